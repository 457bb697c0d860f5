// Copyright 2026 The keystone-client Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::env;
use std::process;

use keystone_client::sync::SyncIdentityClient;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 || args.len() > 5 {
        eprintln!("Usage: check-token <URL> <tenant> <session token> [<admin token file>]");
        eprintln!();
        eprintln!("Without an admin token file the token is re-authenticated,");
        eprintln!("which may extend its validity.");
        process::exit(1);
    }

    let client = SyncIdentityClient::from_url(&args[1]).expect("Invalid identity service URL");
    let result = match args.get(4) {
        Some(path) => client
            .with_admin_token_file(path)
            .get_user_info(&args[3], &args[2]),
        None => client.get_user_info_with_side_effect(&args[3], &args[2]),
    };

    match result {
        Ok(info) => {
            println!("{}", info.username);
            for role in &info.roles {
                println!("  role: {}", role);
            }
        }
        Err(e) => {
            eprintln!("Could not get the user name: {}", e);
            process::exit(1);
        }
    }
}

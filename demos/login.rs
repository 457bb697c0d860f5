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

use keystone_client::{Credentials, IdentityClient};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: login <URL> <username> <password> <tenant>");
        process::exit(1);
    }

    let client = IdentityClient::from_url(&args[1]).expect("Invalid identity service URL");
    let credentials = Credentials::new(args[2].clone(), args[3].clone(), args[4].clone());
    match client.authenticate(&credentials).await {
        Ok(info) => {
            println!("Received token: {}", info.token);
            if let Some(expires) = info.token.expires_at() {
                println!("Expires at: {}", expires);
            }
            println!("Roles: {}", info.roles.join(", "));
        }
        Err(e) => {
            eprintln!("Login failed: {}", e);
            process::exit(1);
        }
    }
}

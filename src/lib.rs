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

//! Minimal client for the OpenStack Identity (Keystone) v2.0 token API.
//!
//! Three things are supported:
//! * Logging in with a user name, a password and a tenant to get a session
//!   token ([IdentityClient::login](struct.IdentityClient.html#method.login)).
//! * Finding out who owns a session token, either through the administrative
//!   endpoint ([get_username](struct.IdentityClient.html#method.get_username))
//!   or by re-authenticating with the token itself
//!   ([get_username_with_side_effect](struct.IdentityClient.html#method.get_username_with_side_effect)).
//! * Reading the administrative token from a local JSON file
//!   ([AdminTokenFile](struct.AdminTokenFile.html)).
//!
//! The client is asynchronous. A blocking wrapper is available in the
//! [sync](sync/index.html) module (enabled by the default `sync` feature).
//!
//! TLS SNI is disabled by default, see [TransportConfig](struct.TransportConfig.html).

// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
// Taken from https://github.com/rust-unofficial/patterns/
#![deny(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    non_shorthand_field_patterns,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_extern_crates,
    unused_import_braces,
    unused_parens,
    unused_qualifications,
    unused_results,
    while_true
)]

mod config;
mod endpoint;
mod error;
mod identity;
#[cfg(feature = "sync")]
pub mod sync;
mod transport;
mod types;

pub use crate::config::ClientConfig;
pub use crate::endpoint::ServiceEndpoint;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::identity::{
    AdminTokenFile, AdminTokenProvider, CachedAdminToken, IdentityClient, DEFAULT_ADMIN_TOKEN_FILE,
};
pub use crate::transport::TransportConfig;
pub use crate::types::{Credentials, SessionToken, UserInfo};

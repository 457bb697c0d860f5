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

//! Synchronous wrapper for the identity client.
//!
//! This module is only available when the `sync` feature is enabled.

use std::future::Future;
use std::path::Path;

use static_assertions::assert_impl_all;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

use crate::{
    AdminTokenProvider, ClientConfig, Credentials, Error, ErrorKind, IdentityClient, Result,
    ServiceEndpoint, SessionToken, TransportConfig, UserInfo,
};

/// A blocking wrapper for an [IdentityClient](../struct.IdentityClient.html).
///
/// Each call blocks the current thread until the request completes or fails.
/// Must not be used from within an asynchronous runtime.
///
/// ```rust,no_run
/// # fn example() -> keystone_client::Result<()> {
/// let client = keystone_client::sync::SyncIdentityClient::from_url(
///     "https://id.example.org/keystone/",
/// )?;
/// let token = client.login("alice", "secret", "tenantA")?;
/// let username = client.get_username_with_side_effect(token.as_str(), "tenantA")?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct SyncIdentityClient {
    inner: IdentityClient,
    runtime: Runtime,
}

assert_impl_all!(SyncIdentityClient: Send, Sync);

impl From<SyncIdentityClient> for IdentityClient {
    fn from(value: SyncIdentityClient) -> IdentityClient {
        value.inner
    }
}

impl SyncIdentityClient {
    /// Create a new synchronous wrapper.
    pub fn new(client: IdentityClient) -> Result<SyncIdentityClient> {
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                Error::new(
                    ErrorKind::TransportFailed,
                    format!("Cannot create a runtime: {}", e),
                )
            })?;
        Ok(SyncIdentityClient {
            inner: client,
            runtime,
        })
    }

    /// Create a client from the base URL with the default transport settings.
    pub fn from_url<U: AsRef<str>>(url: U) -> Result<SyncIdentityClient> {
        SyncIdentityClient::new(IdentityClient::from_url(url)?)
    }

    /// Create a client with the given endpoint and transport settings.
    pub fn with_transport(
        endpoint: ServiceEndpoint,
        transport: &TransportConfig,
    ) -> Result<SyncIdentityClient> {
        SyncIdentityClient::new(IdentityClient::new(endpoint, transport)?)
    }

    /// Create a client from a configuration file.
    ///
    /// See [ClientConfig](../struct.ClientConfig.html) for the format.
    pub fn from_config<P: AsRef<Path>>(path: P) -> Result<SyncIdentityClient> {
        SyncIdentityClient::new(ClientConfig::from_file(path)?.create_client()?)
    }

    /// Enable the administrative token lookup with the given provider.
    pub fn with_admin_token_provider<P>(mut self, provider: P) -> SyncIdentityClient
    where
        P: AdminTokenProvider + 'static,
    {
        self.inner = self.inner.with_admin_token_provider(provider);
        self
    }

    /// Enable the administrative token lookup reading the token from a file.
    pub fn with_admin_token_file<P: AsRef<Path>>(mut self, path: P) -> SyncIdentityClient {
        self.inner = self.inner.with_admin_token_file(path.as_ref());
        self
    }

    /// The asynchronous client.
    #[inline]
    pub fn inner(&self) -> &IdentityClient {
        &self.inner
    }

    /// Log in with a password and return the session token.
    pub fn login<S1, S2, S3>(&self, username: S1, password: S2, tenant: S3) -> Result<SessionToken>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        self.block_on(self.inner.login(username, password, tenant))
    }

    /// Log in with a password and return the token with the user details.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<UserInfo> {
        self.block_on(self.inner.authenticate(credentials))
    }

    /// Get the name of the user owning the token, using the admin endpoint.
    pub fn get_username(&self, user_token: &str, tenant: &str) -> Result<String> {
        self.block_on(self.inner.get_username(user_token, tenant))
    }

    /// Get the user details for the token, using the admin endpoint.
    pub fn get_user_info(&self, user_token: &str, tenant: &str) -> Result<UserInfo> {
        self.block_on(self.inner.get_user_info(user_token, tenant))
    }

    /// Get the name of the user owning the token by re-authenticating with it.
    ///
    /// Has the same side effect as
    /// [IdentityClient::get_username_with_side_effect](../struct.IdentityClient.html#method.get_username_with_side_effect).
    pub fn get_username_with_side_effect(&self, user_token: &str, tenant: &str) -> Result<String> {
        self.block_on(self.inner.get_username_with_side_effect(user_token, tenant))
    }

    /// Get the user details by re-authenticating with the token.
    pub fn get_user_info_with_side_effect(
        &self,
        user_token: &str,
        tenant: &str,
    ) -> Result<UserInfo> {
        self.block_on(self.inner.get_user_info_with_side_effect(user_token, tenant))
    }

    #[inline]
    fn block_on<F: Future>(&self, f: F) -> F::Output {
        self.runtime.block_on(f)
    }
}

#[cfg(test)]
mod test {
    use super::SyncIdentityClient;
    use crate::{ErrorKind, IdentityClient};

    #[test]
    fn test_new() {
        let client = SyncIdentityClient::from_url("http://127.0.0.1:5000/keystone").unwrap();
        assert_eq!(
            client.inner().endpoint().admin_url().as_str(),
            "http://127.0.0.1:5000/keystone_admin/"
        );
        let inner: IdentityClient = client.into();
        assert!(!inner.has_admin_access());
    }

    #[test]
    fn test_get_username_without_admin() {
        let client = SyncIdentityClient::from_url("http://127.0.0.1:5000/keystone").unwrap();
        let err = client.get_username("tok", "tenant").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}

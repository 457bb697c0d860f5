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

//! Client for the Identity API v2.0 token operations.
//!
//! Identity API v3 is not supported.

mod admin;
pub(crate) mod protocol;

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, error, trace};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use static_assertions::assert_impl_all;

use crate::{
    Credentials, Error, ErrorKind, Result, ServiceEndpoint, SessionToken, TransportConfig, UserInfo,
};

pub use self::admin::{AdminTokenFile, AdminTokenProvider, CachedAdminToken, DEFAULT_ADMIN_TOKEN_FILE};

const JSON: &str = "application/json";

/// Client for an identity service speaking the Keystone v2.0 API.
///
/// The client only holds the endpoint URLs, the HTTP client and, optionally,
/// an [AdminTokenProvider](trait.AdminTokenProvider.html). Every call is
/// independent, so a client can be shared between tasks without locking.
///
/// Tokens can be validated in two ways:
/// 1. [get_username](#method.get_username) asks the administrative endpoint
///    about the token. It requires an administrative token provider.
/// 2. [get_username_with_side_effect](#method.get_username_with_side_effect)
///    re-authenticates with the token itself. It works with any valid token,
///    but behaves like a fresh login and may extend the token validity.
///
/// ```rust,no_run
/// # async fn example() -> keystone_client::Result<()> {
/// use keystone_client::{IdentityClient, ServiceEndpoint, TransportConfig};
///
/// let endpoint = ServiceEndpoint::new("https://id.example.org/keystone/")?;
/// let client = IdentityClient::new(endpoint, &TransportConfig::default())?
///     .with_admin_token_file("/usr/local/etc/admintoken.json");
///
/// let token = client.login("alice", "secret", "tenantA").await?;
/// let username = client.get_username(token.as_str(), "tenantA").await?;
/// assert_eq!(username, "alice");
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    endpoint: ServiceEndpoint,
    admin: Option<Arc<dyn AdminTokenProvider>>,
}

assert_impl_all!(IdentityClient: Send, Sync);

impl IdentityClient {
    /// Create a client with the given transport settings.
    ///
    /// The resulting client has no administrative access.
    pub fn new(endpoint: ServiceEndpoint, transport: &TransportConfig) -> Result<IdentityClient> {
        Ok(IdentityClient::new_with_client(
            endpoint,
            transport.build_client()?,
        ))
    }

    /// Create a client from the base URL with the default transport settings.
    pub fn from_url<U: AsRef<str>>(url: U) -> Result<IdentityClient> {
        IdentityClient::new(ServiceEndpoint::new(url)?, &TransportConfig::default())
    }

    /// Create a client with an existing HTTP client.
    pub fn new_with_client(endpoint: ServiceEndpoint, client: Client) -> IdentityClient {
        IdentityClient {
            client,
            endpoint,
            admin: None,
        }
    }

    /// Enable the administrative token lookup with the given provider.
    pub fn with_admin_token_provider<P>(mut self, provider: P) -> IdentityClient
    where
        P: AdminTokenProvider + 'static,
    {
        self.admin = Some(Arc::new(provider));
        self
    }

    /// Enable the administrative token lookup reading the token from a file.
    ///
    /// The file is read again on every lookup.
    #[inline]
    pub fn with_admin_token_file<P: Into<PathBuf>>(self, path: P) -> IdentityClient {
        self.with_admin_token_provider(AdminTokenFile::new(path))
    }

    /// Endpoint URLs in use.
    #[inline]
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Whether the administrative lookup is available.
    #[inline]
    pub fn has_admin_access(&self) -> bool {
        self.admin.is_some()
    }

    /// Log in with a password and return the session token.
    ///
    /// The HTTP status of the response is not inspected: anything that does
    /// not contain `access.token.id` is an invalid response.
    pub async fn login<S1, S2, S3>(
        &self,
        username: S1,
        password: S2,
        tenant: S3,
    ) -> Result<SessionToken>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        let credentials = Credentials::new(username, password, tenant);
        Ok(self.authenticate(&credentials).await?.token)
    }

    /// Log in with a password and return the token with the user details.
    ///
    /// If the service does not report the user name, the one from the
    /// credentials is used.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<UserInfo> {
        debug!(
            "Logging in as {} in tenant {}",
            credentials.username, credentials.tenant
        );
        let body = protocol::AuthRoot::with_password(
            credentials.username.clone(),
            credentials.password.clone(),
            credentials.tenant.clone(),
        );
        let resp = self.post_tokens(&body).await?;
        trace!("Login request returned HTTP {}", resp.status());

        let access = read_access(resp).await?.access;
        let token = access
            .token
            .map(session_token)
            .ok_or_else(|| Error::new_invalid_response("access.token.id"))?;
        let (username, roles) = match access.user {
            Some(user) => {
                let roles = user.role_names();
                let username = user
                    .username()
                    .unwrap_or_else(|| credentials.username.clone());
                (username, roles)
            }
            None => (credentials.username.clone(), Vec::new()),
        };

        debug!("Logged in as {} with roles {:?}", username, roles);
        Ok(UserInfo {
            username,
            roles,
            token,
        })
    }

    /// Get the name of the user owning the token, using the admin endpoint.
    ///
    /// Fails with `InvalidConfig` without issuing any request if the client
    /// has no administrative token provider or the provider fails.
    pub async fn get_username(&self, user_token: &str, tenant: &str) -> Result<String> {
        Ok(self.get_user_info(user_token, tenant).await?.username)
    }

    /// Get the user details for the token, using the admin endpoint.
    ///
    /// Sends `GET <admin>/v2.0/tokens/<token>` authorized with the
    /// administrative token.
    pub async fn get_user_info(&self, user_token: &str, tenant: &str) -> Result<UserInfo> {
        let provider = self.admin.as_ref().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidConfig,
                "Administrative token lookup is not configured for this client",
            )
        })?;
        let admin_token = provider.admin_token().await?;

        let url = self.endpoint.token_url(user_token)?;
        debug!("Looking up a token for tenant {} at the admin endpoint", tenant);
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, JSON)
            .header("x-auth-token", admin_token)
            .send()
            .await
            // The URL contains the token being looked up.
            .map_err(|e| Error::from(e.without_url()))?;

        user_info_from_response(resp, user_token, tenant).await
    }

    /// Get the name of the user owning the token by re-authenticating with it.
    ///
    /// Does not need an administrative token.
    ///
    /// **Side effect**: this is a fresh token login on the identity service.
    /// It may refresh or extend the validity of the token, it does not merely
    /// inspect it.
    pub async fn get_username_with_side_effect(
        &self,
        user_token: &str,
        tenant: &str,
    ) -> Result<String> {
        Ok(self
            .get_user_info_with_side_effect(user_token, tenant)
            .await?
            .username)
    }

    /// Get the user details by re-authenticating with the token.
    ///
    /// Has the same side effect as
    /// [get_username_with_side_effect](#method.get_username_with_side_effect).
    /// The returned token is the one reported by the service.
    pub async fn get_user_info_with_side_effect(
        &self,
        user_token: &str,
        tenant: &str,
    ) -> Result<UserInfo> {
        debug!("Re-authenticating a token for tenant {}", tenant);
        let body = protocol::AuthRoot::with_token(user_token, tenant);
        let resp = self.post_tokens(&body).await?;
        user_info_from_response(resp, user_token, tenant).await
    }

    async fn post_tokens(&self, body: &protocol::AuthRoot) -> Result<Response> {
        let url = self.endpoint.tokens_url()?;
        self.client
            .post(url)
            .header(ACCEPT, JSON)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Request to the identity service failed: {}", e);
                Error::from(e)
            })
    }
}

fn session_token(token: protocol::Token) -> SessionToken {
    let expires_at = token.expires_at();
    let tenant = token.tenant_name();
    SessionToken::new(token.id).with_details(expires_at, tenant)
}

async fn read_access(resp: Response) -> Result<protocol::AccessRoot> {
    let status = resp.status();
    let body = resp.bytes().await.map_err(|e| Error::from(e.without_url()))?;
    serde_json::from_slice(&body).map_err(|e| {
        error!("Invalid response received with HTTP {}: {}", status, e);
        Error::from(e)
    })
}

async fn user_info_from_response(resp: Response, user_token: &str, tenant: &str) -> Result<UserInfo> {
    if let Some(err) = Error::from_validation_status(resp.status(), tenant) {
        debug!("Token validation failed: {}", err);
        return Err(err);
    }

    let access = read_access(resp).await?.access;
    let user = access
        .user
        .ok_or_else(|| Error::new_invalid_response("access.user.username"))?;
    let roles = user.role_names();
    let username = user
        .username()
        .ok_or_else(|| Error::new_invalid_response("access.user.username"))?;
    let token = match access.token {
        Some(token) => session_token(token),
        None => SessionToken::new(user_token),
    };

    debug!("Token belongs to {} with roles {:?}", username, roles);
    Ok(UserInfo {
        username,
        roles,
        token,
    })
}

#[cfg(test)]
pub mod test {
    #![allow(unused_results)]

    use super::IdentityClient;
    use crate::{AdminTokenFile, ErrorKind};

    #[test]
    fn test_client_new() {
        let client = IdentityClient::from_url("http://127.0.0.1:8080/keystone").unwrap();
        assert_eq!(
            client.endpoint().base_url().as_str(),
            "http://127.0.0.1:8080/keystone/"
        );
        assert!(!client.has_admin_access());
    }

    #[test]
    fn test_client_new_invalid() {
        let err = IdentityClient::from_url("http://127.0.0.1 8080/").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_client_with_admin() {
        let client = IdentityClient::from_url("http://127.0.0.1:8080/keystone/")
            .unwrap()
            .with_admin_token_provider(AdminTokenFile::default());
        assert!(client.has_admin_access());
        assert!(client.clone().has_admin_access());
    }

    #[tokio::test]
    async fn test_get_username_without_admin() {
        let client = IdentityClient::from_url("http://127.0.0.1:8080/keystone/").unwrap();
        let err = client.get_username("tok", "tenant").await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}

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

//! Identity service endpoint URLs.

use log::debug;
use reqwest::Url;

use crate::{Error, ErrorKind, Result};

const PUBLIC_PATH: &str = "/keystone/";
const ADMIN_PATH: &str = "/keystone_admin";
const TOKENS_PATH: &str = "v2.0/tokens";

/// Base URL of the identity service and its administrative counterpart.
///
/// The base URL points at the service root without the `v2.0` part, e.g.
/// `https://id.example.com/keystone/`. The administrative URL is derived by
/// replacing `/keystone/` with `/keystone_admin` in the base URL. If the base
/// URL does not contain `/keystone/`, the administrative URL is the base URL.
///
/// Both URLs always end with a slash, so that the API paths are appended to
/// them instead of replacing their last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    base: Url,
    admin: Url,
}

impl ServiceEndpoint {
    /// Create an endpoint from the base URL, deriving the administrative URL.
    pub fn new<U: AsRef<str>>(url: U) -> Result<ServiceEndpoint> {
        let base = normalize(url.as_ref())?;
        let admin = derive_admin_url(&base);
        debug!("Using identity endpoint {} (admin endpoint {})", base, admin);
        Ok(ServiceEndpoint { base, admin })
    }

    /// Use an explicit administrative URL instead of the derived one.
    pub fn with_admin_url<U: AsRef<str>>(mut self, url: U) -> Result<ServiceEndpoint> {
        self.admin = normalize(url.as_ref())?;
        Ok(self)
    }

    /// Base URL of the service.
    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Administrative URL of the service.
    #[inline]
    pub fn admin_url(&self) -> &Url {
        &self.admin
    }

    /// URL for issuing tokens: `<base>/v2.0/tokens`.
    pub(crate) fn tokens_url(&self) -> Result<Url> {
        join(&self.base, TOKENS_PATH)
    }

    /// URL for inspecting a token: `<admin>/v2.0/tokens/<token>`.
    ///
    /// The token is always a single path segment, whatever it contains.
    pub(crate) fn token_url(&self, token: &str) -> Result<Url> {
        let mut url = join(&self.admin, TOKENS_PATH)?;
        let _ = url
            .path_segments_mut()
            .map_err(|_| Error::new(ErrorKind::InvalidConfig, "Invalid admin URL: wrong schema?"))?
            .push(token);
        Ok(url)
    }
}

fn normalize(url: &str) -> Result<Url> {
    if url.is_empty() {
        return Err(Error::new(ErrorKind::InvalidConfig, "Empty identity service URL"));
    }

    let mut result = Url::parse(url).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Invalid identity service URL {}: {}", url, e),
        )
    })?;

    let _ = result
        .path_segments_mut()
        .map_err(|_| Error::new(ErrorKind::InvalidConfig, "Invalid identity service URL: wrong schema?"))?
        .pop_if_empty()
        .push("");

    Ok(result)
}

fn derive_admin_url(base: &Url) -> Url {
    let replaced = base.as_str().replace(PUBLIC_PATH, ADMIN_PATH);
    if replaced == base.as_str() {
        return base.clone();
    }

    match normalize(&replaced) {
        Ok(admin) => admin,
        Err(e) => {
            debug!("Cannot derive an admin URL from {}, using it as is: {}", base, e);
            base.clone()
        }
    }
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot build an API URL from {}: {}", base, e),
        )
    })
}

#[cfg(test)]
pub mod test {
    use super::ServiceEndpoint;
    use crate::ErrorKind;

    #[test]
    fn test_admin_url_derived() {
        let ep = ServiceEndpoint::new("https://id.example.org/keystone/").unwrap();
        assert_eq!(ep.base_url().as_str(), "https://id.example.org/keystone/");
        assert_eq!(ep.admin_url().as_str(), "https://id.example.org/keystone_admin/");
    }

    #[test]
    fn test_admin_url_derived_without_trailing_slash() {
        let ep = ServiceEndpoint::new("https://id.example.org/keystone").unwrap();
        assert_eq!(ep.base_url().as_str(), "https://id.example.org/keystone/");
        assert_eq!(ep.admin_url().as_str(), "https://id.example.org/keystone_admin/");
    }

    #[test]
    fn test_admin_url_fallback() {
        let ep = ServiceEndpoint::new("http://127.0.0.1:5000/identity").unwrap();
        assert_eq!(ep.base_url().as_str(), "http://127.0.0.1:5000/identity/");
        assert_eq!(ep.admin_url(), ep.base_url());
    }

    #[test]
    fn test_admin_url_explicit() {
        let ep = ServiceEndpoint::new("https://id.example.org/keystone/")
            .unwrap()
            .with_admin_url("https://admin.example.org:35357")
            .unwrap();
        assert_eq!(ep.admin_url().as_str(), "https://admin.example.org:35357/");
    }

    #[test]
    fn test_tokens_url() {
        let ep = ServiceEndpoint::new("https://id.example.org/keystone").unwrap();
        assert_eq!(
            ep.tokens_url().unwrap().as_str(),
            "https://id.example.org/keystone/v2.0/tokens"
        );
    }

    #[test]
    fn test_token_url() {
        let ep = ServiceEndpoint::new("https://id.example.org/keystone/").unwrap();
        assert_eq!(
            ep.token_url("tok-123").unwrap().as_str(),
            "https://id.example.org/keystone_admin/v2.0/tokens/tok-123"
        );
    }

    #[test]
    fn test_token_url_escapes_token() {
        let ep = ServiceEndpoint::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(
            ep.token_url("a/b?c").unwrap().as_str(),
            "http://127.0.0.1:5000/v2.0/tokens/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_invalid_urls() {
        for url in &["", "http://127.0.0.1 5000/", "mailto:admin@example.org"] {
            let err = ServiceEndpoint::new(url).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        }
    }
}

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

//! Administrative token providers.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, error};
use static_assertions::assert_impl_all;
use tokio::sync::RwLock;

use super::protocol;
use crate::{Error, ErrorKind, Result};

/// Location of the administrative token file if nothing else is configured.
pub const DEFAULT_ADMIN_TOKEN_FILE: &str = "/usr/local/etc/admintoken.json";

/// Source of the administrative token used to inspect other users' tokens.
///
/// An [IdentityClient](../struct.IdentityClient.html) configured with a
/// provider can use the administrative lookup; one without can only validate
/// tokens by re-authenticating them.
#[async_trait]
pub trait AdminTokenProvider: Debug + Send + Sync {
    /// Get the administrative token.
    async fn admin_token(&self) -> Result<String>;
}

/// Administrative token stored in a local JSON file.
///
/// The file is expected to look like `{"admintoken": "<token>"}` and is read
/// again on every call, so a rotated token is picked up without a restart.
/// Wrap it in a [CachedAdminToken](struct.CachedAdminToken.html) to read it
/// only once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminTokenFile {
    path: PathBuf,
}

assert_impl_all!(AdminTokenFile: Send, Sync);

impl AdminTokenFile {
    /// Read the token from the given file.
    pub fn new<P: Into<PathBuf>>(path: P) -> AdminTokenFile {
        AdminTokenFile { path: path.into() }
    }

    /// Path to the token file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the token file.
    pub async fn read(&self) -> Result<String> {
        debug!("Reading the admin token from {}", self.path.display());
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            error!("Cannot read admin token file {}: {}", self.path.display(), e);
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot read admin token file {}: {}", self.path.display(), e),
            )
        })?;

        let parsed: protocol::AdminToken = serde_json::from_slice(&content).map_err(|e| {
            error!("Cannot parse admin token file {}: {}", self.path.display(), e);
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Error parsing admin token file {}: {}", self.path.display(), e),
            )
        })?;
        Ok(parsed.admintoken)
    }
}

impl Default for AdminTokenFile {
    fn default() -> AdminTokenFile {
        AdminTokenFile::new(DEFAULT_ADMIN_TOKEN_FILE)
    }
}

#[async_trait]
impl AdminTokenProvider for AdminTokenFile {
    async fn admin_token(&self) -> Result<String> {
        self.read().await
    }
}

/// A provider that remembers the first token it gets.
///
/// The cached value stays until [invalidate](#method.invalidate) is called.
/// Failures are not cached.
#[derive(Debug)]
pub struct CachedAdminToken<P> {
    inner: P,
    cached: RwLock<Option<String>>,
}

impl<P: AdminTokenProvider> CachedAdminToken<P> {
    /// Wrap a provider.
    pub fn new(inner: P) -> CachedAdminToken<P> {
        CachedAdminToken {
            inner,
            cached: RwLock::new(None),
        }
    }

    /// Drop the cached token, the next call will consult the inner provider.
    pub async fn invalidate(&self) {
        debug!("Invalidating the cached admin token");
        *self.cached.write().await = None;
    }

    /// The wrapped provider.
    #[inline]
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: AdminTokenProvider> AdminTokenProvider for CachedAdminToken<P> {
    async fn admin_token(&self) -> Result<String> {
        if let Some(ref value) = *self.cached.read().await {
            return Ok(value.clone());
        }

        let mut lock = self.cached.write().await;
        // Another task may have filled the cache while we were waiting.
        if let Some(ref value) = *lock {
            return Ok(value.clone());
        }

        let value = self.inner.admin_token().await?;
        *lock = Some(value.clone());
        Ok(value)
    }
}

#[cfg(test)]
pub mod test {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::{AdminTokenFile, AdminTokenProvider, CachedAdminToken, DEFAULT_ADMIN_TOKEN_FILE};
    use crate::ErrorKind;

    fn token_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_read_token() {
        let file = token_file(r#"{"admintoken": "adm-1"}"#);
        let provider = AdminTokenFile::new(file.path());
        assert_eq!(provider.admin_token().await.unwrap(), "adm-1");
    }

    #[tokio::test]
    async fn test_token_reread() {
        let file = token_file(r#"{"admintoken": "adm-1"}"#);
        let provider = AdminTokenFile::new(file.path());
        assert_eq!(provider.admin_token().await.unwrap(), "adm-1");
        std::fs::write(file.path(), r#"{"admintoken": "adm-2"}"#).unwrap();
        assert_eq!(provider.admin_token().await.unwrap(), "adm-2");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let provider = AdminTokenFile::new("/nonexistent/admintoken.json");
        let err = provider.admin_token().await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[tokio::test]
    async fn test_invalid_files() {
        for content in &["not json", r#"{"token": "adm-1"}"#, r#"{"admintoken": 42}"#, "[]"] {
            let file = token_file(content);
            let err = AdminTokenFile::new(file.path())
                .admin_token()
                .await
                .err()
                .unwrap();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig, "{}", content);
        }
    }

    #[test]
    fn test_default_path() {
        assert_eq!(
            AdminTokenFile::default().path().to_str(),
            Some(DEFAULT_ADMIN_TOKEN_FILE)
        );
    }

    #[tokio::test]
    async fn test_cached_until_invalidated() {
        let file = token_file(r#"{"admintoken": "adm-1"}"#);
        let provider = CachedAdminToken::new(AdminTokenFile::new(file.path()));
        assert_eq!(provider.admin_token().await.unwrap(), "adm-1");

        std::fs::write(file.path(), r#"{"admintoken": "adm-2"}"#).unwrap();
        assert_eq!(provider.admin_token().await.unwrap(), "adm-1");

        provider.invalidate().await;
        assert_eq!(provider.admin_token().await.unwrap(), "adm-2");
    }

    #[tokio::test]
    async fn test_cached_failure_not_remembered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admintoken.json");
        let provider = CachedAdminToken::new(AdminTokenFile::new(&path));
        assert!(provider.admin_token().await.is_err());

        std::fs::write(&path, r#"{"admintoken": "adm-1"}"#).unwrap();
        assert_eq!(provider.admin_token().await.unwrap(), "adm-1");
    }
}

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

//! Support for a client configuration file.
//!
//! The file is YAML:
//!
//! ```yaml
//! auth_url: https://id.example.org/keystone/
//! # Optional, derived from auth_url by default.
//! admin_url: https://id.example.org/keystone_admin/
//! # Set to false to disable the administrative lookup.
//! admin_lookup: true
//! admin_token_file: /usr/local/etc/admintoken.json
//! cache_admin_token: false
//! transport:
//!   sni: false
//!   ca_cert_file: /etc/ssl/certs/identity-ca.pem
//!   connect_timeout: 5
//!   timeout: 30
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde_derive::Deserialize;

use crate::identity::{AdminTokenFile, CachedAdminToken, DEFAULT_ADMIN_TOKEN_FILE};
use crate::{Error, ErrorKind, IdentityClient, Result, ServiceEndpoint, TransportConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Transport {
    #[serde(default)]
    sni: bool,
    #[serde(default)]
    ca_cert_file: Option<PathBuf>,
    #[serde(default)]
    connect_timeout: Option<u64>,
    #[serde(default)]
    timeout: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct Root {
    auth_url: String,
    #[serde(default)]
    admin_url: Option<String>,
    #[serde(default = "default_true")]
    admin_lookup: bool,
    #[serde(default)]
    admin_token_file: Option<PathBuf>,
    #[serde(default)]
    cache_admin_token: bool,
    #[serde(default)]
    transport: Transport,
}

fn default_true() -> bool {
    true
}

/// Client configuration loaded from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    endpoint: ServiceEndpoint,
    transport: TransportConfig,
    admin_token_file: Option<PathBuf>,
    cache_admin_token: bool,
}

impl ClientConfig {
    /// Load the configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
        let path = path.as_ref();
        debug!("Loading client configuration from {}", path.display());
        let file = File::open(path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot read {}: {}", path.display(), e),
            )
        })?;
        let root: Root = serde_yaml::from_reader(file).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot parse {}: {}", path.display(), e),
            )
        })?;
        ClientConfig::from_root(root)
    }

    /// Load the configuration from a YAML string.
    pub fn from_yaml<S: AsRef<str>>(value: S) -> Result<ClientConfig> {
        let root: Root = serde_yaml::from_str(value.as_ref()).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot parse client configuration: {}", e),
            )
        })?;
        ClientConfig::from_root(root)
    }

    fn from_root(root: Root) -> Result<ClientConfig> {
        let mut endpoint = ServiceEndpoint::new(&root.auth_url)?;
        if let Some(admin_url) = root.admin_url {
            endpoint = endpoint.with_admin_url(admin_url)?;
        }

        let mut transport = TransportConfig::new().with_sni(root.transport.sni);
        if let Some(path) = root.transport.ca_cert_file {
            transport.set_ca_cert_file(path);
        }
        if let Some(secs) = root.transport.connect_timeout {
            transport.set_connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = root.transport.timeout {
            transport.set_timeout(Duration::from_secs(secs));
        }

        let admin_token_file = if root.admin_lookup {
            Some(
                root.admin_token_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_ADMIN_TOKEN_FILE)),
            )
        } else {
            None
        };

        Ok(ClientConfig {
            endpoint,
            transport,
            admin_token_file,
            cache_admin_token: root.cache_admin_token,
        })
    }

    /// Identity service endpoint.
    #[inline]
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Transport settings.
    #[inline]
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Administrative token file, if the administrative lookup is enabled.
    #[inline]
    pub fn admin_token_file(&self) -> Option<&Path> {
        self.admin_token_file.as_deref()
    }

    /// Whether the administrative token is read only once.
    #[inline]
    pub fn cache_admin_token(&self) -> bool {
        self.cache_admin_token
    }

    /// Create a client according to the configuration.
    pub fn create_client(&self) -> Result<IdentityClient> {
        let client = IdentityClient::new(self.endpoint.clone(), &self.transport)?;
        Ok(match self.admin_token_file {
            Some(ref path) if self.cache_admin_token => {
                client.with_admin_token_provider(CachedAdminToken::new(AdminTokenFile::new(path)))
            }
            Some(ref path) => client.with_admin_token_file(path),
            None => client,
        })
    }
}

#[cfg(test)]
pub mod test {
    use std::io::Write;
    use std::time::Duration;

    use super::ClientConfig;
    use crate::identity::DEFAULT_ADMIN_TOKEN_FILE;
    use crate::ErrorKind;

    #[test]
    fn test_minimal() {
        let cfg = ClientConfig::from_yaml("auth_url: https://id.example.org/keystone/").unwrap();
        assert_eq!(
            cfg.endpoint().admin_url().as_str(),
            "https://id.example.org/keystone_admin/"
        );
        assert!(!cfg.transport().sni());
        assert_eq!(
            cfg.admin_token_file().and_then(|p| p.to_str()),
            Some(DEFAULT_ADMIN_TOKEN_FILE)
        );
        assert!(!cfg.cache_admin_token());
        assert!(cfg.create_client().unwrap().has_admin_access());
    }

    #[test]
    fn test_full() {
        let cfg = ClientConfig::from_yaml(
            r#"
auth_url: https://id.example.org/identity
admin_url: https://admin.example.org:35357/
admin_token_file: /etc/keystone/admintoken.json
cache_admin_token: true
transport:
  sni: true
  connect_timeout: 5
  timeout: 30
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.endpoint().base_url().as_str(),
            "https://id.example.org/identity/"
        );
        assert_eq!(
            cfg.endpoint().admin_url().as_str(),
            "https://admin.example.org:35357/"
        );
        assert_eq!(
            cfg.admin_token_file().and_then(|p| p.to_str()),
            Some("/etc/keystone/admintoken.json")
        );
        assert!(cfg.cache_admin_token());
        assert!(cfg.transport().sni());
        assert_eq!(cfg.transport().connect_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.transport().timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_without_admin_lookup() {
        let cfg = ClientConfig::from_yaml(
            "auth_url: https://id.example.org/keystone/\nadmin_lookup: false\n",
        )
        .unwrap();
        assert!(cfg.admin_token_file().is_none());
        assert!(!cfg.create_client().unwrap().has_admin_access());
    }

    #[test]
    fn test_invalid() {
        for value in &[
            "",
            "admin_url: https://id.example.org/",
            "auth_url: not a url",
            "auth_url: https://id.example.org/\nunknown: 1\n",
        ] {
            let err = ClientConfig::from_yaml(value).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig, "{}", value);
        }
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"auth_url: http://127.0.0.1:5000/\n").unwrap();
        file.flush().unwrap();
        let cfg = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.endpoint().base_url().as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::from_file("/nonexistent/keystone.yaml")
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}

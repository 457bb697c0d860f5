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

//! HTTP transport settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::{Error, ErrorKind, Result};

/// Settings of the HTTP(s) client used to talk to the identity service.
///
/// The defaults reproduce the environment the client was designed for: the
/// TLS Server Name Indication extension is **disabled**, the system trust
/// store is used and there are no timeouts. Calls block until the transport
/// completes or fails.
///
/// ```rust
/// use std::time::Duration;
///
/// let transport = keystone_client::TransportConfig::new()
///     .with_sni(true)
///     .with_connect_timeout(Duration::from_secs(5));
/// assert!(transport.sni());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportConfig {
    sni: bool,
    ca_cert_file: Option<PathBuf>,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
}

impl TransportConfig {
    /// Default transport settings (SNI disabled, no timeouts).
    pub fn new() -> TransportConfig {
        TransportConfig::default()
    }

    /// Enable or disable the TLS SNI extension.
    #[inline]
    pub fn set_sni(&mut self, sni: bool) {
        self.sni = sni;
    }

    /// Enable or disable the TLS SNI extension.
    #[inline]
    pub fn with_sni(mut self, sni: bool) -> Self {
        self.set_sni(sni);
        self
    }

    /// Trust an additional CA certificate (PEM) from the given file.
    #[inline]
    pub fn set_ca_cert_file<P: Into<PathBuf>>(&mut self, path: P) {
        self.ca_cert_file = Some(path.into());
    }

    /// Trust an additional CA certificate (PEM) from the given file.
    #[inline]
    pub fn with_ca_cert_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.set_ca_cert_file(path);
        self
    }

    /// Limit the time to establish a connection.
    #[inline]
    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.connect_timeout = Some(timeout);
    }

    /// Limit the time to establish a connection.
    #[inline]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.set_connect_timeout(timeout);
        self
    }

    /// Limit the total time of a request.
    #[inline]
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Limit the total time of a request.
    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.set_timeout(timeout);
        self
    }

    /// Whether SNI is enabled.
    #[inline]
    pub fn sni(&self) -> bool {
        self.sni
    }

    /// Additional CA certificate file (if any).
    #[inline]
    pub fn ca_cert_file(&self) -> Option<&Path> {
        self.ca_cert_file.as_deref()
    }

    /// Connection timeout (if any).
    #[inline]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Request timeout (if any).
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build an HTTP client with these settings.
    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder();

        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = self.configure_tls(builder)?;

        builder.build().map_err(|e| {
            Error::new(
                ErrorKind::TransportFailed,
                format!("Cannot create an HTTP client: {}", e),
            )
        })
    }

    #[cfg(any(feature = "native-tls", feature = "rustls"))]
    fn configure_tls(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder> {
        debug!("TLS SNI extension enabled: {}", self.sni);
        let mut builder = builder.tls_sni(self.sni);

        if let Some(ref path) = self.ca_cert_file {
            let pem = std::fs::read(path).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidConfig,
                    format!("Cannot read CA certificate {}: {}", path.display(), e),
                )
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidConfig,
                    format!("Invalid CA certificate {}: {}", path.display(), e),
                )
            })?;
            debug!("Trusting additional CA certificate from {}", path.display());
            builder = builder.add_root_certificate(cert);
        }

        Ok(builder)
    }

    #[cfg(not(any(feature = "native-tls", feature = "rustls")))]
    fn configure_tls(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder> {
        if self.ca_cert_file.is_some() {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "A CA certificate requires the native-tls or rustls feature",
            ));
        }
        debug!("Built without TLS support, only plain HTTP is available");
        Ok(builder)
    }
}

#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use super::TransportConfig;
    use crate::ErrorKind;

    #[test]
    fn test_defaults() {
        let transport = TransportConfig::new();
        assert!(!transport.sni());
        assert!(transport.ca_cert_file().is_none());
        assert!(transport.connect_timeout().is_none());
        assert!(transport.timeout().is_none());
        let _ = transport.build_client().unwrap();
    }

    #[test]
    fn test_with_timeouts() {
        let transport = TransportConfig::new()
            .with_sni(true)
            .with_connect_timeout(Duration::from_secs(3))
            .with_timeout(Duration::from_secs(30));
        assert!(transport.sni());
        assert_eq!(transport.connect_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(transport.timeout(), Some(Duration::from_secs(30)));
        let _ = transport.build_client().unwrap();
    }

    #[test]
    fn test_missing_ca_file() {
        let err = TransportConfig::new()
            .with_ca_cert_file("/nonexistent/ca.pem")
            .build_client()
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[cfg(feature = "native-tls")]
    #[test]
    fn test_invalid_ca_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a certificate").unwrap();
        let err = TransportConfig::new()
            .with_ca_cert_file(file.path())
            .build_client()
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}

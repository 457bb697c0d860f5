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

//! Error and Result implementations.

use std::fmt;

use reqwest::Error as HttpClientError;
use reqwest::StatusCode;

/// Kind of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Connection or stream failure.
    ///
    /// Covers unreachable hosts, TLS handshake failures and I/O errors in the
    /// middle of a request.
    TransportFailed,

    /// Response received from the server is malformed.
    ///
    /// Either the body is not JSON or an expected field is missing.
    InvalidResponse,

    /// The identity service rejected a token/tenant pair.
    ///
    /// Maps to HTTP 401 on validation requests.
    AuthorizationFailed,

    /// A validation request failed with an unexpected HTTP status.
    ///
    /// Any status other than 200, 203 or 401. Most likely bad authorization
    /// as well, but the service gives no way to tell.
    LookupFailed,

    /// Local configuration is missing or invalid.
    ///
    /// Includes the administrative token file, the configuration file, the
    /// service URL and TLS material.
    InvalidConfig,
}

/// Error from an identity service call.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    status: Option<StatusCode>,
    message: Option<String>,
}

/// Result of an identity service call.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Create a new error of the provided kind.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Error {
        Error {
            kind,
            status: None,
            message: Some(message.into()),
        }
    }

    /// Create with providing all details.
    pub(crate) fn new_with_details(
        kind: ErrorKind,
        status: Option<StatusCode>,
        message: Option<String>,
    ) -> Error {
        Error {
            kind,
            status,
            message,
        }
    }

    /// Error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code (if any).
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Error message (if any).
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Helper - error of kind InvalidResponse.
    pub(crate) fn new_invalid_response<D: fmt::Display>(field: D) -> Error {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Missing {} in the response", field),
        )
    }

    /// Map a validation status code to an error, if it is not a success.
    ///
    /// Only 200 and 203 are accepted. 401 means the token/tenant pair is not
    /// valid, everything else collapses into a lookup failure.
    pub(crate) fn from_validation_status(status: StatusCode, tenant: &str) -> Option<Error> {
        match status {
            StatusCode::OK | StatusCode::NON_AUTHORITATIVE_INFORMATION => None,
            StatusCode::UNAUTHORIZED => Some(Error::new_with_details(
                ErrorKind::AuthorizationFailed,
                Some(status),
                Some(format!("The token is not valid for tenant {}", tenant)),
            )),
            other => Some(Error::new_with_details(
                ErrorKind::LookupFailed,
                Some(other),
                Some(format!(
                    "Could not get the user name (HTTP {}), most likely bad authorization",
                    other
                )),
            )),
        }
    }
}

impl ErrorKind {
    /// Short description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::TransportFailed => "Error when accessing the identity service",
            ErrorKind::InvalidResponse => "Received invalid response",
            ErrorKind::AuthorizationFailed => "Bad authorization",
            ErrorKind::LookupFailed => "Token lookup failed",
            ErrorKind::InvalidConfig => "Invalid configuration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(ref msg) = self.message {
            write!(f, ": {}", msg)
        } else {
            Ok(())
        }
    }
}

impl ::std::error::Error for Error {}

impl From<HttpClientError> for Error {
    fn from(value: HttpClientError) -> Error {
        let kind = if value.is_builder() {
            ErrorKind::InvalidConfig
        } else if value.is_decode() {
            ErrorKind::InvalidResponse
        } else {
            ErrorKind::TransportFailed
        };

        Error::new_with_details(kind, value.status(), Some(value.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Error {
        Error::new(
            ErrorKind::InvalidResponse,
            format!("Cannot parse JSON: {}", value),
        )
    }
}

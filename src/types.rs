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

//! Data model shared by the client operations.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset};

/// User credentials for a password login.
///
/// Supplied per call and never stored by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Name of the tenant to scope the token to.
    pub tenant: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new<S1, S2, S3>(username: S1, password: S2, tenant: S3) -> Credentials
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Credentials {
            username: username.into(),
            password: password.into(),
            tenant: tenant.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("tenant", &self.tenant)
            .finish()
    }
}

/// An opaque session token issued by the identity service.
///
/// The value is echoed back to the service on later calls and never
/// interpreted.
#[derive(Clone)]
pub struct SessionToken {
    value: String,
    expires_at: Option<DateTime<FixedOffset>>,
    tenant: Option<String>,
}

/// Tokens are equal when their values are, regardless of the reported details.
impl PartialEq for SessionToken {
    fn eq(&self, other: &SessionToken) -> bool {
        self.value == other.value
    }
}

impl Eq for SessionToken {}

impl SessionToken {
    /// Wrap a raw token value.
    pub fn new<S: Into<String>>(value: S) -> SessionToken {
        SessionToken {
            value: value.into(),
            expires_at: None,
            tenant: None,
        }
    }

    pub(crate) fn with_details(
        mut self,
        expires_at: Option<DateTime<FixedOffset>>,
        tenant: Option<String>,
    ) -> SessionToken {
        self.expires_at = expires_at;
        self.tenant = tenant;
        self
    }

    /// Token value as sent in the `X-Auth-Token` header.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume the token and return its value.
    #[inline]
    pub fn into_string(self) -> String {
        self.value
    }

    /// Expiration time as reported by the service (if any).
    #[inline]
    pub fn expires_at(&self) -> Option<&DateTime<FixedOffset>> {
        self.expires_at.as_ref()
    }

    /// Name of the tenant the token is scoped to (if reported).
    #[inline]
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hasher = DefaultHasher::new();
        self.value.hash(&mut hasher);
        write!(
            f,
            "SessionToken {{ value: hash({}), expires_at: {:?}, tenant: {:?} }}",
            hasher.finish(),
            self.expires_at,
            self.tenant
        )
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> String {
        value.value
    }
}

/// Who a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    /// Name of the user owning the token.
    pub username: String,
    /// Names of the roles the user has in the tenant.
    pub roles: Vec<String>,
    /// The token itself.
    pub token: SessionToken,
}

impl UserInfo {
    /// Whether the user has a role with the given name.
    pub fn has_role<S: AsRef<str>>(&self, role: S) -> bool {
        self.roles.iter().any(|r| r == role.as_ref())
    }
}

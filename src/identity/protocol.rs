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

//! JSON structures and protocol bits for the Identity V2 API.

#![allow(missing_docs)]

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use log::warn;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PasswordCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenId {
    pub id: String,
}

/// Authentication method of a token request.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub enum Identity {
    #[serde(rename = "passwordCredentials")]
    Password(PasswordCredentials),
    #[serde(rename = "token")]
    Token(TokenId),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Auth {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(rename = "tenantName")]
    pub tenant_name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AuthRoot {
    pub auth: Auth,
}

/// Token details. Only `id` is required, other fields are read leniently.
#[derive(Clone, Debug, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(default)]
    pub expires: Option<Value>,
    #[serde(default)]
    pub tenant: Option<Value>,
}

/// User details. Fields of an unexpected shape are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub roles: Option<Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Access {
    #[serde(default)]
    pub token: Option<Token>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccessRoot {
    pub access: Access,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AdminToken {
    pub admintoken: String,
}

impl AuthRoot {
    pub fn with_password<S1, S2, S3>(username: S1, password: S2, tenant_name: S3) -> AuthRoot
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        AuthRoot {
            auth: Auth {
                identity: Identity::Password(PasswordCredentials {
                    username: username.into(),
                    password: password.into(),
                }),
                tenant_name: tenant_name.into(),
            },
        }
    }

    pub fn with_token<S1, S2>(token: S1, tenant_name: S2) -> AuthRoot
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        AuthRoot {
            auth: Auth {
                identity: Identity::Token(TokenId { id: token.into() }),
                tenant_name: tenant_name.into(),
            },
        }
    }
}

impl Token {
    /// Expiration time, if present and understood.
    ///
    /// Keystone reports either RFC 3339 timestamps or naive UTC ones.
    pub fn expires_at(&self) -> Option<DateTime<FixedOffset>> {
        let value = match self.expires.as_ref()? {
            Value::String(value) => value,
            Value::Null => return None,
            other => {
                warn!("Ignoring token expiration time of unexpected type: {}", other);
                return None;
            }
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt);
        }
        match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            Ok(naive) => Some(naive.and_utc().fixed_offset()),
            Err(e) => {
                warn!("Cannot parse token expiration time {}: {}", value, e);
                None
            }
        }
    }

    /// Name of the tenant the token is scoped to.
    pub fn tenant_name(&self) -> Option<String> {
        match self.tenant.as_ref()? {
            Value::Object(tenant) => match tenant.get("name") {
                Some(Value::String(name)) => Some(name.clone()),
                _ => None,
            },
            Value::Null => None,
            other => {
                warn!("Ignoring token tenant of unexpected type: {}", other);
                None
            }
        }
    }
}

impl User {
    /// User name, if reported as a string.
    pub fn username(&self) -> Option<String> {
        match self.username.as_ref()? {
            Value::String(name) => Some(name.clone()),
            Value::Null => None,
            other => {
                warn!("Ignoring user name of unexpected type: {}", other);
                None
            }
        }
    }

    /// Names of the roles, skipping entries without a string name.
    pub fn role_names(&self) -> Vec<String> {
        let roles = match self.roles.as_ref() {
            Some(Value::Array(roles)) => roles,
            None | Some(Value::Null) => return Vec::new(),
            Some(other) => {
                warn!("Ignoring roles of unexpected type: {}", other);
                return Vec::new();
            }
        };
        roles
            .iter()
            .filter_map(|role| match role.get("name") {
                Some(Value::String(name)) => Some(name.clone()),
                _ => {
                    warn!("Ignoring role without a name: {}", role);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
pub mod test {
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    use super::{AccessRoot, AuthRoot};

    #[test]
    fn test_password_body() {
        let body = AuthRoot::with_password("alice", "secret", "tenantA");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "auth": {
                    "passwordCredentials": {"username": "alice", "password": "secret"},
                    "tenantName": "tenantA"
                }
            })
        );
    }

    #[test]
    fn test_token_body() {
        let body = AuthRoot::with_token("tok-123", "tenantA");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"auth": {"token": {"id": "tok-123"}, "tenantName": "tenantA"}})
        );
    }

    #[test]
    fn test_parse_access() {
        let root: AccessRoot = serde_json::from_value(json!({
            "access": {
                "token": {
                    "id": "tok-123",
                    "expires": "2026-10-17T08:30:00Z",
                    "tenant": {"id": "t1", "name": "tenantA"}
                },
                "user": {
                    "id": "u1",
                    "username": "alice",
                    "name": "alice",
                    "roles": [{"name": "member"}, {"name": "admin"}]
                },
                "serviceCatalog": []
            }
        }))
        .unwrap();
        let token = root.access.token.unwrap();
        assert_eq!(token.id, "tok-123");
        assert_eq!(token.tenant_name().as_deref(), Some("tenantA"));
        let expires = token.expires_at().unwrap();
        assert_eq!(expires.year(), 2026);
        assert_eq!(expires.hour(), 8);
        let user = root.access.user.unwrap();
        assert_eq!(user.username().as_deref(), Some("alice"));
        assert_eq!(user.role_names(), vec!["member", "admin"]);
    }

    #[test]
    fn test_parse_naive_expiration() {
        let root: AccessRoot = serde_json::from_value(json!({
            "access": {"token": {"id": "tok", "expires": "2026-10-17T08:30:00.000000"}}
        }))
        .unwrap();
        let expires = root.access.token.unwrap().expires_at().unwrap();
        assert_eq!(expires.minute(), 30);
        assert_eq!(expires.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_garbage_expiration() {
        let root: AccessRoot = serde_json::from_value(json!({
            "access": {"token": {"id": "tok", "expires": "tomorrow"}}
        }))
        .unwrap();
        assert!(root.access.token.unwrap().expires_at().is_none());
    }

    #[test]
    fn test_parse_odd_optional_fields() {
        let root: AccessRoot = serde_json::from_value(json!({
            "access": {
                "token": {"id": "tok-1", "expires": 1760000000, "tenant": "tenantA"},
                "user": {"username": "alice", "roles": [{"id": "r1"}, {"name": "member"}, "admin"]}
            }
        }))
        .unwrap();
        let token = root.access.token.unwrap();
        assert_eq!(token.id, "tok-1");
        assert!(token.expires_at().is_none());
        assert!(token.tenant_name().is_none());
        let user = root.access.user.unwrap();
        assert_eq!(user.username().as_deref(), Some("alice"));
        assert_eq!(user.role_names(), vec!["member"]);
    }

    #[test]
    fn test_parse_roles_not_a_list() {
        let root: AccessRoot = serde_json::from_value(json!({
            "access": {"user": {"username": 42, "roles": {"name": "member"}}}
        }))
        .unwrap();
        let user = root.access.user.unwrap();
        assert!(user.username().is_none());
        assert!(user.role_names().is_empty());
    }
}

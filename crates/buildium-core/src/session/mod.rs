//! Session configuration and its on-disk store
//!
//! The session is a flat record (environment + auth token) persisted as JSON
//! next to the running executable. It is loaded once per process and only
//! rewritten after a successful login.

pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use store::{ConfigSource, CredentialStore, LoadedSession, CONFIG_PATH_ENV};

/// Backend environment the CLI talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    #[default]
    Prod,
    /// Build-time placeholder with no backend configured
    Building,
    /// Local development stack; also used for unrecognised tags
    Local,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "PROD",
            Environment::Building => "BUILDING",
            Environment::Local => "LOCAL",
        }
    }
}

impl From<String> for Environment {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "PROD" => Environment::Prod,
            "BUILDING" => Environment::Building,
            _ => Environment::Local,
        }
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default)]
    pub environment: Environment,

    /// Session token issued at login; empty means not logged in
    #[serde(default)]
    pub auth_token: String,
}

impl SessionConfig {
    pub fn is_logged_in(&self) -> bool {
        !self.auth_token.is_empty()
    }
}

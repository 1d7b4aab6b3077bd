//! Error taxonomy shared by the session store, backend client and scaffolder

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Not logged in, or the selected environment has no backend configured
    #[error("{0}")]
    Auth(String),

    /// The backend answered with a non-200 status
    #[error("backend returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// The backend answered 200 but the body did not have the expected shape
    #[error("unexpected response from backend: {0}")]
    Protocol(String),

    #[error("unsupported language '{language}' (supported: {})", supported.join(", "))]
    UnsupportedLanguage {
        language: String,
        supported: Vec<&'static str>,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to clone {url}: {reason}")]
    Clone { url: String, reason: String },

    /// A required input was empty
    #[error("{0} is required")]
    MissingValue(&'static str),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The substitution tokens could not be compiled into a matcher
    #[error("invalid substitution tokens: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    pub(crate) fn not_logged_in() -> Self {
        Error::Auth("not logged in".to_string())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the "not logged in" family of failures
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

/// Reject empty required inputs before doing any work with them
pub(crate) fn require(name: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingValue(name));
    }
    Ok(())
}

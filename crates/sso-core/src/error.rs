//! Error handling for the core crate.
//!
//! Error messages are informative for operators but never carry key
//! material or raw message content.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Tenant context operation attempted outside of a tenant flow.
    #[error("tenant context error: {0}")]
    TenantContext(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("failed to parse config: {err}"))
    }
}

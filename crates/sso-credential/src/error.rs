//! Credential resolution errors.

use sso_spi::SpiError;
use thiserror::Error;

/// Result type for credential resolution.
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Boxed error from the tenant context machinery.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while resolving a tenant credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The tenant directory could not resolve the domain.
    #[error("error getting the tenant id for the domain {domain}")]
    TenantLookup {
        /// The tenant domain.
        domain: String,
        /// The directory failure.
        #[source]
        source: SpiError,
    },

    /// The tenant flow or tenant registry could not be initialized.
    #[error("error initializing the tenant context of {domain}")]
    TenantContext {
        /// The tenant domain.
        domain: String,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },

    /// A keystore could not be obtained.
    #[error("error loading the key store {name}")]
    KeyStore {
        /// Keystore name.
        name: String,
        /// The keystore backend failure.
        #[source]
        source: SpiError,
    },

    /// The tenant's keystore does not exist.
    #[error("key store {name} not found")]
    KeyStoreNotFound {
        /// Keystore name.
        name: String,
    },

    /// No certificate is stored under the alias.
    #[error("Cannot find a certificate with the alias {alias} in the {key_store} key store")]
    CertificateNotFound {
        /// The certificate alias.
        alias: String,
        /// The keystore that was searched.
        key_store: String,
    },

    /// The certificate bytes are not a valid X.509 certificate.
    #[error("invalid X.509 certificate: {0}")]
    InvalidCertificate(String),

    /// The resolver is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl CredentialError {
    /// Returns the tenant domain involved, if the error carries one.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::TenantLookup { domain, .. } | Self::TenantContext { domain, .. } => Some(domain),
            _ => None,
        }
    }
}

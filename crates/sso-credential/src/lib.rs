//! # sso-credential
//!
//! Resolves the X.509 certificate used to verify SAML signatures for a
//! tenant.
//!
//! Regular tenants are served from their own keystore, named after the
//! tenant domain. The super tenant is served from the shared primary
//! keystore, either by the configured IdP certificate alias or by the
//! keystore's default certificate. One tenant's keys never leak into
//! another tenant's validation flow.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sso_credential::CredentialResolver;
//!
//! let resolver = CredentialResolver::builder(directory, repository)
//!     .config(&config)
//!     .build();
//! let credential = resolver.get_credential_for_tenant("example.com")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod credential;
pub mod error;
pub mod keystore;
pub mod resolver;

pub use credential::Credential;
pub use error::{CredentialError, CredentialResult};
pub use keystore::{
    InMemoryKeyStore, InMemoryKeyStoreManager, InMemoryKeyStoreRepository, StaticTenantDirectory,
};
pub use resolver::{key_store_name_for_domain, CredentialResolver, CredentialResolverBuilder};

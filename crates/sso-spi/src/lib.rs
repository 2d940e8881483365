//! # sso-spi
//!
//! Service Provider Interface traits for the collaborators the SSO
//! authenticator depends on but does not own.
//!
//! ## Design
//!
//! Each collaborator is a `Send + Sync` trait object so that deployments
//! can plug in their own tenant directory, keystore backend, or registry:
//! - [`TenantDirectory`] - Resolves tenant domains to tenant ids
//! - [`KeyStoreRepository`] / [`KeyStoreManager`] / [`KeyStore`] - Read path into keystores
//! - [`TenantRegistryLoader`] / [`RegistryService`] - Tenant registry bootstrap
//! - [`AuthenticationObserver`] - Listeners notified when a tenant authentication starts

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod holder;
pub mod provider;
pub mod registry;

pub use provider::{
    AuthenticationObserver, KeyStore, KeyStoreManager, KeyStoreRepository, RegistryService,
    SpiError, SpiResult, TenantDirectory, TenantRegistryLoader,
};
pub use registry::ObserverRegistry;

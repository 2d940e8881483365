//! Collaborator traits.

use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

/// Result type for collaborator operations.
pub type SpiResult<T> = Result<T, SpiError>;

/// Error type for collaborator operations.
#[derive(Debug, Error)]
pub enum SpiError {
    /// The tenant domain is not known to the directory.
    #[error("unknown tenant: {0}")]
    UnknownTenant(String),

    /// The named keystore does not exist.
    #[error("key store not found: {0}")]
    KeyStoreNotFound(String),

    /// Tenant registry operation failed.
    #[error("registry error: {0}")]
    Registry(String),

    /// Backend failure inside a provider.
    #[error("provider error: {0}")]
    Provider(String),
}

/// Resolves tenant domains to tenant ids.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait TenantDirectory: Send + Sync + Debug {
    /// Returns the tenant id registered for `domain`.
    ///
    /// ## Errors
    ///
    /// Returns [`SpiError::UnknownTenant`] if no tenant owns the domain.
    fn tenant_id(&self, domain: &str) -> SpiResult<i32>;
}

/// A loaded keystore.
///
/// Certificates are handed out DER-encoded.
pub trait KeyStore: Send + Sync + Debug {
    /// Returns the keystore name.
    fn name(&self) -> &str;

    /// Returns the certificate stored under `alias`, if any.
    fn certificate(&self, alias: &str) -> Option<Vec<u8>>;

    /// Returns all aliases in the keystore.
    fn aliases(&self) -> Vec<String>;
}

/// Keystore access for a single tenant.
pub trait KeyStoreManager: Send + Sync + Debug {
    /// Loads the keystore with the given file name.
    ///
    /// ## Errors
    ///
    /// Returns [`SpiError::KeyStoreNotFound`] if the keystore does not exist.
    fn key_store(&self, name: &str) -> SpiResult<Arc<dyn KeyStore>>;

    /// Returns the shared primary keystore.
    ///
    /// ## Errors
    ///
    /// Returns an error if the primary keystore is not available.
    fn primary_key_store(&self) -> SpiResult<Arc<dyn KeyStore>>;

    /// Returns the designated default certificate of the primary keystore.
    ///
    /// ## Errors
    ///
    /// Returns an error if no default certificate is designated.
    fn default_primary_certificate(&self) -> SpiResult<Vec<u8>>;
}

/// Hands out the keystore manager of a tenant.
pub trait KeyStoreRepository: Send + Sync + Debug {
    /// Returns the keystore manager for `tenant_id`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the tenant has no keystore manager.
    fn manager(&self, tenant_id: i32) -> SpiResult<Arc<dyn KeyStoreManager>>;
}

/// Loads a tenant's registry before the tenant is served.
pub trait TenantRegistryLoader: Send + Sync + Debug {
    /// Loads the registry of `tenant_id`.
    ///
    /// ## Errors
    ///
    /// Returns an error if loading fails. Callers surface the failure.
    fn load_tenant_registry(&self, tenant_id: i32) -> SpiResult<()>;
}

/// Access to the registry service of the platform.
pub trait RegistryService: Send + Sync + Debug {
    /// Obtains (and thereby initializes) the governance system registry of
    /// `tenant_id`.
    ///
    /// ## Errors
    ///
    /// Returns an error if the registry cannot be obtained.
    fn governance_system_registry(&self, tenant_id: i32) -> SpiResult<()>;
}

/// Listener notified when an authentication flow starts for a tenant.
pub trait AuthenticationObserver: Send + Sync + Debug {
    /// Called once per tenant-scoped credential resolution.
    fn started_authentication(&self, tenant_id: i32);
}

//! In-memory collaborator implementations.
//!
//! These back embedded deployments and tests. Keystore file formats stay
//! behind the [`KeyStoreManager`] trait.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use sso_spi::{KeyStore, KeyStoreManager, KeyStoreRepository, SpiError, SpiResult, TenantDirectory};

/// A keystore holding DER certificates by alias.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyStore {
    name: String,
    certificates: HashMap<String, Vec<u8>>,
    default_alias: Option<String>,
}

impl InMemoryKeyStore {
    /// Creates an empty keystore.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            certificates: HashMap::new(),
            default_alias: None,
        }
    }

    /// Adds a certificate under `alias`.
    #[must_use]
    pub fn with_certificate(mut self, alias: impl Into<String>, der: Vec<u8>) -> Self {
        self.certificates.insert(alias.into(), der);
        self
    }

    /// Designates the certificate under `alias` as the default.
    #[must_use]
    pub fn with_default_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_alias = Some(alias.into());
        self
    }

    /// Returns the designated default certificate, if any.
    #[must_use]
    pub fn default_certificate(&self) -> Option<Vec<u8>> {
        self.default_alias
            .as_deref()
            .and_then(|alias| self.certificates.get(alias).cloned())
    }
}

impl KeyStore for InMemoryKeyStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn certificate(&self, alias: &str) -> Option<Vec<u8>> {
        self.certificates.get(alias).cloned()
    }

    fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<_> = self.certificates.keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

/// Keystore manager for one tenant.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyStoreManager {
    key_stores: HashMap<String, Arc<InMemoryKeyStore>>,
    primary: Option<Arc<InMemoryKeyStore>>,
}

impl InMemoryKeyStoreManager {
    /// Creates a manager without keystores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named keystore.
    #[must_use]
    pub fn with_key_store(mut self, key_store: InMemoryKeyStore) -> Self {
        self.key_stores
            .insert(key_store.name.clone(), Arc::new(key_store));
        self
    }

    /// Sets the primary keystore.
    #[must_use]
    pub fn with_primary(mut self, key_store: InMemoryKeyStore) -> Self {
        self.primary = Some(Arc::new(key_store));
        self
    }

    fn primary(&self) -> SpiResult<&Arc<InMemoryKeyStore>> {
        self.primary
            .as_ref()
            .ok_or_else(|| SpiError::KeyStoreNotFound("primary key store".to_string()))
    }
}

impl KeyStoreManager for InMemoryKeyStoreManager {
    fn key_store(&self, name: &str) -> SpiResult<Arc<dyn KeyStore>> {
        self.key_stores
            .get(name)
            .map(|ks| Arc::clone(ks) as Arc<dyn KeyStore>)
            .ok_or_else(|| SpiError::KeyStoreNotFound(name.to_string()))
    }

    fn primary_key_store(&self) -> SpiResult<Arc<dyn KeyStore>> {
        self.primary().map(|ks| Arc::clone(ks) as Arc<dyn KeyStore>)
    }

    fn default_primary_certificate(&self) -> SpiResult<Vec<u8>> {
        let primary = self.primary()?;
        primary.default_certificate().ok_or_else(|| {
            SpiError::Provider(format!(
                "no default certificate designated in {}",
                primary.name
            ))
        })
    }
}

/// Keystore managers by tenant id.
#[derive(Debug, Default)]
pub struct InMemoryKeyStoreRepository {
    managers: DashMap<i32, Arc<dyn KeyStoreManager>>,
}

impl InMemoryKeyStoreRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the keystore manager of a tenant, replacing any previous one.
    pub fn insert(&self, tenant_id: i32, manager: Arc<dyn KeyStoreManager>) {
        self.managers.insert(tenant_id, manager);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_manager(self, tenant_id: i32, manager: InMemoryKeyStoreManager) -> Self {
        self.insert(tenant_id, Arc::new(manager));
        self
    }
}

impl KeyStoreRepository for InMemoryKeyStoreRepository {
    fn manager(&self, tenant_id: i32) -> SpiResult<Arc<dyn KeyStoreManager>> {
        self.managers
            .get(&tenant_id)
            .map(|m| Arc::clone(m.value()))
            .ok_or_else(|| {
                SpiError::Provider(format!("no key store manager for tenant {tenant_id}"))
            })
    }
}

/// Tenant directory backed by a fixed domain table.
#[derive(Debug, Default)]
pub struct StaticTenantDirectory {
    tenants: DashMap<String, i32>,
}

impl StaticTenantDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tenant.
    pub fn insert(&self, domain: impl Into<String>, tenant_id: i32) {
        self.tenants.insert(domain.into(), tenant_id);
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_tenant(self, domain: impl Into<String>, tenant_id: i32) -> Self {
        self.insert(domain, tenant_id);
        self
    }
}

impl TenantDirectory for StaticTenantDirectory {
    fn tenant_id(&self, domain: &str) -> SpiResult<i32> {
        self.tenants
            .get(domain)
            .map(|id| *id)
            .ok_or_else(|| SpiError::UnknownTenant(domain.to_string()))
    }
}

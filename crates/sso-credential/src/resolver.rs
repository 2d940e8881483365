//! Tenant credential resolution.

use std::sync::Arc;

use sso_core::{SsoConfig, TenantFlow, TenantKey, SUPER_TENANT_DOMAIN};
use sso_spi::{
    holder, KeyStore, KeyStoreManager, KeyStoreRepository, ObserverRegistry, RegistryService,
    SpiError, TenantDirectory, TenantRegistryLoader,
};

use crate::credential::Credential;
use crate::error::{BoxError, CredentialError, CredentialResult};

/// Name reported for the shared primary keystore.
const DEFAULT_KEY_STORE: &str = "default";

/// Returns the keystore file name of a tenant domain.
///
/// `example.com` maps to `example-com.jks`.
#[must_use]
pub fn key_store_name_for_domain(domain: &str) -> String {
    format!("{}.jks", domain.trim().replace('.', "-"))
}

/// Resolves the signature verification credential of a tenant.
///
/// Holds no per-call state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    directory: Arc<dyn TenantDirectory>,
    repository: Arc<dyn KeyStoreRepository>,
    observers: Arc<ObserverRegistry>,
    tenant_registry_loader: Option<Arc<dyn TenantRegistryLoader>>,
    registry_service: Option<Arc<dyn RegistryService>>,
    idp_cert_alias: Option<String>,
}

impl CredentialResolver {
    /// Starts building a resolver.
    #[must_use]
    pub fn builder(
        directory: Arc<dyn TenantDirectory>,
        repository: Arc<dyn KeyStoreRepository>,
    ) -> CredentialResolverBuilder {
        CredentialResolverBuilder {
            directory,
            repository,
            observers: Arc::new(ObserverRegistry::new()),
            tenant_registry_loader: None,
            registry_service: None,
            idp_cert_alias: None,
        }
    }

    /// Returns the configured IdP certificate alias.
    #[must_use]
    pub fn idp_cert_alias(&self) -> Option<&str> {
        self.idp_cert_alias.as_deref()
    }

    /// Resolves the credential of `tenant_domain`.
    ///
    /// Regular tenants get the certificate stored under their domain in
    /// their own keystore. The super tenant gets the certificate under the
    /// configured IdP alias from the primary keystore, or the primary
    /// keystore's default certificate when no alias is configured.
    ///
    /// ## Errors
    ///
    /// Returns a [`CredentialError`] if the tenant is unknown, its registry
    /// cannot be initialized, the keystore or certificate is missing, or the
    /// certificate cannot be parsed.
    pub fn resolve_credential(&self, tenant_domain: &str) -> CredentialResult<Credential> {
        self.resolve(tenant_domain).map_err(|e| {
            tracing::error!(
                tenant_domain,
                error = %e,
                "Error instantiating a credential for the public certificate"
            );
            e
        })
    }

    /// Alias of [`resolve_credential`](Self::resolve_credential).
    ///
    /// ## Errors
    ///
    /// See [`resolve_credential`](Self::resolve_credential).
    pub fn get_credential_for_tenant(&self, tenant_domain: &str) -> CredentialResult<Credential> {
        self.resolve_credential(tenant_domain)
    }

    fn resolve(&self, tenant_domain: &str) -> CredentialResult<Credential> {
        let tenant = self.tenant_key(tenant_domain)?;
        tracing::debug!(tenant = %tenant, "Resolving tenant credential");

        if !tenant.is_super_tenant() {
            self.initialize_tenant(&tenant)?;
        }

        let manager = self
            .repository
            .manager(tenant.tenant_id)
            .map_err(|source| CredentialError::KeyStore {
                name: format!("manager of tenant {}", tenant.tenant_id),
                source,
            })?;

        let certificate = if tenant.is_super_tenant() {
            self.default_certificate(manager.as_ref())?
        } else {
            tenant_certificate(manager.as_ref(), &tenant.tenant_domain)?
        };

        Credential::new(tenant, certificate)
    }

    fn tenant_key(&self, tenant_domain: &str) -> CredentialResult<TenantKey> {
        if tenant_domain == SUPER_TENANT_DOMAIN {
            return Ok(TenantKey::super_tenant());
        }

        let tenant_id =
            self.directory
                .tenant_id(tenant_domain)
                .map_err(|source| CredentialError::TenantLookup {
                    domain: tenant_domain.to_string(),
                    source,
                })?;
        Ok(TenantKey::new(tenant_id, tenant_domain))
    }

    /// Runs tenant registry initialization inside a tenant flow. The flow
    /// ends when this returns.
    fn initialize_tenant(&self, tenant: &TenantKey) -> CredentialResult<()> {
        let context_error = |source: BoxError| {
            CredentialError::TenantContext {
                domain: tenant.tenant_domain.clone(),
                source,
            }
        };

        let flow = TenantFlow::start();
        flow.set_tenant(tenant)
            .map_err(|e| context_error(e.into()))?;

        self.observers.notify_started(tenant.tenant_id);

        let loader = self
            .tenant_registry_loader
            .clone()
            .or_else(holder::tenant_registry_loader);
        if let Some(loader) = loader {
            loader
                .load_tenant_registry(tenant.tenant_id)
                .map_err(|e| context_error(e.into()))?;
        } else {
            tracing::debug!(tenant = %tenant, "No tenant registry loader available, skipping");
        }

        if let Some(registry) = &self.registry_service {
            registry
                .governance_system_registry(tenant.tenant_id)
                .map_err(|e| context_error(e.into()))?;
        }

        Ok(())
    }

    fn default_certificate(&self, manager: &dyn KeyStoreManager) -> CredentialResult<Vec<u8>> {
        let Some(alias) = self.idp_cert_alias.as_deref() else {
            return manager
                .default_primary_certificate()
                .map_err(|source| key_store_error(DEFAULT_KEY_STORE, source));
        };

        let primary = manager
            .primary_key_store()
            .map_err(|source| key_store_error(DEFAULT_KEY_STORE, source))?;

        primary.certificate(alias).ok_or_else(|| {
            tracing::error!(
                alias,
                "Cannot find a certificate with the configured IdPCertAlias in the default key store"
            );
            CredentialError::CertificateNotFound {
                alias: alias.to_string(),
                key_store: DEFAULT_KEY_STORE.to_string(),
            }
        })
    }
}

fn tenant_certificate(manager: &dyn KeyStoreManager, tenant_domain: &str) -> CredentialResult<Vec<u8>> {
    let name = key_store_name_for_domain(tenant_domain);
    let key_store: Arc<dyn KeyStore> = manager
        .key_store(&name)
        .map_err(|source| key_store_error(&name, source))?;

    key_store
        .certificate(tenant_domain)
        .ok_or_else(|| CredentialError::CertificateNotFound {
            alias: tenant_domain.to_string(),
            key_store: name,
        })
}

fn key_store_error(name: &str, source: SpiError) -> CredentialError {
    match source {
        SpiError::KeyStoreNotFound(_) => CredentialError::KeyStoreNotFound {
            name: name.to_string(),
        },
        source => CredentialError::KeyStore {
            name: name.to_string(),
            source,
        },
    }
}

/// Builder for [`CredentialResolver`].
#[derive(Debug)]
pub struct CredentialResolverBuilder {
    directory: Arc<dyn TenantDirectory>,
    repository: Arc<dyn KeyStoreRepository>,
    observers: Arc<ObserverRegistry>,
    tenant_registry_loader: Option<Arc<dyn TenantRegistryLoader>>,
    registry_service: Option<Arc<dyn RegistryService>>,
    idp_cert_alias: Option<String>,
}

impl CredentialResolverBuilder {
    /// Uses a shared observer registry.
    #[must_use]
    pub fn observers(mut self, observers: Arc<ObserverRegistry>) -> Self {
        self.observers = observers;
        self
    }

    /// Uses `loader` instead of the process-wide tenant registry loader.
    #[must_use]
    pub fn tenant_registry_loader(mut self, loader: Arc<dyn TenantRegistryLoader>) -> Self {
        self.tenant_registry_loader = Some(loader);
        self
    }

    /// Initializes the governance registry of each tenant through `service`.
    #[must_use]
    pub fn registry_service(mut self, service: Arc<dyn RegistryService>) -> Self {
        self.registry_service = Some(service);
        self
    }

    /// Sets the IdP certificate alias. Blank aliases count as unset.
    #[must_use]
    pub fn idp_cert_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        let alias = alias.trim();
        self.idp_cert_alias = (!alias.is_empty()).then(|| alias.to_string());
        self
    }

    /// Applies the authenticator configuration.
    #[must_use]
    pub fn config(mut self, config: &SsoConfig) -> Self {
        self.idp_cert_alias.clone_from(&config.idp_cert_alias);
        self
    }

    /// Builds the resolver.
    #[must_use]
    pub fn build(self) -> CredentialResolver {
        CredentialResolver {
            directory: self.directory,
            repository: self.repository,
            observers: self.observers,
            tenant_registry_loader: self.tenant_registry_loader,
            registry_service: self.registry_service,
            idp_cert_alias: self.idp_cert_alias,
        }
    }
}

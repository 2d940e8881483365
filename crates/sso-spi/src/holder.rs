//! Process-wide collaborator slots.
//!
//! The tenant registry loader is wired once at startup and is read-only
//! afterwards. Code paths that need it must tolerate it being unset.

use std::sync::{Arc, OnceLock};

use crate::provider::{SpiError, SpiResult, TenantRegistryLoader};

static TENANT_REGISTRY_LOADER: OnceLock<Arc<dyn TenantRegistryLoader>> = OnceLock::new();

/// Installs the process-wide tenant registry loader.
///
/// ## Errors
///
/// Returns [`SpiError::Registry`] if a loader was already installed.
pub fn set_tenant_registry_loader(loader: Arc<dyn TenantRegistryLoader>) -> SpiResult<()> {
    TENANT_REGISTRY_LOADER
        .set(loader)
        .map_err(|_| SpiError::Registry("tenant registry loader is already set".to_string()))?;
    tracing::debug!("Tenant registry loader installed");
    Ok(())
}

/// Returns the process-wide tenant registry loader, if one is installed.
#[must_use]
pub fn tenant_registry_loader() -> Option<Arc<dyn TenantRegistryLoader>> {
    TENANT_REGISTRY_LOADER.get().cloned()
}

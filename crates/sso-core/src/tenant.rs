//! Tenant identity.
//!
//! Every tenant is identified by a numeric id and a domain name. The
//! reserved super tenant owns the shared primary keystore.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tenant id of the platform-level super tenant.
pub const SUPER_TENANT_ID: i32 = -1234;

/// Domain name of the platform-level super tenant.
pub const SUPER_TENANT_DOMAIN: &str = "carbon.super";

/// Identifies a tenant scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantKey {
    /// Numeric tenant id.
    pub tenant_id: i32,
    /// Tenant domain name.
    pub tenant_domain: String,
}

impl TenantKey {
    /// Creates a new tenant key.
    #[must_use]
    pub fn new(tenant_id: i32, tenant_domain: impl Into<String>) -> Self {
        Self {
            tenant_id,
            tenant_domain: tenant_domain.into(),
        }
    }

    /// Returns the key of the super tenant.
    #[must_use]
    pub fn super_tenant() -> Self {
        Self::new(SUPER_TENANT_ID, SUPER_TENANT_DOMAIN)
    }

    /// Returns true if this key denotes the super tenant.
    #[must_use]
    pub const fn is_super_tenant(&self) -> bool {
        self.tenant_id == SUPER_TENANT_ID
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tenant_domain, self.tenant_id)
    }
}

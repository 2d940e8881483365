//! # sso-core
//!
//! Core utilities, configuration, and error handling for the SAML2 SSO
//! authenticator.
//!
//! This crate provides foundational types used across the other crates:
//!
//! - [`config`] - Authenticator configuration (certificate alias, parser limits)
//! - [`error`] - Core error type
//! - [`tenant`] - Tenant identity and the reserved super tenant
//! - [`context`] - Scoped, per-thread tenant flow context

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod context;
pub mod error;
pub mod tenant;

pub use config::{SsoConfig, XmlLimits};
pub use context::{TenantContext, TenantFlow};
pub use error::{Error, Result};
pub use tenant::{TenantKey, SUPER_TENANT_DOMAIN, SUPER_TENANT_ID};

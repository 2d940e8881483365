//! Authenticator configuration.
//!
//! Configuration can be loaded from a TOML file or from environment
//! variables. Unset values fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the IdP certificate alias.
pub const ENV_IDP_CERT_ALIAS: &str = "SSO_IDP_CERT_ALIAS";

/// Environment variable holding the maximum accepted message size in bytes.
pub const ENV_MAX_MESSAGE_BYTES: &str = "SSO_MAX_MESSAGE_BYTES";

/// Environment variable holding the maximum number of XML nodes.
pub const ENV_MAX_XML_NODES: &str = "SSO_MAX_XML_NODES";

/// Environment variable holding the maximum XML element depth.
pub const ENV_MAX_XML_DEPTH: &str = "SSO_MAX_XML_DEPTH";

/// SAML2 SSO authenticator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsoConfig {
    /// Alias of the IdP certificate in the default tenant's primary keystore.
    ///
    /// When unset, the primary keystore's default certificate is used.
    #[serde(default, rename = "IdPCertAlias", alias = "idp_cert_alias")]
    pub idp_cert_alias: Option<String>,

    /// Limits applied while parsing inbound XML.
    #[serde(default)]
    pub xml: XmlLimits,
}

/// Limits applied by the hardened XML loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlLimits {
    /// Maximum size of a raw message in bytes.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,

    /// Maximum number of nodes in a parsed document.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u32,

    /// Maximum element nesting depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

const fn default_max_message_bytes() -> usize {
    1024 * 1024
}

const fn default_max_nodes() -> u32 {
    100_000
}

const fn default_max_depth() -> usize {
    256
}

impl Default for XmlLimits {
    fn default() -> Self {
        Self {
            max_message_bytes: default_max_message_bytes(),
            max_nodes: default_max_nodes(),
            max_depth: default_max_depth(),
        }
    }
}

impl SsoConfig {
    /// Parses configuration from a TOML document.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::Config`] if the document is not valid TOML or the
    /// resulting configuration fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.idp_cert_alias = normalize_alias(config.idp_cert_alias);
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Loading SSO configuration");
        Self::from_toml_str(&content)
    }

    /// Loads configuration from environment variables.
    ///
    /// Unparseable numeric values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = XmlLimits::default();

        let idp_cert_alias = normalize_alias(std::env::var(ENV_IDP_CERT_ALIAS).ok());

        let max_message_bytes = std::env::var(ENV_MAX_MESSAGE_BYTES)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_message_bytes);

        let max_nodes = std::env::var(ENV_MAX_XML_NODES)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_nodes);

        let max_depth = std::env::var(ENV_MAX_XML_DEPTH)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_depth);

        Self {
            idp_cert_alias,
            xml: XmlLimits {
                max_message_bytes,
                max_nodes,
                max_depth,
            },
        }
    }

    /// Sets the IdP certificate alias.
    #[must_use]
    pub fn with_idp_cert_alias(mut self, alias: impl Into<String>) -> Self {
        self.idp_cert_alias = normalize_alias(Some(alias.into()));
        self
    }

    /// Validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::Config`] if any parser limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.xml.max_message_bytes == 0 {
            return Err(Error::Config("xml.max_message_bytes must be positive".to_string()));
        }
        if self.xml.max_nodes == 0 {
            return Err(Error::Config("xml.max_nodes must be positive".to_string()));
        }
        if self.xml.max_depth == 0 {
            return Err(Error::Config("xml.max_depth must be positive".to_string()));
        }
        Ok(())
    }
}

/// Blank aliases are treated as absent.
fn normalize_alias(alias: Option<String>) -> Option<String> {
    alias
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

//! Once-only SAML library initialization.
//!
//! The unmarshaller factory is built lazily on first use. Concurrent first
//! callers serialize on an initialization lock and at most one of them
//! runs the initializer. A failed initialization leaves the bootstrapper
//! empty, so the next call tries again.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::error::{SamlError, SamlResult};
use crate::unmarshal::UnmarshallerFactory;

type InitFn = dyn Fn() -> SamlResult<UnmarshallerFactory> + Send + Sync;

/// Lazily initializes the unmarshaller factory.
pub struct Bootstrapper {
    init: Box<InitFn>,
    factory: OnceLock<Arc<UnmarshallerFactory>>,
    init_lock: Mutex<()>,
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("bootstrapped", &self.is_bootstrapped())
            .finish_non_exhaustive()
    }
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrapper {
    /// Creates a bootstrapper that registers the default builders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_init(UnmarshallerFactory::with_defaults)
    }

    /// Creates a bootstrapper with a custom initializer.
    #[must_use]
    pub fn with_init<F>(init: F) -> Self
    where
        F: Fn() -> SamlResult<UnmarshallerFactory> + Send + Sync + 'static,
    {
        Self {
            init: Box::new(init),
            factory: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Returns true once initialization has succeeded.
    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.factory.get().is_some()
    }

    /// Initializes the library if needed and returns the factory.
    ///
    /// ## Errors
    ///
    /// Returns [`SamlError::Bootstrap`] if the initializer fails. The
    /// failure is not remembered.
    pub fn bootstrap(&self) -> SamlResult<Arc<UnmarshallerFactory>> {
        if let Some(factory) = self.factory.get() {
            return Ok(Arc::clone(factory));
        }

        let _guard = self.init_lock.lock();
        if let Some(factory) = self.factory.get() {
            return Ok(Arc::clone(factory));
        }

        tracing::debug!("Bootstrapping SAML library");
        let factory = match (self.init)() {
            Ok(factory) => Arc::new(factory),
            Err(e) => {
                tracing::error!(error = %e, "Error in bootstrapping the SAML library");
                return Err(match e {
                    SamlError::Bootstrap(_) => e,
                    other => SamlError::Bootstrap(other.to_string()),
                });
            }
        };

        let factory = Arc::clone(self.factory.get_or_init(|| factory));
        tracing::info!(unmarshallers = factory.len(), "SAML library bootstrapped");
        Ok(factory)
    }
}

/// Returns the process-wide bootstrapper.
pub(crate) fn global() -> Arc<Bootstrapper> {
    static GLOBAL: OnceLock<Arc<Bootstrapper>> = OnceLock::new();
    Arc::clone(GLOBAL.get_or_init(|| Arc::new(Bootstrapper::new())))
}

/// Initializes the process-wide SAML library. Idempotent.
///
/// ## Errors
///
/// Returns [`SamlError::Bootstrap`] if initialization fails. A later call
/// retries.
pub fn do_bootstrap() -> SamlResult<()> {
    global().bootstrap().map(|_| ())
}

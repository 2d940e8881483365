//! Per-thread tenant flow context.
//!
//! A tenant flow temporarily switches the ambient tenant of the current
//! thread. Flows nest: starting a flow pushes a fresh context, and dropping
//! the returned [`TenantFlow`] guard pops it again, so the previous context
//! is restored on every exit path including early returns and unwinding.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::tenant::TenantKey;

thread_local! {
    static FLOWS: RefCell<Vec<TenantContext>> = const { RefCell::new(Vec::new()) };
}

/// Ambient tenant information of the current thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    /// Tenant id, once set.
    pub tenant_id: Option<i32>,
    /// Tenant domain, once set.
    pub tenant_domain: Option<String>,
}

impl TenantContext {
    /// Returns the context of the innermost active flow on this thread, or
    /// an empty context when no flow is active.
    #[must_use]
    pub fn current() -> Self {
        FLOWS.with(|flows| flows.borrow().last().cloned().unwrap_or_default())
    }

    /// Returns the number of active flows on this thread.
    #[must_use]
    pub fn depth() -> usize {
        FLOWS.with(|flows| flows.borrow().len())
    }
}

/// Guard for an active tenant flow.
///
/// The flow ends when the guard is dropped. The guard is bound to the thread
/// that started it.
#[derive(Debug)]
#[must_use = "the tenant flow ends as soon as the guard is dropped"]
pub struct TenantFlow {
    depth: usize,
    _not_send: PhantomData<Rc<()>>,
}

impl TenantFlow {
    /// Starts a new tenant flow on the current thread.
    pub fn start() -> Self {
        let depth = FLOWS.with(|flows| {
            let mut flows = flows.borrow_mut();
            flows.push(TenantContext::default());
            flows.len()
        });
        tracing::trace!(depth, "Tenant flow started");
        Self {
            depth,
            _not_send: PhantomData,
        }
    }

    /// Sets the tenant of this flow.
    ///
    /// ## Errors
    ///
    /// Returns [`Error::TenantContext`] if this flow is no longer the
    /// innermost flow of the thread.
    pub fn set_tenant(&self, tenant: &TenantKey) -> Result<()> {
        FLOWS.with(|flows| {
            let mut flows = flows.borrow_mut();
            if flows.len() != self.depth {
                return Err(Error::TenantContext(format!(
                    "cannot set tenant {tenant}: flow is not the innermost flow"
                )));
            }
            let context = flows.last_mut().ok_or_else(|| {
                Error::TenantContext("no active tenant flow".to_string())
            })?;
            context.tenant_id = Some(tenant.tenant_id);
            context.tenant_domain = Some(tenant.tenant_domain.clone());
            Ok(())
        })
    }
}

impl Drop for TenantFlow {
    fn drop(&mut self) {
        FLOWS.with(|flows| {
            let mut flows = flows.borrow_mut();
            flows.truncate(self.depth.saturating_sub(1));
        });
        tracing::trace!(depth = self.depth, "Tenant flow ended");
    }
}

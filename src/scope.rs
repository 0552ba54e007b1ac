use std::future::Future;
use std::sync::Arc;

use crate::store::CartStore;

// ============================================================================
// Cart Scope - Scoped Provisioning of the Shared Store
// ============================================================================
//
// One shared cart instance must be reachable by many independent consumers
// without threading references by hand. The store is installed as a task
// local for the duration of a future; everything running inside that future
// (and its awaited children) can reach it through `CartScope::current()`.
//
// Requesting the store outside an active scope is a programming error and
// fails fast with a panic, never a silent default.
//
// ============================================================================

tokio::task_local! {
    static ACTIVE_CART: Arc<CartStore>;
}

pub struct CartScope;

impl CartScope {
    /// Run `fut` with `store` installed as the active cart for the task.
    pub async fn provide<F>(store: Arc<CartStore>, fut: F) -> F::Output
    where
        F: Future,
    {
        ACTIVE_CART.scope(store, fut).await
    }

    /// The cart store of the enclosing scope.
    ///
    /// # Panics
    ///
    /// Panics when called outside `CartScope::provide`.
    pub fn current() -> Arc<CartStore> {
        ACTIVE_CART
            .try_with(Arc::clone)
            .unwrap_or_else(|_| {
                panic!("CartScope::current() called outside an active scope; wrap the task in CartScope::provide")
            })
    }

    /// Non-panicking variant for callers that can run without a cart.
    pub fn try_current() -> Option<Arc<CartStore>> {
        ACTIVE_CART.try_with(Arc::clone).ok()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

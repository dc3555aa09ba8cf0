use super::core::Router;
use crate::config::RouterConfig;
use crate::error::RouterError;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A [`Router`] that can be replaced while other threads keep matching.
///
/// Readers take a snapshot with [`SharedRouter::load`]; a snapshot stays
/// valid even if the router is replaced while it is in use.
pub struct SharedRouter {
    current: ArcSwap<Router>,
}

impl SharedRouter {
    pub fn new(router: Router) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    #[must_use]
    pub fn load(&self) -> Arc<Router> {
        self.current.load_full()
    }

    /// Swap in `router`, returning the previous one.
    pub fn replace(&self, router: Router) -> Arc<Router> {
        let routes_count = router.len();
        let previous = self.current.swap(Arc::new(router));
        info!(
            routes_count,
            previous_routes_count = previous.len(),
            "Router replaced"
        );
        previous
    }

    /// Rebuild from `config` and swap it in. On error the current router
    /// stays in place.
    pub fn reload(&self, config: &RouterConfig) -> Result<Arc<Router>, RouterError> {
        let router = Router::from_config(config)?;
        Ok(self.replace(router))
    }
}

impl From<Router> for SharedRouter {
    fn from(router: Router) -> Self {
        Self::new(router)
    }
}

impl fmt::Debug for SharedRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRouter")
            .field("current", &self.current.load())
            .finish()
    }
}

use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use super::radix::SegmentTrie;
use crate::error::{Error, ErrorKind};
use crate::path::ArgVec;
use crate::route::Route;

/// Result of resolving a request to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (shared, never cloned per request)
    pub route: Arc<Route>,
    /// Argument strings captured from the path, in template order
    pub args: ArgVec,
}

/// Indexes routes per HTTP method and resolves requests to them.
///
/// Routes are added during startup through `&mut self`; afterwards the router
/// is only read, so it can be shared across worker threads without locking.
///
/// # Performance
///
/// - Insertion: O(k) where k is the number of template segments
/// - Lookup: O(k) in the number of request path segments when literal and
///   argument siblings do not overlap. When a literal branch dead-ends the
///   search backtracks into the argument branch, so the worst case is
///   proportional to the size of the subtrie explored, not the path depth.
#[derive(Default)]
pub struct Router {
    tries: HashMap<Method, SegmentTrie>,
    routes: Vec<Arc<Route>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidRoute`] if a route with the same method and the
    /// same template shape (argument names ignored) is already registered.
    pub fn add(&mut self, route: Route) -> Result<(), Error> {
        let route = Arc::new(route);
        let trie = self.tries.entry(route.method().clone()).or_default();

        if let Err(existing) = trie.insert(Arc::clone(&route)) {
            return Err(Error::msg(
                ErrorKind::InvalidRoute,
                format!("conflicting route {route}: already registered as {existing}"),
            ));
        }

        debug!(method = %route.method(), path = %route.path(), "Route registered");
        self.routes.push(route);
        Ok(())
    }

    /// Resolve a request to its route and captured argument strings.
    ///
    /// Returns `None` when nothing matches; there are no partial matches.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let Some(trie) = self.tries.get(method) else {
            trace!(method = %method, path = %path, "No routes for method");
            return None;
        };

        let (route, args) = trie.search(path)?;
        trace!(method = %method, path = %path, route = %route, args = ?args, "Route matched");
        Some(RouteMatch { route, args })
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Arc<Route>> + '_ {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

}

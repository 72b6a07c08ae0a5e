//! Ordered route table.

use crate::{RequestPath, Route, RouteMatch};

/// An ordered list of routes, tried first-to-last.
///
/// The first route whose [`Route::matches`] succeeds wins; there is no
/// specificity ranking. Register more specific prefixes first.
///
/// # Example
///
/// ```rust
/// use vireo_router::{RequestPath, Route, RouteTable};
///
/// let mut routes = RouteTable::new();
/// routes.push(Route::new("admin", "admin").unwrap());
/// routes.push(Route::new("", "default").unwrap());
///
/// let m = routes.match_path(&RequestPath::parse("/admin/users/3")).unwrap();
/// assert_eq!(*m.target, "admin");
///
/// let m = routes.match_path(&RequestPath::parse("/contact")).unwrap();
/// assert_eq!(*m.target, "default");
///
/// assert!(routes.match_path(&RequestPath::parse("/blog/post/1")).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable<T> {
    routes: Vec<Route<T>>,
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTable<T> {
    /// Creates an empty route table.
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route; it is tried after every route already present.
    pub fn push(&mut self, route: Route<T>) {
        self.routes.push(route);
    }

    /// Finds the first route matching `path`.
    #[must_use]
    pub fn match_path(&self, path: &RequestPath) -> Option<RouteMatch<'_, T>> {
        self.routes.iter().find_map(|route| route.matches(path))
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the table holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns an iterator over the routes in match order.
    pub fn iter(&self) -> impl Iterator<Item = &Route<T>> {
        self.routes.iter()
    }
}

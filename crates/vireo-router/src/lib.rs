//! Prefix route table for Vireo.
//!
//! A Vireo route is a fixed sequence of path segments bound to a target
//! (in practice, a controller binding). Matching a request path against a
//! route consumes the route's segments as a prefix of the request's
//! *directory parts* and turns whatever remains into an action name and an
//! ordered list of string parameters.
//!
//! # Features
//!
//! - **Prefix Matching**: case-sensitive, positional segment comparison
//! - **Action Extraction**: the first unconsumed directory becomes the action
//! - **Positional Parameters**: remaining directories plus the file name
//! - **First Match Wins**: [`RouteTable`] tries routes in registration order
//!
//! # Example
//!
//! ```rust
//! use vireo_router::{RequestPath, Route, RouteTable};
//!
//! let mut routes = RouteTable::new();
//! routes.push(Route::new("multilevel", "MultiLevel").unwrap());
//! routes.push(Route::new("", "Default").unwrap());
//!
//! let path = RequestPath::parse("/multilevel/foobarbaz/param1/param2/param3");
//! let route_match = routes.match_path(&path).unwrap();
//!
//! assert_eq!(*route_match.target, "MultiLevel");
//! assert_eq!(route_match.action, "foobarbaz");
//! assert_eq!(route_match.parameters.as_slice(), ["param1", "param2", "param3"]);
//! ```
//!
//! # Decomposition
//!
//! ```text
//!   /multilevel/foobarbaz/param1/param2/param3
//!    └────────────┬────────────────────┘ └──┬──┘
//!          directory parts               file name
//!
//!   route "multilevel" consumes directory 0
//!   directory 1            -> action      "foobarbaz"
//!   directories 2.. + file -> parameters  ["param1", "param2", "param3"]
//! ```

mod error;
mod params;
mod path;
mod route;
mod table;

pub use error::RouteError;
pub use params::Parameters;
pub use path::RequestPath;
pub use route::Route;
pub use table::RouteTable;

/// A successful route match.
///
/// Created per request by [`Route::matches`] and consumed immediately by the
/// dispatcher; it is never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The target bound to the matched route
    pub target: &'a T,
    /// The action name (possibly empty)
    pub action: String,
    /// Ordered positional parameters
    pub parameters: Parameters,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(target: &'a T, action: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            target,
            action: action.into(),
            parameters,
        }
    }
}

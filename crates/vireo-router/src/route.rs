//! A single prefix route.

use crate::{Parameters, RequestPath, RouteError, RouteMatch};

/// A route: a fixed segment prefix bound to a target.
///
/// The path `""` has zero segments and matches requests that have no
/// directory parts at all (e.g. `/` or `/about`). Any other path is split
/// on `/`; each segment must be non-empty and use only `[a-zA-Z0-9._-]`.
///
/// # Example
///
/// ```rust
/// use vireo_router::{RequestPath, Route};
///
/// let route = Route::new("shop/items", 7).unwrap();
/// let m = route.matches(&RequestPath::parse("/shop/items/show/42")).unwrap();
///
/// assert_eq!(*m.target, 7);
/// assert_eq!(m.action, "show");
/// assert_eq!(m.parameters.as_slice(), ["42"]);
/// ```
#[derive(Debug, Clone)]
pub struct Route<T> {
    path: String,
    segments: Vec<String>,
    target: T,
}

impl<T> Route<T> {
    /// Creates a route, validating its path.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::EmptySegment`] if a segment is empty and
    /// [`RouteError::InvalidSegment`] if a segment contains a character
    /// outside `[a-zA-Z0-9._-]`.
    pub fn new(path: impl Into<String>, target: T) -> Result<Self, RouteError> {
        let path = path.into();
        let segments = parse_segments(&path)?;

        Ok(Self {
            path,
            segments,
            target,
        })
    }

    /// Returns the route path as given.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the route segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the bound target.
    #[must_use]
    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Tries to match a request path.
    ///
    /// The route's segments are compared case-sensitively against the
    /// leading directory parts. When more directories remain after the
    /// prefix, the first of them becomes the action and the rest, followed
    /// by the file name, become the parameters. Otherwise the file name is
    /// the action and there are no parameters.
    #[must_use]
    pub fn matches(&self, path: &RequestPath) -> Option<RouteMatch<'_, T>> {
        let directories = path.directories();
        let k = self.segments.len();

        // A root route only serves paths with no directory parts.
        if k == 0 {
            return directories
                .is_empty()
                .then(|| RouteMatch::new(&self.target, path.filename(), Parameters::new()));
        }

        if k > directories.len() {
            return None;
        }

        if self
            .segments
            .iter()
            .zip(directories)
            .any(|(segment, directory)| segment != directory)
        {
            return None;
        }

        if directories.len() > k {
            let mut parameters = Parameters::with_capacity(directories.len() - k);
            for directory in &directories[k + 1..] {
                parameters.push(directory.as_str());
            }
            parameters.push(path.filename());

            Some(RouteMatch::new(&self.target, directories[k].as_str(), parameters))
        } else {
            Some(RouteMatch::new(
                &self.target,
                path.filename(),
                Parameters::new(),
            ))
        }
    }
}

fn parse_segments(path: &str) -> Result<Vec<String>, RouteError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }

    path.split('/')
        .map(|segment| {
            if segment.is_empty() {
                Err(RouteError::EmptySegment {
                    path: path.to_string(),
                })
            } else if segment.chars().all(is_segment_char) {
                Ok(segment.to_string())
            } else {
                Err(RouteError::InvalidSegment {
                    path: path.to_string(),
                    segment: segment.to_string(),
                })
            }
        })
        .collect()
}

const fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_of<'a>(route: &'a Route<&'static str>, path: &str) -> Option<RouteMatch<'a, &'static str>> {
        route.matches(&RequestPath::parse(path))
    }

    #[test]
    fn test_valid_paths() {
        assert_eq!(Route::new("", ()).unwrap().segments().len(), 0);
        assert_eq!(Route::new("a", ()).unwrap().segments(), ["a"]);
        assert_eq!(
            Route::new("v1.0/my_api/some-thing", ()).unwrap().segments(),
            ["v1.0", "my_api", "some-thing"]
        );
    }

    #[test]
    fn test_empty_segment_rejected() {
        for path in ["/", "/a", "a/", "a//b"] {
            assert!(
                matches!(Route::new(path, ()), Err(RouteError::EmptySegment { .. })),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_segment_rejected() {
        for path in ["a b", "a/b?", "caf\u{e9}", "a/%20", " a"] {
            assert!(
                matches!(Route::new(path, ()), Err(RouteError::InvalidSegment { .. })),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_root_route() {
        let route = Route::new("", "root").unwrap();

        let m = match_of(&route, "/").unwrap();
        assert_eq!(m.action, "");
        assert!(m.parameters.is_empty());

        let m = match_of(&route, "/foo").unwrap();
        assert_eq!(m.action, "foo");

        assert!(match_of(&route, "/foo/bar").is_none());
        assert!(match_of(&route, "/foo/").is_none());
    }

    #[test]
    fn test_exact_prefix_takes_action_from_filename() {
        let route = Route::new("shop", "shop").unwrap();

        let m = match_of(&route, "/shop/list").unwrap();
        assert_eq!(m.action, "list");
        assert!(m.parameters.is_empty());

        let m = match_of(&route, "/shop/").unwrap();
        assert_eq!(m.action, "");
        assert!(m.parameters.is_empty());
    }

    #[test]
    fn test_case_sensitive_segments() {
        let route = Route::new("Shop", "shop").unwrap();
        assert!(match_of(&route, "/shop/list").is_none());
        assert!(match_of(&route, "/Shop/list").is_some());
    }

    #[test]
    fn test_mismatched_segment() {
        let route = Route::new("a/b", "ab").unwrap();
        assert!(match_of(&route, "/a/c/x").is_none());
        assert!(match_of(&route, "/a/b/x").is_some());
    }

    #[test]
    fn test_zero_parameter_preserved() {
        let route = Route::new("n", "n").unwrap();
        let m = match_of(&route, "/n/show/0").unwrap();
        assert_eq!(m.action, "show");
        assert_eq!(m.parameters.as_slice(), ["0"]);
    }

    #[test]
    fn test_accessors() {
        let route = Route::new("a/b", 5_u8).unwrap();
        assert_eq!(route.path(), "a/b");
        assert_eq!(*route.target(), 5);
    }
}

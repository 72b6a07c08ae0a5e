//! Resolution of redirect and `Location` targets.
//!
//! Relative references are combined with the current request URL the usual
//! way (`.` and `..` segments are removed, a leading `/` restarts from the
//! root). Unlike lenient resolvers, a reference that climbs above the root
//! is rejected instead of being clamped.

use url::Url;

use crate::error::{CoreError, CoreResult};

/// Resolves `target` against `base`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidUrl`] if the target cannot be parsed or its
/// `..` segments would escape above the root.
///
/// # Example
///
/// ```
/// use url::Url;
/// use vireo_core::resolve_location;
///
/// let base = Url::parse("https://example.com/shop/items/42").unwrap();
///
/// assert_eq!(
///     resolve_location(&base, "../cart?x=1").unwrap().as_str(),
///     "https://example.com/shop/cart?x=1"
/// );
/// assert_eq!(
///     resolve_location(&base, "/login").unwrap().as_str(),
///     "https://example.com/login"
/// );
/// assert!(resolve_location(&base, "../../../etc").is_err());
/// ```
pub fn resolve_location(base: &Url, target: &str) -> CoreResult<Url> {
    if let Ok(absolute) = Url::parse(target) {
        return Ok(absolute);
    }

    if target.starts_with("//") {
        return Url::parse(&format!("{}:{target}", base.scheme()))
            .map_err(|e| CoreError::invalid_url(target, e.to_string()));
    }

    let (rest, fragment) = match target.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (target, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };

    let mut resolved = base.clone();

    if path.is_empty() {
        if query.is_some() {
            resolved.set_query(query);
        }
    } else {
        let joined = merge_paths(base.path(), path)
            .ok_or_else(|| CoreError::invalid_url(target, "path escapes above the root"))?;
        resolved.set_path(&joined);
        resolved.set_query(query);
    }
    resolved.set_fragment(fragment);

    Ok(resolved)
}

/// Combines a base path with a relative path, returning `None` when a `..`
/// segment has nothing left to remove.
fn merge_paths(base_path: &str, relative: &str) -> Option<String> {
    let mut stack: Vec<&str> = Vec::new();

    let relative = if let Some(from_root) = relative.strip_prefix('/') {
        from_root
    } else {
        let directory = base_path.rfind('/').map_or("", |i| &base_path[..i]);
        stack.extend(directory.split('/').filter(|s| !s.is_empty()));
        relative
    };

    let mut ends_in_directory = false;
    for segment in relative.split('/') {
        match segment {
            "." => ends_in_directory = true,
            ".." => {
                stack.pop()?;
                ends_in_directory = true;
            }
            other => {
                stack.push(other);
                ends_in_directory = false;
            }
        }
    }

    let mut path = String::with_capacity(relative.len() + base_path.len());
    for segment in &stack {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() || ends_in_directory {
        path.push('/');
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8080/foo/bar/baz?q=1#frag").unwrap()
    }

    fn resolve(target: &str) -> String {
        resolve_location(&base(), target).unwrap().to_string()
    }

    #[test]
    fn test_absolute_target_is_kept() {
        assert_eq!(resolve("https://example.org/x"), "https://example.org/x");
    }

    #[test]
    fn test_scheme_relative() {
        assert_eq!(resolve("//cdn.example.org/a.js"), "http://cdn.example.org/a.js");
    }

    #[test]
    fn test_relative_file() {
        assert_eq!(resolve("qux"), "http://localhost:8080/foo/bar/qux");
        assert_eq!(resolve("./qux"), "http://localhost:8080/foo/bar/qux");
        assert_eq!(resolve("sub/"), "http://localhost:8080/foo/bar/sub/");
    }

    #[test]
    fn test_parent_segments() {
        assert_eq!(resolve(".."), "http://localhost:8080/foo/");
        assert_eq!(resolve("../x"), "http://localhost:8080/foo/x");
        assert_eq!(resolve("../../x"), "http://localhost:8080/x");
        assert_eq!(resolve("."), "http://localhost:8080/foo/bar/");
    }

    #[test]
    fn test_escape_above_root_rejected() {
        assert!(matches!(
            resolve_location(&base(), "../../../x"),
            Err(CoreError::InvalidUrl { .. })
        ));
        assert!(resolve_location(&base(), "/..").is_err());
    }

    #[test]
    fn test_root_relative() {
        assert_eq!(resolve("/"), "http://localhost:8080/");
        assert_eq!(resolve("/a/./b/../c"), "http://localhost:8080/a/c");
    }

    #[test]
    fn test_query_and_fragment() {
        assert_eq!(resolve("x?a=b#top"), "http://localhost:8080/foo/bar/x?a=b#top");
        assert_eq!(resolve("?z=2"), "http://localhost:8080/foo/bar/baz?z=2");
        assert_eq!(resolve(""), "http://localhost:8080/foo/bar/baz?q=1");
        assert_eq!(resolve("#s"), "http://localhost:8080/foo/bar/baz?q=1#s");
    }
}

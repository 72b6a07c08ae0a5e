//! Positional parameter storage.
//!
//! Parameters extracted by a route match are plain strings in URL order.
//! A small-vector keeps the common case (a handful of parameters) off the
//! heap.

use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Ordered positional parameters produced by a route match.
///
/// Values are kept exactly as they appeared in the (once-decoded) path:
/// an empty trailing file name is an empty string, and `"0"` stays `"0"`.
///
/// # Example
///
/// ```rust
/// use vireo_router::Parameters;
///
/// let mut params = Parameters::new();
/// params.push("param1");
/// params.push("0");
///
/// assert_eq!(params.get(0), Some("param1"));
/// assert_eq!(params.get(1), Some("0"));
/// assert_eq!(params.get(2), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters {
    inner: SmallVec<[String; INLINE_PARAMS]>,
}

impl Parameters {
    /// Creates a new empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parameter list with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Appends a parameter.
    pub fn push(&mut self, value: impl Into<String>) {
        self.inner.push(value.into());
    }

    /// Inserts a parameter at the front of the list.
    pub fn prepend(&mut self, value: impl Into<String>) {
        self.inner.insert(0, value.into());
    }

    /// Returns the parameter at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.inner.get(index).map(String::as_str)
    }

    /// Returns the parameters as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.inner
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Parameters {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::ops::Deref for Parameters {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new() {
        let params = Parameters::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_params_push_and_get() {
        let mut params = Parameters::new();
        params.push("123");
        params.push("");

        assert_eq!(params.get(0), Some("123"));
        assert_eq!(params.get(1), Some(""));
        assert_eq!(params.get(2), None);
    }

    #[test]
    fn test_params_prepend() {
        let mut params: Parameters = ["b", "c"].into_iter().collect();
        params.prepend("a");
        assert_eq!(params.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_params_iter() {
        let params: Parameters = ["1", "2"].into_iter().collect();
        let values: Vec<_> = params.iter().collect();
        assert_eq!(values, vec!["1", "2"]);
    }

    #[test]
    fn test_params_many_params() {
        let mut params = Parameters::new();
        for i in 0..10 {
            params.push(format!("value{i}"));
        }

        assert_eq!(params.len(), 10);
        assert_eq!(params.get(5), Some("value5"));
    }
}

//! HTTP method value.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// An HTTP request method.
///
/// Any non-empty alphanumeric verb is accepted (extension methods
/// included); the value is kept exactly as given.
///
/// # Example
///
/// ```
/// use vireo_core::Method;
///
/// let method = Method::new("POST").unwrap();
/// assert!(method.is_post());
/// assert!(!method.is_get());
///
/// assert!(Method::new("GE T").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method(String);

impl Method {
    /// Creates a method, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMethod`] for empty or non-alphanumeric input.
    pub fn new(method: impl Into<String>) -> CoreResult<Self> {
        let method = method.into();
        if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidMethod(method));
        }
        Ok(Self(method))
    }

    /// The `GET` method.
    #[must_use]
    pub fn get() -> Self {
        Self("GET".to_string())
    }

    /// The `POST` method.
    #[must_use]
    pub fn post() -> Self {
        Self("POST".to_string())
    }

    /// Returns the method name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `GET`
    #[must_use]
    pub fn is_get(&self) -> bool {
        self.0 == "GET"
    }

    /// `POST`
    #[must_use]
    pub fn is_post(&self) -> bool {
        self.0 == "POST"
    }

    /// `PUT`
    #[must_use]
    pub fn is_put(&self) -> bool {
        self.0 == "PUT"
    }

    /// `DELETE`
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "DELETE"
    }

    /// `HEAD`
    #[must_use]
    pub fn is_head(&self) -> bool {
        self.0 == "HEAD"
    }

    /// `PATCH`
    #[must_use]
    pub fn is_patch(&self) -> bool {
        self.0 == "PATCH"
    }

    /// `OPTIONS`
    #[must_use]
    pub fn is_options(&self) -> bool {
        self.0 == "OPTIONS"
    }

    /// `CONNECT`
    #[must_use]
    pub fn is_connect(&self) -> bool {
        self.0 == "CONNECT"
    }

    /// `TRACE`
    #[must_use]
    pub fn is_trace(&self) -> bool {
        self.0 == "TRACE"
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::get()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Method {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<&http::Method> for Method {
    type Error = CoreError;

    fn try_from(method: &http::Method) -> CoreResult<Self> {
        Self::new(method.as_str())
    }
}

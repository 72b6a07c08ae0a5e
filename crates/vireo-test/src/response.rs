//! Test response wrapper.

use serde::de::DeserializeOwned;
use vireo_core::{Response, ResponseCookie, StatusCode};

use crate::error::TestError;

/// The outcome of a test request, with assertion helpers.
///
/// The assertions return `&Self` so they chain.
#[derive(Debug, Clone)]
pub struct TestResponse {
    response: Response,
}

impl TestResponse {
    /// Wraps a response.
    #[must_use]
    pub const fn new(response: Response) -> Self {
        Self { response }
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.response.status_code()
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        self.response.content()
    }

    /// Returns a header value.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response.header(name)
    }

    /// Returns a cookie set by the response.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&ResponseCookie> {
        self.response.cookie(name)
    }

    /// Returns the underlying response.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Unwraps the underlying response.
    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }

    /// Deserializes the content as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        if self.content().is_empty() {
            return Err(TestError::BodyRead("response has no content".to_string()));
        }
        Ok(serde_json::from_str(self.content())?)
    }

    /// Asserts the numeric status code.
    ///
    /// # Panics
    ///
    /// Panics if the status differs.
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status_code().code(),
            expected,
            "expected status {expected}, got {} (content: {:?})",
            self.status_code(),
            self.content()
        );
        self
    }

    /// Asserts the exact content.
    ///
    /// # Panics
    ///
    /// Panics if the content differs.
    pub fn assert_content(&self, expected: &str) -> &Self {
        assert_eq!(self.content(), expected, "unexpected content");
        self
    }

    /// Asserts that the content contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics if it does not.
    pub fn assert_content_contains(&self, needle: &str) -> &Self {
        assert!(
            self.content().contains(needle),
            "expected content to contain {needle:?}, got {:?}",
            self.content()
        );
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        match self.header(name) {
            Some(actual) => assert_eq!(actual, expected, "unexpected value of header {name}"),
            None => panic!("expected header {name} to be set"),
        }
        self
    }

    /// Asserts that a header is absent.
    ///
    /// # Panics
    ///
    /// Panics if the header is set.
    pub fn assert_no_header(&self, name: &str) -> &Self {
        assert!(
            self.header(name).is_none(),
            "expected header {name} to be absent, got {:?}",
            self.header(name)
        );
        self
    }

    /// Asserts a cookie value.
    ///
    /// # Panics
    ///
    /// Panics if the cookie is missing or its value differs.
    pub fn assert_cookie(&self, name: &str, expected: &str) -> &Self {
        match self.cookie(name) {
            Some(cookie) => assert_eq!(cookie.value(), expected, "unexpected value of cookie {name}"),
            None => panic!("expected cookie {name} to be set"),
        }
        self
    }
}

impl From<Response> for TestResponse {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}

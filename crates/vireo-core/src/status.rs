//! HTTP status code registry.

use std::fmt;

use crate::error::{CoreError, CoreResult};

/// Known status codes with their reason phrases, sorted by code.
const REGISTRY: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (103, "Early Hints"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi-Status"),
    (208, "Already Reported"),
    (226, "IM Used"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Payload Too Large"),
    (414, "URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a teapot"),
    (421, "Misdirected Request"),
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"),
    (426, "Upgrade Required"),
    (428, "Precondition Required"),
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (451, "Unavailable For Legal Reasons"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"),
    (507, "Insufficient Storage"),
    (508, "Loop Detected"),
    (510, "Not Extended"),
    (511, "Network Authentication Required"),
];

/// An HTTP status code drawn from a closed registry.
///
/// Two status codes built from the same code are equal and share the same
/// description. `Display` yields the status-line text `"<code> <description>"`.
///
/// # Example
///
/// ```
/// use vireo_core::StatusCode;
///
/// let status = StatusCode::new(404).unwrap();
/// assert_eq!(status, StatusCode::NOT_FOUND);
/// assert_eq!(status.description(), "Not Found");
/// assert_eq!(status.to_string(), "404 Not Found");
///
/// assert!(StatusCode::new(299).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode {
    code: u16,
    description: &'static str,
}

impl StatusCode {
    /// 200 OK
    pub const OK: Self = Self::known(200, "OK");
    /// 201 Created
    pub const CREATED: Self = Self::known(201, "Created");
    /// 204 No Content
    pub const NO_CONTENT: Self = Self::known(204, "No Content");
    /// 301 Moved Permanently
    pub const MOVED_PERMANENTLY: Self = Self::known(301, "Moved Permanently");
    /// 302 Found
    pub const FOUND: Self = Self::known(302, "Found");
    /// 304 Not Modified
    pub const NOT_MODIFIED: Self = Self::known(304, "Not Modified");
    /// 400 Bad Request
    pub const BAD_REQUEST: Self = Self::known(400, "Bad Request");
    /// 401 Unauthorized
    pub const UNAUTHORIZED: Self = Self::known(401, "Unauthorized");
    /// 403 Forbidden
    pub const FORBIDDEN: Self = Self::known(403, "Forbidden");
    /// 404 Not Found
    pub const NOT_FOUND: Self = Self::known(404, "Not Found");
    /// 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: Self = Self::known(405, "Method Not Allowed");
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: Self = Self::known(500, "Internal Server Error");
    /// 503 Service Unavailable
    pub const SERVICE_UNAVAILABLE: Self = Self::known(503, "Service Unavailable");

    const fn known(code: u16, description: &'static str) -> Self {
        Self { code, description }
    }

    /// Looks up a status code in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStatusCode`] if `code` is not registered.
    pub fn new(code: u16) -> CoreResult<Self> {
        REGISTRY
            .binary_search_by_key(&code, |&(c, _)| c)
            .map(|index| Self::known(code, REGISTRY[index].1))
            .map_err(|_| CoreError::InvalidStatusCode(code))
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Returns the reason phrase.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// 1xx
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        self.code >= 100 && self.code < 200
    }

    /// 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// 3xx
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.code >= 300 && self.code < 400
    }

    /// 4xx
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.code >= 400 && self.code < 500
    }

    /// 5xx
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.code >= 500 && self.code < 600
    }

    /// 4xx or 5xx
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.code >= 400
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::OK
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.description)
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = CoreError;

    fn try_from(code: u16) -> CoreResult<Self> {
        Self::new(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.code
    }
}

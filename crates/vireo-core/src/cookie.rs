//! Request and response cookies.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};

/// A cookie received with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCookie {
    value: String,
}

impl RequestCookie {
    /// Creates a request cookie.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for RequestCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A cookie to set on the client.
///
/// # Example
///
/// ```
/// use vireo_core::ResponseCookie;
///
/// let cookie = ResponseCookie::new("abc")
///     .with_path("/admin")
///     .unwrap()
///     .http_only();
///
/// assert_eq!(cookie.to_header_value("token"), "token=abc; Path=/admin; HttpOnly");
/// assert!(ResponseCookie::new("x").with_path("admin").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookie {
    value: String,
    expiry: Option<DateTime<Utc>>,
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
}

impl ResponseCookie {
    /// Creates a session cookie with only a value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expiry: None,
            path: None,
            domain: None,
            secure: false,
            http_only: false,
        }
    }

    /// Sets the cookie path.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCookiePath`] unless the path starts with
    /// `/` and contains no whitespace, `;`, `,` or control characters.
    pub fn with_path(mut self, path: impl Into<String>) -> CoreResult<Self> {
        let path = path.into();
        let valid = path.starts_with('/')
            && !path
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || c == ';' || c == ',');
        if !valid {
            return Err(CoreError::InvalidCookiePath(path));
        }
        self.path = Some(path);
        Ok(self)
    }

    /// Sets the expiry time.
    #[must_use]
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Sets the cookie domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Marks the cookie as secure.
    #[must_use]
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Marks the cookie as HTTP only.
    #[must_use]
    pub fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the expiry, if any.
    #[must_use]
    pub const fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Returns the path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the domain, if any.
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns true if the cookie is secure.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }

    /// Returns true if the cookie is HTTP only.
    #[must_use]
    pub const fn is_http_only(&self) -> bool {
        self.http_only
    }

    /// Formats the cookie as a `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self, name: &str) -> String {
        let mut header = format!("{name}={}", urlencoding::encode(&self.value));

        if let Some(expiry) = self.expiry {
            header.push_str("; Expires=");
            header.push_str(&httpdate::fmt_http_date(expiry.into()));
        }
        if let Some(path) = &self.path {
            header.push_str("; Path=");
            header.push_str(path);
        }
        if let Some(domain) = &self.domain {
            header.push_str("; Domain=");
            header.push_str(domain);
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        header
    }
}

/// Parses a `Cookie` request header into name/value pairs.
///
/// Malformed pairs are skipped; values are percent-decoded.
pub fn parse_cookie_header(header: &str) -> impl Iterator<Item = (String, RequestCookie)> + '_ {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = value.trim().trim_matches('"');
        let value = urlencoding::decode(value)
            .map_or_else(|_| value.to_string(), std::borrow::Cow::into_owned);
        Some((name.to_string(), RequestCookie::new(value)))
    })
}

//! The response built up while a request is processed.

use std::io::{self, Write};

use chrono::{DateTime, Duration, Utc};
use http::header::{HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, EXPIRES};
use indexmap::IndexMap;

use crate::cookie::ResponseCookie;
use crate::error::{CoreError, CoreResult};
use crate::status::StatusCode;

/// A response under construction.
///
/// Starts as `200 OK` with no headers and empty content.
///
/// # Example
///
/// ```
/// use vireo_core::{Response, StatusCode};
///
/// let mut response = Response::new();
/// response.set_status_code(StatusCode::CREATED);
/// response.set_header("X-Powered-By", "vireo").unwrap();
/// response.set_content("done");
///
/// let mut out = Vec::new();
/// response.output(&mut out).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "HTTP/1.1 201 Created\r\nx-powered-by: vireo\r\n\r\ndone"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    content: String,
    cookies: IndexMap<String, ResponseCookie>,
}

impl Response {
    /// Creates an empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Sets the status code.
    pub fn set_status_code(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Returns a header value, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns all headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Sets a header, replacing any previous values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidHeader`] for an invalid name or value.
    pub fn set_header(&mut self, name: &str, value: &str) -> CoreResult<()> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Adds a header value, keeping existing values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidHeader`] for an invalid name or value.
    pub fn add_header(&mut self, name: &str, value: &str) -> CoreResult<()> {
        let (name, value) = parse_header(name, value)?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Removes a header.
    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    /// Returns a cookie by name.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&ResponseCookie> {
        self.cookies.get(name)
    }

    /// Returns all cookies in the order set.
    #[must_use]
    pub const fn cookies(&self) -> &IndexMap<String, ResponseCookie> {
        &self.cookies
    }

    /// Sets a cookie, replacing one of the same name.
    pub fn set_cookie(&mut self, name: impl Into<String>, cookie: ResponseCookie) {
        self.cookies.insert(name.into(), cookie);
    }

    /// Sets caching headers.
    ///
    /// With an expiry, `Expires` is that time and `Cache-Control` allows
    /// public caching for the remaining seconds (never negative). Without
    /// one, the response is marked uncacheable and `Expires` lies in the
    /// past.
    pub fn set_expiry(&mut self, expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) {
        let (expires, cache_control) = match expiry {
            Some(expiry) => {
                let max_age = (expiry - now).num_seconds().max(0);
                (expiry, format!("public, max-age={max_age}"))
            }
            None => (
                now - Duration::days(1),
                "no-cache, no-store, must-revalidate, max-age=0".to_string(),
            ),
        };

        self.insert_ascii(EXPIRES, &httpdate::fmt_http_date(expires.into()));
        self.insert_ascii(CACHE_CONTROL, &cache_control);
    }

    /// Writes the response as HTTP/1.1 text: status line, headers, one
    /// `Set-Cookie` line per cookie, a blank line and the content.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn output<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write!(writer, "HTTP/1.1 {}\r\n", self.status)?;
        for (name, value) in &self.headers {
            writer.write_all(name.as_str().as_bytes())?;
            writer.write_all(b": ")?;
            writer.write_all(value.as_bytes())?;
            writer.write_all(b"\r\n")?;
        }
        for (name, cookie) in &self.cookies {
            write!(writer, "set-cookie: {}\r\n", cookie.to_header_value(name))?;
        }
        writer.write_all(b"\r\n")?;
        writer.write_all(self.content.as_bytes())?;
        writer.flush()
    }

    fn insert_ascii(&mut self, name: HeaderName, value: &str) {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
    }
}

fn parse_header(name: &str, value: &str) -> CoreResult<(HeaderName, HeaderValue)> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| CoreError::invalid_header(name, e))?;
    let header_value = HeaderValue::from_str(value).map_err(|e| CoreError::invalid_header(name, e))?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let response = Response::new();
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.content(), "");
        assert!(response.headers().is_empty());
        assert!(response.cookies().is_empty());
    }

    #[test]
    fn test_set_and_add_header() {
        let mut response = Response::new();
        response.set_header("X-A", "1").unwrap();
        response.set_header("x-a", "2").unwrap();
        assert_eq!(response.header("X-A"), Some("2"));

        response.add_header("X-A", "3").unwrap();
        assert_eq!(response.headers().get_all("x-a").iter().count(), 2);

        response.remove_header("X-A");
        assert_eq!(response.header("X-A"), None);
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut response = Response::new();
        assert!(matches!(
            response.set_header("X-A", "line\nbreak"),
            Err(CoreError::InvalidHeader { .. })
        ));
        assert!(response.set_header("", "x").is_err());
    }

    #[test]
    fn test_set_expiry_future() {
        let mut response = Response::new();
        response.set_expiry(Some(now() + Duration::hours(1)), now());
        assert_eq!(response.header("Cache-Control"), Some("public, max-age=3600"));
        assert_eq!(response.header("Expires"), Some("Fri, 01 Mar 2024 13:00:00 GMT"));
    }

    #[test]
    fn test_set_expiry_past_clamps_max_age() {
        let mut response = Response::new();
        response.set_expiry(Some(now() - Duration::hours(1)), now());
        assert_eq!(response.header("Cache-Control"), Some("public, max-age=0"));
    }

    #[test]
    fn test_set_expiry_none() {
        let mut response = Response::new();
        response.set_expiry(None, now());
        assert_eq!(
            response.header("Cache-Control"),
            Some("no-cache, no-store, must-revalidate, max-age=0")
        );
        assert_eq!(response.header("Expires"), Some("Thu, 29 Feb 2024 12:00:00 GMT"));
    }

    #[test]
    fn test_output_with_cookies() {
        let mut response = Response::new();
        response.set_status_code(StatusCode::NOT_FOUND);
        response.set_cookie("a", ResponseCookie::new("1"));
        response.set_cookie("b", ResponseCookie::new("2").http_only());

        let mut out = Vec::new();
        response.output(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HTTP/1.1 404 Not Found\r\nset-cookie: a=1\r\nset-cookie: b=2; HttpOnly\r\n\r\n"
        );
    }
}

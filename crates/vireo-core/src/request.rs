//! The request seen by applications, plugins and controllers.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE, REFERER, USER_AGENT};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::cookie::{parse_cookie_header, RequestCookie};
use crate::error::{CoreError, CoreResult};
use crate::items::CustomItems;
use crate::method::Method;
use crate::session::{MemorySessionStore, SessionStore};

/// A unique, time-ordered identifier for each request (UUID v7).
///
/// Used to correlate log lines of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An incoming request.
///
/// Everything but the custom items and the session contents is read-only
/// once the request is built. Plugins may add custom items before dispatch.
///
/// # Example
///
/// ```
/// use vireo_core::Request;
///
/// let request = Request::builder()
///     .method("POST")
///     .url("http://localhost/users/add?return=%2F")
///     .header("Content-Type", "application/x-www-form-urlencoded")
///     .header("Cookie", "theme=dark")
///     .body("name=Ada+Lovelace")
///     .build()
///     .unwrap();
///
/// assert!(request.method().is_post());
/// assert_eq!(request.path(), "/users/add");
/// assert_eq!(request.query_parameter("return"), Some("/"));
/// assert_eq!(request.form_parameter("name"), Some("Ada Lovelace"));
/// assert_eq!(request.cookie("theme").map(|c| c.value()), Some("dark"));
/// ```
#[derive(Debug)]
pub struct Request {
    id: RequestId,
    method: Method,
    url: Url,
    headers: HeaderMap,
    cookies: IndexMap<String, RequestCookie>,
    query: IndexMap<String, String>,
    form: IndexMap<String, String>,
    content: Bytes,
    client_ip: Option<IpAddr>,
    session: Arc<dyn SessionStore>,
    items: CustomItems,
}

impl Request {
    /// Returns a builder for a request.
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Builds a plain `GET` request for `url`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidUrl`] if `url` is not an absolute URL.
    pub fn get(url: &str) -> CoreResult<Self> {
        Self::builder().url(url).build()
    }

    /// Returns the request ID.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the full request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the (still percent-encoded) URL path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
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

    /// Returns a cookie by name.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&RequestCookie> {
        self.cookies.get(name)
    }

    /// Returns all cookies in the order received.
    #[must_use]
    pub const fn cookies(&self) -> &IndexMap<String, RequestCookie> {
        &self.cookies
    }

    /// Returns a query parameter (the last one, if repeated).
    #[must_use]
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Returns all query parameters.
    #[must_use]
    pub const fn query_parameters(&self) -> &IndexMap<String, String> {
        &self.query
    }

    /// Returns a form parameter (the last one, if repeated).
    #[must_use]
    pub fn form_parameter(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    /// Returns all form parameters.
    #[must_use]
    pub const fn form_parameters(&self) -> &IndexMap<String, String> {
        &self.form
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn raw_content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the client IP address, if known.
    #[must_use]
    pub const fn client_ip(&self) -> Option<IpAddr> {
        self.client_ip
    }

    /// Returns the `User-Agent` header.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT).and_then(|v| v.to_str().ok())
    }

    /// Returns the `Referer` header parsed as a URL.
    #[must_use]
    pub fn referrer(&self) -> Option<Url> {
        self.headers
            .get(REFERER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Url::parse(v).ok())
    }

    /// Returns the session.
    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Returns a shared handle to the session.
    #[must_use]
    pub fn session_handle(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.session)
    }

    /// Returns the custom items.
    #[must_use]
    pub const fn custom_items(&self) -> &CustomItems {
        &self.items
    }

    /// Returns the custom items mutably.
    pub fn custom_items_mut(&mut self) -> &mut CustomItems {
        &mut self.items
    }
}

/// Builder for [`Request`].
///
/// Validation happens in [`build`](Self::build): the URL must be absolute,
/// the method alphanumeric and every header valid HTTP.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<String>,
    url: Option<String>,
    headers: Vec<(String, String)>,
    cookies: Vec<(String, String)>,
    form: Vec<(String, String)>,
    content: Bytes,
    client_ip: Option<IpAddr>,
    session: Option<Arc<dyn SessionStore>>,
    items: CustomItems,
}

impl RequestBuilder {
    /// Sets the method (default `GET`).
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the absolute request URL (default `http://localhost/`).
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a cookie; it takes precedence over one of the same name in a
    /// `Cookie` header.
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Adds a form parameter.
    #[must_use]
    pub fn form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((name.into(), value.into()));
        self
    }

    /// Sets the raw body. A url-encoded body is parsed into form
    /// parameters when no explicit form parameters were given.
    #[must_use]
    pub fn body(mut self, content: impl Into<Bytes>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the client IP address.
    #[must_use]
    pub const fn client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Attaches a session (default: a fresh in-memory session).
    #[must_use]
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the initial custom items.
    #[must_use]
    pub fn custom_items(mut self, items: CustomItems) -> Self {
        self.items = items;
        self
    }

    /// Builds the request.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidMethod`], [`CoreError::InvalidUrl`] or
    /// [`CoreError::InvalidHeader`] for invalid input.
    pub fn build(self) -> CoreResult<Request> {
        let method = match self.method {
            Some(method) => Method::new(method)?,
            None => Method::get(),
        };

        let raw_url = self.url.unwrap_or_else(|| "http://localhost/".to_string());
        let url = Url::parse(&raw_url).map_err(|e| CoreError::invalid_url(&raw_url, e.to_string()))?;

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| CoreError::invalid_header(name, e))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| CoreError::invalid_header(name, e))?;
            headers.append(header_name, header_value);
        }

        let mut cookies = IndexMap::new();
        for value in headers.get_all(COOKIE) {
            if let Ok(value) = value.to_str() {
                cookies.extend(parse_cookie_header(value));
            }
        }
        for (name, value) in self.cookies {
            cookies.insert(name, RequestCookie::new(value));
        }

        let query = url.query_pairs().into_owned().collect();

        let is_url_encoded = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));
        let form = if self.form.is_empty() && is_url_encoded {
            url::form_urlencoded::parse(&self.content).into_owned().collect()
        } else {
            self.form.into_iter().collect()
        };

        Ok(Request {
            id: RequestId::new(),
            method,
            url,
            headers,
            cookies,
            query,
            form,
            content: self.content,
            client_ip: self.client_ip,
            session: self
                .session
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            items: self.items,
        })
    }
}

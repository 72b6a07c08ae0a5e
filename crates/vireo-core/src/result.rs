//! Action results.
//!
//! An [`ActionResult`] is a fully-formed description of a response: a
//! status, a body and any variant-specific headers. Controllers return one
//! (or interrupt with one) and the dispatcher applies it with
//! [`ActionResult::update_response`].

use serde::Serialize;

use crate::error::{ContentEncodingError, CoreResult};
use crate::location::resolve_location;
use crate::request::Request;
use crate::response::Response;
use crate::status::StatusCode;

/// The closed set of action results.
///
/// # Example
///
/// ```
/// use vireo_core::{ActionResult, Request, Response, StatusCode};
///
/// let request = Request::get("http://localhost/shop/cart/").unwrap();
/// let mut response = Response::new();
///
/// ActionResult::redirect("../checkout").update_response(&request, &mut response).unwrap();
///
/// assert_eq!(response.status_code(), StatusCode::FOUND);
/// assert_eq!(response.header("Location"), Some("http://localhost/shop/checkout"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// Arbitrary content with a status.
    Content {
        /// The body.
        content: String,
        /// The status.
        status: StatusCode,
    },
    /// 301 or 302 with a `Location` header.
    Redirect {
        /// Target URL, possibly relative to the request URL.
        url: String,
        /// 301 when true, 302 otherwise.
        permanent: bool,
    },
    /// 201, with a `Location` header when a URL is given.
    Created {
        /// Location of the created resource, possibly relative.
        url: Option<String>,
        /// The body.
        content: String,
    },
    /// 400
    BadRequest {
        /// The body.
        content: String,
    },
    /// 401 with a `WWW-Authenticate` challenge.
    Unauthorized {
        /// The body.
        content: String,
        /// The `WWW-Authenticate` value.
        challenge: String,
    },
    /// 403
    Forbidden {
        /// The body.
        content: String,
    },
    /// 404
    NotFound {
        /// The body.
        content: String,
    },
    /// 405
    MethodNotAllowed {
        /// The body.
        content: String,
    },
    /// 204 with no body.
    NoContent,
    /// 304 with no body.
    NotModified,
    /// Pre-encoded JSON with `Content-Type: application/json`.
    Json {
        /// The encoded JSON text.
        body: String,
        /// The status.
        status: StatusCode,
    },
}

impl ActionResult {
    /// `200 OK` with `content`.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self::with_status(content, StatusCode::OK)
    }

    /// `content` with an explicit status.
    #[must_use]
    pub fn with_status(content: impl Into<String>, status: StatusCode) -> Self {
        Self::Content {
            content: content.into(),
            status,
        }
    }

    /// Temporary (302) redirect.
    #[must_use]
    pub fn redirect(url: impl Into<String>) -> Self {
        Self::Redirect {
            url: url.into(),
            permanent: false,
        }
    }

    /// Permanent (301) redirect.
    #[must_use]
    pub fn permanent_redirect(url: impl Into<String>) -> Self {
        Self::Redirect {
            url: url.into(),
            permanent: true,
        }
    }

    /// `201 Created` without a location.
    #[must_use]
    pub fn created() -> Self {
        Self::Created {
            url: None,
            content: String::new(),
        }
    }

    /// `201 Created` pointing at `url`.
    #[must_use]
    pub fn created_at(url: impl Into<String>) -> Self {
        Self::Created {
            url: Some(url.into()),
            content: String::new(),
        }
    }

    /// `400 Bad Request`.
    #[must_use]
    pub fn bad_request(content: impl Into<String>) -> Self {
        Self::BadRequest {
            content: content.into(),
        }
    }

    /// `401 Unauthorized` with the `Basic` challenge.
    #[must_use]
    pub fn unauthorized(content: impl Into<String>) -> Self {
        Self::unauthorized_with_challenge(content, "Basic")
    }

    /// `401 Unauthorized` with a custom challenge.
    #[must_use]
    pub fn unauthorized_with_challenge(
        content: impl Into<String>,
        challenge: impl Into<String>,
    ) -> Self {
        Self::Unauthorized {
            content: content.into(),
            challenge: challenge.into(),
        }
    }

    /// `403 Forbidden`.
    #[must_use]
    pub fn forbidden(content: impl Into<String>) -> Self {
        Self::Forbidden {
            content: content.into(),
        }
    }

    /// `404 Not Found`.
    #[must_use]
    pub fn not_found(content: impl Into<String>) -> Self {
        Self::NotFound {
            content: content.into(),
        }
    }

    /// `405 Method Not Allowed`.
    #[must_use]
    pub fn method_not_allowed(content: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            content: content.into(),
        }
    }

    /// `204 No Content`.
    #[must_use]
    pub const fn no_content() -> Self {
        Self::NoContent
    }

    /// `304 Not Modified`.
    #[must_use]
    pub const fn not_modified() -> Self {
        Self::NotModified
    }

    /// `200 OK` JSON, encoded now.
    ///
    /// # Errors
    ///
    /// Returns [`ContentEncodingError`] if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ContentEncodingError> {
        Self::json_with_status(value, StatusCode::OK)
    }

    /// JSON with an explicit status, encoded now.
    ///
    /// # Errors
    ///
    /// Returns [`ContentEncodingError`] if `value` cannot be serialized.
    pub fn json_with_status<T: Serialize + ?Sized>(
        value: &T,
        status: StatusCode,
    ) -> Result<Self, ContentEncodingError> {
        Ok(Self::Json {
            body: serde_json::to_string(value)?,
            status,
        })
    }

    /// Returns the status this result produces.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Content { status, .. } | Self::Json { status, .. } => *status,
            Self::Redirect { permanent: true, .. } => StatusCode::MOVED_PERMANENTLY,
            Self::Redirect { permanent: false, .. } => StatusCode::FOUND,
            Self::Created { .. } => StatusCode::CREATED,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NoContent => StatusCode::NO_CONTENT,
            Self::NotModified => StatusCode::NOT_MODIFIED,
        }
    }

    /// Returns the body this result produces.
    #[must_use]
    pub fn content_str(&self) -> &str {
        match self {
            Self::Content { content, .. }
            | Self::Created { content, .. }
            | Self::BadRequest { content }
            | Self::Unauthorized { content, .. }
            | Self::Forbidden { content }
            | Self::NotFound { content }
            | Self::MethodNotAllowed { content } => content,
            Self::Json { body, .. } => body,
            Self::Redirect { .. } | Self::NoContent | Self::NotModified => "",
        }
    }

    /// Applies this result to `response`.
    ///
    /// The status and body are always replaced; variant headers
    /// (`Location`, `WWW-Authenticate`, `Content-Type`) are set afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidUrl`](crate::CoreError::InvalidUrl) if a
    /// redirect or created location cannot be resolved against the request
    /// URL, and [`CoreError::InvalidHeader`](crate::CoreError::InvalidHeader)
    /// for a challenge that is not a valid header value.
    pub fn update_response(&self, request: &Request, response: &mut Response) -> CoreResult<()> {
        response.set_status_code(self.status_code());
        response.set_content(self.content_str());

        match self {
            Self::Redirect { url, .. }
            | Self::Created {
                url: Some(url), ..
            } => {
                let location = resolve_location(request.url(), url)?;
                response.set_header("Location", location.as_str())?;
            }
            Self::Unauthorized { challenge, .. } => {
                response.set_header("WWW-Authenticate", challenge)?;
            }
            Self::Json { .. } => {
                response.set_header("Content-Type", "application/json")?;
            }
            _ => {}
        }

        Ok(())
    }
}

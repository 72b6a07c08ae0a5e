//! Conversions between wire messages and Vireo requests and responses.

use std::net::IpAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, COOKIE, HOST, SET_COOKIE};
use http::request::Parts;
use http::uri::PathAndQuery;
use http::HeaderValue;
use http_body_util::Full;
use vireo_core::{parse_cookie_header, Request, Response, SessionStore};

use crate::error::ServerError;

/// Body type of wire responses.
pub type ResponseBody = Full<Bytes>;

/// A wire response.
pub type HttpResponse = http::Response<ResponseBody>;

/// Returns the value of cookie `name` from the `Cookie` headers.
pub fn session_id(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(parse_cookie_header)
        .find(|(cookie, _)| cookie == name)
        .map(|(_, cookie)| cookie.value().to_string())
}

/// Builds a [`Request`] from the parts and collected body of a wire
/// request.
///
/// The absolute URL comes from the request target when it carries an
/// authority, otherwise from the `Host` header.
///
/// # Errors
///
/// Returns [`ServerError::InvalidRequest`] for a header that is not UTF-8
/// and [`ServerError::Request`] if the request is rejected while it is
/// built.
pub fn to_request(
    parts: &Parts,
    body: Bytes,
    client_ip: Option<IpAddr>,
    session: Arc<dyn SessionStore>,
) -> Result<Request, ServerError> {
    let scheme = parts.uri.scheme_str().unwrap_or("http");
    let authority = match parts.uri.authority() {
        Some(authority) => authority.as_str(),
        None => parts
            .headers
            .get(HOST)
            .map(|host| {
                host.to_str()
                    .map_err(|_| ServerError::invalid_request("Host header is not valid UTF-8"))
            })
            .transpose()?
            .unwrap_or("localhost"),
    };
    let target = parts.uri.path_and_query().map_or("/", PathAndQuery::as_str);

    let mut builder = Request::builder()
        .method(parts.method.as_str())
        .url(format!("{scheme}://{authority}{target}"))
        .body(body)
        .session(session);

    for (name, value) in &parts.headers {
        let value = value.to_str().map_err(|_| {
            ServerError::invalid_request(format!("header {name} is not valid UTF-8"))
        })?;
        builder = builder.header(name.as_str(), value);
    }
    if let Some(ip) = client_ip {
        builder = builder.client_ip(ip);
    }

    Ok(builder.build()?)
}

/// Converts a [`Response`] into a wire response: the status, every header
/// and one `Set-Cookie` header per cookie.
///
/// # Errors
///
/// Returns [`ServerError::InvalidResponse`] if a cookie does not form a
/// valid header value.
pub fn to_http_response(response: &Response) -> Result<HttpResponse, ServerError> {
    let status = http::StatusCode::from_u16(response.status_code().code())
        .map_err(|e| ServerError::invalid_response(e.to_string()))?;

    let mut http_response = http::Response::new(Full::new(Bytes::from(
        response.content().to_string(),
    )));
    *http_response.status_mut() = status;

    let headers = http_response.headers_mut();
    headers.extend(
        response
            .headers()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    for (name, cookie) in response.cookies() {
        let value = HeaderValue::from_str(&cookie.to_header_value(name))
            .map_err(|e| ServerError::invalid_response(format!("cookie {name}: {e}")))?;
        headers.append(SET_COOKIE, value);
    }

    Ok(http_response)
}

/// A plain-text response with the standard reason as body.
pub fn plain_response(status: http::StatusCode) -> HttpResponse {
    let mut response = http::Response::new(Full::new(Bytes::from(
        status.canonical_reason().unwrap_or_default(),
    )));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

//! # Vireo Core
//!
//! Core values for the Vireo MVC framework.
//!
//! This crate provides the types every other Vireo crate speaks:
//!
//! - [`StatusCode`] - Closed registry of HTTP status codes
//! - [`Method`] - Validated HTTP method
//! - [`Request`] / [`Response`] - The request adapter and the response under construction
//! - [`ActionResult`] - Result variants that know how to update a response
//! - [`SessionStore`] - Explicitly injected session storage
//! - [`CustomItems`] - Name- and type-keyed item bag
//! - [`ActionError`] - The short-circuit or failure signal raised by actions
//! - [`CoreError`] / [`ContentEncodingError`] - Error types

#![doc(html_root_url = "https://docs.rs/vireo-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cookie;
mod error;
mod items;
mod location;
mod method;
mod request;
mod response;
mod result;
mod session;
mod signal;
mod status;

pub use cookie::{parse_cookie_header, RequestCookie, ResponseCookie};
pub use error::{ContentEncodingError, CoreError, CoreResult};
pub use items::CustomItems;
pub use location::resolve_location;
pub use method::Method;
pub use request::{Request, RequestBuilder, RequestId};
pub use response::Response;
pub use result::ActionResult;
pub use session::{MemorySessionStore, SessionStore};
pub use signal::{interrupt, ActionError, ActionOutcome};
pub use status::StatusCode;

pub use url::Url;

//! # Vireo Test
//!
//! In-memory testing for Vireo applications: requests go through the full
//! run-loop (plugins, routing, dispatch, error handling) without binding a
//! port.
//!
//! ```
//! use vireo_core::ActionResult;
//! use vireo_mvc::{interrupt, ActionContext, ActionOutcome, ActionTable, Application, Controller};
//! use vireo_test::TestClient;
//!
//! #[derive(Default)]
//! struct PageController;
//!
//! impl PageController {
//!     fn show(&mut self, _ctx: &mut ActionContext<'_>, id: u32) -> ActionOutcome<String> {
//!         if id == 0 {
//!             return interrupt(ActionResult::not_found("Page was not found"));
//!         }
//!         Ok(format!("page {id}"))
//!     }
//! }
//!
//! impl Controller for PageController {
//!     fn register(actions: &mut ActionTable<Self>) {
//!         actions.add("show", Self::show);
//!     }
//! }
//!
//! let client = TestClient::new(Application::builder().route::<PageController>("pages").build().unwrap());
//! client.get("/pages/show/3").send().assert_status(200).assert_content("page 3");
//! client.get("/pages/show/0").send().assert_status(404).assert_content("Page was not found");
//! ```

#![doc(html_root_url = "https://docs.rs/vireo-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::{TestClient, DEFAULT_BASE_URL};
pub use error::TestError;
pub use request::TestRequest;
pub use response::TestResponse;

//! Test request building.

use std::sync::Arc;

use serde::Serialize;
use vireo_core::{Request, RequestBuilder, SessionStore};

use crate::client::TestClient;
use crate::error::TestError;
use crate::response::TestResponse;

/// A request being prepared by a [`TestClient`].
///
/// Nothing runs until [`send`](Self::send) or [`try_send`](Self::try_send).
///
/// # Example
///
/// ```
/// use vireo_mvc::{ActionContext, ActionTable, Application, Controller};
/// use vireo_test::TestClient;
///
/// #[derive(Default)]
/// struct EchoController;
///
/// impl EchoController {
///     fn index(&mut self, ctx: &mut ActionContext<'_>) -> String {
///         let name = ctx.request().form_parameter("name").unwrap_or("nobody");
///         format!("{} from {name}", ctx.request().method())
///     }
/// }
///
/// impl Controller for EchoController {
///     fn register(actions: &mut ActionTable<Self>) {
///         actions.add("index", Self::index);
///     }
/// }
///
/// let client = TestClient::new(Application::builder().route::<EchoController>("").build().unwrap());
/// client
///     .post("/")
///     .form("name", "Ada")
///     .send()
///     .assert_status(200)
///     .assert_content("POST from Ada");
/// ```
#[must_use]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    builder: RequestBuilder,
    session: Option<Arc<dyn SessionStore>>,
    error: Option<TestError>,
}

impl<'a> TestRequest<'a> {
    pub(crate) fn new(client: &'a TestClient, method: &str, url: String) -> Self {
        let mut builder = Request::builder().method(method).url(url);
        for (name, value) in client.default_headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        Self {
            client,
            builder,
            session: None,
            error: None,
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Adds a cookie.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.cookie(name, value);
        self
    }

    /// Adds a form parameter.
    pub fn form(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.form(name, value);
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.builder = self.builder.body(body.into());
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => {
                self.builder = self
                    .builder
                    .header("Content-Type", "application/json")
                    .body(body);
            }
            Err(e) => self.error = Some(TestError::Json(e)),
        }
        self
    }

    /// Uses `session` instead of the client's session.
    pub fn session(mut self, session: Arc<dyn SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    /// Runs the request through the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built.
    pub fn try_send(self) -> Result<TestResponse, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let session = self.session.unwrap_or_else(|| self.client.session());
        let request = self.builder.session(session).build()?;
        Ok(TestResponse::new(self.client.application().handle(request)))
    }

    /// Runs the request through the application.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub fn send(self) -> TestResponse {
        self.try_send()
            .unwrap_or_else(|e| panic!("failed to send test request: {e}"))
    }
}

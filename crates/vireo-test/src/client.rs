//! In-memory test client.

use std::sync::Arc;

use vireo_core::{MemorySessionStore, SessionStore};
use vireo_mvc::Application;

use crate::request::TestRequest;

/// Default base URL of test requests.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Sends requests straight into an [`Application`]'s run-loop, without a
/// server or a socket.
///
/// Like a browser, the client keeps one session across its requests.
///
/// # Example
///
/// ```
/// use vireo_mvc::{ActionContext, ActionTable, Application, Controller};
/// use vireo_test::TestClient;
///
/// #[derive(Default)]
/// struct HomeController;
///
/// impl HomeController {
///     fn index(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
///         "Hello World!"
///     }
/// }
///
/// impl Controller for HomeController {
///     fn register(actions: &mut ActionTable<Self>) {
///         actions.add("index", Self::index);
///     }
/// }
///
/// let application = Application::builder().route::<HomeController>("").build().unwrap();
/// let client = TestClient::new(application);
///
/// client.get("/").send().assert_status(200).assert_content("Hello World!");
/// client.get("/missing/").send().assert_status(404).assert_content("");
/// ```
#[must_use]
pub struct TestClient {
    application: Arc<Application>,
    base_url: String,
    default_headers: Vec<(String, String)>,
    session: Arc<MemorySessionStore>,
}

impl TestClient {
    /// Creates a client for `application`.
    pub fn new(application: Application) -> Self {
        Self::from_arc(Arc::new(application))
    }

    /// Creates a client for a shared application.
    pub fn from_arc(application: Arc<Application>) -> Self {
        Self {
            application,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: Vec::new(),
            session: Arc::new(MemorySessionStore::new()),
        }
    }

    /// Sets the scheme and authority that request paths are appended to.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Returns the application.
    #[must_use]
    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Returns the session shared by this client's requests.
    #[must_use]
    pub fn session(&self) -> Arc<dyn SessionStore> {
        self.session.clone()
    }

    /// Starts a `GET` request.
    pub fn get(&self, path: &str) -> TestRequest<'_> {
        self.request("GET", path)
    }

    /// Starts a `POST` request.
    pub fn post(&self, path: &str) -> TestRequest<'_> {
        self.request("POST", path)
    }

    /// Starts a `PUT` request.
    pub fn put(&self, path: &str) -> TestRequest<'_> {
        self.request("PUT", path)
    }

    /// Starts a `DELETE` request.
    pub fn delete(&self, path: &str) -> TestRequest<'_> {
        self.request("DELETE", path)
    }

    /// Starts a request with any method. `path` may also be an absolute
    /// URL.
    pub fn request(&self, method: &str, path: &str) -> TestRequest<'_> {
        TestRequest::new(self, method, self.url(path))
    }

    pub(crate) fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    fn url(&self, path: &str) -> String {
        if path.contains("://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

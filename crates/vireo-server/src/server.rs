//! The HTTP server.
//!
//! One Tokio task per connection; hyper parses HTTP/1.1 and hands each
//! request to [`Server::handle_request`], which runs the application
//! synchronously on the connection's task.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};
use vireo_core::{ResponseCookie, SessionStore};
use vireo_mvc::Application;

use crate::config::ServerConfig;
use crate::convert::{plain_response, session_id, to_http_response, to_request, HttpResponse};
use crate::error::ServerError;
use crate::session::SessionRegistry;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Hosts one [`Application`] over HTTP.
///
/// # Example
///
/// ```rust,no_run
/// use vireo_mvc::Application;
/// use vireo_server::{Server, ServerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let application = Application::builder().build()?;
///     let server = Server::builder()
///         .config(ServerConfig::builder().http_addr("127.0.0.1:8080").build())
///         .application(application)
///         .build()?;
///
///     server.run().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    application: Arc<Application>,
    sessions: SessionRegistry,
}

impl Server {
    /// Creates a builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the hosted application.
    #[must_use]
    pub fn application(&self) -> &Application {
        &self.application
    }

    /// Returns the session registry.
    #[must_use]
    pub const fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Serves until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals()).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address is invalid or cannot be
    /// bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|e| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                reason: e.to_string(),
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await;
        Ok(())
    }

    /// Serves connections from `listener` until `shutdown` fires, then
    /// waits up to the shutdown timeout for open connections to finish.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "server listening");
        }

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => server.accept(stream, remote, &tracker, &shutdown),
                    Err(e) => error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        let timeout = server.config.shutdown_timeout();
        info!(
            connections = tracker.active_connections(),
            timeout_secs = timeout.as_secs(),
            "draining connections"
        );
        if tokio::time::timeout(timeout, tracker.wait_idle()).await.is_err() {
            warn!(
                connections = tracker.active_connections(),
                "shutdown timeout reached with connections still open"
            );
        }
        info!("server stopped");
    }

    fn accept(
        self: &Arc<Self>,
        stream: TcpStream,
        remote: SocketAddr,
        tracker: &ConnectionTracker,
        shutdown: &ShutdownSignal,
    ) {
        if let Some(max) = self.config.max_connections() {
            if tracker.active_connections() >= max {
                warn!(%remote, max, "connection limit reached, dropping connection");
                return;
            }
        }

        let token = tracker.acquire();
        let server = Arc::clone(self);
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = server.serve_connection(stream, remote, shutdown).await {
                debug!(%remote, error = %e, "connection closed with error");
            }
            drop(token);
        });
    }

    async fn serve_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let server = Arc::clone(&self);
        let service = service_fn(move |request: http::Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle_request(request, remote).await) }
        });

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(self.config.keep_alive_timeout().is_some());
        if let Some(timeout) = self.config.keep_alive_timeout() {
            builder.header_read_timeout(timeout);
        }

        let connection = builder.serve_connection(TokioIo::new(stream), service);
        tokio::pin!(connection);

        tokio::select! {
            result = connection.as_mut() => result,
            () = shutdown.recv() => {
                debug!(%remote, "finishing connection for shutdown");
                connection.as_mut().graceful_shutdown();
                connection.await
            }
        }
    }

    /// Handles one wire request: collects the body, attaches the session,
    /// runs the application and converts the response.
    ///
    /// Bodies over [`ServerConfig::max_body_bytes`] get a 413 and requests
    /// that cannot be converted get a 400; neither reaches the application.
    /// A new session is kept, and its cookie sent, only if the application
    /// stored something in it.
    pub async fn handle_request<B>(&self, request: http::Request<B>, remote: SocketAddr) -> HttpResponse
    where
        B: hyper::body::Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = request.into_parts();
        let limit = self.config.max_body_bytes();
        let body = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.is::<LengthLimitError>() => {
                warn!(%remote, limit, "request body too large");
                return plain_response(http::StatusCode::PAYLOAD_TOO_LARGE);
            }
            Err(e) => {
                warn!(%remote, error = %e, "failed to read request body");
                return plain_response(http::StatusCode::BAD_REQUEST);
            }
        };

        let cookie_name = self.config.session_cookie();
        let session = self
            .sessions
            .resolve(session_id(&parts, cookie_name).as_deref());
        let store: Arc<dyn SessionStore> = session.store.clone();

        let mut request = match to_request(&parts, body, Some(remote.ip()), store) {
            Ok(request) => request,
            Err(e) => {
                warn!(%remote, error = %e, "rejecting malformed request");
                return plain_response(http::StatusCode::BAD_REQUEST);
            }
        };

        let mut response = vireo_core::Response::new();
        self.application.run(&mut request, &mut response);

        if self.sessions.commit(&session) && response.cookie(cookie_name).is_none() {
            match ResponseCookie::new(session.id.as_str()).with_path("/") {
                Ok(cookie) => response.set_cookie(cookie_name, cookie.http_only()),
                Err(e) => warn!(error = %e, "cannot set session cookie"),
            }
        }

        to_http_response(&response).unwrap_or_else(|e| {
            error!(error = %e, "cannot convert response");
            plain_response(http::StatusCode::INTERNAL_SERVER_ERROR)
        })
    }
}

/// Builder for [`Server`].
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: Option<ServerConfig>,
    application: Option<Application>,
}

impl ServerBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration (default: [`ServerConfig::default`]).
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the application to host.
    #[must_use]
    pub fn application(mut self, application: Application) -> Self {
        self.application = Some(application);
        self
    }

    /// Builds the server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::MissingApplication`] if no application was
    /// set.
    pub fn build(self) -> Result<Server, ServerError> {
        let application = self.application.ok_or(ServerError::MissingApplication)?;
        Ok(Server {
            config: self.config.unwrap_or_default(),
            application: Arc::new(application),
            sessions: SessionRegistry::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use vireo_mvc::{ActionContext, ActionTable, Controller};

    #[derive(Default)]
    struct CounterController;

    impl CounterController {
        fn index(&mut self, ctx: &mut ActionContext<'_>) -> String {
            let count = ctx
                .session()
                .get("count")
                .and_then(|v| v.as_u64())
                .unwrap_or(0)
                + 1;
            ctx.session().set("count", count.into());
            format!("visit {count}")
        }

        fn quiet(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
            "shh"
        }

        fn logout(&mut self, ctx: &mut ActionContext<'_>) -> &'static str {
            ctx.session().clear();
            "bye"
        }

        fn length(&mut self, ctx: &mut ActionContext<'_>) -> String {
            ctx.request().raw_content().len().to_string()
        }
    }

    impl Controller for CounterController {
        fn register(actions: &mut ActionTable<Self>) {
            actions
                .add("index", Self::index)
                .add("quiet", Self::quiet)
                .add("logout", Self::logout)
                .add("length", Self::length);
        }
    }

    fn server_with(config: ServerConfig) -> Server {
        let application = Application::builder()
            .route::<CounterController>("")
            .build()
            .unwrap();
        Server::builder()
            .config(config)
            .application(application)
            .build()
            .unwrap()
    }

    fn server() -> Server {
        server_with(ServerConfig::default())
    }

    fn get(path: &str, cookie: Option<&str>) -> http::Request<Full<Bytes>> {
        let mut builder = http::Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header("Cookie", cookie);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    fn remote() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn body(response: HttpResponse) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_builder_requires_application() {
        assert!(matches!(
            Server::builder().build(),
            Err(ServerError::MissingApplication)
        ));
    }

    #[tokio::test]
    async fn test_session_cookie_round_trip() {
        let server = server();

        let request = http::Request::get("/").body(Full::new(Bytes::new())).unwrap();
        let response = server.handle_request(request, remote()).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        let cookie = response.headers()[http::header::SET_COOKIE]
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("VIREOSESSID="));
        assert!(cookie.ends_with("; Path=/; HttpOnly"));
        assert_eq!(body(response).await, "visit 1");

        let pair = cookie.split(';').next().unwrap().to_string();
        let request = http::Request::get("/")
            .header("Cookie", pair)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = server.handle_request(request, remote()).await;
        assert!(response.headers().get(http::header::SET_COOKIE).is_none());
        assert_eq!(body(response).await, "visit 2");
        assert_eq!(server.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_untouched_sessions_are_not_kept() {
        let server = server();
        for _ in 0..1000 {
            let response = server.handle_request(get("/quiet", None), remote()).await;
            assert_eq!(response.status(), http::StatusCode::OK);
            assert!(response.headers().get(http::header::SET_COOKIE).is_none());
        }
        assert!(server.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_cleared_session_is_dropped() {
        let server = server();
        let response = server.handle_request(get("/", None), remote()).await;
        let cookie = response.headers()[http::header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string();
        assert_eq!(server.sessions().len(), 1);

        let response = server
            .handle_request(get("/logout", Some(&cookie)), remote())
            .await;
        assert_eq!(body(response).await, "bye");
        assert!(server.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let server = server_with(ServerConfig::builder().max_body_bytes(16).build());

        let request = http::Request::post("/length")
            .body(Full::new(Bytes::from_static(b"0123456789abcdef")))
            .unwrap();
        let response = server.handle_request(request, remote()).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(body(response).await, "16");

        let request = http::Request::post("/length")
            .body(Full::new(Bytes::from(vec![b'x'; 17])))
            .unwrap();
        let response = server.handle_request(request, remote()).await;
        assert_eq!(response.status(), http::StatusCode::PAYLOAD_TOO_LARGE);
        assert!(server.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_request_is_400() {
        let server = server();
        let request = http::Request::get("/")
            .header("x-raw", http::HeaderValue::from_bytes(b"\xff").unwrap())
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = server.handle_request(request, remote()).await;
        assert_eq!(response.status(), http::StatusCode::BAD_REQUEST);
        assert!(server.sessions().is_empty());
    }

    #[tokio::test]
    async fn test_unrouted_request_is_404() {
        let application = Application::builder().build().unwrap();
        let server = Server::builder().application(application).build().unwrap();
        let request = http::Request::get("/missing")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let response = server.handle_request(request, remote()).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(body(response).await, "");
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let application = Application::builder().build().unwrap();
        let server = Server::builder()
            .config(ServerConfig::builder().http_addr("nowhere").build())
            .application(application)
            .build()
            .unwrap();
        assert!(matches!(
            server.run_with_shutdown(ShutdownSignal::new()).await,
            Err(ServerError::InvalidAddress { .. })
        ));
    }
}

//! End-to-end tests over a real socket.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use vireo_mvc::{ActionContext, ActionTable, Application, Controller};
use vireo_server::{Server, ServerConfig, ShutdownSignal};

#[derive(Default)]
struct HomeController;

impl HomeController {
    fn index(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
        "Hello World!"
    }

    fn echo(&mut self, ctx: &mut ActionContext<'_>) -> String {
        ctx.request().form_parameter("text").unwrap_or_default().to_string()
    }

    fn login(&mut self, ctx: &mut ActionContext<'_>) -> &'static str {
        ctx.session().set("user", "ada".into());
        "welcome"
    }
}

impl Controller for HomeController {
    fn register(actions: &mut ActionTable<Self>) {
        actions
            .add("index", Self::index)
            .add("echo", Self::echo)
            .add("login", Self::login);
    }
}

async fn start() -> (std::net::SocketAddr, ShutdownSignal, tokio::task::JoinHandle<()>) {
    let application = Application::builder()
        .route::<HomeController>("")
        .build()
        .unwrap();
    let server = Server::builder()
        .config(
            ServerConfig::builder()
                .shutdown_timeout(Duration::from_secs(1))
                .build(),
        )
        .application(application)
        .build()
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let handle = tokio::spawn(server.serve(listener, shutdown.clone()));
    (addr, shutdown, handle)
}

async fn exchange(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut out = String::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_string(&mut out))
        .await
        .expect("response in time")
        .unwrap();
    out
}

#[tokio::test]
async fn test_get_index() {
    let (addr, shutdown, handle) = start().await;

    let response = exchange(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(!response.contains("set-cookie"), "{response}");
    assert!(response.ends_with("Hello World!"), "{response}");

    let response = exchange(
        addr,
        "GET /login HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.contains("set-cookie: VIREOSESSID="), "{response}");
    assert!(response.ends_with("welcome"), "{response}");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops")
        .unwrap();
}

#[tokio::test]
async fn test_post_form_and_not_found() {
    let (addr, shutdown, handle) = start().await;

    let response = exchange(
        addr,
        "POST /echo HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/x-www-form-urlencoded\r\nContent-Length: 15\r\n\r\n\
         text=hello+wire",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response.ends_with("hello wire"), "{response}");

    let response = exchange(
        addr,
        "GET /nowhere/at/all HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"), "{response}");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops")
        .unwrap();
}

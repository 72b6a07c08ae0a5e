//! Run-loop tests: routing, plugins, error handling and views.

use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

use serde_json::json;
use vireo_core::{Request, Response, StatusCode};
use vireo_mvc::{
    interrupt, ActionContext, ActionError, ActionOutcome, ActionResult, ActionTable, Application,
    ConfigurationError, Controller, Plugin, Segment, TemplateRenderer, View,
};

#[derive(Default)]
struct ShopController;

impl ShopController {
    fn index(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
        "shop index"
    }

    fn item(&mut self, _ctx: &mut ActionContext<'_>, id: u32) -> String {
        format!("item {id}")
    }

    fn crash(&mut self, _ctx: &mut ActionContext<'_>) -> ActionOutcome<String> {
        let err = anyhow::anyhow!("stock service offline").context("loading stock");
        Err(ActionError::failure(err))
    }

    fn gone(&mut self, ctx: &mut ActionContext<'_>) -> ActionOutcome<()> {
        ctx.response_mut().set_content("partial");
        interrupt(ActionResult::not_found("Page was not found"))
    }

    fn echo(&mut self, _ctx: &mut ActionContext<'_>, word: Segment) -> String {
        word.into_inner()
    }

    fn page(&mut self, ctx: &mut ActionContext<'_>) -> View {
        ctx.set_view_item("site", "Vireo");
        View::new(json!({"title": "Welcome"}))
    }

    fn named(&mut self, _ctx: &mut ActionContext<'_>) -> View {
        View::new(json!("named")).with_file("other")
    }

    fn noview(&mut self, _ctx: &mut ActionContext<'_>) -> View {
        View::empty()
    }
}

impl Controller for ShopController {
    fn register(actions: &mut ActionTable<Self>) {
        actions
            .add("index", Self::index)
            .add("item", Self::item)
            .add("crash", Self::crash)
            .add("gone", Self::gone)
            .add("echo", Self::echo)
            .add("page", Self::page)
            .add("named", Self::named)
            .add("noview", Self::noview);
    }
}

#[derive(Default)]
struct ErrorController;

impl ErrorController {
    fn not_found(&mut self, ctx: &mut ActionContext<'_>) -> String {
        format!("custom 404 for {}", ctx.request().path())
    }

    fn server_error(&mut self, ctx: &mut ActionContext<'_>) -> String {
        match ctx.error() {
            Some(error) => format!("custom 500: {error}"),
            None => "custom 500".to_string(),
        }
    }
}

impl Controller for ErrorController {
    fn register(actions: &mut ActionTable<Self>) {
        actions.add("404", Self::not_found).add("500", Self::server_error);
    }
}

#[derive(Default)]
struct BrokenErrorController;

impl BrokenErrorController {
    fn any(&mut self, _ctx: &mut ActionContext<'_>, _status: String) -> ActionOutcome<String> {
        Err(ActionError::failure(anyhow::anyhow!("error page broke")))
    }
}

impl Controller for BrokenErrorController {
    fn register(actions: &mut ActionTable<Self>) {
        actions.add("default", Self::any);
    }
}

fn get(application: &Application, url: &str) -> Response {
    application.handle(Request::get(url).unwrap())
}

fn shop() -> vireo_mvc::ApplicationBuilder {
    Application::builder().route::<ShopController>("shop")
}

#[test]
fn test_routes_and_parameters() {
    let application = shop().build().unwrap();

    let response = get(&application, "http://localhost/shop/");
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.content(), "shop index");

    let response = get(&application, "http://localhost/shop/item/42");
    assert_eq!(response.content(), "item 42");
}

#[test]
fn test_unmatched_route_is_404_with_empty_body() {
    let application = shop().build().unwrap();
    let response = get(&application, "http://localhost/nowhere/");
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.content(), "");
}

#[test]
fn test_parameter_mismatch_is_404() {
    let application = shop().build().unwrap();
    let response = get(&application, "http://localhost/shop/item/042");
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn test_unhandled_keeps_content() {
    struct Banner;

    impl Plugin for Banner {
        fn name(&self) -> &str {
            "banner"
        }

        fn on_pre_request(
            &self,
            _application: &Application,
            _request: &mut Request,
            response: &mut Response,
        ) -> bool {
            response.set_content("banner");
            false
        }
    }

    let application = shop().plugin(Banner).build().unwrap();

    let response = get(&application, "http://localhost/shop/echo/a/b");
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.content(), "banner");

    let response = get(&application, "http://localhost/elsewhere/");
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.content(), "banner");

    let response = get(&application, "http://localhost/shop/echo/a");
    assert_eq!(response.content(), "a");
}

#[test]
fn test_interrupt_replaces_content() {
    let application = shop().build().unwrap();
    let response = get(&application, "http://localhost/shop/gone");
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.content(), "Page was not found");
}

#[test]
fn test_failure_release_mode_is_bare_500() {
    let application = shop().build().unwrap();
    let response = get(&application, "http://localhost/shop/crash");
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.content(), "");
}

#[test]
fn test_failure_debug_mode_renders_chain() {
    let application = shop().debug(true).build().unwrap();
    let response = get(&application, "http://localhost/shop/crash");
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.content().starts_with("action Shop::crash failed"));
    assert!(response.content().contains("Caused by:"));
    assert!(response.content().contains("loading stock"));
    assert!(response.content().contains("stock service offline"));
}

#[test]
fn test_error_controller_handles_statuses() {
    let application = shop().error_controller::<ErrorController>().build().unwrap();

    let response = get(&application, "http://localhost/missing/");
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.content(), "custom 404 for /missing/");

    let response = get(&application, "http://localhost/shop/crash");
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.content(), "custom 500: action Shop::crash failed");

    // Interrupted 404s go through the error controller as well.
    let response = get(&application, "http://localhost/shop/gone");
    assert_eq!(response.content(), "custom 404 for /shop/gone");
}

#[test]
fn test_failing_error_controller_is_not_retried() {
    let application = shop()
        .debug(true)
        .error_controller::<BrokenErrorController>()
        .build()
        .unwrap();
    let response = get(&application, "http://localhost/missing/");
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.content(), "");
}

struct CountingPlugin {
    name: &'static str,
    stop_pre: bool,
    stop_post: bool,
    pre: Arc<AtomicUsize>,
    post: Arc<AtomicUsize>,
}

impl CountingPlugin {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            stop_pre: false,
            stop_post: false,
            pre: Arc::default(),
            post: Arc::default(),
        }
    }
}

impl Plugin for CountingPlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn on_pre_request(
        &self,
        _application: &Application,
        request: &mut Request,
        response: &mut Response,
    ) -> bool {
        self.pre.fetch_add(1, Ordering::SeqCst);
        request.custom_items_mut().set("seen-by", self.name.to_string());
        if self.stop_pre {
            response.set_status_code(StatusCode::SERVICE_UNAVAILABLE);
            response.set_content("maintenance");
        }
        self.stop_pre
    }

    fn on_post_request(
        &self,
        _application: &Application,
        _request: &Request,
        response: &mut Response,
    ) -> bool {
        self.post.fetch_add(1, Ordering::SeqCst);
        response.add_header("X-Plugin", self.name).unwrap();
        self.stop_post
    }
}

#[test]
fn test_pre_request_stop_skips_dispatch_and_post_hooks() {
    let first = CountingPlugin {
        stop_pre: true,
        ..CountingPlugin::new("first")
    };
    let second = CountingPlugin::new("second");
    let (first_post, second_pre) = (first.post.clone(), second.pre.clone());

    let application = shop().plugin(first).plugin(second).build().unwrap();
    let response = get(&application, "http://localhost/shop/");

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.content(), "maintenance");
    assert_eq!(second_pre.load(Ordering::SeqCst), 0);
    assert_eq!(first_post.load(Ordering::SeqCst), 0);
}

#[test]
fn test_post_request_stop_skips_remaining_hooks() {
    let first = CountingPlugin {
        stop_post: true,
        ..CountingPlugin::new("first")
    };
    let second = CountingPlugin::new("second");
    let second_post = second.post.clone();

    let application = shop().plugin(first).plugin(second).build().unwrap();
    let response = get(&application, "http://localhost/shop/");

    assert_eq!(response.content(), "shop index");
    assert_eq!(response.header("X-Plugin"), Some("first"));
    assert_eq!(second_post.load(Ordering::SeqCst), 0);
}

#[test]
fn test_views() {
    let root = tempfile::tempdir().unwrap();
    let shop_views = root.path().join("Views").join("Shop");
    fs::create_dir_all(&shop_views).unwrap();
    fs::write(shop_views.join("page.tpl"), "<h1>{{ title }}</h1> on {{ items.site }}").unwrap();
    fs::write(shop_views.join("other.tpl"), "{{ model }}").unwrap();
    fs::write(shop_views.join("page.html"), "html wins?").unwrap();

    let application = shop()
        .document_root(root.path())
        .renderer(TemplateRenderer::new())
        .renderer(TemplateRenderer::with_extension("html"))
        .build()
        .unwrap();
    assert_eq!(application.view_path(), root.path().join("Views"));

    let response = get(&application, "http://localhost/shop/page");
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.content(), "<h1>Welcome</h1> on Vireo");

    let response = get(&application, "http://localhost/shop/named");
    assert_eq!(response.content(), "named");

    let response = get(&application, "http://localhost/shop/noview");
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_view_without_renderers_fails() {
    let application = shop().debug(true).build().unwrap();
    let response = get(&application, "http://localhost/shop/page");
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.content(), "no view renderers are registered");
}

#[test]
fn test_configuration_errors() {
    let err = Application::builder()
        .route::<ShopController>("bad path")
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::Route(_)));

    let err = Application::builder()
        .renderer(TemplateRenderer::with_extension(".tpl"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidViewExtension(_)));
}

#[test]
fn test_with_config() {
    let section = vireo_config::ApplicationSection {
        document_root: "/srv/site".into(),
        view_path: Some("templates".into()),
        debug: true,
    };
    let application = Application::builder().with_config(&section).build().unwrap();
    assert!(application.is_debug());
    assert_eq!(application.document_root(), std::path::Path::new("/srv/site"));
    assert_eq!(application.view_path(), std::path::Path::new("/srv/site/templates"));
}

#[test]
fn test_application_items_visible_to_actions() {
    #[derive(Default)]
    struct ItemsController;

    impl ItemsController {
        fn index(&mut self, ctx: &mut ActionContext<'_>) -> String {
            let greeting = ctx.application_items().get::<String>("greeting");
            let seen_by = ctx.request().custom_items().get::<String>("seen-by");
            format!("{greeting:?} {seen_by:?}")
        }
    }

    impl Controller for ItemsController {
        fn register(actions: &mut ActionTable<Self>) {
            actions.add("index", Self::index);
        }
    }

    let application = Application::builder()
        .route::<ItemsController>("")
        .custom_item("greeting", "hi".to_string())
        .plugin(CountingPlugin::new("tagger"))
        .build()
        .unwrap();
    let response = get(&application, "http://localhost/");
    assert_eq!(response.content(), "Some(\"hi\") Some(\"tagger\")");
}

#[derive(Clone, Default)]
struct Hooks {
    pre: Option<ActionResult>,
    post: Option<ActionResult>,
    post_after_interrupt: bool,
}

struct GuardedController {
    hooks: Hooks,
    runs: Arc<AtomicUsize>,
}

impl GuardedController {
    fn index(&mut self, _ctx: &mut ActionContext<'_>) -> ActionResult {
        self.runs.fetch_add(1, Ordering::SeqCst);
        ActionResult::not_found("nf")
    }
}

impl Controller for GuardedController {
    fn register(actions: &mut ActionTable<Self>) {
        actions.add("index", Self::index);
    }

    fn runs_post_action_after_interrupt(&self) -> bool {
        self.hooks.post_after_interrupt
    }

    fn on_pre_action_event(
        &mut self,
        _ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome<Option<ActionResult>> {
        Ok(self.hooks.pre.take())
    }

    fn on_post_action_event(
        &mut self,
        _ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome<Option<ActionResult>> {
        match self.hooks.post.take() {
            Some(result) => interrupt(result),
            None => Ok(None),
        }
    }
}

fn guarded(hooks: Hooks) -> (Response, usize) {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let application = Application::builder()
        .route_with("guarded", move || GuardedController {
            hooks: hooks.clone(),
            runs: Arc::clone(&counter),
        })
        .build()
        .unwrap();
    let response = get(&application, "http://localhost/guarded/");
    (response, runs.load(Ordering::SeqCst))
}

#[test]
fn test_action_hooks_without_results() {
    let (response, runs) = guarded(Hooks::default());
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.content(), "nf");
    assert_eq!(runs, 1);
}

#[test]
fn test_pre_action_result_skips_action() {
    let (response, runs) = guarded(Hooks {
        pre: Some(ActionResult::forbidden("pre")),
        ..Hooks::default()
    });
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.content(), "pre");
    assert_eq!(runs, 0);
}

#[test]
fn test_post_action_result_replaces_action_result() {
    let (response, runs) = guarded(Hooks {
        post: Some(ActionResult::content("post")),
        ..Hooks::default()
    });
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.content(), "post");
    assert_eq!(runs, 1);
}

#[test]
fn test_post_action_skipped_after_pre_action_result() {
    let (response, runs) = guarded(Hooks {
        pre: Some(ActionResult::forbidden("pre")),
        post: Some(ActionResult::content("post")),
        post_after_interrupt: false,
    });
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.content(), "pre");
    assert_eq!(runs, 0);
}

#[test]
fn test_post_action_after_pre_action_result_when_enabled() {
    let (response, runs) = guarded(Hooks {
        pre: Some(ActionResult::forbidden("pre")),
        post: Some(ActionResult::content("post")),
        post_after_interrupt: true,
    });
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.content(), "post");
    assert_eq!(runs, 0);
}

/// Collects the distinct counter series registered through it.
#[derive(Default)]
struct SeriesRecorder {
    counters: Mutex<HashSet<Key>>,
}

impl SeriesRecorder {
    fn series(&self, name: &str) -> Vec<Key> {
        self.counters
            .lock()
            .unwrap()
            .iter()
            .filter(|key| key.name() == name)
            .cloned()
            .collect()
    }
}

impl Recorder for SeriesRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        self.counters.lock().unwrap().insert(key.clone());
        Counter::noop()
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

#[test]
fn test_request_metrics_label_registered_actions_only() {
    let recorder = SeriesRecorder::default();
    let application = shop().build().unwrap();

    metrics::with_local_recorder(&recorder, || {
        for i in 0..50 {
            get(&application, &format!("http://localhost/shop/garbage{i}"));
            get(&application, &format!("http://localhost/nowhere{i}/"));
        }
        get(&application, "http://localhost/shop/item/7");
        get(&application, "http://localhost/shop/ITEM/8");
    });

    let series = recorder.series(vireo_telemetry::metrics::REQUESTS_TOTAL);
    let mut actions: Vec<String> = series
        .iter()
        .filter_map(|key| {
            key.labels()
                .find(|label| label.key() == "action")
                .map(|label| label.value().to_string())
        })
        .collect();
    actions.sort();

    assert_eq!(actions, ["", "(unhandled)", "item"]);
}

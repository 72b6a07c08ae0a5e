//! End-to-end scenarios through the whole stack.

use std::fs;

use serde_json::json;
use vireo::prelude::*;
use vireo_test::TestClient;

#[derive(Default)]
struct HomeController;

impl HomeController {
    fn index(&mut self, _ctx: &mut ActionContext<'_>) -> &'static str {
        "Hello World!"
    }

    fn missing(&mut self, _ctx: &mut ActionContext<'_>) -> ActionOutcome<String> {
        interrupt(ActionResult::not_found("Page was not found"))
    }
}

impl Controller for HomeController {
    fn register(actions: &mut ActionTable<Self>) {
        actions.add("index", Self::index).add("missing", Self::missing);
    }
}

#[derive(Default)]
struct MultiLevelController;

impl MultiLevelController {
    fn foobarbaz(
        &mut self,
        _ctx: &mut ActionContext<'_>,
        foo: String,
        bar: String,
        baz: String,
    ) -> String {
        format!("FooBarBazAction: Foo=[{foo}], Bar=[{bar}], Baz=[{baz}]")
    }

    fn echo(&mut self, _ctx: &mut ActionContext<'_>, value: String) -> String {
        format!("[{value}]")
    }

    fn int(&mut self, _ctx: &mut ActionContext<'_>, value: i64) -> String {
        format!("int {value}")
    }

    fn flag(&mut self, _ctx: &mut ActionContext<'_>, value: bool) -> String {
        format!("flag {value}")
    }
}

impl Controller for MultiLevelController {
    fn register(actions: &mut ActionTable<Self>) {
        actions
            .add("foobarbaz", Self::foobarbaz)
            .add("echo", Self::echo)
            .add("int", Self::int)
            .add("flag", Self::flag);
    }
}

struct MaintenancePlugin;

impl Plugin for MaintenancePlugin {
    fn name(&self) -> &str {
        "maintenance"
    }

    fn on_pre_request(
        &self,
        _application: &Application,
        _request: &mut Request,
        response: &mut Response,
    ) -> bool {
        response.set_status_code(StatusCode::SERVICE_UNAVAILABLE);
        response.set_content("Down for maintenance");
        true
    }
}

fn client() -> TestClient {
    TestClient::new(
        Application::builder()
            .route::<MultiLevelController>("multilevel")
            .route::<HomeController>("")
            .build()
            .unwrap(),
    )
}

#[test]
fn scenario_hello_world() {
    client()
        .get("/")
        .send()
        .assert_status(200)
        .assert_content("Hello World!");
}

#[test]
fn scenario_unknown_action_is_empty_404() {
    client()
        .get("/notfound")
        .send()
        .assert_status(404)
        .assert_content("");
}

#[test]
fn scenario_not_found_interrupt() {
    client()
        .get("/missing")
        .send()
        .assert_status(404)
        .assert_content("Page was not found");
}

#[test]
fn scenario_multilevel_parameters() {
    client()
        .get("/multilevel/foobarbaz/param1/param2/param3")
        .send()
        .assert_status(200)
        .assert_content("FooBarBazAction: Foo=[param1], Bar=[param2], Baz=[param3]");
}

#[test]
fn scenario_pre_request_plugin_stops_dispatch() {
    let client = TestClient::new(
        Application::builder()
            .route::<HomeController>("")
            .plugin(MaintenancePlugin)
            .build()
            .unwrap(),
    );
    client
        .get("/")
        .send()
        .assert_status(503)
        .assert_content("Down for maintenance");
}

#[test]
fn trailing_slash_is_empty_parameter() {
    client()
        .get("/multilevel/echo/")
        .send()
        .assert_status(200)
        .assert_content("[]");
}

#[test]
fn zero_segment_is_preserved() {
    client()
        .get("/multilevel/echo/0")
        .send()
        .assert_content("[0]");
    client()
        .get("/multilevel/int/0")
        .send()
        .assert_content("int 0");
}

#[test]
fn typed_parameters_reject_non_canonical_values() {
    let client = client();
    client.get("/multilevel/int/10").send().assert_content("int 10");
    client.get("/multilevel/int/020").send().assert_status(404);
    client.get("/multilevel/int/+20").send().assert_status(404);
    client.get("/multilevel/flag/true").send().assert_content("flag true");
    for rejected in ["TRUE", "1", "0"] {
        client
            .get(&format!("/multilevel/flag/{rejected}"))
            .send()
            .assert_status(404);
    }
}

#[test]
fn first_matching_route_wins() {
    // "multilevel" is registered before the catch-all root route.
    client()
        .get("/multilevel/echo/x")
        .send()
        .assert_content("[x]");
}

#[test]
fn views_render_through_template_renderer() {
    #[derive(Default)]
    struct ProfileController;

    impl ProfileController {
        fn show(&mut self, ctx: &mut ActionContext<'_>, name: String) -> View {
            ctx.set_view_item("title", "Profile");
            View::new(json!({ "name": name }))
        }
    }

    impl Controller for ProfileController {
        fn register(actions: &mut ActionTable<Self>) {
            actions.add("show", Self::show);
        }
    }

    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Views").join("Profile");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("show.tpl"), "{{ items.title }}: {{ name }}").unwrap();

    let client = TestClient::new(
        Application::builder()
            .document_root(root.path())
            .renderer(TemplateRenderer::new())
            .route::<ProfileController>("profile")
            .build()
            .unwrap(),
    );
    client
        .get("/profile/show/<ada>")
        .send()
        .assert_status(200)
        .assert_content("Profile: &lt;ada&gt;");
}

#[test]
fn session_is_shared_across_client_requests() {
    #[derive(Default)]
    struct CartController;

    impl CartController {
        fn add(&mut self, ctx: &mut ActionContext<'_>, item: String) -> String {
            let mut items = ctx
                .session()
                .get("cart")
                .and_then(|v| serde_json::from_value::<Vec<String>>(v).ok())
                .unwrap_or_default();
            items.push(item);
            let count = items.len();
            ctx.session().set("cart", json!(items));
            count.to_string()
        }
    }

    impl Controller for CartController {
        fn register(actions: &mut ActionTable<Self>) {
            actions.add("add", Self::add);
        }
    }

    let client = TestClient::new(
        Application::builder()
            .route::<CartController>("cart")
            .build()
            .unwrap(),
    );
    client.get("/cart/add/apple").send().assert_content("1");
    client.get("/cart/add/pear").send().assert_content("2");
    assert_eq!(client.session().get("cart"), Some(json!(["apple", "pear"])));
}

#[test]
fn redirect_and_json_results() {
    #[derive(Default)]
    struct ApiController;

    impl ApiController {
        fn old(&mut self, _ctx: &mut ActionContext<'_>) -> ActionResult {
            ActionResult::permanent_redirect("new")
        }

        fn item(&mut self, _ctx: &mut ActionContext<'_>, id: u32) -> ActionOutcome<ActionResult> {
            Ok(ActionResult::json(&json!({ "id": id }))?)
        }
    }

    impl Controller for ApiController {
        fn register(actions: &mut ActionTable<Self>) {
            actions.add("old", Self::old).add("item", Self::item);
        }
    }

    let client = TestClient::new(
        Application::builder()
            .route::<ApiController>("api")
            .build()
            .unwrap(),
    );
    client
        .get("/api/old")
        .send()
        .assert_status(301)
        .assert_header("Location", "http://localhost/api/new");
    client
        .get("/api/item/7")
        .send()
        .assert_status(200)
        .assert_header("Content-Type", "application/json")
        .assert_content(r#"{"id":7}"#);
}

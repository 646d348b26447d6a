//! Screen controllers against a mock server
//!
//! These tests drive the screens the way the terminal front end does and
//! check what the user would see and what reaches the network.

use std::sync::Arc;

use app_core::{
    LoginScreen, MainScreen, ObjectDetailScreen, ObjectManageScreen, Route, ScreenResult, View,
};
use app_state::AppServices;
use lostfound_client::session::{MemorySessionStore, Session};
use lostfound_client::{ClientConfig, LostFoundObject, ObjectStatus};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default)]
struct Recorder {
    loading: Vec<bool>,
    rendered: Vec<i64>,
    toasts: Vec<String>,
    alerts: Vec<String>,
    routes: Vec<Route>,
    finished: Vec<ScreenResult>,
}

impl View for Recorder {
    fn show_loading(&mut self, visible: bool) {
        self.loading.push(visible);
    }

    fn show_content(&mut self, _visible: bool) {}

    fn render_objects(&mut self, objects: &[LostFoundObject]) {
        self.rendered.extend(objects.iter().map(|o| o.id));
    }

    fn render_object(&mut self, object: &LostFoundObject) {
        self.rendered.push(object.id);
    }

    fn toast(&mut self, message: &str) {
        self.toasts.push(message.to_string());
    }

    fn alert(&mut self, _title: &str, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, route: Route) {
        self.routes.push(route);
    }

    fn finish(&mut self, result: ScreenResult) {
        self.finished.push(result);
    }
}

fn bag() -> serde_json::Value {
    json!({
        "id": 7,
        "user_id": 1,
        "title": "Bag",
        "description": "Grey backpack",
        "status": "found",
        "is_completed": 0,
        "cover": null
    })
}

async fn signed_in(server: &MockServer) -> (Arc<MemorySessionStore>, AppServices) {
    let store = Arc::new(MemorySessionStore::with_session(Session::logged_in("a@b.com", "tok-123")));
    let services = AppServices::connect(ClientConfig::new(server.uri()), store.clone())
        .await
        .unwrap();
    (store, services)
}

#[tokio::test]
async fn test_delete_finishes_with_changed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lost-founds/7"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": {"lost_found": bag()}
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/lost-founds/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Berhasil menghapus data"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_store, services) = signed_in(&server).await;
    let mut screen = ObjectDetailScreen::new(services, Recorder::default(), 7);

    assert!(screen.open().await);
    assert!(screen.delete().await);

    assert_eq!(screen.view().finished, vec![ScreenResult::changed()]);
    assert_eq!(screen.view().toasts, vec!["Object deleted"]);
    assert_eq!(screen.view().loading.last(), Some(&false));
}

#[tokio::test]
async fn test_empty_title_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_store, services) = signed_in(&server).await;
    let mut screen = ObjectManageScreen::add(services, Recorder::default());

    assert!(!screen.save("", "Black leather", ObjectStatus::Lost).await);
    assert!(!screen.save("Wallet", "", ObjectStatus::Lost).await);

    assert_eq!(screen.view().alerts.len(), 2);
    assert!(screen.view().loading.is_empty());
    assert!(screen.view().finished.is_empty());
}

#[tokio::test]
async fn test_login_rejected_shows_one_alert() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Email atau password salah"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let services = AppServices::connect(ClientConfig::new(server.uri()), store.clone())
        .await
        .unwrap();
    let mut screen = LoginScreen::new(services, Recorder::default());

    assert!(screen.submit("a@b.com", "secret").await.is_none());

    let view = screen.into_view();
    assert_eq!(view.alerts, vec!["Email atau password salah"]);
    assert!(view.finished.is_empty());
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_list_then_reload_after_add() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lost-founds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": {"lost_founds": [bag()]}
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/lost-founds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Berhasil menambahkan data",
            "data": {"lost_found_id": 8}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_store, services) = signed_in(&server).await;
    let mut main = MainScreen::new(services.clone(), Recorder::default());
    assert!(main.open().await);
    main.open_add();
    assert_eq!(main.view().routes, vec![Route::Add]);

    let mut add = ObjectManageScreen::add(services, Recorder::default());
    assert!(add.save("Umbrella", "Blue", ObjectStatus::Found).await);
    let result = add.view().finished[0];

    main.on_result(result).await;
    assert_eq!(main.view().rendered, vec![7, 7]);
}

#[tokio::test]
async fn test_main_without_session_routes_to_login() {
    let server = MockServer::start().await;
    let services = AppServices::connect(
        ClientConfig::new(server.uri()),
        Arc::new(MemorySessionStore::new()),
    )
    .await
    .unwrap();
    let mut main = MainScreen::new(services, Recorder::default());

    assert!(!main.open().await);

    assert_eq!(main.view().routes, vec![Route::Login]);
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
}

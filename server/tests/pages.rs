use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use evently_server::config::Config;
use evently_server::models::{Category, Event, EventInput, Organizer};
use evently_server::routes::create_routes;
use evently_server::session::SESSION_COOKIE;
use evently_server::state::AppState;
use evently_server::store::{EventStore, MemoryStore};

const SECRET: &str = "integration-secret";
const ORGANIZER: &str = "user_organizer";
const VISITOR: &str = "user_visitor";

struct TestApp {
    store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "SESSION_JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .unwrap();

        let store = Arc::new(MemoryStore::new());
        store
            .upsert_user(&Organizer {
                id: ORGANIZER.into(),
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
            })
            .await
            .unwrap();

        let router = create_routes(AppState::new(store.clone(), &config));
        Self { store, router }
    }

    async fn category(&self, name: &str) -> Category {
        self.store.create_category(name).await.unwrap()
    }

    async fn event(&self, title: &str, category: &Category) -> Event {
        let start = Utc::now() + Duration::days(3);
        self.store
            .create_event(
                ORGANIZER,
                EventInput {
                    title: title.to_string(),
                    description: "An evening out".into(),
                    location: "Main Hall".into(),
                    image_url: "https://example.com/image.png".into(),
                    start_date_time: start,
                    end_date_time: start + Duration::hours(2),
                    category_id: category.id,
                    is_free: false,
                    price: Decimal::from(15),
                    url: "https://example.com/event".into(),
                },
            )
            .await
            .unwrap()
    }

    async fn get(&self, uri: &str, user: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(user) = user {
            request = request.header(header::COOKIE, session_cookie(user));
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post(&self, uri: &str, user: Option<&str>, form: &[(&str, &str)]) -> Response {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(form.iter())
            .finish();

        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(user) = user {
            request = request.header(header::COOKIE, session_cookie(user));
        }
        self.router
            .clone()
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }
}

fn session_cookie(user_id: &str) -> String {
    let token = encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "sub": format!("sess_{}", user_id),
            "userId": user_id,
            "exp": Utc::now().timestamp() + 3600,
        }),
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    format!("{}={}", SESSION_COOKIE, token)
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn event_form(category: &Category, title: &str) -> Vec<(&'static str, String)> {
    vec![
        ("title", title.to_string()),
        ("description", "Updated description".to_string()),
        ("location", "Riverside Park".to_string()),
        ("image_url", "https://example.com/new.png".to_string()),
        ("start_date_time", "2030-05-01T18:00".to_string()),
        ("end_date_time", "2030-05-01T22:00".to_string()),
        ("category_id", category.id.to_string()),
        ("price", "25.00".to_string()),
        ("url", "https://example.com/new".to_string()),
    ]
}

fn as_pairs<'a>(form: &'a [(&'static str, String)]) -> Vec<(&'static str, &'a str)> {
    form.iter().map(|(k, v)| (*k, v.as_str())).collect()
}

#[tokio::test]
async fn health_check_reports_ok() {
    let app = TestApp::new().await;
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn home_shows_empty_state_without_events() {
    let app = TestApp::new().await;
    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("No Events Found"));
    assert!(html.contains("Login"));
}

#[tokio::test]
async fn home_filters_by_category_and_query() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;
    let art = app.category("Art").await;
    app.event("Jazz Night", &music).await;
    app.event("Watercolor Class", &art).await;
    app.event("Rock Festival", &music).await;

    let html = body_text(app.get("/?category=Music", None).await).await;
    assert!(html.contains("Jazz Night"));
    assert!(html.contains("Rock Festival"));
    assert!(!html.contains("Watercolor Class"));

    let html = body_text(app.get("/?category=Music&query=jazz", None).await).await;
    assert!(html.contains("Jazz Night"));
    assert!(!html.contains("Rock Festival"));
}

#[tokio::test]
async fn home_paginates_six_per_page() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;
    for i in 0..8 {
        app.event(&format!("Concert {}", i), &music).await;
    }

    let first = body_text(app.get("/", None).await).await;
    assert!(first.contains("Page 1 of 2"));
    assert!(first.contains("Concert 7"));
    assert!(!first.contains("Concert 1<"));

    let second = body_text(app.get("/?page=2", None).await).await;
    assert!(second.contains("Page 2 of 2"));
    assert!(second.contains("Concert 0"));
}

#[tokio::test]
async fn event_detail_renders_event_and_related() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;
    let main = app.event("Jazz Night", &music).await;
    app.event("Blues Evening", &music).await;

    let response = app.get(&format!("/events/{}", main.id), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Jazz Night"));
    assert!(html.contains("Related Events"));
    assert!(html.contains("Blues Evening"));
    assert!(html.contains("Grace Hopper"));
    assert!(html.contains("$15"));
}

#[tokio::test]
async fn event_detail_missing_or_malformed_is_not_found() {
    let app = TestApp::new().await;

    let missing = app.get(&format!("/events/{}", Uuid::new_v4()), None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = app.get("/events/not-a-uuid", None).await;
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_controls_only_for_organizer() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;
    app.event("Jazz Night", &music).await;

    let owner = body_text(app.get("/", Some(ORGANIZER)).await).await;
    assert!(owner.contains("card-owner-controls"));

    let visitor = body_text(app.get("/", Some(VISITOR)).await).await;
    assert!(!visitor.contains("card-owner-controls"));

    let anonymous = body_text(app.get("/", None).await).await;
    assert!(!anonymous.contains("card-owner-controls"));
}

#[tokio::test]
async fn profile_requires_sign_in() {
    let app = TestApp::new().await;
    let response = app.get("/profile", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_lists_tickets_and_organized_events() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;
    let gig = app.event("Jazz Night", &music).await;

    let organizer = body_text(app.get("/profile", Some(ORGANIZER)).await).await;
    assert!(organizer.contains("No event tickets purchased yet"));
    assert!(organizer.contains("Jazz Night"));
    assert!(organizer.contains("Order Details"));

    app.store.insert_order(VISITOR, gig.id).await.unwrap();
    let visitor = body_text(app.get("/profile", Some(VISITOR)).await).await;
    assert!(visitor.contains("Jazz Night"));
    assert!(visitor.contains("No events have been created yet"));
    assert!(!visitor.contains("Order Details"));
}

#[tokio::test]
async fn create_event_redirects_to_detail() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;

    let form_page = app.get("/events/create", Some(VISITOR)).await;
    assert_eq!(form_page.status(), StatusCode::OK);
    assert!(body_text(form_page).await.contains("Music"));

    let form = event_form(&music, "Summer Picnic");
    let response = app.post("/events/create", Some(VISITOR), &as_pairs(&form)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let id: Uuid = location(&response)
        .trim_start_matches("/events/")
        .parse()
        .unwrap();
    let created = app.store.get_event_by_id(id).await.unwrap();
    assert_eq!(created.title, "Summer Picnic");
    assert_eq!(created.organizer.id, VISITOR);
}

#[tokio::test]
async fn create_event_rejects_invalid_form() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;

    let mut form = event_form(&music, "Summer Picnic");
    form[0].1 = "x".to_string();
    let response = app.post("/events/create", Some(VISITOR), &as_pairs(&form)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let anonymous = app.post("/events/create", None, &as_pairs(&form)).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_is_limited_to_organizer() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;
    let event = app.event("Jazz Night", &music).await;
    let update_uri = format!("/events/{}/update", event.id);

    let forbidden = app.get(&update_uri, Some(VISITOR)).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let form_page = app.get(&update_uri, Some(ORGANIZER)).await;
    assert_eq!(form_page.status(), StatusCode::OK);
    let html = body_text(form_page).await;
    assert!(html.contains("Update Event"));
    assert!(html.contains("Jazz Night"));

    let form = event_form(&music, "Jazz Night Extended");
    let rejected = app.post(&update_uri, Some(VISITOR), &as_pairs(&form)).await;
    assert_eq!(rejected.status(), StatusCode::FORBIDDEN);

    let response = app.post(&update_uri, Some(ORGANIZER), &as_pairs(&form)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/events/{}", event.id));

    let updated = app.store.get_event_by_id(event.id).await.unwrap();
    assert_eq!(updated.title, "Jazz Night Extended");
    assert_eq!(updated.location, "Riverside Park");
}

#[tokio::test]
async fn delete_is_limited_to_organizer() {
    let app = TestApp::new().await;
    let music = app.category("Music").await;
    let event = app.event("Jazz Night", &music).await;
    let delete_uri = format!("/events/{}/delete", event.id);

    let forbidden = app.post(&delete_uri, Some(VISITOR), &[]).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    assert!(app.store.get_event_by_id(event.id).await.is_ok());

    let response = app.post(&delete_uri, Some(ORGANIZER), &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/profile");
    assert!(app.store.get_event_by_id(event.id).await.is_err());
}

#[tokio::test]
async fn create_category_redirects_back() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/categories",
            Some(VISITOR),
            &[("new_category", "  Comedy  "), ("return_to", "/events/create")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/events/create");

    let names: Vec<_> = app
        .store
        .get_all_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Comedy"]);

    let blank = app
        .post("/categories", Some(VISITOR), &[("new_category", "   ")])
        .await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pages_carry_security_headers() {
    let app = TestApp::new().await;
    let response = app.get("/", None).await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("content-security-policy").is_some());
    assert!(headers
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}

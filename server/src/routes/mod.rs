use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::create_security_headers_layer;
use crate::handlers::{categories, events, health_check, home, profile};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home))
        .route(
            "/events/create",
            get(events::create_form).post(events::create_event),
        )
        .route("/events/:id", get(events::event_detail))
        .route(
            "/events/:id/update",
            get(events::update_form).post(events::update_event),
        )
        .route("/events/:id/delete", post(events::delete_event))
        .route("/profile", get(profile::profile))
        .route("/categories", post(categories::create_category))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(create_security_headers_layer())
        .layer(TraceLayer::new_for_http())
}

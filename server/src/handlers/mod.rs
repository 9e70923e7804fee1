use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Event;
use crate::session::Viewer;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;
use crate::views::pages::Chrome;

pub mod categories;
pub mod events;
pub mod home;
pub mod profile;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "evently-server",
    };

    success(payload, "Health check successful").into_response()
}

fn chrome(state: &AppState, path: &str, viewer: Option<&Viewer>) -> Chrome {
    Chrome::new(path, viewer, &state.sign_in_url)
}

/// Malformed ids can never match an event, so they are reported as missing.
fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::NotFound(format!("Event with id '{}' was not found", raw)))
}

fn ensure_organizer(event: &Event, viewer: &Viewer) -> Result<(), AppError> {
    if event.is_organized_by(&viewer.user_id) {
        Ok(())
    } else {
        tracing::warn!(
            event_id = %event.id,
            user_id = %viewer.user_id,
            "Rejected change by non-organizer"
        );
        Err(AppError::Forbidden(
            "Only the organizer can change this event".to_string(),
        ))
    }
}

use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{Html, Redirect};
use axum::Form;

use super::{chrome, ensure_organizer, parse_event_id};
use crate::models::EventForm;
use crate::session::{OptionalViewer, Viewer};
use crate::state::AppState;
use crate::store::{RelatedEventsParams, RELATED_EVENTS_LIMIT};
use crate::utils::error::AppError;
use crate::utils::query::{parse_page, QueryParams};
use crate::utils::response::render;
use crate::views::components::{
    CategoryDropdown, Collection, CollectionProps, CollectionType, DEFAULT_PAGE_PARAM,
};
use crate::views::pages::{EventDetailPage, EventFormAction, EventFormPage};

const CREATE_PATH: &str = "/events/create";

pub async fn event_detail(
    State(state): State<AppState>,
    viewer: OptionalViewer,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let id = parse_event_id(&id)?;
    let raw_query = uri.query().unwrap_or("");
    let page = parse_page(QueryParams::parse(raw_query).get(DEFAULT_PAGE_PARAM));

    let event = state.store.get_event_by_id(id).await?;
    let related_events = state
        .store
        .get_related_events_by_category(RelatedEventsParams {
            category_id: event.category.id,
            event_id: event.id,
            page,
            limit: RELATED_EVENTS_LIMIT,
        })
        .await?;

    let related = Collection::new(CollectionProps {
        data: &related_events.data,
        empty_title: "No Events Found",
        empty_state_subtext: "Come back later",
        collection_type: CollectionType::AllEvents,
        page,
        total_pages: related_events.total_pages,
        url_param_name: None,
        path: uri.path(),
        query: raw_query,
        viewer_id: viewer.user_id(),
    });

    render(&EventDetailPage::new(
        chrome(&state, uri.path(), viewer.0.as_ref()),
        &event,
        related,
    ))
}

pub async fn create_form(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Result<Html<String>, AppError> {
    let categories = state.store.get_all_categories().await?;

    render(&EventFormPage::new(
        chrome(&state, CREATE_PATH, Some(&viewer)),
        EventFormAction::Create,
        CREATE_PATH.to_string(),
        EventForm::default(),
        CategoryDropdown::new(&categories, "", CREATE_PATH),
    ))
}

pub async fn create_event(
    State(state): State<AppState>,
    viewer: Viewer,
    Form(form): Form<EventForm>,
) -> Result<Redirect, AppError> {
    let input = form.validate()?;

    state.store.upsert_user(&viewer.as_organizer()).await?;
    let event = state.store.create_event(&viewer.user_id, input).await?;

    tracing::info!(event_id = %event.id, user_id = %viewer.user_id, "Event created");
    Ok(Redirect::to(&format!("/events/{}", event.id)))
}

pub async fn update_form(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let id = parse_event_id(&id)?;
    let event = state.store.get_event_by_id(id).await?;
    ensure_organizer(&event, &viewer)?;

    let categories = state.store.get_all_categories().await?;
    let values = EventForm::from_event(&event);
    let dropdown = CategoryDropdown::new(&categories, &values.category_id, uri.path());

    render(&EventFormPage::new(
        chrome(&state, uri.path(), Some(&viewer)),
        EventFormAction::Update,
        format!("/events/{}/update", event.id),
        values,
        dropdown,
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
    Form(form): Form<EventForm>,
) -> Result<Redirect, AppError> {
    let id = parse_event_id(&id)?;
    let event = state.store.get_event_by_id(id).await?;
    ensure_organizer(&event, &viewer)?;

    let input = form.validate()?;
    let updated = state.store.update_event(event.id, input).await?;

    tracing::info!(event_id = %updated.id, user_id = %viewer.user_id, "Event updated");
    Ok(Redirect::to(&format!("/events/{}", updated.id)))
}

pub async fn delete_event(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_event_id(&id)?;
    let event = state.store.get_event_by_id(id).await?;
    ensure_organizer(&event, &viewer)?;

    state.store.delete_event(event.id).await?;

    tracing::info!(event_id = %event.id, user_id = %viewer.user_id, "Event deleted");
    Ok(Redirect::to("/profile"))
}

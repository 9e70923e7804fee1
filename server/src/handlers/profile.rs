use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;

use super::chrome;
use crate::session::Viewer;
use crate::state::AppState;
use crate::store::{UserEventsParams, USER_EVENTS_LIMIT, USER_ORDERS_LIMIT};
use crate::utils::error::AppError;
use crate::utils::query::{parse_page, QueryParams};
use crate::utils::response::render;
use crate::views::components::{Collection, CollectionProps, CollectionType};
use crate::views::pages::ProfilePage;

const ORDERS_PAGE_PARAM: &str = "ordersPage";
const EVENTS_PAGE_PARAM: &str = "eventsPage";

pub async fn profile(
    State(state): State<AppState>,
    viewer: Viewer,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let path = uri.path();
    let raw_query = uri.query().unwrap_or("");
    let params = QueryParams::parse(raw_query);
    let orders_page = parse_page(params.get(ORDERS_PAGE_PARAM));
    let events_page = parse_page(params.get(EVENTS_PAGE_PARAM));

    let orders = state
        .store
        .get_orders_by_user(UserEventsParams {
            user_id: viewer.user_id.clone(),
            page: orders_page,
            limit: USER_ORDERS_LIMIT,
        })
        .await?;
    let organized_events = state
        .store
        .get_events_by_user(UserEventsParams {
            user_id: viewer.user_id.clone(),
            page: events_page,
            limit: USER_EVENTS_LIMIT,
        })
        .await?;

    let tickets = Collection::new(CollectionProps {
        data: &orders.data,
        empty_title: "No event tickets purchased yet",
        empty_state_subtext: "No worries - plenty of exciting events to explore!",
        collection_type: CollectionType::MyTickets,
        page: orders_page,
        total_pages: orders.total_pages,
        url_param_name: Some(ORDERS_PAGE_PARAM),
        path,
        query: raw_query,
        viewer_id: Some(&viewer.user_id),
    });
    let organized = Collection::new(CollectionProps {
        data: &organized_events.data,
        empty_title: "No events have been created yet",
        empty_state_subtext: "Go create some now",
        collection_type: CollectionType::EventsOrganized,
        page: events_page,
        total_pages: organized_events.total_pages,
        url_param_name: Some(EVENTS_PAGE_PARAM),
        path,
        query: raw_query,
        viewer_id: Some(&viewer.user_id),
    });

    render(&ProfilePage {
        chrome: chrome(&state, path, Some(&viewer)),
        tickets,
        organized,
    })
}

use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;

use super::chrome;
use crate::session::OptionalViewer;
use crate::state::AppState;
use crate::store::{AllEventsParams, ALL_EVENTS_LIMIT};
use crate::utils::error::AppError;
use crate::utils::query::{parse_page, QueryParams};
use crate::utils::response::render;
use crate::views::components::{
    CategoryFilter, Collection, CollectionProps, CollectionType, CATEGORY_PARAM,
    DEFAULT_PAGE_PARAM,
};
use crate::views::pages::HomePage;

pub async fn home(
    State(state): State<AppState>,
    viewer: OptionalViewer,
    uri: Uri,
) -> Result<Html<String>, AppError> {
    let path = uri.path();
    let raw_query = uri.query().unwrap_or("");
    let params = QueryParams::parse(raw_query);

    let page = parse_page(params.get(DEFAULT_PAGE_PARAM));
    let search_query = params.get("query").unwrap_or("").trim().to_string();
    let category = params
        .get(CATEGORY_PARAM)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    let events = state
        .store
        .get_all_events(AllEventsParams {
            query: (!search_query.is_empty()).then(|| search_query.clone()),
            category: category.clone(),
            page,
            limit: ALL_EVENTS_LIMIT,
        })
        .await?;
    let categories = state.store.get_all_categories().await?;

    let collection = Collection::new(CollectionProps {
        data: &events.data,
        empty_title: "No Events Found",
        empty_state_subtext: "Come back later",
        collection_type: CollectionType::AllEvents,
        page,
        total_pages: events.total_pages,
        url_param_name: None,
        path,
        query: raw_query,
        viewer_id: viewer.user_id(),
    });

    render(&HomePage {
        chrome: chrome(&state, path, viewer.0.as_ref()),
        search_query,
        category,
        filter: CategoryFilter::new(&categories, path, raw_query),
        collection,
    })
}

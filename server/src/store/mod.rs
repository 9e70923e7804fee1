//! Data access collaborators.
//!
//! Page composers talk to persistence only through [`EventStore`]. The
//! Postgres implementation backs production; the in-memory one backs tests
//! and database-less development runs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Category, Event, EventInput, Organizer, Page};
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub const ALL_EVENTS_LIMIT: u32 = 6;
pub const USER_EVENTS_LIMIT: u32 = 6;
pub const RELATED_EVENTS_LIMIT: u32 = 3;
pub const USER_ORDERS_LIMIT: u32 = 3;

#[derive(Debug, Clone)]
pub struct AllEventsParams {
    /// Case-insensitive title substring.
    pub query: Option<String>,
    /// Category name.
    pub category: Option<String>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct UserEventsParams {
    pub user_id: String,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct RelatedEventsParams {
    pub category_id: Uuid,
    pub event_id: Uuid,
    pub page: u32,
    pub limit: u32,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get_event_by_id(&self, id: Uuid) -> Result<Event, AppError>;

    /// Newest first.
    async fn get_all_events(&self, params: AllEventsParams) -> Result<Page<Event>, AppError>;

    /// Events organized by `user_id`, newest first.
    async fn get_events_by_user(&self, params: UserEventsParams) -> Result<Page<Event>, AppError>;

    /// Other events in the same category, excluding `event_id`.
    async fn get_related_events_by_category(
        &self,
        params: RelatedEventsParams,
    ) -> Result<Page<Event>, AppError>;

    /// Events `user_id` holds tickets for, most recent order first.
    async fn get_orders_by_user(&self, params: UserEventsParams) -> Result<Page<Event>, AppError>;

    async fn create_event(&self, organizer_id: &str, input: EventInput) -> Result<Event, AppError>;

    async fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, AppError>;

    async fn delete_event(&self, id: Uuid) -> Result<(), AppError>;

    /// Sorted by name.
    async fn get_all_categories(&self) -> Result<Vec<Category>, AppError>;

    async fn create_category(&self, category_name: &str) -> Result<Category, AppError>;

    /// Records the identity provider's view of a user so events can name their organizer.
    async fn upsert_user(&self, user: &Organizer) -> Result<(), AppError>;
}

pub(crate) fn event_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Event with id '{}' was not found", id))
}

pub(crate) fn unknown_category(id: Uuid) -> AppError {
    AppError::ValidationError(format!("Category '{}' does not exist", id))
}

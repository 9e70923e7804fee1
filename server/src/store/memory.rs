use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    event_not_found, unknown_category, AllEventsParams, EventStore, RelatedEventsParams,
    UserEventsParams,
};
use crate::models::{page_offset, total_pages, Category, Event, EventInput, Order, Organizer, Page};
use crate::utils::error::AppError;

#[derive(Debug, Clone)]
struct EventRecord {
    id: Uuid,
    seq: u64,
    organizer_id: String,
    input: EventInput,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    next_seq: u64,
    users: HashMap<String, Organizer>,
    categories: Vec<Category>,
    events: Vec<EventRecord>,
    orders: Vec<(u64, Order)>,
}

impl Tables {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn record(&self, id: Uuid) -> Option<&EventRecord> {
        self.events.iter().find(|e| e.id == id)
    }

    fn resolve(&self, record: &EventRecord) -> Event {
        let input = &record.input;
        let category = self.category(input.category_id).cloned().unwrap_or(Category {
            id: input.category_id,
            name: String::new(),
        });
        let organizer = self
            .users
            .get(&record.organizer_id)
            .cloned()
            .unwrap_or(Organizer {
                id: record.organizer_id.clone(),
                first_name: String::new(),
                last_name: String::new(),
            });

        Event {
            id: record.id,
            title: input.title.clone(),
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            is_free: input.is_free,
            price: input.price,
            start_date_time: input.start_date_time,
            end_date_time: input.end_date_time,
            location: input.location.clone(),
            url: input.url.clone(),
            category,
            organizer,
            created_at: record.created_at,
        }
    }

    /// Records matching `keep`, newest first.
    fn newest_first<F>(&self, keep: F) -> Vec<&EventRecord>
    where
        F: Fn(&EventRecord) -> bool,
    {
        let mut records: Vec<&EventRecord> = self.events.iter().filter(|r| keep(*r)).collect();
        records.sort_by(|a, b| (b.created_at, b.seq).cmp(&(a.created_at, a.seq)));
        records
    }

    fn page_of(&self, records: Vec<&EventRecord>, page: u32, limit: u32) -> Page<Event> {
        let total_pages = total_pages(records.len() as u64, limit);
        let data = records
            .into_iter()
            .skip(page_offset(page, limit) as usize)
            .take(limit as usize)
            .map(|record| self.resolve(record))
            .collect();

        Page { data, total_pages }
    }
}

/// In-process [`EventStore`].
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a ticket purchase. Checkout itself lives elsewhere.
    pub async fn insert_order(&self, buyer_id: &str, event_id: Uuid) -> Result<Order, AppError> {
        let mut tables = self.tables.write().await;
        let record = tables.record(event_id).ok_or_else(|| event_not_found(event_id))?;

        let order = Order {
            id: Uuid::new_v4(),
            event_id,
            buyer_id: buyer_id.to_string(),
            total_amount: if record.input.is_free {
                Decimal::ZERO
            } else {
                record.input.price
            },
            created_at: Utc::now(),
        };

        let seq = tables.seq();
        tables.orders.push((seq, order.clone()));
        Ok(order)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn get_event_by_id(&self, id: Uuid) -> Result<Event, AppError> {
        let tables = self.tables.read().await;
        let record = tables.record(id).ok_or_else(|| event_not_found(id))?;
        Ok(tables.resolve(record))
    }

    async fn get_all_events(&self, params: AllEventsParams) -> Result<Page<Event>, AppError> {
        let tables = self.tables.read().await;
        let query = params.query.map(|q| q.to_lowercase());

        let records = tables.newest_first(|record| {
            let title_matches = query
                .as_deref()
                .map_or(true, |q| record.input.title.to_lowercase().contains(q));
            let category_matches = params.category.as_deref().map_or(true, |name| {
                tables
                    .category(record.input.category_id)
                    .is_some_and(|c| c.name == name)
            });
            title_matches && category_matches
        });

        Ok(tables.page_of(records, params.page, params.limit))
    }

    async fn get_events_by_user(&self, params: UserEventsParams) -> Result<Page<Event>, AppError> {
        let tables = self.tables.read().await;
        let records = tables.newest_first(|record| record.organizer_id == params.user_id);
        Ok(tables.page_of(records, params.page, params.limit))
    }

    async fn get_related_events_by_category(
        &self,
        params: RelatedEventsParams,
    ) -> Result<Page<Event>, AppError> {
        let tables = self.tables.read().await;
        let records = tables.newest_first(|record| {
            record.input.category_id == params.category_id && record.id != params.event_id
        });
        Ok(tables.page_of(records, params.page, params.limit))
    }

    async fn get_orders_by_user(&self, params: UserEventsParams) -> Result<Page<Event>, AppError> {
        let tables = self.tables.read().await;

        let mut orders: Vec<&(u64, Order)> = tables
            .orders
            .iter()
            .filter(|(_, order)| order.buyer_id == params.user_id)
            .collect();
        orders.sort_by(|(a_seq, a), (b_seq, b)| (b.created_at, b_seq).cmp(&(a.created_at, a_seq)));

        let records: Vec<&EventRecord> = orders
            .into_iter()
            .filter_map(|(_, order)| tables.record(order.event_id))
            .collect();

        Ok(tables.page_of(records, params.page, params.limit))
    }

    async fn create_event(&self, organizer_id: &str, input: EventInput) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        if tables.category(input.category_id).is_none() {
            return Err(unknown_category(input.category_id));
        }

        let seq = tables.seq();
        let record = EventRecord {
            id: Uuid::new_v4(),
            seq,
            organizer_id: organizer_id.to_string(),
            input,
            created_at: Utc::now(),
        };
        let event = tables.resolve(&record);
        tables.events.push(record);

        Ok(event)
    }

    async fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, AppError> {
        let mut tables = self.tables.write().await;
        if tables.category(input.category_id).is_none() {
            return Err(unknown_category(input.category_id));
        }

        let record = tables
            .events
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| event_not_found(id))?;
        record.input = input;

        let record = record.clone();
        Ok(tables.resolve(&record))
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|r| r.id != id);

        if tables.events.len() == before {
            return Err(event_not_found(id));
        }

        tables.orders.retain(|(_, order)| order.event_id != id);
        Ok(())
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.tables.read().await.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, category_name: &str) -> Result<Category, AppError> {
        let mut tables = self.tables.write().await;
        let lowered = category_name.to_lowercase();
        if tables
            .categories
            .iter()
            .any(|c| c.name.to_lowercase() == lowered)
        {
            return Err(AppError::ValidationError(format!(
                "Category '{}' already exists",
                category_name
            )));
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: category_name.to_string(),
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn upsert_user(&self, user: &Organizer) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .users
            .entry(user.id.clone())
            .or_insert_with(|| user.clone());

        // Sessions without name claims keep the names we already know.
        if !user.first_name.is_empty() {
            entry.first_name = user.first_name.clone();
        }
        if !user.last_name.is_empty() {
            entry.last_name = user.last_name.clone();
        }
        Ok(())
    }
}

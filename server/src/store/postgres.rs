use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use super::{
    event_not_found, unknown_category, AllEventsParams, EventStore, RelatedEventsParams,
    UserEventsParams,
};
use crate::models::event::EventRow;
use crate::models::{page_offset, total_pages, Category, Event, EventInput, Organizer, Page};
use crate::utils::error::AppError;

const EVENT_COLUMNS: &str = "e.id, e.title, e.description, e.image_url, e.is_free, e.price, \
    e.start_date_time, e.end_date_time, e.location, e.url, e.created_at, \
    c.id AS category_id, c.name AS category_name, \
    u.id AS organizer_id, u.first_name AS organizer_first_name, u.last_name AS organizer_last_name";

const EVENT_JOINS: &str = "JOIN categories c ON c.id = e.category_id \
    JOIN users u ON u.id = e.organizer_id";

/// `ILIKE` pattern matching `query` literally anywhere in the value.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// [`EventStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        tracing::info!("Successfully connected to database");

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!().run(&self.pool).await?;
        tracing::info!("Migrations run successfully");
        Ok(())
    }

    async fn fetch_page(
        &self,
        filter: &str,
        binds: &[&str],
        page: u32,
        limit: u32,
    ) -> Result<Page<Event>, AppError> {
        let count_sql = format!("SELECT COUNT(*) FROM events e {EVENT_JOINS} WHERE {filter}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in binds {
            count_query = count_query.bind(*value);
        }
        let count = count_query.fetch_one(&self.pool).await?;

        let n = binds.len();
        let rows_sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events e {EVENT_JOINS} WHERE {filter} \
             ORDER BY e.created_at DESC LIMIT ${} OFFSET ${}",
            n + 1,
            n + 2
        );
        let mut rows_query = sqlx::query_as::<_, EventRow>(&rows_sql);
        for value in binds {
            rows_query = rows_query.bind(*value);
        }
        let rows = rows_query
            .bind(i64::from(limit))
            .bind(page_offset(page, limit) as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            data: rows.into_iter().map(Event::from).collect(),
            total_pages: total_pages(count.max(0) as u64, limit),
        })
    }

    async fn ensure_category(&self, id: Uuid) -> Result<(), AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if exists {
            Ok(())
        } else {
            Err(unknown_category(id))
        }
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn get_event_by_id(&self, id: Uuid) -> Result<Event, AppError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e {EVENT_JOINS} WHERE e.id = $1");
        sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Event::from)
            .ok_or_else(|| event_not_found(id))
    }

    async fn get_all_events(&self, params: AllEventsParams) -> Result<Page<Event>, AppError> {
        let title_pattern = params.query.as_deref().map(contains_pattern);
        let mut clauses = vec!["TRUE".to_string()];
        let mut binds: Vec<&str> = Vec::new();

        if let Some(pattern) = title_pattern.as_deref() {
            binds.push(pattern);
            clauses.push(format!("e.title ILIKE ${}", binds.len()));
        }
        if let Some(category) = params.category.as_deref() {
            binds.push(category);
            clauses.push(format!("c.name = ${}", binds.len()));
        }

        self.fetch_page(&clauses.join(" AND "), &binds, params.page, params.limit)
            .await
    }

    async fn get_events_by_user(&self, params: UserEventsParams) -> Result<Page<Event>, AppError> {
        self.fetch_page(
            "e.organizer_id = $1",
            &[params.user_id.as_str()],
            params.page,
            params.limit,
        )
        .await
    }

    async fn get_related_events_by_category(
        &self,
        params: RelatedEventsParams,
    ) -> Result<Page<Event>, AppError> {
        let category_id = params.category_id.to_string();
        let event_id = params.event_id.to_string();

        self.fetch_page(
            "e.category_id = $1::uuid AND e.id <> $2::uuid",
            &[category_id.as_str(), event_id.as_str()],
            params.page,
            params.limit,
        )
        .await
    }

    async fn get_orders_by_user(&self, params: UserEventsParams) -> Result<Page<Event>, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE buyer_id = $1")
            .bind(&params.user_id)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM orders o JOIN events e ON e.id = o.event_id {EVENT_JOINS} \
             WHERE o.buyer_id = $1 ORDER BY o.created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(&params.user_id)
            .bind(i64::from(params.limit))
            .bind(page_offset(params.page, params.limit) as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            data: rows.into_iter().map(Event::from).collect(),
            total_pages: total_pages(count.max(0) as u64, params.limit),
        })
    }

    async fn create_event(&self, organizer_id: &str, input: EventInput) -> Result<Event, AppError> {
        self.ensure_category(input.category_id).await?;

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO events (id, title, description, image_url, is_free, price, \
             start_date_time, end_date_time, location, url, category_id, organizer_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(input.is_free)
        .bind(input.price)
        .bind(input.start_date_time)
        .bind(input.end_date_time)
        .bind(&input.location)
        .bind(&input.url)
        .bind(input.category_id)
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_event_by_id(id).await
    }

    async fn update_event(&self, id: Uuid, input: EventInput) -> Result<Event, AppError> {
        self.ensure_category(input.category_id).await?;

        let result = sqlx::query(
            "UPDATE events SET title = $2, description = $3, image_url = $4, is_free = $5, \
             price = $6, start_date_time = $7, end_date_time = $8, location = $9, url = $10, \
             category_id = $11, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(input.is_free)
        .bind(input.price)
        .bind(input.start_date_time)
        .bind(input.end_date_time)
        .bind(&input.location)
        .bind(&input.url)
        .bind(input.category_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(event_not_found(id));
        }

        self.get_event_by_id(id).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(event_not_found(id));
        }
        Ok(())
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn create_category(&self, category_name: &str) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2) \
             ON CONFLICT ((lower(name))) DO NOTHING RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(category_name)
        .fetch_optional(&self.pool)
        .await?;

        category.ok_or_else(|| {
            AppError::ValidationError(format!("Category '{}' already exists", category_name))
        })
    }

    async fn upsert_user(&self, user: &Organizer) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name) VALUES ($1, $2, $3) \
             ON CONFLICT (id) DO UPDATE SET \
             first_name = COALESCE(NULLIF(EXCLUDED.first_name, ''), users.first_name), \
             last_name = COALESCE(NULLIF(EXCLUDED.last_name, ''), users.last_name), \
             updated_at = NOW()",
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("jazz"), "%jazz%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\d"), "%c:\\\\d%");
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A purchased ticket. The "My Tickets" collection shows the events behind
/// a buyer's orders.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub event_id: Uuid,
    pub buyer_id: String,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user as known to the identity provider. Organizers and ticket buyers
/// share this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Organizer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Organizer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

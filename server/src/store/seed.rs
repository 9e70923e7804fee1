use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use super::EventStore;
use crate::models::{EventInput, Organizer};
use crate::utils::error::AppError;

pub const DEMO_ORGANIZER_ID: &str = "user_demo_organizer";

const DEMO_CATEGORIES: [&str; 3] = ["Music", "Tech", "Art"];

/// Fills an empty store with a handful of demo events. Does nothing when
/// categories already exist.
pub async fn seed_demo(store: &dyn EventStore) -> Result<(), AppError> {
    if !store.get_all_categories().await?.is_empty() {
        return Ok(());
    }

    store
        .upsert_user(&Organizer {
            id: DEMO_ORGANIZER_ID.to_string(),
            first_name: "Demo".to_string(),
            last_name: "Organizer".to_string(),
        })
        .await?;

    let mut categories = Vec::with_capacity(DEMO_CATEGORIES.len());
    for name in DEMO_CATEGORIES {
        categories.push(store.create_category(name).await?);
    }

    let now = Utc::now();
    for (i, title) in ["Open Air Jazz", "Rust Meetup", "Gallery Night", "Synth Workshop"]
        .into_iter()
        .enumerate()
    {
        let category = &categories[i % categories.len()];
        let start = now + Duration::days(7 * (i as i64 + 1));

        store
            .create_event(
                DEMO_ORGANIZER_ID,
                EventInput {
                    title: title.to_string(),
                    description: format!("{} hosted by the Evently demo organizer", title),
                    location: "Community Hall".to_string(),
                    image_url: "https://images.example.com/evently/placeholder.png".to_string(),
                    start_date_time: start,
                    end_date_time: start + Duration::hours(3),
                    category_id: category.id,
                    is_free: i % 2 == 0,
                    price: if i % 2 == 0 {
                        Decimal::ZERO
                    } else {
                        Decimal::new(2500, 2)
                    },
                    url: "https://example.com/evently".to_string(),
                },
            )
            .await?;
    }

    tracing::info!("Seeded demo data");
    Ok(())
}

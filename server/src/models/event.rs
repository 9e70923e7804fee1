use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{Category, Organizer};
use crate::utils::error::AppError;

/// `<input type="datetime-local">` wire format.
const FORM_DATE_TIME: &str = "%Y-%m-%dT%H:%M";
const MAX_TEXT_LEN: usize = 400;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub is_free: bool,
    pub price: Decimal,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub location: String,
    pub url: String,
    pub category: Category,
    pub organizer: Organizer,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn is_organized_by(&self, user_id: &str) -> bool {
        self.organizer.id == user_id
    }
}

/// Flat row produced by joining events with their category and organizer.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub is_free: bool,
    pub price: Decimal,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub location: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub category_id: Uuid,
    pub category_name: String,
    pub organizer_id: String,
    pub organizer_first_name: String,
    pub organizer_last_name: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            is_free: row.is_free,
            price: row.price,
            start_date_time: row.start_date_time,
            end_date_time: row.end_date_time,
            location: row.location,
            url: row.url,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            organizer: Organizer {
                id: row.organizer_id,
                first_name: row.organizer_first_name,
                last_name: row.organizer_last_name,
            },
            created_at: row.created_at,
        }
    }
}

/// Validated fields for creating or updating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub image_url: String,
    pub start_date_time: DateTime<Utc>,
    pub end_date_time: DateTime<Utc>,
    pub category_id: Uuid,
    pub is_free: bool,
    pub price: Decimal,
    pub url: String,
}

/// Raw event form submission. Also used to prefill the update form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub start_date_time: String,
    #[serde(default)]
    pub end_date_time: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub price: String,
    /// Checkbox: present (any value) when ticked.
    pub is_free: Option<String>,
    #[serde(default)]
    pub url: String,
}

impl EventForm {
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            image_url: event.image_url.clone(),
            start_date_time: event.start_date_time.format(FORM_DATE_TIME).to_string(),
            end_date_time: event.end_date_time.format(FORM_DATE_TIME).to_string(),
            category_id: event.category.id.to_string(),
            price: if event.is_free {
                String::new()
            } else {
                event.price.to_string()
            },
            is_free: event.is_free.then(|| "on".to_string()),
            url: event.url.clone(),
        }
    }

    pub fn is_free(&self) -> bool {
        self.is_free.is_some()
    }

    pub fn validate(&self) -> Result<EventInput, AppError> {
        let title = required_text("Title", &self.title, 3, usize::MAX)?;
        let description = required_text("Description", &self.description, 3, MAX_TEXT_LEN)?;
        let location = required_text("Location", &self.location, 3, MAX_TEXT_LEN)?;
        let image_url = http_url("Image", &self.image_url)?;
        let url = http_url("URL", &self.url)?;

        let start_date_time = parse_form_date_time("Start date", &self.start_date_time)?;
        let end_date_time = parse_form_date_time("End date", &self.end_date_time)?;
        if end_date_time < start_date_time {
            return Err(AppError::ValidationError(
                "End date must not be before the start date".to_string(),
            ));
        }

        let category_id = Uuid::parse_str(self.category_id.trim())
            .map_err(|_| AppError::ValidationError("Please choose a category".to_string()))?;

        let is_free = self.is_free();
        let price = if is_free {
            Decimal::ZERO
        } else {
            let price = Decimal::from_str(self.price.trim()).map_err(|_| {
                AppError::ValidationError("Price must be a number".to_string())
            })?;
            if price.is_sign_negative() {
                return Err(AppError::ValidationError(
                    "Price must not be negative".to_string(),
                ));
            }
            price
        };

        Ok(EventInput {
            title,
            description,
            location,
            image_url,
            start_date_time,
            end_date_time,
            category_id,
            is_free,
            price,
            url,
        })
    }
}

fn required_text(field: &str, value: &str, min: usize, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();

    if len < min {
        return Err(AppError::ValidationError(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(AppError::ValidationError(format!(
            "{} must be less than {} characters",
            field, max
        )));
    }

    Ok(trimmed.to_string())
}

fn http_url(field: &str, value: &str) -> Result<String, AppError> {
    let url = required_text(field, value, 1, usize::MAX)?;
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(url)
    } else {
        Err(AppError::ValidationError(format!(
            "{} must be an http(s) URL",
            field
        )))
    }
}

fn parse_form_date_time(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDateTime::parse_from_str(value.trim(), FORM_DATE_TIME)
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::ValidationError(format!("{} is not a valid date", field)))
}

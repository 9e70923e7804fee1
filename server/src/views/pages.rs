use askama::Template;

use crate::models::{Event, EventForm};
use crate::session::Viewer;
use crate::utils::format::{format_date_time, price_label};
use crate::views::components::{
    CategoryDropdown, CategoryFilter, Collection, Footer, Header, MobileNav, NavItems,
};

/// Header and footer shared by every page.
pub struct Chrome {
    pub header: Header,
    pub footer: Footer,
}

impl Chrome {
    pub fn new(path: &str, viewer: Option<&Viewer>, sign_in_url: &str) -> Self {
        let viewer_name = viewer.map(|viewer| {
            let name = viewer.as_organizer().full_name();
            if name.is_empty() {
                "My Account".to_string()
            } else {
                name
            }
        });

        Self {
            header: Header {
                nav: NavItems::for_path(path),
                mobile_nav: MobileNav {
                    nav: NavItems::for_path(path),
                },
                viewer_name,
                sign_in_url: sign_in_url.to_string(),
            },
            footer: Footer,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomePage {
    pub chrome: Chrome,
    pub search_query: String,
    pub category: Option<String>,
    pub filter: CategoryFilter,
    pub collection: Collection,
}

#[derive(Template)]
#[template(path = "pages/event_detail.html")]
pub struct EventDetailPage {
    pub chrome: Chrome,
    pub image_url: String,
    pub title: String,
    pub price_label: String,
    pub category_name: String,
    pub organizer_name: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub related: Collection,
}

impl EventDetailPage {
    pub fn new(chrome: Chrome, event: &Event, related: Collection) -> Self {
        let start = format_date_time(event.start_date_time);
        let end = format_date_time(event.end_date_time);

        Self {
            chrome,
            image_url: event.image_url.clone(),
            title: event.title.clone(),
            price_label: price_label(event.is_free, event.price),
            category_name: event.category.name.clone(),
            organizer_name: event.organizer.full_name(),
            start_date: start.date_only,
            start_time: start.time_only,
            end_date: end.date_only,
            end_time: end.time_only,
            location: event.location.clone(),
            description: event.description.clone(),
            url: event.url.clone(),
            related,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormAction {
    Create,
    Update,
}

impl EventFormAction {
    pub fn label(self) -> &'static str {
        match self {
            EventFormAction::Create => "Create Event",
            EventFormAction::Update => "Update Event",
        }
    }
}

#[derive(Template)]
#[template(path = "pages/event_form.html")]
pub struct EventFormPage {
    pub chrome: Chrome,
    pub heading: &'static str,
    pub submit_label: &'static str,
    pub action: String,
    pub values: EventForm,
    pub dropdown: CategoryDropdown,
}

impl EventFormPage {
    pub fn new(
        chrome: Chrome,
        form_action: EventFormAction,
        action: String,
        values: EventForm,
        dropdown: CategoryDropdown,
    ) -> Self {
        Self {
            chrome,
            heading: form_action.label(),
            submit_label: form_action.label(),
            action,
            values,
            dropdown,
        }
    }
}

#[derive(Template)]
#[template(path = "pages/profile.html")]
pub struct ProfilePage {
    pub chrome: Chrome,
    pub tickets: Collection,
    pub organized: Collection,
}

#[derive(Template)]
#[template(path = "pages/error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub reason: String,
    pub code: String,
    pub message: String,
}

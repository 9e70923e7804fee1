use askama::Template;
use uuid::Uuid;

use crate::models::{Category, Event};
use crate::utils::format::{format_date_time, price_label};
use crate::utils::query::{form_url_query, remove_keys_from_query, url_with_query, QueryParams};

pub const HEADER_LINKS: [(&str, &str); 3] = [
    ("Home", "/"),
    ("Create Event", "/events/create"),
    ("My Profile", "/profile"),
];

pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const CATEGORY_PARAM: &str = "category";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionType {
    EventsOrganized,
    AllEvents,
    MyTickets,
}

impl CollectionType {
    pub fn has_order_link(self) -> bool {
        self == CollectionType::EventsOrganized
    }

    pub fn hide_price(self) -> bool {
        self == CollectionType::MyTickets
    }
}

/// Edit/delete affordances are shown to the organizer only, and never on
/// cards that hide pricing. Display-level check; handlers re-check ownership.
pub fn shows_owner_controls(viewer_id: Option<&str>, organizer_id: &str, hide_price: bool) -> bool {
    !hide_price && viewer_id == Some(organizer_id)
}

pub struct NavLink {
    pub label: &'static str,
    pub route: &'static str,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "components/nav_items.html")]
pub struct NavItems {
    pub items: Vec<NavLink>,
}

impl NavItems {
    pub fn for_path(path: &str) -> Self {
        let items = HEADER_LINKS
            .iter()
            .map(|&(label, route)| NavLink {
                label,
                route,
                active: path == route,
            })
            .collect();

        Self { items }
    }
}

#[derive(Template)]
#[template(path = "components/mobile_nav.html")]
pub struct MobileNav {
    pub nav: NavItems,
}

#[derive(Template)]
#[template(path = "components/header.html")]
pub struct Header {
    pub nav: NavItems,
    pub mobile_nav: MobileNav,
    pub viewer_name: Option<String>,
    pub sign_in_url: String,
}

#[derive(Template)]
#[template(path = "components/footer.html")]
pub struct Footer;

#[derive(Template)]
#[template(path = "components/card.html")]
pub struct Card {
    pub event_id: Uuid,
    pub image_url: String,
    pub title: String,
    pub price_label: String,
    pub category_name: String,
    pub date_time: String,
    pub location: String,
    pub organizer_name: String,
    pub hide_price: bool,
    pub has_order_link: bool,
    pub show_owner_controls: bool,
}

impl Card {
    pub fn new(event: &Event, viewer_id: Option<&str>, collection_type: CollectionType) -> Self {
        let hide_price = collection_type.hide_price();

        Self {
            event_id: event.id,
            image_url: event.image_url.clone(),
            title: event.title.clone(),
            price_label: price_label(event.is_free, event.price),
            category_name: event.category.name.clone(),
            date_time: format_date_time(event.start_date_time).date_time,
            location: event.location.clone(),
            organizer_name: event.organizer.full_name(),
            hide_price,
            has_order_link: collection_type.has_order_link(),
            show_owner_controls: shows_owner_controls(viewer_id, &event.organizer.id, hide_price),
        }
    }
}

#[derive(Template)]
#[template(path = "components/pagination.html")]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

impl Pagination {
    pub fn new(path: &str, query: &str, url_param_name: &str, page: u32, total_pages: u32) -> Self {
        let href = |target: u32| url_with_query(path, &form_url_query(query, url_param_name, &target.to_string()));

        Self {
            page,
            total_pages,
            // Out-of-range pages step straight back to the last real page.
            previous_href: (page > 1).then(|| href((page - 1).min(total_pages.max(1)))),
            next_href: (page < total_pages).then(|| href(page + 1)),
        }
    }
}

/// Inputs a page composer hands to [`Collection::new`].
pub struct CollectionProps<'a> {
    pub data: &'a [Event],
    pub empty_title: &'a str,
    pub empty_state_subtext: &'a str,
    pub collection_type: CollectionType,
    pub page: u32,
    pub total_pages: u32,
    /// Query parameter the pager writes; defaults to `page`.
    pub url_param_name: Option<&'a str>,
    pub path: &'a str,
    pub query: &'a str,
    pub viewer_id: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "components/collection.html")]
pub struct Collection {
    pub cards: Vec<Card>,
    pub empty_title: String,
    pub empty_subtext: String,
    pub pagination: Option<Pagination>,
}

impl Collection {
    pub fn new(props: CollectionProps<'_>) -> Self {
        let cards = props
            .data
            .iter()
            .map(|event| Card::new(event, props.viewer_id, props.collection_type))
            .collect();

        let pagination = (props.total_pages > 1).then(|| {
            Pagination::new(
                props.path,
                props.query,
                props.url_param_name.unwrap_or(DEFAULT_PAGE_PARAM),
                props.page,
                props.total_pages,
            )
        });

        Self {
            cards,
            empty_title: props.empty_title.to_string(),
            empty_subtext: props.empty_state_subtext.to_string(),
            pagination,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub struct FilterOption {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Template)]
#[template(path = "components/category_filter.html")]
pub struct CategoryFilter {
    pub selected_label: String,
    pub options: Vec<FilterOption>,
}

impl CategoryFilter {
    pub fn new(categories: &[Category], path: &str, query: &str) -> Self {
        let current = QueryParams::parse(query)
            .get(CATEGORY_PARAM)
            .map(str::to_string);

        // A new filter always starts from the first page.
        let without_page = remove_keys_from_query(query, &[DEFAULT_PAGE_PARAM]);

        let mut options = Vec::with_capacity(categories.len() + 1);
        options.push(FilterOption {
            label: "All".to_string(),
            href: url_with_query(path, &remove_keys_from_query(&without_page, &[CATEGORY_PARAM])),
            active: current.is_none(),
        });
        options.extend(categories.iter().map(|category| FilterOption {
            label: category.name.clone(),
            href: url_with_query(path, &form_url_query(&without_page, CATEGORY_PARAM, &category.name)),
            active: current.as_deref() == Some(category.name.as_str()),
        }));

        Self {
            selected_label: current.unwrap_or_else(|| "Category".to_string()),
            options,
        }
    }
}

pub struct DropdownOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "components/category_dropdown.html")]
pub struct CategoryDropdown {
    pub options: Vec<DropdownOption>,
    pub has_selection: bool,
    pub return_to: String,
}

impl CategoryDropdown {
    pub fn new(categories: &[Category], value: &str, return_to: &str) -> Self {
        let options: Vec<DropdownOption> = categories
            .iter()
            .map(|category| {
                let id = category.id.to_string();
                DropdownOption {
                    selected: id == value,
                    value: id,
                    label: category.name.clone(),
                }
            })
            .collect();

        Self {
            has_selection: options.iter().any(|option| option.selected),
            options,
            return_to: return_to.to_string(),
        }
    }
}

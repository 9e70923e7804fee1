pub mod category;
pub mod event;
pub mod order;
pub mod organizer;

pub use category::Category;
pub use event::{Event, EventForm, EventInput};
pub use order::Order;
pub use organizer::Organizer;

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_pages: u32,
}

pub fn total_pages(count: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    count.div_ceil(u64::from(limit)) as u32
}

pub fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(limit)
}

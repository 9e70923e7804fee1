pub mod error;
pub mod format;
pub mod query;
pub mod response;

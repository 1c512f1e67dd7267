//! Utility functions and helpers.

pub mod http;
pub mod identity;
pub mod time;

pub use identity::{normalize_field, posting_id, strip_markup};

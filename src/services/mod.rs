//! Service layer for the monitor.
//!
//! This module contains the business logic for:
//! - Document retrieval (`DocumentSource`, `HttpSource`)
//! - Table extraction (`extract_table`)
//! - Row parsing (`RowParser`)
//! - Alert rendering and delivery (`Notification`, `Notifier`)

mod notify;
mod rows;
mod source;
mod table;

#[cfg(feature = "email")]
pub use notify::EmailNotifier;
pub use notify::{Notification, Notifier, render_html, render_subject};
pub use rows::{RowOutcome, RowParser, SkipReason, extract_link};
pub use source::{DocumentSource, FileSource, HttpSource};
pub use table::{TableMarkers, extract_table};

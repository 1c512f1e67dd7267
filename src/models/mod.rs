// src/models/mod.rs

//! Domain models for the monitor.

mod config;
mod posting;

// Re-export all public types
pub use config::{
    Config, ENV_EMAIL_PASSWORD, ENV_EMAIL_USER, ENV_NOTIFY_EMAIL, ENV_SOURCE_URL, NotifyConfig,
    SourceConfig, StorageConfig, TableConfig,
};
pub use posting::Posting;

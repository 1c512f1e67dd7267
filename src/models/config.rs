//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable holding the sender mailbox.
pub const ENV_EMAIL_USER: &str = "EMAIL_USER";
/// Environment variable holding the sender password.
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
/// Environment variable holding the recipient mailbox.
pub const ENV_NOTIFY_EMAIL: &str = "NOTIFY_EMAIL";
/// Environment variable overriding the source document URL.
pub const ENV_SOURCE_URL: &str = "INTERNWATCH_SOURCE_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where the markdown document comes from
    #[serde(default)]
    pub source: SourceConfig,

    /// Table boundaries and row rules
    #[serde(default)]
    pub table: TableConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub storage: StorageConfig,

    /// Alert delivery
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Fill credentials and the source URL from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_SOURCE_URL) {
            self.source.url = url;
        }
        if let Some(sender) = get(ENV_EMAIL_USER) {
            self.notify.sender = Some(sender);
        }
        if let Some(password) = get(ENV_EMAIL_PASSWORD) {
            self.notify.password = Some(password);
        }
        if let Some(recipient) = get(ENV_NOTIFY_EMAIL) {
            self.notify.recipient = Some(recipient);
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.source.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "source.url must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.table.start_marker.trim().is_empty() {
            return Err(AppError::validation("table.start_marker is empty"));
        }
        if self.table.end_marker.trim().is_empty() {
            return Err(AppError::validation("table.end_marker is empty"));
        }
        if self.table.min_columns < defaults::min_columns() {
            return Err(AppError::validation(format!(
                "table.min_columns must be >= {}",
                defaults::min_columns()
            )));
        }
        if self.storage.snapshot_path.as_os_str().is_empty() {
            return Err(AppError::validation("storage.snapshot_path is empty"));
        }
        if self.notify.subject.trim().is_empty() {
            return Err(AppError::validation("notify.subject is empty"));
        }
        if self.notify.smtp_port == 0 {
            return Err(AppError::validation("notify.smtp_port must be > 0"));
        }
        Ok(())
    }
}

/// Source document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Raw markdown URL
    #[serde(default = "defaults::source_url")]
    pub url: String,

    /// User-Agent header for the fetch
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Human-facing repository page, linked from alert footers
    #[serde(default = "defaults::repository_url")]
    pub repository_url: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::source_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            repository_url: defaults::repository_url(),
        }
    }
}

/// Table location and row interpretation rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Literal header row opening the table
    #[serde(default = "defaults::start_marker")]
    pub start_marker: String,

    /// Literal sentinel closing the table
    #[serde(default = "defaults::end_marker")]
    pub end_marker: String,

    /// Minimum parts after splitting a row on `|`
    #[serde(default = "defaults::min_columns")]
    pub min_columns: usize,

    /// Company cells meaning "same company as the row above"
    #[serde(default = "defaults::continuation_tokens")]
    pub continuation_tokens: Vec<String>,

    /// Glyphs marking closed or restricted postings
    #[serde(default = "defaults::locked_markers")]
    pub locked_markers: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            start_marker: defaults::start_marker(),
            end_marker: defaults::end_marker(),
            min_columns: defaults::min_columns(),
            continuation_tokens: defaults::continuation_tokens(),
            locked_markers: defaults::locked_markers(),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the last run's postings
    #[serde(default = "defaults::snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: defaults::snapshot_path(),
        }
    }
}

/// Email alert settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default = "defaults::smtp_server")]
    pub smtp_server: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Sender mailbox, also used as the SMTP login
    #[serde(default)]
    pub sender: Option<String>,

    /// SMTP password (usually an app password)
    #[serde(default)]
    pub password: Option<String>,

    /// Recipient mailbox
    #[serde(default)]
    pub recipient: Option<String>,

    /// Subject template; `{count}` is replaced with the number of new postings
    #[serde(default = "defaults::subject")]
    pub subject: String,
}

impl NotifyConfig {
    /// Names of the missing delivery settings.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        let mut missing = Vec::new();
        if !present(&self.sender) {
            missing.push("sender");
        }
        if !present(&self.password) {
            missing.push("password");
        }
        if !present(&self.recipient) {
            missing.push("recipient");
        }
        missing
    }

    /// Whether sender, password and recipient are all set.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            smtp_server: defaults::smtp_server(),
            smtp_port: defaults::smtp_port(),
            sender: None,
            password: None,
            recipient: None,
            subject: defaults::subject(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Source defaults
    pub fn source_url() -> String {
        "https://raw.githubusercontent.com/vanshb03/Summer2026-Internships/main/README.md".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; internwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn repository_url() -> Option<String> {
        Some("https://github.com/vanshb03/Summer2026-Internships".into())
    }

    // Table defaults
    pub fn start_marker() -> String {
        "| Company | Role | Location | Application/Link | Date Posted |".into()
    }
    pub fn end_marker() -> String {
        "<!-- Please leave a one line gap between this and the table TABLE_END".into()
    }
    pub fn min_columns() -> usize {
        6
    }
    pub fn continuation_tokens() -> Vec<String> {
        vec!["↳".into(), "L,".into(), "L".into()]
    }
    pub fn locked_markers() -> Vec<String> {
        vec!["🔒".into()]
    }

    // Storage defaults
    pub fn snapshot_path() -> PathBuf {
        PathBuf::from("internships_data.json")
    }

    // Notify defaults
    pub fn smtp_server() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn subject() -> String {
        "🚨 {count} New Internship Posting(s) Available!".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = Config::default();
        config.source.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.source.url = "ftp://example.com/README.md".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.source.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_too_few_columns() {
        let mut config = Config::default();
        config.table.min_columns = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [table]
            continuation_tokens = ["↳"]

            [notify]
            recipient = "me@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.table.continuation_tokens, vec!["↳".to_string()]);
        assert_eq!(config.table.locked_markers, vec!["🔒".to_string()]);
        assert_eq!(config.notify.smtp_port, 587);
        assert_eq!(config.notify.missing_fields(), vec!["sender", "password"]);
    }

    #[test]
    fn example_config_is_valid() {
        let config: Config = toml::from_str(include_str!("../../config.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.table.start_marker, defaults::start_marker());
    }

    #[test]
    fn overrides_fill_credentials() {
        let mut config = Config::default();
        assert!(!config.notify.is_complete());

        config.apply_overrides(|key| match key {
            ENV_EMAIL_USER => Some("bot@example.com".to_string()),
            ENV_EMAIL_PASSWORD => Some("secret".to_string()),
            ENV_NOTIFY_EMAIL => Some("me@example.com".to_string()),
            ENV_SOURCE_URL => Some("   ".to_string()),
            _ => None,
        });

        assert!(config.notify.is_complete());
        assert_eq!(config.source.url, defaults::source_url());
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default("/nonexistent/internwatch.toml");
        assert_eq!(config.storage.snapshot_path, PathBuf::from("internships_data.json"));
    }
}

// src/services/source.rs

//! Source document retrieval.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::utils::http;

/// Something that yields the raw markdown document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn location(&self) -> String;

    /// Fetch the whole document as text.
    async fn fetch(&self) -> Result<String>;
}

/// Fetches the document over HTTP(S).
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            client: http::create_async_client(config)?,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String> {
        http::fetch_text(&self.client, &self.url)
            .await
            .map_err(|e| AppError::fetch(&self.url, e))
    }
}

/// Reads the document from a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::fetch(self.location(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("README.md");
        std::fs::write(&path, "# Internships").unwrap();

        let source = FileSource::new(&path);
        assert_eq!(source.fetch().await.unwrap(), "# Internships");
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let tmp = TempDir::new().unwrap();
        let source = FileSource::new(tmp.path().join("nope.md"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::Fetch { .. }));
        assert!(err.is_fatal_to_run());
    }

    #[test]
    fn test_http_source_location() {
        let source = HttpSource::new(&SourceConfig::default()).unwrap();
        assert!(source.location().starts_with("https://"));
    }
}

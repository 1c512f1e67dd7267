// src/services/table.rs

//! Table extraction.
//!
//! Locates the postings table between a literal header row and a literal
//! end sentinel and hands back the rows in between.

use crate::error::{AppError, Result};
use crate::models::TableConfig;

/// Markers delimiting the table in the source document.
#[derive(Debug, Clone, Copy)]
pub struct TableMarkers<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

impl<'a> From<&'a TableConfig> for TableMarkers<'a> {
    fn from(config: &'a TableConfig) -> Self {
        Self {
            start: &config.start_marker,
            end: &config.end_marker,
        }
    }
}

/// Return the trimmed lines following the header row, up to the end sentinel.
///
/// Fails when either marker is missing, or when the end sentinel only
/// appears before the header.
pub fn extract_table<'d>(document: &'d str, markers: TableMarkers<'_>) -> Result<Vec<&'d str>> {
    let start = document
        .find(markers.start)
        .ok_or_else(|| AppError::table_not_found(markers.start))?;

    let after_header = start + markers.start.len();
    let end = document[after_header..]
        .find(markers.end)
        .map(|offset| after_header + offset)
        .ok_or_else(|| AppError::table_not_found(markers.end))?;

    // The header marker may not span the whole header line.
    let body = &document[after_header..end];
    let body = match body.find('\n') {
        Some(newline) => &body[newline + 1..],
        None => "",
    };

    Ok(body.lines().map(str::trim).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "| Company | Role | Location | Application/Link | Date Posted |";
    const END: &str = "<!-- TABLE_END";

    fn markers() -> TableMarkers<'static> {
        TableMarkers {
            start: START,
            end: END,
        }
    }

    #[test]
    fn test_extracts_rows_between_markers() {
        let doc = format!(
            "# Internships\n\nIntro text\n\n{START}\n| --- | --- |\n| **Acme** | SWE | NYC | link | Sep 01 |\n\n{END} -->\nfooter\n"
        );
        let rows = extract_table(&doc, markers()).unwrap();
        assert_eq!(
            rows,
            vec!["| --- | --- |", "| **Acme** | SWE | NYC | link | Sep 01 |", ""]
        );
    }

    #[test]
    fn test_missing_start_marker() {
        let doc = format!("no table here\n{END}");
        let err = extract_table(&doc, markers()).unwrap_err();
        assert!(matches!(err, AppError::TableNotFound { marker } if marker == START));
    }

    #[test]
    fn test_missing_end_marker_yields_no_partial_table() {
        let doc = format!("{START}\n|---|\n| Acme | SWE | NYC | link | Sep 01 |\n");
        let result = extract_table(&doc, markers());
        assert!(matches!(result, Err(AppError::TableNotFound { marker }) if marker == END));
    }

    #[test]
    fn test_end_marker_before_start_is_missing() {
        let doc = format!("{END}\n{START}\n| Acme | SWE | NYC | link | Sep 01 |\n");
        assert!(extract_table(&doc, markers()).is_err());
    }

    #[test]
    fn test_windows_line_endings() {
        let doc = format!("{START}\r\n|---|\r\n| Acme | SWE | NYC | x | Sep 01 |\r\n{END}");
        let rows = extract_table(&doc, markers()).unwrap();
        assert_eq!(rows, vec!["|---|", "| Acme | SWE | NYC | x | Sep 01 |"]);
    }
}

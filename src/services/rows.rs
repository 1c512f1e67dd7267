// src/services/rows.rs

//! Row parser.
//!
//! Turns table rows into postings. The source merges consecutive postings
//! from one company by leaving the company cell blank (or using a
//! placeholder) on later rows, so parsing is a left fold that threads the
//! most recent company through the rows in document order.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{Html, Selector};

use crate::models::{Posting, TableConfig};
use crate::utils::strip_markup;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\(\s*([^)\s]+)[^)]*\)").expect("static regex"));

/// Why a row produced no posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    Separator,
    Locked,
    TooFewColumns,
    MissingField,
    NoCompany,
}

/// Outcome of parsing a single row.
pub type RowOutcome = std::result::Result<Posting, SkipReason>;

/// Row parser configured with the table's continuation and locked rules.
#[derive(Debug, Clone)]
pub struct RowParser<'a> {
    rules: &'a TableConfig,
    observed_at: DateTime<Utc>,
}

impl<'a> RowParser<'a> {
    /// Create a parser stamping postings with `observed_at`.
    pub fn new(rules: &'a TableConfig, observed_at: DateTime<Utc>) -> Self {
        Self { rules, observed_at }
    }

    /// Parse one row given the company carried from earlier rows.
    ///
    /// Returns the outcome and the company to carry into the next row.
    pub fn parse_row(&self, row: &str, carry: &str) -> (RowOutcome, String) {
        let row = row.trim();
        let unchanged = || carry.to_string();

        if row.is_empty() {
            return (Err(SkipReason::Blank), unchanged());
        }
        if is_separator(row) {
            return (Err(SkipReason::Separator), unchanged());
        }
        if self.is_locked(row) {
            return (Err(SkipReason::Locked), unchanged());
        }

        let parts: Vec<&str> = row.split('|').map(str::trim).collect();
        if parts.len() < self.rules.min_columns {
            return (Err(SkipReason::TooFewColumns), unchanged());
        }
        let [_, company_cell, role, location, link_cell, date_posted, ..] = parts[..] else {
            return (Err(SkipReason::TooFewColumns), unchanged());
        };

        if role.is_empty() || location.is_empty() || link_cell.is_empty() {
            return (Err(SkipReason::MissingField), unchanged());
        }

        let company = if self.is_continuation(company_cell) {
            carry.to_string()
        } else {
            company_cell.to_string()
        };
        let name = strip_markup(&company);
        if name.is_empty() {
            return (Err(SkipReason::NoCompany), String::new());
        }

        let posting = Posting::new(
            name,
            strip_markup(role),
            location,
            extract_link(link_cell).unwrap_or_default(),
            date_posted,
            self.observed_at,
        );
        (Ok(posting), company)
    }

    /// Parse rows in order, dropping the ones that yield no posting.
    ///
    /// Rows resolving to an id already produced are dropped too, so the
    /// first occurrence wins.
    pub fn parse_rows<'r, I>(&self, rows: I) -> Vec<Posting>
    where
        I: IntoIterator<Item = &'r str>,
    {
        let mut seen = HashSet::new();
        let (postings, _) = rows.into_iter().fold(
            (Vec::new(), String::new()),
            |(mut postings, carry), row| {
                let (outcome, carry) = self.parse_row(row, &carry);
                match outcome {
                    Ok(posting) if !seen.insert(posting.id.clone()) => {
                        log::debug!("Skipping duplicate posting: {}", posting.headline());
                    }
                    Ok(posting) => postings.push(posting),
                    Err(reason @ (SkipReason::Blank | SkipReason::Separator)) => {
                        log::trace!("Skipping row ({reason:?})");
                    }
                    Err(reason) => log::debug!("Skipping row ({reason:?}): {row}"),
                }
                (postings, carry)
            },
        );
        postings
    }

    fn is_locked(&self, row: &str) -> bool {
        self.rules
            .locked_markers
            .iter()
            .any(|marker| !marker.is_empty() && row.contains(marker.as_str()))
    }

    fn is_continuation(&self, cell: &str) -> bool {
        cell.is_empty() || self.rules.continuation_tokens.iter().any(|t| t == cell)
    }
}

/// Whether a row is the markdown header separator (`|---|:---:|`).
fn is_separator(row: &str) -> bool {
    row.contains('-')
        && row
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Extract the application URL from a link cell.
///
/// Prefers the first HTML anchor `href`, then a markdown `[text](url)` link.
pub fn extract_link(cell: &str) -> Option<String> {
    if cell.contains('<') {
        let fragment = Html::parse_fragment(cell);
        let href = fragment
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty());
        if let Some(href) = href {
            return Some(href.to_string());
        }
    }

    MARKDOWN_LINK
        .captures(cell)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

// src/utils/identity.rs

//! Content-based posting identity.

use sha2::{Digest, Sha256};

/// Characters the source table uses for emphasis and code spans.
pub const DECORATIVE_MARKUP: [char; 3] = ['*', '_', '`'];

/// Separator between normalized fields before hashing.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Remove decorative markup characters and trim.
pub fn strip_markup(text: &str) -> String {
    text.chars()
        .filter(|c| !DECORATIVE_MARKUP.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Normalize a field for identity: markup stripped, whitespace collapsed,
/// lower-cased.
pub fn normalize_field(text: &str) -> String {
    strip_markup(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Derive the stable id of a posting from its company, role and location.
pub fn posting_id(company: &str, role: &str, location: &str) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in [company, role, location].iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(FIELD_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(normalize_field(field).as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("**Acme_Corp**"), "AcmeCorp");
        assert_eq!(strip_markup(" `Software Engineer` "), "Software Engineer");
    }

    #[test]
    fn test_id_is_hex_sha256() {
        let id = posting_id("Acme", "SWE Intern", "NYC");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_id_ignores_case_and_markup() {
        let a = posting_id("Acme", "SWE Intern", "New York, NY");
        let b = posting_id("**ACME**", "_swe intern_", "new york,  NY");
        assert_eq!(a, b);
    }

    #[test]
    fn test_id_distinguishes_fields() {
        let a = posting_id("Acme", "SWE Intern", "NYC");
        assert_ne!(a, posting_id("Acme", "SWE Intern", "SF"));
        assert_ne!(a, posting_id("Acme", "Data Intern", "NYC"));
    }

    #[test]
    fn test_field_boundaries_matter() {
        assert_ne!(posting_id("ab", "c", "d"), posting_id("a", "bc", "d"));
    }
}

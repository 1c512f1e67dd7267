//! Posting data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::posting_id;
use crate::utils::time::{self, lenient};

/// An internship posting extracted from one table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posting {
    /// Hash over normalized company, role and location
    pub id: String,

    /// Company display name
    pub company: String,

    /// Role display name
    pub role: String,

    /// Free-text location, possibly several places
    pub location: String,

    /// Application link (empty when none could be resolved)
    #[serde(default)]
    pub apply_url: String,

    /// Date as written in the source
    #[serde(default)]
    pub date_posted: String,

    /// When this posting was first observed
    #[serde(default = "time::epoch", deserialize_with = "lenient::deserialize")]
    pub found_at: DateTime<Utc>,
}

impl Posting {
    /// Build a posting, deriving its id from company, role and location.
    pub fn new(
        company: impl Into<String>,
        role: impl Into<String>,
        location: impl Into<String>,
        apply_url: impl Into<String>,
        date_posted: impl Into<String>,
        found_at: DateTime<Utc>,
    ) -> Self {
        let company = company.into();
        let role = role.into();
        let location = location.into();
        Self {
            id: posting_id(&company, &role, &location),
            company,
            role,
            location,
            apply_url: apply_url.into(),
            date_posted: date_posted.into(),
            found_at,
        }
    }

    /// Recompute the id from the stored fields.
    ///
    /// Returns `true` when the stored id differed.
    pub fn rekey(&mut self) -> bool {
        let id = posting_id(&self.company, &self.role, &self.location);
        if id == self.id {
            return false;
        }
        self.id = id;
        true
    }

    /// One-line description used in logs.
    pub fn headline(&self) -> String {
        format!("{}: {} ({})", self.company, self.role, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Posting {
        Posting::new(
            "Acme",
            "Software Engineer Intern",
            "Remote",
            "https://acme.example/jobs/1",
            "Sep 01",
            Utc::now(),
        )
    }

    #[test]
    fn test_new_derives_id() {
        let posting = sample();
        assert_eq!(
            posting.id,
            posting_id("Acme", "Software Engineer Intern", "Remote")
        );
    }

    #[test]
    fn test_rekey() {
        let mut posting = sample();
        assert!(!posting.rekey());

        posting.id = "d41d8cd98f00b204e9800998ecf8427e".to_string();
        assert!(posting.rekey());
        assert_eq!(posting.id, sample().id);
    }

    #[test]
    fn test_headline() {
        assert_eq!(sample().headline(), "Acme: Software Engineer Intern (Remote)");
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let json = r#"{
            "id": "0cc175b9c0f1b6a831c399e269772661",
            "company": "Acme",
            "role": "SWE Intern",
            "location": "NYC",
            "apply_url": "https://acme.example",
            "date_posted": "Sep 01",
            "found_at": "2025-09-01T10:00:00.000001"
        }"#;
        let posting: Posting = serde_json::from_str(json).unwrap();
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.found_at.to_rfc3339(), "2025-09-01T10:00:00.000001+00:00");
    }
}

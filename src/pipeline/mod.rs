//! Pipeline entry points.
//!
//! - `run_monitor`: one fetch → diff → notify → persist cycle
//! - `new_postings`: the additions-only diff it relies on

pub mod diff;
pub mod run;

pub use diff::{carry_first_seen, new_postings};
pub use run::{NotifyOutcome, RunOptions, RunSummary, SaveOutcome, run_monitor};

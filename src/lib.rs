// src/lib.rs

//! internwatch library
//!
//! Watches a markdown internship table and reports postings that were not
//! present in the previous snapshot.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

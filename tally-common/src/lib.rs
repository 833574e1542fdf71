//! # Tally Common Library
//!
//! Shared code for the Tally services including:
//! - Database schema, models, and migrations
//! - Error types
//! - Configuration and root folder resolution
//! - Audit trail sink

pub mod audit;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};

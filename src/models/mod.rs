// src/models/mod.rs

//! Domain models for the portal application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod record;
mod seed;

// Re-export all public types
pub use config::{Config, HarvesterConfig, NormalizerConfig, RepositoryRule};
pub use record::{NOT_AVAILABLE, Record, RecordOutput, UNTITLED};
pub use seed::SeedList;

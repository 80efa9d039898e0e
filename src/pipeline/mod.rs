//! Pipeline entry points for portal operations.
//!
//! - `run_harvest`: walk the seed list and persist records + failure log
//! - `run_reindex`: build a fresh snapshot from storage and publish it

pub mod harvest;
pub mod reindex;

pub use harvest::run_harvest;
pub use reindex::run_reindex;

// src/lib.rs

//! IIIF Portal Library
//!
//! Harvests IIIF collections/manifests into normalized records and answers
//! faceted + keyword queries over them.

pub mod error;
pub mod harvest;
pub mod index;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod query;
pub mod storage;
pub mod utils;

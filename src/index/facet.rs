//! Facet dimensions and per-dimension value tables.

use std::collections::{BTreeSet, HashMap};

use crate::error::{AppError, Result};
use crate::models::{NOT_AVAILABLE, Record};

/// A metadata dimension used to filter and group search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Repository,
    Author,
    Language,
    Material,
}

impl Facet {
    /// All facet dimensions, in sidebar display order.
    pub const ALL: [Facet; 4] = [
        Facet::Repository,
        Facet::Author,
        Facet::Language,
        Facet::Material,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Repository => "repository",
            Facet::Author => "author",
            Facet::Language => "language",
            Facet::Material => "material",
        }
    }

    /// Parse a facet parameter name; unknown names are a query error.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "repository" => Ok(Facet::Repository),
            "author" => Ok(Facet::Author),
            "language" => Ok(Facet::Language),
            "material" => Ok(Facet::Material),
            other => Err(AppError::query(format!("Unknown facet name: {other}"))),
        }
    }

    /// The record field backing this dimension.
    pub fn field<'a>(&self, record: &'a Record) -> Option<&'a str> {
        match self {
            Facet::Repository => record.repository.as_deref(),
            Facet::Author => record.author.as_deref(),
            Facet::Language => record.language.as_deref(),
            Facet::Material => record.material.as_deref(),
        }
    }

    /// The value this record is bucketed under: the field's text, or the
    /// `"N/A"` sentinel for an absent field. Absence is a facet value like
    /// any other.
    pub fn bucket_value<'a>(&self, record: &'a Record) -> &'a str {
        self.field(record).unwrap_or(NOT_AVAILABLE)
    }
}

/// One facet value: display text, count, and the ordered record id set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetBucket {
    /// Original-case display value (first seen wins)
    pub value: String,
    pub count: usize,
    pub ids: BTreeSet<String>,
}

/// Value table for a single facet dimension.
///
/// Values are grouped case-insensitively; original case is retained for
/// display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetTable {
    buckets: HashMap<String, FacetBucket>,
}

impl FacetTable {
    /// Build a table for one dimension over a record set in a single pass.
    pub fn build<'a, I>(facet: Facet, records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut table = Self::default();
        for record in records {
            table.insert(facet.bucket_value(record), &record.id);
        }
        table
    }

    fn insert(&mut self, value: &str, id: &str) {
        let bucket = self
            .buckets
            .entry(value.to_lowercase())
            .or_insert_with(|| FacetBucket {
                value: value.to_string(),
                count: 0,
                ids: BTreeSet::new(),
            });
        if bucket.ids.insert(id.to_string()) {
            bucket.count += 1;
        }
    }

    /// Exact bucket lookup, case-insensitive on the value.
    pub fn get(&self, value: &str) -> Option<&FacetBucket> {
        self.buckets.get(&value.to_lowercase())
    }

    /// Buckets ordered for display: count descending, ties broken by
    /// case-insensitive lexical order. Deterministic across runs.
    pub fn ranked(&self) -> Vec<&FacetBucket> {
        let mut buckets: Vec<&FacetBucket> = self.buckets.values().collect();
        buckets.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.value.to_lowercase().cmp(&b.value.to_lowercase()))
        });
        buckets
    }

    /// Top-N buckets by count, for sidebar display before filtering.
    pub fn top(&self, n: usize) -> Vec<&FacetBucket> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Sum of counts over all values. Equals the record count, since every
    /// record lands in exactly one bucket per dimension.
    pub fn total_count(&self) -> usize {
        self.buckets.values().map(|b| b.count).sum()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

//! Query engine: multi-facet + keyword filtering with stable pagination.
//!
//! Filtering is boolean, not ranked: facet selections AND together via
//! bucket intersection, an optional keyword ANDs in as a case-insensitive
//! substring match over label/author/description. Results are ordered by
//! case-insensitive label, ties by id, and paged at a fixed size of 20.
//!
//! Facet counts returned alongside results are scoped to the filtered
//! candidate set, so selecting one facet narrows the counts shown for the
//! others.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::index::{Facet, FacetTable, Snapshot};
use crate::models::{Record, RecordOutput};

/// Fixed number of records per result page.
pub const PAGE_SIZE: usize = 20;

/// The unconstrained facet value.
pub const WILDCARD: &str = "*";

/// Per-request query parameters. Never persisted.
#[derive(Debug, Clone)]
pub struct QueryState {
    /// Concrete selections only; an absent facet is the wildcard
    selections: HashMap<Facet, String>,
    keyword: Option<String>,
    page: usize,
}

impl QueryState {
    /// Unconstrained query, page 1.
    pub fn new() -> Self {
        Self {
            selections: HashMap::new(),
            keyword: None,
            page: 1,
        }
    }

    /// Set a facet selection by parameter name, as received from the web
    /// layer. Unknown names are a query error; `"*"` or blank clears the
    /// selection.
    pub fn with_facet(mut self, name: &str, value: &str) -> Result<Self> {
        let facet = Facet::parse(name)?;
        self.set_facet(facet, value);
        Ok(self)
    }

    /// Set a facet selection. The wildcard or a blank value clears it, which
    /// is exactly equivalent to never having selected the facet.
    pub fn set_facet(&mut self, facet: Facet, value: &str) {
        let value = value.trim();
        if value.is_empty() || value == WILDCARD {
            self.selections.remove(&facet);
        } else {
            self.selections.insert(facet, value.to_string());
        }
    }

    /// Clear a facet selection (the UI's "remove filter" control).
    pub fn clear_facet(&mut self, facet: Facet) {
        self.set_facet(facet, WILDCARD);
    }

    /// Set the keyword term; blank clears it.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        let keyword = keyword.trim();
        self.keyword = if keyword.is_empty() || keyword == WILDCARD {
            None
        } else {
            Some(keyword.to_string())
        };
        self
    }

    /// Set the 1-indexed page number. Zero is malformed.
    pub fn with_page(mut self, page: usize) -> Result<Self> {
        if page == 0 {
            return Err(AppError::query("Page numbers are 1-indexed"));
        }
        self.page = page;
        Ok(self)
    }

    /// The selection for a facet, wildcard when unconstrained.
    pub fn selection(&self, facet: Facet) -> &str {
        self.selections
            .get(&facet)
            .map(String::as_str)
            .unwrap_or(WILDCARD)
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

/// One sidebar entry: a facet value with its count in the current results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FacetLink {
    pub value: String,
    pub count: usize,
    pub selected: bool,
}

/// The result page plus facet display data, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutput {
    /// Total matching records before pagination
    pub total_count: usize,
    pub page: usize,
    pub page_count: usize,
    /// At most [`PAGE_SIZE`] records for the requested page
    pub records: Vec<RecordOutput>,
    /// Dimension name -> ranked facet links, scoped to the current filter
    pub facets: BTreeMap<String, Vec<FacetLink>>,
}

/// Execute a query against one snapshot.
pub fn run(snapshot: &Snapshot, state: &QueryState) -> QueryOutput {
    // AND together the id sets of all selected facet buckets. A selected
    // value with no bucket yields the empty set.
    let mut candidates: Option<HashSet<&str>> = None;
    for facet in Facet::ALL {
        let selection = state.selection(facet);
        if selection == WILDCARD {
            continue;
        }
        let ids: HashSet<&str> = snapshot
            .facet(facet)
            .get(selection)
            .map(|bucket| bucket.ids.iter().map(String::as_str).collect())
            .unwrap_or_default();
        candidates = Some(match candidates {
            None => ids,
            Some(previous) => previous.intersection(&ids).copied().collect(),
        });
    }

    let keyword = state.keyword().map(str::to_lowercase);

    // Snapshot records are already in result order; filtering preserves it.
    let matched: Vec<&Record> = snapshot
        .records()
        .iter()
        .filter(|record| match &candidates {
            Some(ids) => ids.contains(record.id.as_str()),
            None => true,
        })
        .filter(|record| match &keyword {
            Some(term) => keyword_matches(record, term),
            None => true,
        })
        .collect();

    let total_count = matched.len();
    let page_count = total_count.div_ceil(PAGE_SIZE);

    // A page past the end is an empty result set, not an error.
    let offset = (state.page() - 1) * PAGE_SIZE;
    let records: Vec<RecordOutput> = matched
        .iter()
        .skip(offset)
        .take(PAGE_SIZE)
        .map(|record| RecordOutput::from(*record))
        .collect();

    let mut facets = BTreeMap::new();
    for facet in Facet::ALL {
        let table = FacetTable::build(facet, matched.iter().copied());
        let selection = state.selection(facet).to_lowercase();
        let links = table
            .ranked()
            .into_iter()
            .map(|bucket| FacetLink {
                value: bucket.value.clone(),
                count: bucket.count,
                selected: bucket.value.to_lowercase() == selection,
            })
            .collect();
        facets.insert(facet.as_str().to_string(), links);
    }

    QueryOutput {
        total_count,
        page: state.page(),
        page_count,
        records,
        facets,
    }
}

/// Case-insensitive substring match over label, author, and description.
fn keyword_matches(record: &Record, term: &str) -> bool {
    if record.label.to_lowercase().contains(term) {
        return true;
    }
    [record.author.as_deref(), record.description.as_deref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(term))
}

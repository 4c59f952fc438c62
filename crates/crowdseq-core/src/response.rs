//! Wire shapes for search results and paginated listings.

use crate::error::Result;
use crate::projection::{GeneWithAnnotations, Projector, VariantWithRelations};
use crate::search::SearchResults;
use crate::store::Store;
use crate::types::AminoAcidChange;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// A result collection that serialises as a JSON array, or as `{}` when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<T>(pub Vec<T>);

impl<T> Section<T> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for Section<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_empty() {
            serializer.serialize_map(Some(0))?.end()
        } else {
            self.0.serialize(serializer)
        }
    }
}

/// Body of `GET /search`. All three keys are always present.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct SearchEnvelope {
    pub genes: Section<GeneWithAnnotations>,
    pub aa_changes: Section<AminoAcidChange>,
    pub variants: Section<VariantWithRelations>,
}

impl SearchEnvelope {
    /// Project flat search results into their nested wire representations.
    pub fn shape(store: &Store, results: SearchResults) -> Result<Self> {
        let projector = Projector::new(store);
        Ok(Self {
            genes: projector.genes_with_annotations(results.genes)?.into(),
            aa_changes: results.aa_changes.into(),
            variants: projector.variants_with_relations(results.variants)?.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Raw `page` / `page_size` query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Apply defaults and clamp `page_size` to `1..=max_page_size`.
    /// Page 0 is treated as page 1.
    pub fn resolve(self, default_size: u64, max_page_size: u64) -> PageWindow {
        let max = max_page_size.max(1);
        PageWindow {
            page: self.page.unwrap_or(1).max(1),
            page_size: self.page_size.unwrap_or(default_size).clamp(1, max),
        }
    }
}

impl PageWindow {
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Paginated listing body: `{count, next, previous, results}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: u64, window: PageWindow) -> Self {
        let seen = window.offset().saturating_add(window.page_size);
        Self {
            count,
            next: (seen < count).then(|| window.page.saturating_add(1)),
            previous: (window.page > 1).then_some(window.page - 1),
            results,
        }
    }
}

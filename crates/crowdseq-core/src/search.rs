//! Search layer: federated OR search across genes, amino-acid changes,
//! transcripts and variants.
//!
//! ```text
//! tokenize ──► match genes
//!          ├─► match aa changes
//!          ├─► match transcripts ──► bridge (transcript → variant ids)
//!          └─────────────────────────────┴──► match variants (ids OR fields)
//! ```
//!
//! Matching is recall-oriented: a record qualifies when any term is a
//! case-insensitive substring of any of its searchable fields.

use crate::error::Result;
use crate::query::{Predicate, VariantField};
use crate::store::{Searchable, Store};
use crate::types::{AminoAcidChange, Gene, Transcript, Variant};
use std::collections::HashSet;
use tracing::debug;

/// Split a raw query on whitespace. Order is kept and case is left untouched.
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Split a listing filter on whitespace and commas.
pub fn filter_terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Variant columns checked by the listing filter. Transcript ids and
/// amino-acid change names are reached through the link tables.
pub const LISTING_FILTER_FIELDS: &[VariantField] = &[
    VariantField::ChromPosRefAlt,
    VariantField::RefseqHgvsgId,
    VariantField::AltHgvsgId,
    VariantField::HgvsgId,
    VariantField::LrgHgvsgId,
];

/// Flat result of one search, before projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub genes: Vec<Gene>,
    pub aa_changes: Vec<AminoAcidChange>,
    pub variants: Vec<Variant>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty() && self.aa_changes.is_empty() && self.variants.is_empty()
    }
}

/// Window applied to the variant listing of an empty query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingWindow {
    pub limit: u64,
    pub offset: u64,
}

pub struct SearchEngine<'a> {
    store: &'a Store,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Run a federated search.
    ///
    /// With no terms, genes and amino-acid changes are empty and variants are
    /// the full sorted listing.
    pub fn search(&self, raw_query: &str) -> Result<SearchResults> {
        self.search_windowed(raw_query, None)
    }

    /// As [`search`](Self::search), but an empty query lists only `window`
    /// of the variants. A non-empty query is never windowed.
    pub fn search_windowed(
        &self,
        raw_query: &str,
        window: Option<ListingWindow>,
    ) -> Result<SearchResults> {
        let terms = tokenize(raw_query);

        if terms.is_empty() {
            let all = Predicate::all();
            let variants = match window {
                Some(w) => self.store.find_page::<Variant>(&all, w.limit, w.offset)?,
                None => self.store.find::<Variant>(&all)?,
            };
            debug!(variants = variants.len(), "empty query, listing variants");
            return Ok(SearchResults {
                variants,
                ..Default::default()
            });
        }

        let genes = self.match_entities::<Gene>(&terms)?;
        let aa_changes = self.match_entities::<AminoAcidChange>(&terms)?;
        let transcripts = self.match_entities::<Transcript>(&terms)?;
        let bridged = self.bridge(&transcripts)?;

        let predicate = Predicate::all()
            .or_id_in(bridged.iter().copied())
            .merge(Predicate::any_term_in_any_field(Variant::SEARCH_FIELDS, &terms));
        let variants = self.store.find::<Variant>(&predicate)?;

        debug!(
            terms = ?terms,
            genes = genes.len(),
            aa_changes = aa_changes.len(),
            transcripts = transcripts.len(),
            bridged = bridged.len(),
            variants = variants.len(),
            "search complete"
        );

        Ok(SearchResults {
            genes,
            aa_changes,
            variants,
        })
    }

    /// Records of `R` where any term is contained in any of its search fields.
    /// No terms means the unfiltered listing.
    pub fn match_entities<R: Searchable>(&self, terms: &[String]) -> Result<Vec<R>> {
        let predicate = Predicate::any_term_in_any_field(R::SEARCH_FIELDS, terms);
        self.store.find::<R>(&predicate)
    }

    /// Predicate restricting the variant listing to rows where every term
    /// matches one of the variant's identifiers, transcript ids or
    /// amino-acid change names. `None` when `raw` has no terms.
    pub fn listing_filter(&self, raw: &str) -> Result<Option<Predicate<VariantField>>> {
        let terms = filter_terms(raw);
        if terms.is_empty() {
            return Ok(None);
        }

        let mut matching: Option<HashSet<i64>> = None;
        for term in &terms {
            let ids = self.variant_ids_for_term(term)?;
            let narrowed: HashSet<i64> = match matching {
                Some(prev) => prev.intersection(&ids).copied().collect(),
                None => ids,
            };
            if narrowed.is_empty() {
                debug!(terms = ?terms, "listing filter matched nothing");
                return Ok(Some(Predicate::all().or_id_in(Vec::new())));
            }
            matching = Some(narrowed);
        }

        let ids = matching.unwrap_or_default();
        debug!(terms = ?terms, variants = ids.len(), "listing filter");
        Ok(Some(Predicate::all().or_id_in(ids)))
    }

    fn variant_ids_for_term(&self, term: &str) -> Result<HashSet<i64>> {
        let term = [term.to_string()];

        let mut transcript_ids: Vec<i64> = self
            .match_entities::<Transcript>(&term)?
            .iter()
            .map(|t| t.id)
            .collect();
        let aa_change_ids: Vec<i64> = self
            .match_entities::<AminoAcidChange>(&term)?
            .iter()
            .map(|a| a.id)
            .collect();
        transcript_ids.extend(
            self.store
                .transcripts_of_aa_changes(&aa_change_ids)?
                .values()
                .flatten()
                .map(|t| t.id),
        );

        let mut ids = self.store.variant_ids_for_transcripts(&transcript_ids)?;
        let direct = Predicate::any_term_in_any_field(LISTING_FILTER_FIELDS, &term);
        ids.extend(self.store.find::<Variant>(&direct)?.iter().map(|v| v.id));
        Ok(ids)
    }

    /// Ids of every variant associated with any of `transcripts`.
    pub fn bridge(&self, transcripts: &[Transcript]) -> Result<HashSet<i64>> {
        let ids: Vec<i64> = transcripts.iter().map(|t| t.id).collect();
        self.store.variant_ids_for_transcripts(&ids)
    }
}

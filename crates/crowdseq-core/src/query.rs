//! Typed predicate builder.
//!
//! A [`Predicate`] is an explicit OR of [`Clause`]s over one entity's fields.
//! It is built once per entity per search and handed to a single store query;
//! nothing here touches the database.

use rusqlite::types::Value;
use std::fmt;

/// A searchable column of one entity table.
pub trait Field: Copy + fmt::Debug + 'static {
    fn column(self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Per-entity fields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneField {
    AliasSymbols,
    ApprovedName,
    ApprovedSymbol,
}

impl Field for GeneField {
    fn column(self) -> &'static str {
        match self {
            GeneField::AliasSymbols => "alias_symbols",
            GeneField::ApprovedName => "approved_name",
            GeneField::ApprovedSymbol => "approved_symbol",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptField {
    EnsemblTranscriptId,
}

impl Field for TranscriptField {
    fn column(self) -> &'static str {
        match self {
            TranscriptField::EnsemblTranscriptId => "ensembl_transcript_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AaChangeField {
    LongName,
    ShortName,
}

impl Field for AaChangeField {
    fn column(self) -> &'static str {
        match self {
            AaChangeField::LongName => "long_name",
            AaChangeField::ShortName => "short_name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantField {
    ChromPosRefAlt,
    AltChromPosRefAlt,
    HgvsgId,
    AltHgvsgId,
    RefseqHgvsgId,
    LrgHgvsgId,
}

impl Field for VariantField {
    fn column(self) -> &'static str {
        match self {
            VariantField::ChromPosRefAlt => "chrom_pos_ref_alt",
            VariantField::AltChromPosRefAlt => "alt_chrom_pos_ref_alt",
            VariantField::HgvsgId => "hgvsg_id",
            VariantField::AltHgvsgId => "alt_hgvsg_id",
            VariantField::RefseqHgvsgId => "refseq_hgvsg_id",
            VariantField::LrgHgvsgId => "lrg_hgvsg_id",
        }
    }
}

// ---------------------------------------------------------------------------
// Clauses and predicates
// ---------------------------------------------------------------------------

/// One `(field, comparator, value)` disjunct.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause<F> {
    /// Case-insensitive substring match.
    Contains { field: F, value: String },
    /// Row id is a member of the set. An empty set matches nothing.
    IdIn(Vec<i64>),
}

/// OR-combination of clauses. A predicate with no clauses matches every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate<F> {
    clauses: Vec<Clause<F>>,
}

/// Rendered `WHERE` body plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl<F: Field> Predicate<F> {
    /// The unfiltered predicate.
    pub fn all() -> Self {
        Self { clauses: Vec::new() }
    }

    /// Every term against every field: `OR(term × field)`.
    pub fn any_term_in_any_field(fields: &[F], terms: &[String]) -> Self {
        terms.iter().fold(Self::all(), |pred, term| {
            fields
                .iter()
                .fold(pred, |pred, &field| pred.or_contains(field, term.clone()))
        })
    }

    pub fn or(mut self, clause: Clause<F>) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn or_contains(self, field: F, value: impl Into<String>) -> Self {
        self.or(Clause::Contains {
            field,
            value: value.into(),
        })
    }

    pub fn or_id_in(self, ids: impl IntoIterator<Item = i64>) -> Self {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        self.or(Clause::IdIn(ids))
    }

    /// Append every clause of `other`.
    pub fn merge(mut self, other: Self) -> Self {
        self.clauses.extend(other.clauses);
        self
    }

    pub fn clauses(&self) -> &[Clause<F>] {
        &self.clauses
    }

    pub fn is_unfiltered(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render as a SQL boolean expression over columns of `table_alias`.
    pub fn to_sql(&self, table_alias: &str) -> SqlFragment {
        if self.clauses.is_empty() {
            return SqlFragment {
                sql: "1".to_string(),
                params: Vec::new(),
            };
        }

        let mut params = Vec::with_capacity(self.clauses.len());
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| match clause {
                Clause::Contains { field, value } => {
                    params.push(Value::Text(format!("%{}%", escape_like(value))));
                    format!("{table_alias}.{} LIKE ? ESCAPE '\\'", field.column())
                }
                Clause::IdIn(ids) if ids.is_empty() => "0".to_string(),
                Clause::IdIn(ids) => {
                    params.push(Value::Text(json_id_array(ids)));
                    format!("{table_alias}.id IN (SELECT value FROM json_each(?))")
                }
            })
            .collect();

        SqlFragment {
            sql: format!("({})", parts.join(" OR ")),
            params,
        }
    }
}

impl<F: Field> Default for Predicate<F> {
    fn default() -> Self {
        Self::all()
    }
}

/// Escape `LIKE` metacharacters so a term is matched literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Encode ids as a JSON array for a single `json_each(?)` parameter.
pub fn json_id_array(ids: &[i64]) -> String {
    let body: Vec<String> = ids.iter().map(i64::to_string).collect();
    format!("[{}]", body.join(","))
}

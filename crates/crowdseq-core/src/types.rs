//! Core entity types for crowdseq.
//!
//! Every struct here mirrors one table row. Relations are carried as plain
//! ids; nested representations live in [`crate::projection`] so that no type
//! in this module ever embeds another entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Stored rows
// ---------------------------------------------------------------------------

/// A gene seeded from the HGNC nomenclature export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gene {
    pub id: i64,
    pub hgnc_gene_id: i64,
    /// Generated once on first insert and never rewritten by later upserts.
    pub api_key: Uuid,
    pub approved_symbol: Option<String>,
    pub approved_name: Option<String>,
    pub alias_symbols: Option<String>,
    pub alias_names: Option<String>,
    pub previous_symbols: Option<String>,
    pub previous_name: Option<String>,
    pub chromosome: String,
    pub locus_group: String,
    pub locus_type: String,
    pub status: String,
    pub gene_group_name: Option<String>,
    pub ensembl_gene_id: Option<String>,
    pub ncbi_gene_id: Option<i64>,
    pub refseq_ids: Option<String>,
    pub uniprot_id: Option<String>,
    pub omim_id: Option<String>,
    pub date_approved: Option<NaiveDate>,
}

/// Free-text curation note attached to a gene. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneAnnotation {
    pub id: i64,
    pub gene_id: i64,
    pub annotation: String,
    pub priority: i64,
    pub user: Option<String>,
    pub creation_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub id: i64,
    pub ensembl_transcript_id: String,
    pub transcript_support_level: Option<String>,
    pub transcript_length: Option<i64>,
    pub refseq_match: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AminoAcidChange {
    pub id: i64,
    pub long_name: String,
    pub short_name: String,
}

/// Curation note on an amino-acid change, scoped to the gene it was made for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AminoAcidAnnotation {
    pub id: i64,
    pub gene_id: i64,
    pub amino_acid_id: i64,
    pub annotation: String,
    pub priority: i64,
    pub user: Option<String>,
    pub creation_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variant {
    pub id: i64,
    pub md5sum: String,
    /// Canonical `chr:pos:ref:alt` locus; the variant sort key.
    pub chrom_pos_ref_alt: String,
    pub chr: String,
    pub start_pos: i64,
    pub end_pos: i64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub gene_id: Option<i64>,
    pub hgvsg_id: String,
    pub alt_hgvsg_id: String,
    pub refseq_hgvsg_id: String,
    pub lrg_hgvsg_id: Option<String>,
    pub alt_chr: String,
    pub alt_chrom_pos_ref_alt: String,
}

/// The ANNOVAR prediction record of one variant.
///
/// Only populated columns are present in `fields`; keys are names from
/// [`crate::annovar::ANNOVAR_FIELDS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnovarData {
    pub id: i64,
    pub variant_id: i64,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Insert payloads
// ---------------------------------------------------------------------------

/// Gene columns written by an upsert keyed on `hgnc_gene_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGene {
    pub hgnc_gene_id: i64,
    pub approved_symbol: Option<String>,
    pub approved_name: Option<String>,
    pub alias_symbols: Option<String>,
    pub alias_names: Option<String>,
    pub previous_symbols: Option<String>,
    pub previous_name: Option<String>,
    pub chromosome: String,
    pub locus_group: String,
    pub locus_type: String,
    pub status: String,
    pub gene_group_name: Option<String>,
    pub ensembl_gene_id: Option<String>,
    pub ncbi_gene_id: Option<i64>,
    pub refseq_ids: Option<String>,
    pub uniprot_id: Option<String>,
    pub omim_id: Option<String>,
    pub date_approved: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTranscript {
    pub ensembl_transcript_id: String,
    pub transcript_support_level: Option<String>,
    pub transcript_length: Option<i64>,
    pub refseq_match: Option<String>,
}

/// Variant columns written by an upsert keyed on `md5sum`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewVariant {
    pub md5sum: String,
    pub chrom_pos_ref_alt: String,
    pub chr: String,
    pub start_pos: i64,
    pub end_pos: i64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub gene_id: Option<i64>,
    pub hgvsg_id: String,
    pub alt_hgvsg_id: String,
    pub refseq_hgvsg_id: String,
    pub lrg_hgvsg_id: Option<String>,
    pub alt_chr: String,
    pub alt_chrom_pos_ref_alt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnotation {
    pub annotation: String,
    pub priority: i64,
    pub user: Option<String>,
}

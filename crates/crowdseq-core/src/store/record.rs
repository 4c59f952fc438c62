//! Row decoding and per-table metadata.

use crate::annovar::ANNOVAR_FIELDS;
use crate::query::{AaChangeField, Field, GeneField, TranscriptField, VariantField};
use crate::types::{
    AminoAcidAnnotation, AminoAcidChange, AnnovarData, Gene, GeneAnnotation, Transcript, Variant,
};
use rusqlite::types::Type;
use rusqlite::Row;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A type decoded from one row of `TABLE`. Columns are read by name so the
/// same decoder works for `SELECT t.*` with extra aliased columns.
pub trait Record: Sized {
    const TABLE: &'static str;
    /// Listing order ahead of the `id` tie-break. `None` means storage order.
    const SORT_KEY: Option<&'static str>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A record the federated search matches terms against.
pub trait Searchable: Record {
    type Field: Field;
    const SEARCH_FIELDS: &'static [Self::Field];
}

// ---------------------------------------------------------------------------
// Genes
// ---------------------------------------------------------------------------

impl Record for Gene {
    const TABLE: &'static str = "genes";
    const SORT_KEY: Option<&'static str> = Some("approved_symbol");

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Gene {
            id: row.get("id")?,
            hgnc_gene_id: row.get("hgnc_gene_id")?,
            api_key: uuid_column(row, "api_key")?,
            approved_symbol: row.get("approved_symbol")?,
            approved_name: row.get("approved_name")?,
            alias_symbols: row.get("alias_symbols")?,
            alias_names: row.get("alias_names")?,
            previous_symbols: row.get("previous_symbols")?,
            previous_name: row.get("previous_name")?,
            chromosome: row.get("chromosome")?,
            locus_group: row.get("locus_group")?,
            locus_type: row.get("locus_type")?,
            status: row.get("status")?,
            gene_group_name: row.get("gene_group_name")?,
            ensembl_gene_id: row.get("ensembl_gene_id")?,
            ncbi_gene_id: row.get("ncbi_gene_id")?,
            refseq_ids: row.get("refseq_ids")?,
            uniprot_id: row.get("uniprot_id")?,
            omim_id: row.get("omim_id")?,
            date_approved: row.get("date_approved")?,
        })
    }
}

impl Searchable for Gene {
    type Field = GeneField;
    const SEARCH_FIELDS: &'static [GeneField] = &[
        GeneField::AliasSymbols,
        GeneField::ApprovedName,
        GeneField::ApprovedSymbol,
    ];
}

impl Record for GeneAnnotation {
    const TABLE: &'static str = "gene_annotations";
    const SORT_KEY: Option<&'static str> = None;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(GeneAnnotation {
            id: row.get("id")?,
            gene_id: row.get("gene_id")?,
            annotation: row.get("annotation")?,
            priority: row.get("priority")?,
            user: row.get("user")?,
            creation_timestamp: row.get("creation_timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Transcripts and amino-acid changes
// ---------------------------------------------------------------------------

impl Record for Transcript {
    const TABLE: &'static str = "transcripts";
    const SORT_KEY: Option<&'static str> = None;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Transcript {
            id: row.get("id")?,
            ensembl_transcript_id: row.get("ensembl_transcript_id")?,
            transcript_support_level: row.get("transcript_support_level")?,
            transcript_length: row.get("transcript_length")?,
            refseq_match: row.get("refseq_match")?,
        })
    }
}

impl Searchable for Transcript {
    type Field = TranscriptField;
    const SEARCH_FIELDS: &'static [TranscriptField] = &[TranscriptField::EnsemblTranscriptId];
}

impl Record for AminoAcidChange {
    const TABLE: &'static str = "amino_acid_changes";
    const SORT_KEY: Option<&'static str> = None;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AminoAcidChange {
            id: row.get("id")?,
            long_name: row.get("long_name")?,
            short_name: row.get("short_name")?,
        })
    }
}

impl Searchable for AminoAcidChange {
    type Field = AaChangeField;
    const SEARCH_FIELDS: &'static [AaChangeField] =
        &[AaChangeField::LongName, AaChangeField::ShortName];
}

impl Record for AminoAcidAnnotation {
    const TABLE: &'static str = "amino_acid_annotations";
    const SORT_KEY: Option<&'static str> = None;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AminoAcidAnnotation {
            id: row.get("id")?,
            gene_id: row.get("gene_id")?,
            amino_acid_id: row.get("amino_acid_id")?,
            annotation: row.get("annotation")?,
            priority: row.get("priority")?,
            user: row.get("user")?,
            creation_timestamp: row.get("creation_timestamp")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

impl Record for Variant {
    const TABLE: &'static str = "variants";
    const SORT_KEY: Option<&'static str> = Some("chrom_pos_ref_alt");

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Variant {
            id: row.get("id")?,
            md5sum: row.get("md5sum")?,
            chrom_pos_ref_alt: row.get("chrom_pos_ref_alt")?,
            chr: row.get("chr")?,
            start_pos: row.get("start_pos")?,
            end_pos: row.get("end_pos")?,
            ref_allele: row.get("ref_allele")?,
            alt_allele: row.get("alt_allele")?,
            gene_id: row.get("gene_id")?,
            hgvsg_id: row.get("hgvsg_id")?,
            alt_hgvsg_id: row.get("alt_hgvsg_id")?,
            refseq_hgvsg_id: row.get("refseq_hgvsg_id")?,
            lrg_hgvsg_id: row.get("lrg_hgvsg_id")?,
            alt_chr: row.get("alt_chr")?,
            alt_chrom_pos_ref_alt: row.get("alt_chrom_pos_ref_alt")?,
        })
    }
}

impl Searchable for Variant {
    type Field = VariantField;
    const SEARCH_FIELDS: &'static [VariantField] = &[
        VariantField::ChromPosRefAlt,
        VariantField::AltChromPosRefAlt,
        VariantField::HgvsgId,
        VariantField::RefseqHgvsgId,
        VariantField::LrgHgvsgId,
    ];
}

impl Record for AnnovarData {
    const TABLE: &'static str = "annovar_data";
    const SORT_KEY: Option<&'static str> = None;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut fields = BTreeMap::new();
        for &name in ANNOVAR_FIELDS {
            if let Some(value) = row.get::<_, Option<String>>(name)? {
                fields.insert(name.to_string(), value);
            }
        }
        Ok(AnnovarData {
            id: row.get("id")?,
            variant_id: row.get("variant_id")?,
            fields,
        })
    }
}

fn uuid_column(row: &Row<'_>, name: &str) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(name)?;
    Uuid::parse_str(&raw).map_err(|e| {
        let idx = row.as_ref().column_index(name).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

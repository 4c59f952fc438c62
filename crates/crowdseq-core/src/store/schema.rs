//! Relational schema. Applied idempotently every time a store is opened.

use crate::annovar::ANNOVAR_FIELDS;

const BASE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS genes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hgnc_gene_id INTEGER NOT NULL UNIQUE,
    api_key TEXT NOT NULL UNIQUE,
    approved_symbol TEXT,
    approved_name TEXT,
    alias_symbols TEXT,
    alias_names TEXT,
    previous_symbols TEXT,
    previous_name TEXT,
    chromosome TEXT NOT NULL,
    locus_group TEXT NOT NULL,
    locus_type TEXT NOT NULL,
    status TEXT NOT NULL,
    gene_group_name TEXT,
    ensembl_gene_id TEXT,
    ncbi_gene_id INTEGER,
    refseq_ids TEXT,
    uniprot_id TEXT,
    omim_id TEXT,
    date_approved TEXT
);

CREATE TABLE IF NOT EXISTS gene_annotations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    gene_id INTEGER NOT NULL REFERENCES genes(id) ON DELETE CASCADE,
    annotation TEXT NOT NULL,
    priority INTEGER NOT NULL,
    user TEXT,
    creation_timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS transcripts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ensembl_transcript_id TEXT NOT NULL UNIQUE,
    transcript_support_level TEXT,
    transcript_length INTEGER,
    refseq_match TEXT
);

CREATE TABLE IF NOT EXISTS amino_acid_changes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    long_name TEXT NOT NULL UNIQUE,
    short_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS amino_acid_change_transcripts (
    amino_acid_change_id INTEGER NOT NULL REFERENCES amino_acid_changes(id) ON DELETE CASCADE,
    transcript_id INTEGER NOT NULL REFERENCES transcripts(id) ON DELETE CASCADE,
    PRIMARY KEY (amino_acid_change_id, transcript_id)
);

CREATE TABLE IF NOT EXISTS amino_acid_change_genes (
    amino_acid_change_id INTEGER NOT NULL REFERENCES amino_acid_changes(id) ON DELETE CASCADE,
    gene_id INTEGER NOT NULL REFERENCES genes(id) ON DELETE CASCADE,
    PRIMARY KEY (amino_acid_change_id, gene_id)
);

CREATE TABLE IF NOT EXISTS amino_acid_annotations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    gene_id INTEGER NOT NULL REFERENCES genes(id) ON DELETE CASCADE,
    amino_acid_id INTEGER NOT NULL REFERENCES amino_acid_changes(id) ON DELETE CASCADE,
    annotation TEXT NOT NULL,
    priority INTEGER NOT NULL,
    user TEXT,
    creation_timestamp TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS variants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    md5sum TEXT NOT NULL UNIQUE,
    chrom_pos_ref_alt TEXT NOT NULL UNIQUE,
    chr TEXT NOT NULL,
    start_pos INTEGER NOT NULL,
    end_pos INTEGER NOT NULL,
    ref_allele TEXT NOT NULL,
    alt_allele TEXT NOT NULL,
    gene_id INTEGER REFERENCES genes(id) ON DELETE CASCADE,
    hgvsg_id TEXT NOT NULL DEFAULT '',
    alt_hgvsg_id TEXT NOT NULL DEFAULT '',
    refseq_hgvsg_id TEXT NOT NULL DEFAULT '',
    lrg_hgvsg_id TEXT,
    alt_chr TEXT NOT NULL DEFAULT '',
    alt_chrom_pos_ref_alt TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS variant_transcripts (
    variant_id INTEGER NOT NULL REFERENCES variants(id) ON DELETE CASCADE,
    transcript_id INTEGER NOT NULL REFERENCES transcripts(id) ON DELETE CASCADE,
    PRIMARY KEY (variant_id, transcript_id)
);

CREATE INDEX IF NOT EXISTS idx_genes_approved_symbol ON genes(approved_symbol);
CREATE INDEX IF NOT EXISTS idx_gene_annotations_gene ON gene_annotations(gene_id);
CREATE INDEX IF NOT EXISTS idx_aa_annotations_aa ON amino_acid_annotations(amino_acid_id);
CREATE INDEX IF NOT EXISTS idx_aa_changes_short_name ON amino_acid_changes(short_name);
CREATE INDEX IF NOT EXISTS idx_aa_change_transcripts_transcript ON amino_acid_change_transcripts(transcript_id);
CREATE INDEX IF NOT EXISTS idx_aa_change_genes_gene ON amino_acid_change_genes(gene_id);
CREATE INDEX IF NOT EXISTS idx_variants_gene ON variants(gene_id);
CREATE INDEX IF NOT EXISTS idx_variant_transcripts_transcript ON variant_transcripts(transcript_id);
";

/// Full DDL, with the ANNOVAR table generated from [`ANNOVAR_FIELDS`].
///
/// `annovar_data.variant_id` is indexed but not unique: one row per variant
/// is maintained by the importer's lookup-before-insert.
pub fn ddl() -> String {
    let annovar_columns: String = ANNOVAR_FIELDS
        .iter()
        .map(|name| format!(",\n    {name} TEXT"))
        .collect();

    format!(
        "{BASE_SCHEMA}
CREATE TABLE IF NOT EXISTS annovar_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    variant_id INTEGER NOT NULL REFERENCES variants(id) ON DELETE CASCADE{annovar_columns}
);

CREATE INDEX IF NOT EXISTS idx_annovar_data_variant ON annovar_data(variant_id);
"
    )
}

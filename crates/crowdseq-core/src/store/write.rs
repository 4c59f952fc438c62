//! Transactional writes. A [`Writer`] only exists inside [`Store::write`](super::Store::write).

use super::read;
use crate::annovar::is_annovar_field;
use crate::error::Result;
use crate::types::{AminoAcidChange, Gene, NewAnnotation, NewGene, NewTranscript, NewVariant, Variant};
use chrono::Utc;
use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension};
use uuid::Uuid;

pub struct Writer<'c> {
    conn: &'c Connection,
}

/// Outcome of [`Writer::upsert_annovar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnovarWrite {
    pub id: i64,
    pub created: bool,
}

impl<'c> Writer<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // -----------------------------------------------------------------------
    // Lookups visible inside the transaction
    // -----------------------------------------------------------------------

    pub fn gene_by_symbol(&self, symbol: &str) -> Result<Option<Gene>> {
        read::first_where(self.conn, "t.approved_symbol = ?1 COLLATE NOCASE", &symbol)
    }

    pub fn variant_by_cpra(&self, chrom_pos_ref_alt: &str) -> Result<Option<Variant>> {
        read::first_where(self.conn, "t.chrom_pos_ref_alt = ?1", &chrom_pos_ref_alt)
    }

    pub fn aa_change_by_short_name(&self, short_name: &str) -> Result<Option<AminoAcidChange>> {
        read::first_where(self.conn, "t.short_name = ?1 COLLATE NOCASE", &short_name)
    }

    // -----------------------------------------------------------------------
    // Upserts
    // -----------------------------------------------------------------------

    /// Insert or update by `hgnc_gene_id`. `api_key` is only set on insert.
    pub fn upsert_gene(&self, gene: &NewGene) -> Result<i64> {
        let id = self.conn.query_row(
            "INSERT INTO genes (
                hgnc_gene_id, api_key, approved_symbol, approved_name, alias_symbols,
                alias_names, previous_symbols, previous_name, chromosome, locus_group,
                locus_type, status, gene_group_name, ensembl_gene_id, ncbi_gene_id,
                refseq_ids, uniprot_id, omim_id, date_approved
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
             ON CONFLICT(hgnc_gene_id) DO UPDATE SET
                approved_symbol = excluded.approved_symbol,
                approved_name = excluded.approved_name,
                alias_symbols = excluded.alias_symbols,
                alias_names = excluded.alias_names,
                previous_symbols = excluded.previous_symbols,
                previous_name = excluded.previous_name,
                chromosome = excluded.chromosome,
                locus_group = excluded.locus_group,
                locus_type = excluded.locus_type,
                status = excluded.status,
                gene_group_name = excluded.gene_group_name,
                ensembl_gene_id = excluded.ensembl_gene_id,
                ncbi_gene_id = excluded.ncbi_gene_id,
                refseq_ids = excluded.refseq_ids,
                uniprot_id = excluded.uniprot_id,
                omim_id = excluded.omim_id,
                date_approved = excluded.date_approved
             RETURNING id",
            params![
                gene.hgnc_gene_id,
                Uuid::new_v4().to_string(),
                gene.approved_symbol,
                gene.approved_name,
                gene.alias_symbols,
                gene.alias_names,
                gene.previous_symbols,
                gene.previous_name,
                gene.chromosome,
                gene.locus_group,
                gene.locus_type,
                gene.status,
                gene.gene_group_name,
                gene.ensembl_gene_id,
                gene.ncbi_gene_id,
                gene.refseq_ids,
                gene.uniprot_id,
                gene.omim_id,
                gene.date_approved,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Insert or update by `ensembl_transcript_id`; absent details keep their stored value.
    pub fn upsert_transcript(&self, transcript: &NewTranscript) -> Result<i64> {
        let id = self.conn.query_row(
            "INSERT INTO transcripts (
                ensembl_transcript_id, transcript_support_level, transcript_length, refseq_match
             ) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(ensembl_transcript_id) DO UPDATE SET
                transcript_support_level = COALESCE(excluded.transcript_support_level, transcripts.transcript_support_level),
                transcript_length = COALESCE(excluded.transcript_length, transcripts.transcript_length),
                refseq_match = COALESCE(excluded.refseq_match, transcripts.refseq_match)
             RETURNING id",
            params![
                transcript.ensembl_transcript_id,
                transcript.transcript_support_level,
                transcript.transcript_length,
                transcript.refseq_match,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Insert or update by `long_name`.
    pub fn upsert_aa_change(&self, long_name: &str, short_name: &str) -> Result<i64> {
        let id = self.conn.query_row(
            "INSERT INTO amino_acid_changes (long_name, short_name) VALUES (?1, ?2)
             ON CONFLICT(long_name) DO UPDATE SET short_name = excluded.short_name
             RETURNING id",
            params![long_name, short_name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Insert or update by `md5sum`. Empty identifiers and a missing gene
    /// never overwrite stored values.
    pub fn upsert_variant(&self, variant: &NewVariant) -> Result<i64> {
        let id = self.conn.query_row(
            "INSERT INTO variants (
                md5sum, chrom_pos_ref_alt, chr, start_pos, end_pos, ref_allele, alt_allele,
                gene_id, hgvsg_id, alt_hgvsg_id, refseq_hgvsg_id, lrg_hgvsg_id, alt_chr,
                alt_chrom_pos_ref_alt
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(md5sum) DO UPDATE SET
                end_pos = excluded.end_pos,
                gene_id = COALESCE(excluded.gene_id, variants.gene_id),
                hgvsg_id = COALESCE(NULLIF(excluded.hgvsg_id, ''), variants.hgvsg_id),
                alt_hgvsg_id = COALESCE(NULLIF(excluded.alt_hgvsg_id, ''), variants.alt_hgvsg_id),
                refseq_hgvsg_id = COALESCE(NULLIF(excluded.refseq_hgvsg_id, ''), variants.refseq_hgvsg_id),
                lrg_hgvsg_id = COALESCE(excluded.lrg_hgvsg_id, variants.lrg_hgvsg_id),
                alt_chr = COALESCE(NULLIF(excluded.alt_chr, ''), variants.alt_chr),
                alt_chrom_pos_ref_alt = COALESCE(NULLIF(excluded.alt_chrom_pos_ref_alt, ''), variants.alt_chrom_pos_ref_alt)
             RETURNING id",
            params![
                variant.md5sum,
                variant.chrom_pos_ref_alt,
                variant.chr,
                variant.start_pos,
                variant.end_pos,
                variant.ref_allele,
                variant.alt_allele,
                variant.gene_id,
                variant.hgvsg_id,
                variant.alt_hgvsg_id,
                variant.refseq_hgvsg_id,
                variant.lrg_hgvsg_id,
                variant.alt_chr,
                variant.alt_chrom_pos_ref_alt,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Write the ANNOVAR record of a variant, updating the existing row in
    /// place when there is one. Names outside the canonical list are ignored.
    pub fn upsert_annovar(&self, variant_id: i64, fields: &[(&str, String)]) -> Result<AnnovarWrite> {
        let fields: Vec<&(&str, String)> = fields
            .iter()
            .filter(|(name, _)| is_annovar_field(name))
            .collect();

        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM annovar_data WHERE variant_id = ?1 ORDER BY id LIMIT 1",
                [variant_id],
                |row| row.get(0),
            )
            .optional()?;

        let mut values: Vec<Value> = fields.iter().map(|(_, v)| Value::Text(v.clone())).collect();

        match existing {
            Some(id) => {
                if !fields.is_empty() {
                    let assignments: Vec<String> =
                        fields.iter().map(|(name, _)| format!("{name} = ?")).collect();
                    let sql = format!(
                        "UPDATE annovar_data SET {} WHERE id = ?",
                        assignments.join(", ")
                    );
                    values.push(Value::Integer(id));
                    self.conn.execute(&sql, params_from_iter(values.iter()))?;
                }
                Ok(AnnovarWrite { id, created: false })
            }
            None => {
                let columns: String = fields.iter().map(|(name, _)| format!(", {name}")).collect();
                let placeholders: String = fields.iter().map(|_| ", ?").collect();
                let sql = format!(
                    "INSERT INTO annovar_data (variant_id{columns}) VALUES (?{placeholders})"
                );
                values.insert(0, Value::Integer(variant_id));
                self.conn.execute(&sql, params_from_iter(values.iter()))?;
                Ok(AnnovarWrite {
                    id: self.conn.last_insert_rowid(),
                    created: true,
                })
            }
        }
    }

    // -----------------------------------------------------------------------
    // Links (idempotent)
    // -----------------------------------------------------------------------

    pub fn link_variant_transcript(&self, variant_id: i64, transcript_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO variant_transcripts (variant_id, transcript_id) VALUES (?1, ?2)",
            [variant_id, transcript_id],
        )?;
        Ok(())
    }

    pub fn link_aa_change_transcript(&self, aa_change_id: i64, transcript_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO amino_acid_change_transcripts (amino_acid_change_id, transcript_id) \
             VALUES (?1, ?2)",
            [aa_change_id, transcript_id],
        )?;
        Ok(())
    }

    pub fn link_aa_change_gene(&self, aa_change_id: i64, gene_id: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO amino_acid_change_genes (amino_acid_change_id, gene_id) VALUES (?1, ?2)",
            [aa_change_id, gene_id],
        )?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Annotations (append-only)
    // -----------------------------------------------------------------------

    pub fn add_gene_annotation(&self, gene_id: i64, note: &NewAnnotation) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO gene_annotations (gene_id, annotation, priority, user, creation_timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![gene_id, note.annotation, note.priority, note.user, Utc::now()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_aa_annotation(
        &self,
        gene_id: i64,
        aa_change_id: i64,
        note: &NewAnnotation,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO amino_acid_annotations \
             (gene_id, amino_acid_id, annotation, priority, user, creation_timestamp) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![gene_id, aa_change_id, note.annotation, note.priority, note.user, Utc::now()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

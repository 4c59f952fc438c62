//! Store: the data access layer over the relational schema.
//!
//! One SQLite connection behind a mutex. Reads are single statements; writes
//! go through [`Store::write`], which wraps a closure in one transaction.

mod read;
mod record;
mod schema;
mod write;

pub use record::{Record, Searchable};
pub use write::{AnnovarWrite, Writer};

use crate::error::Result;
use crate::query::Predicate;
use crate::types::{
    AminoAcidAnnotation, AminoAcidChange, AnnovarData, Gene, GeneAnnotation, Transcript, Variant,
};
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (creating if needed) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA busy_timeout = 5000;")?;
        debug!(path = %path.display(), "opened store");
        Self::init(conn)
    }

    /// Private in-memory database, for tests and one-shot CLI runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(&schema::ddl())?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves the connection itself usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` inside one transaction. An `Err` from `f` rolls back.
    pub fn write<T>(&self, f: impl FnOnce(&Writer<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let out = f(&Writer::new(&tx))?;
        tx.commit()?;
        Ok(out)
    }

    // -----------------------------------------------------------------------
    // Filtered listings
    // -----------------------------------------------------------------------

    /// Every record matching `predicate`, in canonical order.
    pub fn find<R: Searchable>(&self, predicate: &Predicate<R::Field>) -> Result<Vec<R>> {
        read::find(&self.conn(), predicate, None)
    }

    pub fn find_page<R: Searchable>(
        &self,
        predicate: &Predicate<R::Field>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<R>> {
        read::find(&self.conn(), predicate, Some((limit, offset)))
    }

    pub fn count<R: Searchable>(&self, predicate: &Predicate<R::Field>) -> Result<u64> {
        read::count::<R>(&self.conn(), predicate)
    }

    /// Ids of every variant linked to any of `transcript_ids`, in one statement.
    pub fn variant_ids_for_transcripts(&self, transcript_ids: &[i64]) -> Result<HashSet<i64>> {
        if transcript_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT variant_id FROM variant_transcripts \
             WHERE transcript_id IN (SELECT value FROM json_each(?1))",
        )?;
        let ids = stmt
            .query_map([crate::query::json_id_array(transcript_ids)], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<i64>>>()?;
        Ok(ids)
    }

    // -----------------------------------------------------------------------
    // Single lookups
    // -----------------------------------------------------------------------

    /// Case-insensitive exact match on the approved symbol.
    pub fn gene_by_symbol(&self, symbol: &str) -> Result<Option<Gene>> {
        read::first_where(&self.conn(), "t.approved_symbol = ?1 COLLATE NOCASE", &symbol)
    }

    pub fn variant_by_cpra(&self, chrom_pos_ref_alt: &str) -> Result<Option<Variant>> {
        read::first_where(&self.conn(), "t.chrom_pos_ref_alt = ?1", &chrom_pos_ref_alt)
    }

    /// Short names are not unique; the earliest stored change wins.
    pub fn aa_change_by_short_name(&self, short_name: &str) -> Result<Option<AminoAcidChange>> {
        read::first_where(&self.conn(), "t.short_name = ?1 COLLATE NOCASE", &short_name)
    }

    pub fn annovar_for_variant(&self, variant_id: i64) -> Result<Option<AnnovarData>> {
        read::first_where(&self.conn(), "t.variant_id = ?1", &variant_id)
    }

    // -----------------------------------------------------------------------
    // Batched relation loaders, keyed by owner id
    // -----------------------------------------------------------------------

    pub fn genes_by_id(&self, gene_ids: &[i64]) -> Result<HashMap<i64, Gene>> {
        let genes: Vec<Gene> = self.find(&Predicate::all().or_id_in(gene_ids.iter().copied()))?;
        Ok(genes.into_iter().map(|g| (g.id, g)).collect())
    }

    pub fn gene_annotations(&self, gene_ids: &[i64]) -> Result<HashMap<i64, Vec<GeneAnnotation>>> {
        read::children(&self.conn(), "gene_id", gene_ids)
    }

    pub fn variants_of_genes(&self, gene_ids: &[i64]) -> Result<HashMap<i64, Vec<Variant>>> {
        read::children(&self.conn(), "gene_id", gene_ids)
    }

    pub fn transcripts_of_variants(
        &self,
        variant_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Transcript>>> {
        read::linked(
            &self.conn(),
            "variant_transcripts",
            "variant_id",
            "transcript_id",
            variant_ids,
        )
    }

    pub fn aa_changes_of_transcripts(
        &self,
        transcript_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<AminoAcidChange>>> {
        read::linked(
            &self.conn(),
            "amino_acid_change_transcripts",
            "transcript_id",
            "amino_acid_change_id",
            transcript_ids,
        )
    }

    pub fn transcripts_of_aa_changes(
        &self,
        aa_change_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Transcript>>> {
        read::linked(
            &self.conn(),
            "amino_acid_change_transcripts",
            "amino_acid_change_id",
            "transcript_id",
            aa_change_ids,
        )
    }

    pub fn genes_of_aa_changes(&self, aa_change_ids: &[i64]) -> Result<HashMap<i64, Vec<Gene>>> {
        read::linked(
            &self.conn(),
            "amino_acid_change_genes",
            "amino_acid_change_id",
            "gene_id",
            aa_change_ids,
        )
    }

    /// Every ANNOVAR row per variant. The importer keeps this at most one.
    pub fn annovar_records(&self, variant_ids: &[i64]) -> Result<HashMap<i64, Vec<AnnovarData>>> {
        read::children(&self.conn(), "variant_id", variant_ids)
    }

    pub fn aa_annotations(
        &self,
        aa_change_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<AminoAcidAnnotation>>> {
        read::children(&self.conn(), "amino_acid_id", aa_change_ids)
    }
}

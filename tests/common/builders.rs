//! Test builders: a fluent way to seed a [`Store`] with a small entity graph.
//!
//! These builders are designed for readability in test setup, not for
//! production use. They panic on invalid input rather than returning `Result`.

use crowdseq_core::{Cpra, NewAnnotation, NewGene, NewTranscript, NewVariant, Store};

// ---------------------------------------------------------------------------
// Payload helpers
// ---------------------------------------------------------------------------

/// A minimal approved protein-coding gene.
pub fn new_gene(hgnc_gene_id: i64, symbol: &str) -> NewGene {
    NewGene {
        hgnc_gene_id,
        approved_symbol: Some(symbol.to_string()),
        chromosome: "1".into(),
        locus_group: "protein-coding gene".into(),
        locus_type: "gene with protein product".into(),
        status: "Approved".into(),
        ..Default::default()
    }
}

/// A variant payload derived from a `chr:pos:ref:alt` string.
pub fn new_variant(cpra: &str) -> NewVariant {
    let locus: Cpra = cpra.parse().expect("test locus must parse");
    NewVariant {
        md5sum: locus.md5sum(),
        chrom_pos_ref_alt: locus.to_string(),
        chr: locus.chr.clone(),
        start_pos: locus.pos,
        end_pos: locus.end_pos(),
        ref_allele: locus.ref_allele.clone(),
        alt_allele: locus.alt_allele.clone(),
        ..Default::default()
    }
}

pub fn note(text: &str) -> NewAnnotation {
    NewAnnotation {
        annotation: text.to_string(),
        priority: 50,
        user: Some("curator".to_string()),
    }
}

// ---------------------------------------------------------------------------
// StoreBuilder
// ---------------------------------------------------------------------------

/// Fluent builder over an in-memory [`Store`].
///
/// # Example
///
/// ```rust
/// let store = StoreBuilder::new()
///     .gene(1100, "BRCA1", "BRCA1 DNA repair associated", "RNF53")
///     .variant("17:43045712:T:C", Some("BRCA1"), "NC_000017.11:g.43045712T>C")
///     .transcript("ENST00000357654", &["17:43045712:T:C"])
///     .build();
/// ```
pub struct StoreBuilder {
    store: Store,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            store: Store::open_in_memory().expect("in-memory store"),
        }
    }

    /// Wrap an existing store, e.g. one opened on a temp file.
    pub fn on(store: Store) -> Self {
        Self { store }
    }

    pub fn gene(self, hgnc_gene_id: i64, symbol: &str, name: &str, aliases: &str) -> Self {
        let mut gene = new_gene(hgnc_gene_id, symbol);
        gene.approved_name = Some(name.to_string());
        gene.alias_symbols = Some(aliases.to_string()).filter(|a| !a.is_empty());
        self.store.write(|w| w.upsert_gene(&gene)).expect("upsert gene");
        self
    }

    pub fn variant(self, cpra: &str, gene_symbol: Option<&str>, hgvsg: &str) -> Self {
        self.store
            .write(|w| {
                let gene_id = match gene_symbol {
                    Some(symbol) => Some(w.gene_by_symbol(symbol)?.expect("gene seeded first").id),
                    None => None,
                };
                let mut variant = new_variant(cpra);
                variant.gene_id = gene_id;
                variant.hgvsg_id = hgvsg.to_string();
                w.upsert_variant(&variant)
            })
            .expect("upsert variant");
        self
    }

    /// Upsert a transcript and link it to already seeded variants.
    pub fn transcript(self, ensembl_transcript_id: &str, cpras: &[&str]) -> Self {
        self.store
            .write(|w| {
                let transcript_id = w.upsert_transcript(&NewTranscript {
                    ensembl_transcript_id: ensembl_transcript_id.to_string(),
                    ..Default::default()
                })?;
                for cpra in cpras {
                    let variant = w.variant_by_cpra(cpra)?.expect("variant seeded first");
                    w.link_variant_transcript(variant.id, transcript_id)?;
                }
                Ok(())
            })
            .expect("upsert transcript");
        self
    }

    /// Upsert an amino-acid change on seeded transcripts and an optional gene.
    pub fn aa_change(
        self,
        long_name: &str,
        short_name: &str,
        transcripts: &[&str],
        gene_symbol: Option<&str>,
    ) -> Self {
        self.store
            .write(|w| {
                let aa_id = w.upsert_aa_change(long_name, short_name)?;
                for enst in transcripts {
                    let transcript_id = w.upsert_transcript(&NewTranscript {
                        ensembl_transcript_id: enst.to_string(),
                        ..Default::default()
                    })?;
                    w.link_aa_change_transcript(aa_id, transcript_id)?;
                }
                if let Some(symbol) = gene_symbol {
                    let gene = w.gene_by_symbol(symbol)?.expect("gene seeded first");
                    w.link_aa_change_gene(aa_id, gene.id)?;
                }
                Ok(())
            })
            .expect("upsert aa change");
        self
    }

    pub fn gene_note(self, symbol: &str, text: &str) -> Self {
        self.store
            .write(|w| {
                let gene = w.gene_by_symbol(symbol)?.expect("gene seeded first");
                w.add_gene_annotation(gene.id, &note(text))
            })
            .expect("add gene annotation");
        self
    }

    pub fn aa_note(self, symbol: &str, short_name: &str, text: &str) -> Self {
        self.store
            .write(|w| {
                let gene = w.gene_by_symbol(symbol)?.expect("gene seeded first");
                let aa = w.aa_change_by_short_name(short_name)?.expect("aa change seeded first");
                w.add_aa_annotation(gene.id, aa.id, &note(text))
            })
            .expect("add aa annotation");
        self
    }

    pub fn build(self) -> Store {
        self.store
    }
}

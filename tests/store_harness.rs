//! Store and projection integration harness.
//!
//! # What this covers
//!
//! - **Persistence**: a file-backed store survives being closed and reopened.
//! - **Upserts**: natural keys (HGNC id, locus hash, transcript id, long name)
//!   make repeated writes update in place.
//! - **ANNOVAR records**: at most one per variant, updated field by field.
//! - **Links**: relation writes are idempotent.
//! - **Projections**: every view embeds its relations and none recurses.
//! - **Shared access**: one store serves concurrent readers.
//!
//! # What this does NOT cover
//!
//! - Schema migration between releases
//!
//! # Running
//!
//! ```sh
//! cargo test --test store_harness
//! ```

mod common;
use common::*;

use crowdseq_core::projection::Projector;
use crowdseq_core::query::Predicate;
use crowdseq_core::{NewTranscript, SearchEngine, Store, Transcript, Variant};
use pretty_assertions::assert_eq;

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crowdseq.db");

    let api_key = {
        let store = seed_reference(StoreBuilder::on(Store::open(&path).unwrap())).build();
        store.gene_by_symbol("TP53").unwrap().unwrap().api_key
    };

    let reopened = Store::open(&path).unwrap();
    let gene = reopened.gene_by_symbol("tp53").unwrap().unwrap();
    assert_eq!(gene.api_key, api_key);
    assert_eq!(reopened.count::<Variant>(&Predicate::all()).unwrap(), 5);
}

#[test]
fn reopening_applies_schema_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crowdseq.db");
    drop(Store::open(&path).unwrap());
    drop(Store::open(&path).unwrap());
    let store = Store::open(&path).unwrap();
    assert_eq!(store.count::<Variant>(&Predicate::all()).unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Upserts
// ---------------------------------------------------------------------------

#[test]
fn variant_upsert_is_keyed_by_locus_hash() {
    let store = reference_store();
    let before = store.variant_by_cpra(BRCA1_VARIANT).unwrap().unwrap();

    let id = store
        .write(|w| {
            let mut again = new_variant(BRCA1_VARIANT);
            again.refseq_hgvsg_id = "NM_007294.4:c.181T>G".into();
            w.upsert_variant(&again)
        })
        .unwrap();

    let after = store.variant_by_cpra(BRCA1_VARIANT).unwrap().unwrap();
    assert_eq!(id, before.id);
    assert_eq!(after.refseq_hgvsg_id, "NM_007294.4:c.181T>G");
    // Empty identifiers and a missing gene keep what was stored.
    assert_eq!(after.hgvsg_id, before.hgvsg_id);
    assert_eq!(after.gene_id, before.gene_id);
    assert_eq!(store.count::<Variant>(&Predicate::all()).unwrap(), 5);
}

#[test]
fn transcript_upsert_keeps_known_details() {
    let store = reference_store();
    store
        .write(|w| {
            w.upsert_transcript(&NewTranscript {
                ensembl_transcript_id: TP53_TRANSCRIPT.into(),
                transcript_support_level: Some("1".into()),
                transcript_length: Some(2512),
                refseq_match: Some("NM_000546.6".into()),
            })?;
            w.upsert_transcript(&NewTranscript {
                ensembl_transcript_id: TP53_TRANSCRIPT.into(),
                ..Default::default()
            })
        })
        .unwrap();

    let transcripts: Vec<Transcript> = store.find(&Predicate::all()).unwrap();
    assert_eq!(transcripts.len(), 3);
    let tp53 = transcripts
        .iter()
        .find(|t| t.ensembl_transcript_id == TP53_TRANSCRIPT)
        .unwrap();
    assert_eq!(tp53.transcript_length, Some(2512));
    assert_eq!(tp53.refseq_match.as_deref(), Some("NM_000546.6"));
}

#[test]
fn links_are_idempotent() {
    let mut store = reference_store();
    for _ in 0..3 {
        store = StoreBuilder::on(store)
            .transcript(BRCA1_TRANSCRIPT, &[BRCA1_VARIANT])
            .build();
    }
    let variant = store.variant_by_cpra(BRCA1_VARIANT).unwrap().unwrap();
    let linked = store.transcripts_of_variants(&[variant.id]).unwrap();
    assert_eq!(linked[&variant.id].len(), 1);
}

// ---------------------------------------------------------------------------
// ANNOVAR records
// ---------------------------------------------------------------------------

#[test]
fn annovar_record_is_updated_in_place() {
    let store = reference_store();
    let variant = store.variant_by_cpra(TP53_VARIANT).unwrap().unwrap();

    let first = store
        .write(|w| {
            w.upsert_annovar(
                variant.id,
                &[("func_ref_gene", "exonic".to_string()), ("cadd_phred", "25.3".to_string())],
            )
        })
        .unwrap();
    let second = store
        .write(|w| {
            w.upsert_annovar(
                variant.id,
                &[("cadd_phred", "27.1".to_string()), ("not_a_column", "x".to_string())],
            )
        })
        .unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.id, second.id);

    let records = store.annovar_records(&[variant.id]).unwrap();
    assert_eq!(records[&variant.id].len(), 1);
    let fields = &records[&variant.id][0].fields;
    assert_eq!(fields.get("func_ref_gene").map(String::as_str), Some("exonic"));
    assert_eq!(fields.get("cadd_phred").map(String::as_str), Some("27.1"));
    assert!(!fields.contains_key("not_a_column"));
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

#[test]
fn gene_detail_lists_its_variants_and_notes() {
    let store = reference_store();
    let gene = store.gene_by_symbol("BRCA1").unwrap().unwrap();
    let detail = Projector::new(&store).gene_detail(gene).unwrap();

    assert_loci!(detail.variants, [BRCA1_VARIANT, BRCA1_SECOND_VARIANT]);
    assert_eq!(detail.annotations.len(), 1);
    assert_eq!(detail.annotations[0].priority, 50);
}

#[test]
fn variant_detail_embeds_gene_transcripts_and_annovar() {
    let store = reference_store();
    let variant = store.variant_by_cpra(TP53_VARIANT).unwrap().unwrap();
    store
        .write(|w| w.upsert_annovar(variant.id, &[("sift_pred", "D".to_string())]))
        .unwrap();

    let detail = Projector::new(&store).variant_detail(variant).unwrap();
    let gene = detail.variant.gene.as_ref().unwrap();
    assert_eq!(gene.gene.approved_symbol.as_deref(), Some("TP53"));
    assert_eq!(detail.variant.transcripts.len(), 1);
    assert_eq!(detail.variant.transcripts[0].aa_changes[0].short_name, "R175H");
    assert_eq!(
        detail.annovar.unwrap().fields.get("sift_pred").map(String::as_str),
        Some("D")
    );
}

#[test]
fn variant_without_gene_projects_null_gene() {
    let store = reference_store();
    let variant = store.variant_by_cpra(ORPHAN_VARIANT).unwrap().unwrap();
    let detail = Projector::new(&store).variant_detail(variant).unwrap();
    assert!(detail.variant.gene.is_none());
    assert!(detail.variant.transcripts.is_empty());
    assert!(detail.annovar.is_none());

    let json = serde_json::to_value(&detail).unwrap();
    assert!(json["gene"].is_null());
    assert!(json["annovar"].is_null());
}

#[test]
fn aa_change_detail_embeds_genes_notes_and_transcripts() {
    let store = reference_store();
    let aa = store.aa_change_by_short_name("r175h").unwrap().unwrap();
    let detail = Projector::new(&store).aa_change_detail(aa).unwrap();

    assert_eq!(detail.annotations.len(), 1);
    assert_eq!(detail.annotations[0].annotation, "DNA-binding domain hotspot");
    let genes: Vec<_> = detail.genes.iter().map(|g| g.gene.clone()).collect();
    assert_symbols!(genes, ["TP53"]);
    assert_eq!(detail.transcripts[0].ensembl_transcript_id, TP53_TRANSCRIPT);
}

#[test]
fn batched_projection_keeps_input_order() {
    let store = reference_store();
    let variants: Vec<Variant> = store.find(&Predicate::all()).unwrap();
    let projected = Projector::new(&store).variants_with_relations(variants).unwrap();
    let loci: Vec<_> = projected.iter().map(|v| v.variant.chrom_pos_ref_alt.as_str()).collect();
    assert_eq!(loci, ALL_VARIANTS);

    let genes: Vec<_> = projected
        .iter()
        .map(|v| v.gene.as_ref().and_then(|g| g.gene.approved_symbol.as_deref()))
        .collect();
    assert_eq!(genes, vec![None, Some("BRCA2"), Some("BRCA1"), Some("BRCA1"), Some("TP53")]);
}

// ---------------------------------------------------------------------------
// Shared access
// ---------------------------------------------------------------------------

#[test]
fn concurrent_searches_agree() {
    let store = reference_store();
    let expected = SearchEngine::new(&store).search("BRCA ENST").unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| SearchEngine::new(&store).search("BRCA ENST").unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

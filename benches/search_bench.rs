//! Search engine benchmarks.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `terms` | Full search (match + bridge + variant match) for 1, 3 and 6 terms |
//! | `bridge` | Transcript-only queries that resolve through the link table |
//! | `envelope` | Search plus projection into the wire envelope |
//! | `scaling` | One-term search as the variant count grows |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench search_bench
//! open target/criterion/report/index.html
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crowdseq_core::{Cpra, NewGene, NewTranscript, NewVariant, SearchEngine, SearchEnvelope, Store};
use std::hint::black_box;

const GENES: i64 = 200;

/// A store with `GENES` genes, `variants` variants spread across them and one
/// transcript per variant.
fn synthetic_store(variants: i64) -> Store {
    let store = Store::open_in_memory().expect("in-memory store");
    store
        .write(|w| {
            let mut gene_ids = Vec::with_capacity(GENES as usize);
            for g in 0..GENES {
                gene_ids.push(w.upsert_gene(&NewGene {
                    hgnc_gene_id: g + 1,
                    approved_symbol: Some(format!("GENE{g}")),
                    approved_name: Some(format!("synthetic gene {g}")),
                    chromosome: "1".into(),
                    locus_group: "protein-coding gene".into(),
                    locus_type: "gene with protein product".into(),
                    status: "Approved".into(),
                    ..Default::default()
                })?);
            }
            for v in 0..variants {
                let chr = (v % 22) + 1;
                let locus: Cpra = format!("{chr}:{}:A:G", 1_000 + v).parse()?;
                let variant_id = w.upsert_variant(&NewVariant {
                    md5sum: locus.md5sum(),
                    chrom_pos_ref_alt: locus.to_string(),
                    chr: locus.chr.clone(),
                    start_pos: locus.pos,
                    end_pos: locus.end_pos(),
                    ref_allele: locus.ref_allele.clone(),
                    alt_allele: locus.alt_allele.clone(),
                    gene_id: Some(gene_ids[(v % GENES) as usize]),
                    hgvsg_id: format!("NC_0000{chr:02}.11:g.{}A>G", 1_000 + v),
                    ..Default::default()
                })?;
                let transcript_id = w.upsert_transcript(&NewTranscript {
                    ensembl_transcript_id: format!("ENST{:011}", v),
                    ..Default::default()
                })?;
                w.link_variant_transcript(variant_id, transcript_id)?;
            }
            Ok(())
        })
        .expect("seed synthetic store");
    store
}

fn terms_bench(c: &mut Criterion) {
    let store = synthetic_store(10_000);
    let engine = SearchEngine::new(&store);
    let mut group = c.benchmark_group("terms");

    for query in ["GENE7", "GENE7 1:1001 ENST00000000042", "GENE1 GENE2 GENE3 2:1 3:1 4:1"] {
        let n = query.split_whitespace().count();
        group.bench_with_input(BenchmarkId::from_parameter(n), query, |b, q| {
            b.iter(|| black_box(engine.search(q).expect("search")))
        });
    }
    group.finish();
}

fn bridge_bench(c: &mut Criterion) {
    let store = synthetic_store(10_000);
    let engine = SearchEngine::new(&store);
    let mut group = c.benchmark_group("bridge");

    // `ENST000000001` prefixes 100 transcripts (ids 100..=199).
    for query in ["ENST00000000042", "ENST000000001"] {
        group.bench_with_input(BenchmarkId::from_parameter(query), query, |b, q| {
            b.iter(|| black_box(engine.search(q).expect("search")))
        });
    }
    group.finish();
}

fn envelope_bench(c: &mut Criterion) {
    let store = synthetic_store(10_000);
    let mut group = c.benchmark_group("envelope");

    group.bench_function("gene_prefix_with_projection", |b| {
        b.iter(|| {
            let results = SearchEngine::new(&store).search("GENE19").expect("search");
            black_box(SearchEnvelope::shape(&store, results).expect("shape"))
        })
    });
    group.finish();
}

fn scaling_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    group.sample_size(20);

    for size in [1_000i64, 10_000, 50_000] {
        let store = synthetic_store(size);
        let engine = SearchEngine::new(&store);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(engine.search("NC_000017").expect("search")))
        });
    }
    group.finish();
}

criterion_group!(benches, terms_bench, bridge_bench, envelope_bench, scaling_bench);
criterion_main!(benches);

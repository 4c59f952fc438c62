//! Reference data used across harnesses.
//!
//! [`reference_store`] seeds a small but fully linked entity graph. The
//! upload corpora are the same shapes curators send: an HGNC export, a
//! variant catalogue, ANNOVAR multianno output and annotation sheets.

use super::builders::StoreBuilder;
use crowdseq_core::Store;

pub const BRCA1_VARIANT: &str = "17:43045712:T:C";
pub const BRCA1_SECOND_VARIANT: &str = "17:43045713:G:A";
pub const BRCA2_VARIANT: &str = "13:32315474:G:T";
pub const TP53_VARIANT: &str = "17:7675088:C:T";
pub const ORPHAN_VARIANT: &str = "11:108227827:A:G";

pub const BRCA1_TRANSCRIPT: &str = "ENST00000357654";
pub const BRCA2_TRANSCRIPT: &str = "ENST00000380152";
pub const TP53_TRANSCRIPT: &str = "ENST00000269305";

/// Every variant locus in [`reference_store`], sorted.
pub const ALL_VARIANTS: &[&str] = &[
    ORPHAN_VARIANT,
    BRCA2_VARIANT,
    BRCA1_VARIANT,
    BRCA1_SECOND_VARIANT,
    TP53_VARIANT,
];

/// Four genes, five variants (one without a gene), three transcripts and
/// two amino-acid changes with notes.
pub fn reference_store() -> Store {
    reference_builder().build()
}

pub fn reference_builder() -> StoreBuilder {
    seed_reference(StoreBuilder::new())
}

/// Seed the reference graph into whatever store `builder` wraps.
pub fn seed_reference(builder: StoreBuilder) -> StoreBuilder {
    builder
        .gene(1100, "BRCA1", "BRCA1 DNA repair associated", "RNF53, BRCC1")
        .gene(1101, "BRCA2", "BRCA2 DNA repair associated", "FANCD1")
        .gene(11998, "TP53", "tumor protein p53", "LFS1")
        .gene(795, "ATM", "ATM serine/threonine kinase", "TEL1")
        .variant(BRCA1_VARIANT, Some("BRCA1"), "NC_000017.11:g.43045712T>C")
        .variant(BRCA1_SECOND_VARIANT, Some("BRCA1"), "NC_000017.11:g.43045713G>A")
        .variant(BRCA2_VARIANT, Some("BRCA2"), "NC_000013.11:g.32315474G>T")
        .variant(TP53_VARIANT, Some("TP53"), "NC_000017.11:g.7675088C>T")
        .variant(ORPHAN_VARIANT, None, "NC_000011.10:g.108227827A>G")
        .transcript(BRCA1_TRANSCRIPT, &[BRCA1_VARIANT])
        .transcript(BRCA2_TRANSCRIPT, &[BRCA2_VARIANT])
        .transcript(TP53_TRANSCRIPT, &[TP53_VARIANT])
        .aa_change("p.Cys61Gly", "C61G", &[BRCA1_TRANSCRIPT], Some("BRCA1"))
        .aa_change("p.Arg175His", "R175H", &[TP53_TRANSCRIPT], Some("TP53"))
        .gene_note("BRCA1", "hereditary breast and ovarian cancer")
        .aa_note("TP53", "R175H", "DNA-binding domain hotspot")
}

// ---------------------------------------------------------------------------
// Upload corpora
// ---------------------------------------------------------------------------

/// HGNC nomenclature export (tab separated).
pub const HGNC_TSV: &str = "\
HGNC ID\tApproved symbol\tApproved name\tStatus\tLocus type\tLocus group\tPrevious symbols\tAlias symbols\tChromosome\tDate approved\tNCBI Gene ID\n\
HGNC:1100\tBRCA1\tBRCA1 DNA repair associated\tApproved\tgene with protein product\tprotein-coding gene\t\tRNF53, BRCC1\t17q21.31\t1989-06-30\t672\n\
HGNC:1101\tBRCA2\tBRCA2 DNA repair associated\tApproved\tgene with protein product\tprotein-coding gene\tFANCD1\tFAD, FACD\t13q13.1\t1995-01-01\t675\n\
11998\tTP53\ttumor protein p53\tApproved\tgene with protein product\tprotein-coding gene\t\tLFS1\t17p13.1\t1986-01-01\t7157\n\
HGNC:\tBROKEN\tno id\tApproved\t\t\t\t\t1\t\t\n";

/// Variant catalogue. The last row names a gene that does not exist.
pub const VARIANTS_CSV: &str = "\
CPRA,Gene,Transcript,HGVSg,RefSeq HGVSg,HGVSp,Protein change\n\
chr17:43045712:T:C,BRCA1,ENST00000357654;ENST00000471181,NC_000017.11:g.43045712T>C,NM_007294.4:c.181T>G,p.Cys61Gly,C61G\n\
13:32315474:G:T,BRCA2,ENST00000380152,NC_000013.11:g.32315474G>T,,,\n\
1:100:A:G,NOPE1,ENST00000000001,,,,\n";

/// ANNOVAR multianno output. The second row's variant is not in the store.
pub const ANNOVAR_CSV: &str = "\
Chr,Start,End,Ref,Alt,Func.refGene,Gene.refGene,ExonicFunc.refGene,SIFT_score,CADD_phred,CLNSIG\n\
chr17,43045712,43045712,T,C,exonic,BRCA1,nonsynonymous SNV,0.01,25.3,Pathogenic\n\
chr1,999,999,A,G,intronic,XYZ,.,.,.,.\n";

/// The same variant as [`ANNOVAR_CSV`] with an updated CADD score.
pub const ANNOVAR_CSV_UPDATED: &str = "\
Chr,Start,End,Ref,Alt,Func.refGene,CADD_phred\n\
chr17,43045712,43045712,T,C,exonic,27.1\n";

/// Gene annotations. The second row names an unknown gene.
pub const GENE_NOTES_CSV: &str = "\
Gene symbol,Annotation,Priority,User\n\
brca1,Founder mutation hotspot,10,alice\n\
XYZ1,orphan note,,\n";

/// Amino-acid change annotations. The second row names an unknown change.
pub const AA_NOTES_CSV: &str = "\
Gene,AA short name,Comment\n\
BRCA2,C61G,RING domain\n\
BRCA2,Z999Z,does not exist\n";

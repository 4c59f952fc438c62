//! Column-name resolution.
//!
//! Spreadsheet headers arrive in whatever spelling the producing tool used
//! (`Func.refGene`, `Approved symbol`, `HGNC ID`, ...). Each header is
//! normalised once, then looked up in a static alias table. A normalised
//! header that already is a canonical name maps to itself. Resolution runs
//! once per sheet; rows are then read by canonical name through a
//! [`ColumnMap`].

use crowdseq_core::annovar::ANNOVAR_FIELDS;
use phf::phf_map;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Canonical names outside the ANNOVAR table
// ---------------------------------------------------------------------------

pub const CHROM_POS_REF_ALT: &str = "chrom_pos_ref_alt";
pub const CHR: &str = "chr";
pub const START: &str = "start";
pub const END: &str = "end";
pub const REF: &str = "ref";
pub const ALT: &str = "alt";

pub const HGNC_GENE_ID: &str = "hgnc_gene_id";
pub const APPROVED_SYMBOL: &str = "approved_symbol";
pub const APPROVED_NAME: &str = "approved_name";
pub const STATUS: &str = "status";
pub const LOCUS_TYPE: &str = "locus_type";
pub const LOCUS_GROUP: &str = "locus_group";
pub const PREVIOUS_SYMBOLS: &str = "previous_symbols";
pub const PREVIOUS_NAME: &str = "previous_name";
pub const ALIAS_SYMBOLS: &str = "alias_symbols";
pub const ALIAS_NAMES: &str = "alias_names";
pub const CHROMOSOME: &str = "chromosome";
pub const DATE_APPROVED: &str = "date_approved";
pub const GENE_GROUP_NAME: &str = "gene_group_name";
pub const ENSEMBL_GENE_ID: &str = "ensembl_gene_id";
pub const NCBI_GENE_ID: &str = "ncbi_gene_id";
pub const REFSEQ_IDS: &str = "refseq_ids";
pub const UNIPROT_ID: &str = "uniprot_id";
pub const OMIM_ID: &str = "omim_id";

pub const GENE_SYMBOL: &str = "gene_symbol";
pub const HGVSG_ID: &str = "hgvsg_id";
pub const ALT_HGVSG_ID: &str = "alt_hgvsg_id";
pub const REFSEQ_HGVSG_ID: &str = "refseq_hgvsg_id";
pub const LRG_HGVSG_ID: &str = "lrg_hgvsg_id";
pub const ALT_CHR: &str = "alt_chr";
pub const ALT_CHROM_POS_REF_ALT: &str = "alt_chrom_pos_ref_alt";
pub const ENSEMBL_TRANSCRIPT_ID: &str = "ensembl_transcript_id";
pub const AA_LONG_NAME: &str = "aa_long_name";
pub const AA_SHORT_NAME: &str = "aa_short_name";

pub const ANNOTATION: &str = "annotation";
pub const PRIORITY: &str = "priority";
pub const USER: &str = "user";

const CANONICAL: &[&str] = &[
    CHROM_POS_REF_ALT, CHR, START, END, REF, ALT,
    HGNC_GENE_ID, APPROVED_SYMBOL, APPROVED_NAME, STATUS, LOCUS_TYPE, LOCUS_GROUP,
    PREVIOUS_SYMBOLS, PREVIOUS_NAME, ALIAS_SYMBOLS, ALIAS_NAMES, CHROMOSOME, DATE_APPROVED,
    GENE_GROUP_NAME, ENSEMBL_GENE_ID, NCBI_GENE_ID, REFSEQ_IDS, UNIPROT_ID, OMIM_ID,
    GENE_SYMBOL, HGVSG_ID, ALT_HGVSG_ID, REFSEQ_HGVSG_ID, LRG_HGVSG_ID, ALT_CHR,
    ALT_CHROM_POS_REF_ALT, ENSEMBL_TRANSCRIPT_ID, AA_LONG_NAME, AA_SHORT_NAME,
    ANNOTATION, PRIORITY, USER,
];

// ---------------------------------------------------------------------------
// Alias table (normalised external header → canonical name)
// ---------------------------------------------------------------------------

static ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    // Locus
    "chrom" => CHR,
    "chromosome_name" => CHR,
    "pos" => START,
    "position" => START,
    "start_pos" => START,
    "end_pos" => END,
    "ref_allele" => REF,
    "reference" => REF,
    "alt_allele" => ALT,
    "alternate" => ALT,
    "cpra" => CHROM_POS_REF_ALT,
    "variant" => CHROM_POS_REF_ALT,
    "locus" => CHROM_POS_REF_ALT,

    // HGNC export
    "hgnc_id" => HGNC_GENE_ID,
    "hgnc" => HGNC_GENE_ID,
    "symbol" => APPROVED_SYMBOL,
    "name" => APPROVED_NAME,
    "previous_name_s" => PREVIOUS_NAME,
    "previous_names" => PREVIOUS_NAME,
    "synonyms" => ALIAS_SYMBOLS,
    "alias_name_s" => ALIAS_NAMES,
    "gene_group" => GENE_GROUP_NAME,
    "gene_group_name_s" => GENE_GROUP_NAME,
    "ensembl_id_supplied_by_ensembl" => ENSEMBL_GENE_ID,
    "ensembl_gene_id_supplied_by_ensembl" => ENSEMBL_GENE_ID,
    "ncbi_gene_id_supplied_by_ncbi" => NCBI_GENE_ID,
    "entrez_gene_id" => NCBI_GENE_ID,
    "entrez_id" => NCBI_GENE_ID,
    "refseq_accession" => REFSEQ_IDS,
    "refseq_ids_supplied_by_ncbi" => REFSEQ_IDS,
    "uniprot_id_supplied_by_uniprot" => UNIPROT_ID,
    "uniprot_ids_supplied_by_uniprot" => UNIPROT_ID,
    "omim_id_supplied_by_omim" => OMIM_ID,

    // Variant catalogue
    "gene" => GENE_SYMBOL,
    "hgnc_symbol" => GENE_SYMBOL,
    "hgvsg" => HGVSG_ID,
    "hgvs_g" => HGVSG_ID,
    "alt_hgvsg" => ALT_HGVSG_ID,
    "refseq_hgvsg" => REFSEQ_HGVSG_ID,
    "lrg_hgvsg" => LRG_HGVSG_ID,
    "transcript" => ENSEMBL_TRANSCRIPT_ID,
    "transcripts" => ENSEMBL_TRANSCRIPT_ID,
    "feature" => ENSEMBL_TRANSCRIPT_ID,
    "aa_change" => AA_LONG_NAME,
    "amino_acid_change" => AA_LONG_NAME,
    "hgvsp" => AA_LONG_NAME,
    "aa_short" => AA_SHORT_NAME,
    "protein_change" => AA_SHORT_NAME,
    "amino_acid_short_name" => AA_SHORT_NAME,

    // Annotation sheets
    "comment" => ANNOTATION,
    "interpretation" => ANNOTATION,
    "note" => ANNOTATION,
    "curator" => USER,
    "username" => USER,

    // ANNOVAR output headers whose normalised form differs from ours
    "func_refgene" => "func_ref_gene",
    "gene_refgene" => "gene_ref_gene",
    "genedetail_refgene" => "gene_detail_ref_gene",
    "exonicfunc_refgene" => "exonic_func_ref_gene",
    "aachange_refgene" => "aa_change_ref_gene",
    "genomicsuperdups" => "genomic_super_dups",
    "exac_all" => "ex_ac_all",
    "avsnp150" => "avsnp_150",
    "cosmic91_coding" => "cosmic_91_coding",
    "cosmic91_noncoding" => "cosmic_91_noncoding",
    "polyphen2_hdiv_score" => "polyphen_2_hdiv_score",
    "polyphen2_hdiv_rankscore" => "polyphen_2_hdiv_rankscore",
    "polyphen2_hdiv_pred" => "polyphen_2_hdiv_pred",
    "polyphen2_hvar_score" => "polyphen_2_hvar_score",
    "polyphen2_hvar_rankscore" => "polyphen_2_hvar_rankscore",
    "polyphen2_hvar_pred" => "polyphen_2_hvar_pred",
    "mutationtaster_score" => "mutation_taster_score",
    "mutationtaster_converted_rankscore" => "mutation_taster_converted_rankscore",
    "mutationtaster_pred" => "mutation_taster_pred",
    "mutationassessor_score" => "mutation_assessor_score",
    "mutationassessor_score_rankscore" => "mutation_assessor_score_rankscore",
    "mutationassessor_pred" => "mutation_assessor_pred",
    "vest3_score" => "vest_3_score",
    "vest3_rankscore" => "vest_3_rankscore",
    "metasvm_score" => "meta_svm_score",
    "metasvm_rankscore" => "meta_svm_rankscore",
    "metasvm_pred" => "meta_svm_pred",
    "metalr_score" => "meta_lr_score",
    "metalr_rankscore" => "meta_lr_rankscore",
    "metalr_pred" => "meta_lr_pred",
    "mutpred_score" => "mut_pred_score",
    "mutpred_rankscore" => "mut_pred_rankscore",
    "genocanyon_score" => "geno_canyon_score",
    "genocanyon_score_rankscore" => "geno_canyon_score_rankscore",
    "integrated_fitcons_score" => "integrated_fit_cons_score",
    "integrated_fitcons_score_rankscore" => "integrated_fit_cons_score_rankscore",
    "phylop100way_vertebrate" => "phylo_p_100_way_vertebrate",
    "phylop100way_vertebrate_rankscore" => "phylo_p_100_way_vertebrate_rankscore",
    "phylop20way_mammalian" => "phylo_p_20_way_mammalian",
    "phylop20way_mammalian_rankscore" => "phylo_p_20_way_mammalian_rankscore",
    "phastcons100way_vertebrate" => "phast_cons_100_way_vertebrate",
    "phastcons100way_vertebrate_rankscore" => "phast_cons_100_way_vertebrate_rankscore",
    "phastcons20way_mammalian" => "phast_cons_20_way_mammalian",
    "phastcons20way_mammalian_rankscore" => "phast_cons_20_way_mammalian_rankscore",
    "siphy_29way_logodds" => "si_phy_29_way_log_odds",
    "siphy_29way_logodds_rankscore" => "si_phy_29_way_log_odds_rankscore",
    "gtex_v6p_gene" => "gt_ex_v_6_p_gene",
    "gtex_v6p_tissue" => "gt_ex_v_6_p_tissue",
    "cadd16gt10" => "cadd_16_gt_10",
    "nci60" => "nci_60",
};

fn non_alnum() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"))
}

/// Lowercase, collapse runs of non-alphanumerics to `_`, trim `_` at both ends.
pub fn normalize_header(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    non_alnum()
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// Canonical name for a raw header, if it is one we read.
pub fn canonical(raw: &str) -> Option<&'static str> {
    let norm = normalize_header(raw);
    if let Some(name) = ALIASES.get(norm.as_str()) {
        return Some(name);
    }
    CANONICAL
        .iter()
        .chain(ANNOVAR_FIELDS.iter())
        .find(|name| **name == norm)
        .copied()
}

// ---------------------------------------------------------------------------
// Per-sheet resolution
// ---------------------------------------------------------------------------

/// Canonical name → column index for one sheet. The first header that
/// resolves to a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    index: HashMap<&'static str, usize>,
}

impl ColumnMap {
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(name) = canonical(header.as_ref()) {
                index.entry(name).or_insert(i);
            }
        }
        Self { index }
    }

    pub fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn has_all(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.has(n))
    }

    /// Trimmed, non-empty cell value of `name` in `row`.
    pub fn get<'r>(&self, row: &'r [String], name: &str) -> Option<&'r str> {
        let i = *self.index.get(name)?;
        row.get(i).map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    /// Resolved ANNOVAR columns, in canonical order.
    pub fn annovar_fields(&self) -> Vec<&'static str> {
        ANNOVAR_FIELDS
            .iter()
            .copied()
            .filter(|f| self.has(f))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

//! Canonical column names of the ANNOVAR prediction table.
//!
//! The `annovar_data` schema, the record decoder, and the importer's column
//! resolution are all generated from this one list.

pub const ANNOVAR_FIELDS: &[&str] = &[
    "func_ref_gene",
    "gene_ref_gene",
    "gene_detail_ref_gene",
    "exonic_func_ref_gene",
    "aa_change_ref_gene",
    "genomic_super_dups",
    "ex_ac_all",
    "gnomad_exome_af_popmax",
    "gnomad_genome_af",
    "avsnp_150",
    "cosmic_91_coding",
    "cosmic_91_noncoding",
    "sift_score",
    "sift_converted_rankscore",
    "sift_pred",
    "polyphen_2_hdiv_score",
    "polyphen_2_hdiv_rankscore",
    "polyphen_2_hdiv_pred",
    "polyphen_2_hvar_score",
    "polyphen_2_hvar_rankscore",
    "polyphen_2_hvar_pred",
    "lrt_score",
    "lrt_converted_rankscore",
    "lrt_pred",
    "mutation_taster_score",
    "mutation_taster_converted_rankscore",
    "mutation_taster_pred",
    "mutation_assessor_score",
    "mutation_assessor_score_rankscore",
    "mutation_assessor_pred",
    "fathmm_score",
    "fathmm_converted_rankscore",
    "fathmm_pred",
    "provean_score",
    "provean_converted_rankscore",
    "provean_pred",
    "vest_3_score",
    "vest_3_rankscore",
    "meta_svm_score",
    "meta_svm_rankscore",
    "meta_svm_pred",
    "meta_lr_score",
    "meta_lr_rankscore",
    "meta_lr_pred",
    "m_cap_score",
    "m_cap_rankscore",
    "m_cap_pred",
    "revel_score",
    "revel_rankscore",
    "mut_pred_score",
    "mut_pred_rankscore",
    "cadd_raw",
    "cadd_raw_rankscore",
    "cadd_phred",
    "dann_score",
    "dann_rankscore",
    "fathmm_mkl_coding_score",
    "fathmm_mkl_coding_rankscore",
    "fathmm_mkl_coding_pred",
    "eigen_coding_or_noncoding",
    "eigen_raw",
    "eigen_pc_raw",
    "geno_canyon_score",
    "geno_canyon_score_rankscore",
    "integrated_fit_cons_score",
    "integrated_fit_cons_score_rankscore",
    "integrated_confidence_value",
    "gerp_rs",
    "gerp_rs_rankscore",
    "phylo_p_100_way_vertebrate",
    "phylo_p_100_way_vertebrate_rankscore",
    "phylo_p_20_way_mammalian",
    "phylo_p_20_way_mammalian_rankscore",
    "phast_cons_100_way_vertebrate",
    "phast_cons_100_way_vertebrate_rankscore",
    "phast_cons_20_way_mammalian",
    "phast_cons_20_way_mammalian_rankscore",
    "si_phy_29_way_log_odds",
    "si_phy_29_way_log_odds_rankscore",
    "interpro_domain",
    "gt_ex_v_6_p_gene",
    "gt_ex_v_6_p_tissue",
    "cadd_16_gt_10",
    "nci_60",
    "clnalleleid",
    "clndn",
    "clndisdb",
    "clnrevstat",
    "clnsig",
];

/// Whether `name` is one of the canonical ANNOVAR columns.
pub fn is_annovar_field(name: &str) -> bool {
    ANNOVAR_FIELDS.contains(&name)
}

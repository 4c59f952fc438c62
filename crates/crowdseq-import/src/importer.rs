//! Row-by-row bulk import.
//!
//! Each sheet is classified once from its resolved columns, then every data
//! row is written in its own transaction. A row that cannot be mapped onto
//! existing entities produces one [`Feedback`] entry and no write; the import
//! carries on with the next row. Only store failures abort, and rows written
//! before the failure stay committed.

use crate::columns::{self as col, ColumnMap};
use crate::error::Result;
use crate::sheet::{self, Sheet};
use chrono::{Duration, NaiveDate};
use crowdseq_core::store::Writer;
use crowdseq_core::{Cpra, NewAnnotation, NewGene, NewTranscript, NewVariant, Store};
use serde::Serialize;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One row (or sheet) that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub sheet: String,
    pub row_value: String,
    pub issue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub message: String,
    pub feedback: Vec<Feedback>,
}

// ---------------------------------------------------------------------------
// Sheet classification
// ---------------------------------------------------------------------------

/// What a sheet holds, inferred from its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    /// ANNOVAR predictions for already known variants.
    Annovar,
    /// HGNC nomenclature export.
    Genes,
    /// Curator notes on genes or amino-acid changes.
    Annotations,
    /// Variant catalogue: loci with their gene, transcripts and protein change.
    Variants,
}

impl SheetKind {
    pub fn detect(columns: &ColumnMap) -> Option<Self> {
        let has_locus = has_locus(columns);
        if has_locus && !columns.annovar_fields().is_empty() {
            Some(SheetKind::Annovar)
        } else if columns.has(col::HGNC_GENE_ID) {
            Some(SheetKind::Genes)
        } else if columns.has_all(&[col::ANNOTATION, col::GENE_SYMBOL]) {
            Some(SheetKind::Annotations)
        } else if has_locus {
            Some(SheetKind::Variants)
        } else {
            None
        }
    }
}

fn has_locus(columns: &ColumnMap) -> bool {
    columns.has(col::CHROM_POS_REF_ALT) || columns.has_all(&[col::CHR, col::START, col::REF, col::ALT])
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

/// Result of one row: written, or an issue keyed by the row's identifying value.
enum RowOutcome {
    Written,
    Issue { row_value: String, issue: String },
}

impl RowOutcome {
    fn issue(row_value: impl Into<String>, issue: impl Into<String>) -> Self {
        RowOutcome::Issue {
            row_value: row_value.into(),
            issue: issue.into(),
        }
    }
}

pub struct Importer<'a> {
    store: &'a Store,
    default_priority: i64,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a Store, default_priority: i64) -> Self {
        Self {
            store,
            default_priority,
        }
    }

    /// Load `bytes` as `file_name` and import every sheet.
    pub fn import_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<ImportReport> {
        let sheets = sheet::load(file_name, bytes)?;
        self.import_sheets(&sheets)
    }

    pub fn import_sheets(&self, sheets: &[Sheet]) -> Result<ImportReport> {
        let mut feedback = Vec::new();
        let mut written = 0usize;
        let mut recognised = 0usize;

        for sheet in sheets {
            let columns = ColumnMap::resolve(sheet.headers.as_slice());
            let Some(kind) = SheetKind::detect(&columns) else {
                warn!(sheet = %sheet.name, "sheet not recognised, skipping");
                feedback.push(Feedback {
                    sheet: sheet.name.clone(),
                    row_value: String::new(),
                    issue: "columns do not match any known sheet layout".to_string(),
                });
                continue;
            };
            recognised += 1;
            debug!(sheet = %sheet.name, ?kind, rows = sheet.rows.len(), "importing sheet");

            for (i, row) in sheet.rows.iter().enumerate() {
                match self.import_row(kind, &columns, row, i)? {
                    RowOutcome::Written => written += 1,
                    RowOutcome::Issue { row_value, issue } => {
                        warn!(sheet = %sheet.name, row_value = %row_value, issue = %issue, "row skipped");
                        feedback.push(Feedback {
                            sheet: sheet.name.clone(),
                            row_value,
                            issue,
                        });
                    }
                }
            }
        }

        let message = format!(
            "Imported {written} row(s) from {recognised} of {} sheet(s); {} issue(s) reported",
            sheets.len(),
            feedback.len()
        );
        info!(written, sheets = sheets.len(), feedback = feedback.len(), "import finished");
        Ok(ImportReport { message, feedback })
    }

    fn import_row(
        &self,
        kind: SheetKind,
        columns: &ColumnMap,
        row: &[String],
        index: usize,
    ) -> Result<RowOutcome> {
        let outcome = self.store.write(|w| {
            Ok(match kind {
                SheetKind::Annovar => annovar_row(w, columns, row, index)?,
                SheetKind::Genes => gene_row(w, columns, row, index)?,
                SheetKind::Annotations => annotation_row(w, columns, row, index, self.default_priority)?,
                SheetKind::Variants => variant_row(w, columns, row, index)?,
            })
        })?;
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Row handlers
// ---------------------------------------------------------------------------

type RowResult = crowdseq_core::Result<RowOutcome>;

/// Human row label for rows without an identifying value. Row 1 is the header.
fn row_label(index: usize) -> String {
    format!("row {}", index + 2)
}

/// The row's locus, from either a combined column or the four ANNOVAR columns.
fn locus(columns: &ColumnMap, row: &[String]) -> Option<(String, Option<Cpra>)> {
    if let Some(raw) = columns.get(row, col::CHROM_POS_REF_ALT) {
        return Some((raw.to_string(), raw.parse().ok()));
    }
    let chr = columns.get(row, col::CHR)?;
    let start = columns.get(row, col::START)?;
    let ref_allele = columns.get(row, col::REF)?;
    let alt_allele = columns.get(row, col::ALT)?;
    let raw = format!("{chr}:{start}:{ref_allele}:{alt_allele}");
    let parsed = Cpra::from_parts(chr, start, ref_allele, alt_allele).ok();
    Some((raw, parsed))
}

fn annovar_row(w: &Writer<'_>, columns: &ColumnMap, row: &[String], index: usize) -> RowResult {
    let Some((raw, parsed)) = locus(columns, row) else {
        return Ok(RowOutcome::issue(row_label(index), "no variant locus"));
    };
    let Some(cpra) = parsed else {
        return Ok(RowOutcome::issue(raw, "malformed variant locus"));
    };
    let key = cpra.to_string();
    let Some(variant) = w.variant_by_cpra(&key)? else {
        return Ok(RowOutcome::issue(key, "variant does not exist"));
    };

    let fields: Vec<(&str, String)> = columns
        .annovar_fields()
        .into_iter()
        .filter_map(|name| columns.get(row, name).map(|v| (name, v.to_string())))
        .collect();
    let write = w.upsert_annovar(variant.id, &fields)?;
    debug!(variant = %key, created = write.created, fields = fields.len(), "annovar record written");
    Ok(RowOutcome::Written)
}

fn gene_row(w: &Writer<'_>, columns: &ColumnMap, row: &[String], index: usize) -> RowResult {
    let Some(raw_id) = columns.get(row, col::HGNC_GENE_ID) else {
        return Ok(RowOutcome::issue(row_label(index), "no HGNC id"));
    };
    let Some(hgnc_gene_id) = parse_hgnc_id(raw_id) else {
        return Ok(RowOutcome::issue(raw_id, "malformed HGNC id"));
    };

    let text = |name: &str| columns.get(row, name).map(str::to_string);
    let required = |name: &str| text(name).unwrap_or_default();
    let gene = NewGene {
        hgnc_gene_id,
        approved_symbol: text(col::APPROVED_SYMBOL),
        approved_name: text(col::APPROVED_NAME),
        alias_symbols: text(col::ALIAS_SYMBOLS),
        alias_names: text(col::ALIAS_NAMES),
        previous_symbols: text(col::PREVIOUS_SYMBOLS),
        previous_name: text(col::PREVIOUS_NAME),
        chromosome: required(col::CHROMOSOME),
        locus_group: required(col::LOCUS_GROUP),
        locus_type: required(col::LOCUS_TYPE),
        status: required(col::STATUS),
        gene_group_name: text(col::GENE_GROUP_NAME),
        ensembl_gene_id: text(col::ENSEMBL_GENE_ID),
        ncbi_gene_id: columns.get(row, col::NCBI_GENE_ID).and_then(|v| v.parse().ok()),
        refseq_ids: text(col::REFSEQ_IDS),
        uniprot_id: text(col::UNIPROT_ID),
        omim_id: text(col::OMIM_ID),
        date_approved: columns.get(row, col::DATE_APPROVED).and_then(parse_date),
    };
    w.upsert_gene(&gene)?;
    Ok(RowOutcome::Written)
}

fn annotation_row(
    w: &Writer<'_>,
    columns: &ColumnMap,
    row: &[String],
    index: usize,
    default_priority: i64,
) -> RowResult {
    let Some(symbol) = columns.get(row, col::GENE_SYMBOL) else {
        return Ok(RowOutcome::issue(row_label(index), "no gene symbol"));
    };
    let Some(text) = columns.get(row, col::ANNOTATION) else {
        return Ok(RowOutcome::issue(symbol, "empty annotation"));
    };
    let Some(gene) = w.gene_by_symbol(symbol)? else {
        return Ok(RowOutcome::issue(symbol, "gene does not exist"));
    };

    let note = NewAnnotation {
        annotation: text.to_string(),
        priority: columns
            .get(row, col::PRIORITY)
            .and_then(|p| p.parse::<f64>().ok())
            .map(|p| p as i64)
            .unwrap_or(default_priority),
        user: columns.get(row, col::USER).map(str::to_string),
    };

    match columns.get(row, col::AA_SHORT_NAME) {
        Some(short_name) => {
            let Some(aa_change) = w.aa_change_by_short_name(short_name)? else {
                return Ok(RowOutcome::issue(
                    format!("{symbol} {short_name}"),
                    "amino acid change does not exist",
                ));
            };
            w.add_aa_annotation(gene.id, aa_change.id, &note)?;
        }
        None => {
            w.add_gene_annotation(gene.id, &note)?;
        }
    }
    Ok(RowOutcome::Written)
}

fn variant_row(w: &Writer<'_>, columns: &ColumnMap, row: &[String], index: usize) -> RowResult {
    let Some((raw, parsed)) = locus(columns, row) else {
        return Ok(RowOutcome::issue(row_label(index), "no variant locus"));
    };
    let Some(cpra) = parsed else {
        return Ok(RowOutcome::issue(raw, "malformed variant locus"));
    };
    let key = cpra.to_string();

    let gene_id = match columns.get(row, col::GENE_SYMBOL) {
        Some(symbol) => match w.gene_by_symbol(symbol)? {
            Some(gene) => Some(gene.id),
            None => return Ok(RowOutcome::issue(key, format!("gene {symbol} does not exist"))),
        },
        None => None,
    };

    let text = |name: &str| columns.get(row, name).unwrap_or_default().to_string();
    let alt_locus = columns
        .get(row, col::ALT_CHROM_POS_REF_ALT)
        .and_then(|v| v.parse::<Cpra>().ok());
    let variant = NewVariant {
        md5sum: cpra.md5sum(),
        chrom_pos_ref_alt: key.clone(),
        chr: cpra.chr.clone(),
        start_pos: cpra.pos,
        end_pos: cpra.end_pos(),
        ref_allele: cpra.ref_allele.clone(),
        alt_allele: cpra.alt_allele.clone(),
        gene_id,
        hgvsg_id: text(col::HGVSG_ID),
        alt_hgvsg_id: text(col::ALT_HGVSG_ID),
        refseq_hgvsg_id: text(col::REFSEQ_HGVSG_ID),
        lrg_hgvsg_id: columns.get(row, col::LRG_HGVSG_ID).map(str::to_string),
        alt_chr: columns
            .get(row, col::ALT_CHR)
            .map(str::to_string)
            .or_else(|| alt_locus.as_ref().map(|l| l.chr.clone()))
            .unwrap_or_default(),
        alt_chrom_pos_ref_alt: alt_locus.map(|l| l.to_string()).unwrap_or_default(),
    };
    let variant_id = w.upsert_variant(&variant)?;

    let mut transcript_ids = Vec::new();
    for ensembl_transcript_id in split_list(columns.get(row, col::ENSEMBL_TRANSCRIPT_ID)) {
        let transcript_id = w.upsert_transcript(&NewTranscript {
            ensembl_transcript_id: ensembl_transcript_id.to_string(),
            ..Default::default()
        })?;
        w.link_variant_transcript(variant_id, transcript_id)?;
        transcript_ids.push(transcript_id);
    }

    let long_name = columns.get(row, col::AA_LONG_NAME);
    let short_name = columns.get(row, col::AA_SHORT_NAME);
    if let Some(long_name) = long_name.or(short_name) {
        let aa_id = w.upsert_aa_change(long_name, short_name.unwrap_or(long_name))?;
        for &transcript_id in &transcript_ids {
            w.link_aa_change_transcript(aa_id, transcript_id)?;
        }
        if let Some(gene_id) = gene_id {
            w.link_aa_change_gene(aa_id, gene_id)?;
        }
    }
    Ok(RowOutcome::Written)
}

// ---------------------------------------------------------------------------
// Value parsing
// ---------------------------------------------------------------------------

/// `HGNC:1100` or `1100`.
pub fn parse_hgnc_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits = match raw.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("hgnc:") => &raw[5..],
        _ => raw,
    };
    digits.trim().parse().ok().filter(|id| *id > 0)
}

/// ISO `YYYY-MM-DD`, or a spreadsheet serial day number.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    let serial: f64 = raw.parse().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::days(serial as i64))
}

/// Comma- or semicolon-separated identifiers, trimmed, empties dropped.
fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn columns(headers: &[&str]) -> ColumnMap {
        ColumnMap::resolve(headers)
    }

    #[rstest]
    #[case(&["Chr", "Start", "End", "Ref", "Alt", "Func.refGene"], Some(SheetKind::Annovar))]
    #[case(&["chrom_pos_ref_alt", "CADD_phred"], Some(SheetKind::Annovar))]
    #[case(&["HGNC ID", "Approved symbol", "Status"], Some(SheetKind::Genes))]
    #[case(&["Gene", "Annotation", "Priority"], Some(SheetKind::Annotations))]
    #[case(&["Gene symbol", "AA short name", "Comment"], Some(SheetKind::Annotations))]
    #[case(&["CPRA", "Gene", "Transcript", "HGVSp"], Some(SheetKind::Variants))]
    #[case(&["Func.refGene", "SIFT_score"], None)]
    #[case(&["foo", "bar"], None)]
    fn sheet_kinds(#[case] headers: &[&str], #[case] expected: Option<SheetKind>) {
        assert_eq!(SheetKind::detect(&columns(headers)), expected);
    }

    #[rstest]
    #[case("HGNC:1100", Some(1100))]
    #[case("hgnc:5", Some(5))]
    #[case(" 1100 ", Some(1100))]
    #[case("HGNC:", None)]
    #[case("BRCA1", None)]
    #[case("0", None)]
    fn hgnc_ids(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_hgnc_id(raw), expected);
    }

    #[test]
    fn dates_from_iso_or_serial() {
        let expected = NaiveDate::from_ymd_opt(1989, 6, 30);
        assert_eq!(parse_date("1989-06-30"), expected);
        assert_eq!(parse_date("32689"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn lists_split_on_commas_and_semicolons() {
        let ids: Vec<_> = split_list(Some("ENST1, ENST2;;ENST3 ")).collect();
        assert_eq!(ids, vec!["ENST1", "ENST2", "ENST3"]);
        assert_eq!(split_list(None).count(), 0);
    }

    #[test]
    fn unrecognised_sheet_yields_one_feedback_entry() {
        let store = Store::open_in_memory().unwrap();
        let sheet = Sheet {
            name: "misc".into(),
            headers: vec!["foo".into()],
            rows: vec![vec!["a".into()], vec!["b".into()]],
        };
        let report = Importer::new(&store, 50).import_sheets(&[sheet]).unwrap();
        assert_eq!(report.feedback.len(), 1);
        assert_eq!(report.feedback[0].sheet, "misc");
    }
}

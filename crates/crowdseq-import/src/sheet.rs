//! Workbook and delimited-text loading.
//!
//! Every input becomes a list of [`Sheet`]s whose cells are plain strings.
//! The first non-empty row of each sheet is its header row.

use crate::error::{ImportError, Result};
use calamine::{open_workbook_auto_from_rs, DataType, Reader};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Workbook,
    Csv,
    Tsv,
}

impl Format {
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Format::Workbook),
            "csv" => Ok(Format::Csv),
            "tsv" | "txt" => Ok(Format::Tsv),
            _ => Err(ImportError::UnsupportedFormat(name.to_string())),
        }
    }
}

/// Load every sheet of `bytes`, interpreted according to `file_name`'s extension.
pub fn load(file_name: &str, bytes: &[u8]) -> Result<Vec<Sheet>> {
    let sheets = match Format::from_file_name(file_name)? {
        Format::Workbook => load_workbook(bytes)?,
        Format::Csv => vec![load_delimited(sheet_name(file_name), bytes, b',')?],
        Format::Tsv => vec![load_delimited(sheet_name(file_name), bytes, b'\t')?],
    };
    debug!(file = file_name, sheets = sheets.len(), "loaded input");
    Ok(sheets)
}

fn sheet_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

fn load_workbook(bytes: &[u8]) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let Some(range) = workbook.worksheet_range(&name) else {
            continue;
        };
        let range = range?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
        sheets.push(into_sheet(name, rows));
    }
    Ok(sheets)
}

fn load_delimited(name: String, bytes: &[u8], delimiter: u8) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(into_sheet(name, rows.into_iter()))
}

fn into_sheet(name: String, rows: impl Iterator<Item = Vec<String>>) -> Sheet {
    let mut rows = rows.skip_while(|row| row.iter().all(|c| c.trim().is_empty()));
    let headers = rows.next().unwrap_or_default();
    let rows = rows
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .collect();
    Sheet {
        name,
        headers,
        rows,
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Bool(b) => b.to_string(),
        DataType::Error(e) => format!("ERR({e:?})"),
        // Integral floats are how spreadsheets store ids and positions.
        DataType::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        DataType::Float(n) | DataType::Duration(n) => n.to_string(),
        DataType::Int(i) => i.to_string(),
        // Serial day number; the importer converts date columns itself.
        DataType::DateTime(f) => f.to_string(),
        DataType::DateTimeIso(s) | DataType::DurationIso(s) => s.clone(),
    }
}

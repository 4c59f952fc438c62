//! Failures that abort an import. Row-level problems are not errors; they
//! become [`Feedback`](crate::Feedback) entries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("unsupported file type: {0} (expected .xlsx, .xls, .ods, .csv or .tsv)")]
    UnsupportedFormat(String),

    #[error("could not read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("could not read delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Core(#[from] crowdseq_core::CoreError),
}

pub type Result<T> = std::result::Result<T, ImportError>;

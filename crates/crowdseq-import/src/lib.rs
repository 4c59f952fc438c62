//! crowdseq-import: spreadsheet-driven bulk import.
//!
//! ```text
//! bytes ──► sheet::load ──► ColumnMap (once per sheet) ──► SheetKind
//!                                                            │
//!                        Store::write (once per row) ◄───────┘
//! ```
//!
//! Row-level problems never abort an import; they are collected into the
//! [`ImportReport`] as [`Feedback`].

pub mod columns;
pub mod error;
pub mod importer;
pub mod sheet;

pub use columns::ColumnMap;
pub use error::{ImportError, Result};
pub use importer::{Feedback, ImportReport, Importer, SheetKind};
pub use sheet::{Format, Sheet};

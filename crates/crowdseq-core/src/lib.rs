//! crowdseq-core: entity model, store and federated search for the crowdseq
//! genomics reference API.
//!
//! # Architecture
//!
//! ```text
//! query ──► Tokenizer ──► Matcher (genes, aa changes, transcripts)
//!                                         │
//!                             Bridge ◄────┘
//!                               │
//!                     Matcher (variants) ──► Projector ──► Response shaper
//! ```
//!
//! The [`store::Store`] is the only component that touches SQLite. Search
//! composes [`query::Predicate`]s and hands each one to a single store query.

pub mod annovar;
pub mod config;
pub mod error;
pub mod locus;
pub mod projection;
pub mod query;
pub mod response;
pub mod search;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{CoreError, Result};
pub use locus::Cpra;
pub use response::{Page, PageRequest, PageWindow, SearchEnvelope, Section};
pub use search::{filter_terms, tokenize, ListingWindow, SearchEngine, SearchResults};
pub use store::Store;
pub use types::{
    AminoAcidAnnotation, AminoAcidChange, AnnovarData, Gene, GeneAnnotation, NewAnnotation,
    NewGene, NewTranscript, NewVariant, Transcript, Variant,
};

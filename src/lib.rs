//! crowdseq: genomics reference API.
//!
//! Stores curated gene, transcript, amino-acid-change and variant data and
//! serves federated search over it. This crate re-exports the member crates
//! so that integration tests and benches can import them from one place.
//!
//! # Architecture
//!
//! ```text
//! import ──► Store ◄── Search ──► Projector ──► HTTP / CLI
//! ```
//!
//! The store is a single SQLite database; every layer above it is synchronous
//! and the HTTP layer moves store work onto the blocking pool.

pub use crowdseq_api;
pub use crowdseq_core;
pub use crowdseq_import;

pub mod telemetry;

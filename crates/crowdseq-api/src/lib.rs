//! crowdseq-api: the HTTP surface.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /search` | [`handlers::search`] |
//! | `GET /variants` | [`handlers::list_variants`] |
//! | `GET /genes/symbol/{symbol}` | [`handlers::gene_by_symbol`] |
//! | `GET /variants/cpra/{chrom_pos_ref_alt}` | [`handlers::variant_by_cpra`] |
//! | `GET /amino_acid_changes/short_name/{name}` | [`handlers::aa_change_by_short_name`] |
//! | `POST /annotations/upload` | [`handlers::upload_annotations`] |
//!
//! Store access is synchronous and runs on the blocking pool.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ApiResult, ValidationErrors};
pub use state::{AppState, SharedState};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

pub fn router(state: SharedState) -> Router {
    let upload_limit = state.config.import.max_upload_bytes;
    Router::new()
        .route("/search", get(handlers::search))
        .route("/variants", get(handlers::list_variants))
        .route("/genes/symbol/{symbol}", get(handlers::gene_by_symbol))
        .route("/variants/cpra/{chrom_pos_ref_alt}", get(handlers::variant_by_cpra))
        .route(
            "/amino_acid_changes/short_name/{name}",
            get(handlers::aa_change_by_short_name),
        )
        .route(
            "/annotations/upload",
            post(handlers::upload_annotations).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: SharedState, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

//! Route handlers.

use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::state::SharedState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use crowdseq_core::projection::{AaChangeDetail, GeneDetail, Projector, VariantDetail, VariantWithRelations};
use crowdseq_core::query::Predicate;
use crowdseq_core::{
    Cpra, ListingWindow, Page, PageRequest, PageWindow, SearchEngine, SearchEnvelope, Variant,
};
use crowdseq_import::{Format, Importer};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

fn window(state: &SharedState, page: Option<u64>, page_size: Option<u64>) -> PageWindow {
    let pagination = &state.config.pagination;
    PageRequest { page, page_size }.resolve(pagination.page_size, pagination.max_page_size)
}

// ---------------------------------------------------------------------------
// Search and listings
// ---------------------------------------------------------------------------

/// `GET /search?query=&page=&page_size=`
pub async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchEnvelope>> {
    let window = window(&state, params.page, params.page_size);
    let query = params.query.unwrap_or_default();
    debug!(query = %query, page = window.page, "search");

    let envelope = state
        .blocking(move |store| {
            let listing = ListingWindow {
                limit: window.limit(),
                offset: window.offset(),
            };
            let results = SearchEngine::new(store).search_windowed(&query, Some(listing))?;
            SearchEnvelope::shape(store, results)
        })
        .await?;
    Ok(Json(envelope))
}

/// `GET /variants?search=&page=&page_size=`
pub async fn list_variants(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Page<VariantWithRelations>>> {
    let window = window(&state, params.page, params.page_size);
    let search = params.search.unwrap_or_default();
    debug!(search = %search, page = window.page, "list variants");

    let page = state
        .blocking(move |store| {
            let filter = SearchEngine::new(store)
                .listing_filter(&search)?
                .unwrap_or_else(Predicate::all);
            let count = store.count::<Variant>(&filter)?;
            let variants = store.find_page::<Variant>(&filter, window.limit(), window.offset())?;
            let results = Projector::new(store).variants_with_relations(variants)?;
            crowdseq_core::Result::Ok(Page::new(results, count, window))
        })
        .await?;
    Ok(Json(page))
}

// ---------------------------------------------------------------------------
// Detail lookups
// ---------------------------------------------------------------------------

/// `GET /genes/symbol/{symbol}`
pub async fn gene_by_symbol(
    State(state): State<SharedState>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<GeneDetail>> {
    let lookup = symbol.clone();
    let detail = state
        .blocking(move |store| match store.gene_by_symbol(&lookup)? {
            Some(gene) => Projector::new(store).gene_detail(gene).map(Some),
            None => Ok(None),
        })
        .await?;
    detail
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("gene {symbol} not found")))
}

/// `GET /variants/cpra/{chrom_pos_ref_alt}`
///
/// A well-formed locus is canonicalised first, so `chr17:...` finds `17:...`.
pub async fn variant_by_cpra(
    State(state): State<SharedState>,
    Path(cpra): Path<String>,
) -> ApiResult<Json<VariantDetail>> {
    let key = cpra
        .parse::<Cpra>()
        .map(|c| c.to_string())
        .unwrap_or_else(|_| cpra.clone());
    let detail = state
        .blocking(move |store| match store.variant_by_cpra(&key)? {
            Some(variant) => Projector::new(store).variant_detail(variant).map(Some),
            None => Ok(None),
        })
        .await?;
    detail
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("variant {cpra} not found")))
}

/// `GET /amino_acid_changes/short_name/{name}`
pub async fn aa_change_by_short_name(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<Json<AaChangeDetail>> {
    let lookup = name.clone();
    let detail = state
        .blocking(move |store| match store.aa_change_by_short_name(&lookup)? {
            Some(aa_change) => Projector::new(store).aa_change_detail(aa_change).map(Some),
            None => Ok(None),
        })
        .await?;
    detail
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("amino acid change {name} not found")))
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

const FILE_FIELD: &str = "file";

/// `POST /annotations/upload`, multipart with a `file` field.
pub async fn upload_annotations(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(invalid) => return Ok(invalid.into_response()),
    };
    let (file_name, bytes) = upload;
    info!(file = %file_name, bytes = bytes.len(), "annotation upload received");

    let priority = state.config.import.default_priority;
    let report = state
        .blocking(move |store| Importer::new(store, priority).import_bytes(&file_name, &bytes))
        .await?;
    Ok(Json(report).into_response())
}

/// The uploaded file's name and contents, or the validation failure to return.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(String, Vec<u8>), ValidationErrors> {
    let invalid = |message: String| ValidationErrors::field(FILE_FIELD, message);

    let mut multipart =
        multipart.map_err(|e| invalid(format!("Upload must be multipart/form-data: {e}")))?;

    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| invalid(format!("Could not read upload: {e}")))?;
        let Some(field) = field else {
            return Err(invalid("No file was submitted.".to_string()));
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(invalid("No file was submitted.".to_string()));
        }
        if let Err(e) = Format::from_file_name(&file_name) {
            return Err(invalid(e.to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| invalid(format!("Could not read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(invalid("The submitted file is empty.".to_string()));
        }
        return Ok((file_name, bytes.to_vec()));
    }
}

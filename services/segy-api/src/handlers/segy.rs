//! SEG-Y extraction handlers.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use serde_json::Value;
use tracing::{info, warn};

use extraction::{
    binary_header, extract_file, extract_folder, run_batch, text_header, write_batch_output, BatchRequest,
    ExtractionRequest, ExtractionResult,
};

use super::{required_path, run_blocking, FilePathQuery};
use crate::error::{status_for, ApiError, ApiResult};
use crate::state::AppState;

fn target_file(state: &AppState, requested: Option<String>) -> ApiResult<PathBuf> {
    match requested.filter(|p| !p.is_empty()) {
        Some(path) => Ok(PathBuf::from(path)),
        None => state
            .config
            .default_segy_file
            .clone()
            .ok_or_else(|| ApiError::input("file_path is required")),
    }
}

fn record_outcome(result: &ExtractionResult) {
    counter!("segy_extractions_total").increment(1);
    if result.is_failed() {
        counter!("segy_extraction_errors_total").increment(1);
    }
}

fn extraction_response(result: ExtractionResult) -> Response {
    record_outcome(&result);
    (status_for(result.error().kind), Json(result)).into_response()
}

async fn manual_read(state: Arc<AppState>, path: PathBuf, request: ExtractionRequest) -> Response {
    let limits = state.config.limits;
    match run_blocking(move || Ok(extract_file(&path, &request, &limits))).await {
        Ok(result) => extraction_response(result),
        Err(e) => e.into_response(),
    }
}

/// GET /api/segy_manual_read?file_path=
pub async fn manual_read_query_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FilePathQuery>,
) -> Response {
    let path = match target_file(&state, query.file_path) {
        Ok(path) => path,
        Err(e) => return e.into_response(),
    };
    manual_read(state, path, ExtractionRequest::default()).await
}

/// POST /api/segy_manual_read
pub async fn manual_read_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    let requested = body.get("file_path").and_then(Value::as_str).map(str::to_string);
    let path = match target_file(&state, requested) {
        Ok(path) => path,
        Err(e) => return e.into_response(),
    };
    let request = match ExtractionRequest::from_value(body) {
        Ok(request) => request,
        Err(e) => return ApiError::from(e).into_response(),
    };
    manual_read(state, path, request).await
}

/// POST /api/segy_extract_batch
pub async fn extract_batch_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let batch = BatchRequest::from_value(body)?;
    let limits = state.config.limits;
    let output = state.config.batch_output.clone();

    let results = run_blocking(move || {
        let results = run_batch(&batch, &limits)?;
        if let Err(e) = write_batch_output(&output, &results) {
            warn!(file = %output.display(), error = %e, "Failed to write batch output");
        }
        Ok(results)
    })
    .await?;

    let failed = results.values().filter(|entry| entry.error().is_fatal()).count();
    counter!("segy_extractions_total").increment(results.len() as u64);
    counter!("segy_extraction_errors_total").increment(failed as u64);
    info!(files = results.len(), failed, "Batch extraction complete");

    serde_json::to_value(results)
        .map(Json)
        .map_err(|e| ApiError::processing(e.to_string()))
}

/// POST /api/segy_extract_folder
pub async fn extract_folder_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Vec<ExtractionResult>>> {
    let folder = PathBuf::from(required_path(&body, "folder_path")?);
    let request = ExtractionRequest::from_value(body)?;
    let limits = state.config.limits;

    let results = run_blocking(move || Ok(extract_folder(&folder, &request, &limits)?)).await?;
    for result in &results {
        record_outcome(result);
    }
    Ok(Json(results))
}

/// GET /api/ebcdic_header?file_path=
pub async fn ebcdic_header_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FilePathQuery>,
) -> ApiResult<Json<Value>> {
    let path = target_file(&state, query.file_path)?;
    let header = run_blocking(move || Ok(text_header(&path)?)).await?;
    Ok(Json(serde_json::json!({ "ebcdic_header": header })))
}

/// GET /api/binary_header?file_path=
pub async fn binary_header_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<FilePathQuery>,
) -> ApiResult<Json<Value>> {
    let path = target_file(&state, query.file_path)?;
    let header = run_blocking(move || Ok(binary_header(&path)?)).await?;
    Ok(Json(serde_json::json!({ "binary_header": header })))
}

//! LAS well-log handlers.

use std::path::PathBuf;

use axum::Json;
use metrics::counter;
use serde_json::Value;

use extraction::las::{self, LasStatus};
use las_parser::{LasMetadata, LasSummary, WellReportResult};

use super::{required_path, run_blocking};
use crate::error::ApiResult;

fn las_path(body: &Value) -> ApiResult<PathBuf> {
    counter!("las_requests_total").increment(1);
    Ok(PathBuf::from(required_path(body, "file_path")?))
}

/// POST /api/las/metadata
pub async fn metadata_handler(Json(body): Json<Value>) -> ApiResult<Json<LasMetadata>> {
    let path = las_path(&body)?;
    let metadata = run_blocking(move || Ok(las::extract_metadata(&path)?)).await?;
    Ok(Json(metadata))
}

/// POST /api/las/summary
pub async fn summary_handler(Json(body): Json<Value>) -> ApiResult<Json<LasSummary>> {
    let path = las_path(&body)?;
    let summary = run_blocking(move || Ok(las::summary(&path)?)).await?;
    Ok(Json(summary))
}

/// POST /api/las/report
///
/// Read failures come back inside the report (`success: false`).
pub async fn report_handler(Json(body): Json<Value>) -> ApiResult<Json<WellReportResult>> {
    let path = las_path(&body)?;
    let report = run_blocking(move || Ok(las::report(&path))).await?;
    Ok(Json(report))
}

/// GET /api/las/status
pub async fn status_handler() -> Json<LasStatus> {
    Json(las::status())
}

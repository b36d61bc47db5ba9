//! Coordinate conversion handlers.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use metrics::counter;
use serde_json::Value;

use extraction::{convert_file, convert_files, ConversionBatch, ConversionRequest, ConversionResult, MultiConversionRequest};

use super::{decode, run_blocking};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/convert_coordinates
pub async fn convert_coordinates_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ConversionBatch>> {
    let request: MultiConversionRequest = decode(body)?;
    let limits = state.config.limits;
    let batch = run_blocking(move || Ok(convert_files(&request, &limits)?)).await?;
    counter!("coordinate_conversions_total").increment(batch.summary.successful_conversions as u64);
    Ok(Json(batch))
}

/// POST /api/convert_single_file
pub async fn convert_single_file_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ConversionResult>> {
    let request: ConversionRequest = decode(body)?;
    let limits = state.config.limits;
    let result = run_blocking(move || Ok(convert_file(&request, &limits)?)).await?;
    counter!("coordinate_conversions_total").increment(1);
    Ok(Json(result))
}

//! File info handler.

use std::path::PathBuf;

use axum::{extract::Query, Json};

use extraction::{file_info, FileInfo};

use super::{run_blocking, FilePathQuery};
use crate::error::{ApiError, ApiResult};

/// GET /api/file_info?file_path=
pub async fn file_info_handler(Query(query): Query<FilePathQuery>) -> ApiResult<Json<FileInfo>> {
    let path = query
        .file_path
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| ApiError::input("file_path is required"))?;
    let info = run_blocking(move || Ok(file_info(&path)?)).await?;
    Ok(Json(info))
}

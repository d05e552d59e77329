//! Change-history endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use roster_core::history::{Pagination, VersionComparison};
use roster_core::types::{EmployeeSummary, VersionEntry};

/// Query parameters for the history listing.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryData {
    pub employee: EmployeeSummary,
    pub history: Vec<VersionEntry>,
}

/// Response shape the timeline UI consumes: the employee summary and the
/// page of entries under `data`, the pagination block alongside it.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub data: HistoryData,
    pub pagination: Pagination,
}

/// List one page of an employee's change history, newest first.
/// GET /api/employees/:id/history
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let page = query.page.unwrap_or(1);
    let limit = state.config.clamp_page_size(query.limit);

    let result = state
        .service
        .history(id, page, limit)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(HistoryResponse {
        success: true,
        data: HistoryData {
            employee: result.employee,
            history: result.history,
        },
        pagination: result.pagination,
    }))
}

/// Query parameters for version comparison.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareQuery {
    pub version_id1: Uuid,
    pub version_id2: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub data: VersionComparison,
}

/// Fetch two versions of an employee side by side.
/// GET /api/employees/:id/history/compare
pub async fn compare_versions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CompareQuery>,
) -> ApiResult<Json<CompareResponse>> {
    let comparison = state
        .service
        .compare(id, query.version_id1, query.version_id2)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(CompareResponse {
        success: true,
        data: comparison,
    }))
}

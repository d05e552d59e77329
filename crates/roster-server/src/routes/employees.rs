//! Employee CRUD endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use roster_core::history::Pagination;
use roster_core::service::DEFAULT_ACTOR;
use roster_core::types::{
    EmployeeFilter, EmployeeRecord, EmployeeUpdate, EmploymentStatus, NewEmployee, StatsOverview,
};

/// Request body for creating an employee.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(flatten)]
    pub employee: NewEmployee,
    pub changed_by: Option<String>,
    pub change_reason: Option<String>,
}

/// Request body for updating an employee.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(flatten)]
    pub patch: EmployeeUpdate,
    pub changed_by: Option<String>,
    pub change_reason: Option<String>,
}

/// Optional request body for deleting an employee.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEmployeeRequest {
    pub changed_by: Option<String>,
    pub change_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub success: bool,
    pub data: EmployeeRecord,
}

#[derive(Debug, Serialize)]
pub struct ListEmployeesResponse {
    pub success: bool,
    pub data: Vec<EmployeeRecord>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: StatsOverview,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Create an employee.
/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    Json(request): Json<CreateEmployeeRequest>,
) -> ApiResult<Json<EmployeeResponse>> {
    let changed_by = request.changed_by.as_deref().unwrap_or(DEFAULT_ACTOR);
    let record = state
        .service
        .create(request.employee, changed_by, request.change_reason.as_deref())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(EmployeeResponse {
        success: true,
        data: record,
    }))
}

/// Query parameters for listing employees.
#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub department: Option<String>,
    pub status: Option<EmploymentStatus>,
    pub search: Option<String>,
}

/// List employees with filters and pagination.
/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> ApiResult<Json<ListEmployeesResponse>> {
    let page = query.page.unwrap_or(1);
    let limit = state.config.clamp_page_size(query.limit);
    let filter = EmployeeFilter {
        department: query.department,
        status: query.status,
        search: query.search,
    };

    let (records, total) = state
        .service
        .list(&filter, page, limit)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListEmployeesResponse {
        success: true,
        data: records,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit as u64),
        },
    }))
}

/// Get one employee.
/// GET /api/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EmployeeResponse>> {
    let record = state.service.get(id).await.map_err(ApiError::from)?;
    Ok(Json(EmployeeResponse {
        success: true,
        data: record,
    }))
}

/// Update an employee.
/// PUT /api/employees/:id
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<EmployeeResponse>> {
    let changed_by = request.changed_by.as_deref().unwrap_or(DEFAULT_ACTOR);
    let record = state
        .service
        .update(id, request.patch, changed_by, request.change_reason.as_deref())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(EmployeeResponse {
        success: true,
        data: record,
    }))
}

/// Soft-delete an employee.
/// DELETE /api/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    request: Option<Json<DeleteEmployeeRequest>>,
) -> ApiResult<Json<MessageResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let changed_by = request.changed_by.as_deref().unwrap_or(DEFAULT_ACTOR);

    state
        .service
        .delete(id, changed_by, request.change_reason.as_deref())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Employee deleted successfully".to_string(),
    }))
}

/// Aggregate counts for the dashboard.
/// GET /api/employees/stats/overview
pub async fn stats_overview(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    let stats = state.service.stats().await.map_err(ApiError::from)?;
    Ok(Json(StatsResponse {
        success: true,
        data: stats,
    }))
}

//! Employee API Handlers

use axum::{Json, extract::State};

use crate::api::{ApiJson, ApiPath, ApiQuery, ValidatedJson};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::employee;
use crate::services::hierarchy;
use crate::services::query::{SearchFilter, SortSpec};
use crate::utils::types::{ListParams, PageRequest, TreeParams};
use crate::utils::AppResult;
use shared::models::{
    Employee, EmployeeCreate, EmployeeData, EmployeeDetail, EmployeeUpdate, EmployeeView,
    ReassignResult, ReassignSubordinates, SupervisorUpdate, TreeNode,
};
use shared::types::Page;

/// Shared by the listing and the data dump
async fn query_page(state: &ServerState, params: ListParams) -> AppResult<Page<EmployeeView>> {
    let filter = params.q.as_deref().and_then(SearchFilter::parse);
    let sort = SortSpec::parse(params.sort.as_deref())?;
    let page = PageRequest::resolve(
        params.page,
        params.page_size,
        state.config.default_page_size,
        state.config.max_page_size,
    );
    Ok(employee::list(&state.pool, filter.as_ref(), sort, page).await?)
}

/// List / search / sort / paginate
pub async fn list(
    State(state): State<ServerState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> AppResult<Json<Page<EmployeeView>>> {
    Ok(Json(query_page(&state, params).await?))
}

/// Flat records for table widgets
pub async fn data(
    State(state): State<ServerState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> AppResult<Json<Page<EmployeeData>>> {
    let page = query_page(&state, params).await?;
    Ok(Json(page.map(EmployeeData::from)))
}

/// Supervisor tree; the whole forest unless `?root=` is given
pub async fn tree(
    State(state): State<ServerState>,
    ApiQuery(params): ApiQuery<TreeParams>,
) -> AppResult<Json<Vec<TreeNode>>> {
    Ok(Json(hierarchy::load_forest(&state.pool, params.root).await?))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<EmployeeDetail>> {
    Ok(Json(employee::find_detail(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    ValidatedJson(payload): ValidatedJson<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    let created = employee::create(&state.pool, payload).await?;
    tracing::info!(employee_id = created.id, operator = %current.username, "Employee created");
    Ok(Json(created))
}

pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<EmployeeUpdate>,
) -> AppResult<Json<Employee>> {
    let updated = employee::update(&state.pool, id, payload).await?;
    tracing::info!(employee_id = id, operator = %current.username, "Employee updated");
    Ok(Json(updated))
}

/// Delete; direct reports lose their supervisor
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<bool>> {
    let deleted = employee::delete(&state.pool, id).await?;
    tracing::info!(employee_id = id, operator = %current.username, "Employee deleted");
    Ok(Json(deleted))
}

/// Full transitive subtree, flat
pub async fn subordinates(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Vec<EmployeeView>>> {
    Ok(Json(hierarchy::subordinates(&state.pool, id).await?))
}

pub async fn update_supervisor(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiJson(payload): ApiJson<SupervisorUpdate>,
) -> AppResult<Json<Employee>> {
    let updated =
        hierarchy::update_supervisor(&state.pool, payload.employee_id, payload.supervisor_id)
            .await?;
    tracing::debug!(operator = %current.username, "Supervisor update applied");
    Ok(Json(updated))
}

pub async fn reassign_subordinates(
    State(state): State<ServerState>,
    current: CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<ReassignSubordinates>,
) -> AppResult<Json<ReassignResult>> {
    let moved = hierarchy::reassign_subordinates(&state.pool, id, payload.new_supervisor_id).await?;
    tracing::debug!(operator = %current.username, "Subordinate reassignment applied");
    Ok(Json(ReassignResult { moved }))
}

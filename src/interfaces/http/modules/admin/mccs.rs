//! Motor-control center administration
//!
//! Slugs are never taken from the client; storage derives them from the
//! name on every save.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{MccDto, MccRequest};
use crate::domain::motor_control_center::MotorControlCenter;
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/api/v1/mccs",
    tag = "Motor Control Centers",
    responses((status = 200, description = "All MCCs ordered by name", body = ApiResponse<Vec<MccDto>>)),
    security(("bearer_auth" = []))
)]
pub async fn list_mccs(State(state): State<AppState>) -> ApiResult<Vec<MccDto>> {
    let mccs = state.locator.mccs().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(mccs.iter().map(MccDto::from).collect())))
}

#[utoipa::path(
    get,
    path = "/admin/api/v1/mccs/{id}",
    tag = "Motor Control Centers",
    params(("id" = i32, Path, description = "MCC id")),
    responses(
        (status = 200, description = "MCC", body = ApiResponse<MccDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_mcc(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<MccDto> {
    let mcc = state.locator.mcc(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(MccDto::from(&mcc))))
}

#[utoipa::path(
    post,
    path = "/admin/api/v1/mccs",
    tag = "Motor Control Centers",
    request_body = MccRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<MccDto>),
        (status = 409, description = "An MCC with this name already exists"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_mcc(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<MccRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MccDto>>), ApiError> {
    let new = request
        .into_new()
        .map_err(|e| domain_error(DomainError::Invalid(e)))?;
    let mcc = state.locator.create_mcc(new).await.map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(MccDto::from(&mcc)))))
}

#[utoipa::path(
    put,
    path = "/admin/api/v1/mccs/{id}",
    tag = "Motor Control Centers",
    params(("id" = i32, Path, description = "MCC id")),
    request_body = MccRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<MccDto>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_mcc(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<MccRequest>,
) -> ApiResult<MccDto> {
    let new = request
        .into_new()
        .map_err(|e| domain_error(DomainError::Invalid(e)))?;
    let current = state.locator.mcc(id).await.map_err(domain_error)?;
    let mcc = state
        .locator
        .update_mcc(MotorControlCenter {
            name: new.name,
            substation_id: new.substation_id,
            ..current
        })
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(MccDto::from(&mcc))))
}

#[utoipa::path(
    delete,
    path = "/admin/api/v1/mccs/{id}",
    tag = "Motor Control Centers",
    params(("id" = i32, Path, description = "MCC id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Nodes still reference it")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_mcc(State(state): State<AppState>, Path(id): Path<i32>) -> ApiResult<EmptyData> {
    state.locator.delete_mcc(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

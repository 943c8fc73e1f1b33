//! Substation administration

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{SubstationDto, SubstationRequest};
use crate::domain::substation::Substation;
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/api/v1/substations",
    tag = "Substations",
    responses((status = 200, description = "All substations ordered by name", body = ApiResponse<Vec<SubstationDto>>)),
    security(("bearer_auth" = []))
)]
pub async fn list_substations(State(state): State<AppState>) -> ApiResult<Vec<SubstationDto>> {
    let substations = state
        .locator
        .substations_by_name()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        substations.iter().map(SubstationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/admin/api/v1/substations/{id}",
    tag = "Substations",
    params(("id" = i32, Path, description = "Substation id")),
    responses(
        (status = 200, description = "Substation", body = ApiResponse<SubstationDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_substation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<SubstationDto> {
    let substation = state.locator.substation(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SubstationDto::from(&substation))))
}

#[utoipa::path(
    post,
    path = "/admin/api/v1/substations",
    tag = "Substations",
    request_body = SubstationRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<SubstationDto>),
        (status = 409, description = "Slug already used"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_substation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SubstationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubstationDto>>), ApiError> {
    let new = request
        .into_new()
        .map_err(|e| domain_error(DomainError::Invalid(e)))?;
    let substation = state
        .locator
        .create_substation(new)
        .await
        .map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SubstationDto::from(&substation))),
    ))
}

#[utoipa::path(
    put,
    path = "/admin/api/v1/substations/{id}",
    tag = "Substations",
    params(("id" = i32, Path, description = "Substation id")),
    request_body = SubstationRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<SubstationDto>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_substation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<SubstationRequest>,
) -> ApiResult<SubstationDto> {
    let new = request
        .into_new()
        .map_err(|e| domain_error(DomainError::Invalid(e)))?;
    let substation = state
        .locator
        .update_substation(Substation {
            id,
            name: new.name,
            slug: new.slug,
            level: new.level,
        })
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SubstationDto::from(&substation))))
}

#[utoipa::path(
    delete,
    path = "/admin/api/v1/substations/{id}",
    tag = "Substations",
    params(("id" = i32, Path, description = "Substation id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Motor-control centers still reference it")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_substation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state
        .locator
        .delete_substation(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

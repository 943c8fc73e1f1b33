//! Account administration (superusers only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{parse_permissions, CreateUserRequest, PermissionsRequest};
use crate::domain::DomainError;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::{ensure_superuser, CurrentUser};
use crate::interfaces::http::modules::auth::UserInfo;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/admin/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All accounts", body = ApiResponse<Vec<UserInfo>>),
        (status = 403, description = "Superuser access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(State(state): State<AppState>, current: CurrentUser) -> ApiResult<Vec<UserInfo>> {
    ensure_superuser(&current)?;
    let users = state.accounts.list_users().await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(users.iter().map(UserInfo::from).collect())))
}

#[utoipa::path(
    post,
    path = "/admin/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserInfo>),
        (status = 403, description = "Superuser access required"),
        (status = 409, description = "Username taken"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    ensure_superuser(&current)?;
    let permissions = parse_permissions(&request.permissions)
        .map_err(|e| domain_error(DomainError::Invalid(e)))?;
    let user = state
        .accounts
        .create_user(
            request.username.trim(),
            &request.password,
            request.is_staff,
            request.is_superuser,
            permissions,
        )
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(UserInfo::from(&user)))))
}

/// Replace the account's permission set.
#[utoipa::path(
    put,
    path = "/admin/api/v1/users/{id}/permissions",
    tag = "Users",
    params(("id" = String, Path, description = "User id")),
    request_body = PermissionsRequest,
    responses(
        (status = 200, description = "Permissions replaced", body = ApiResponse<UserInfo>),
        (status = 403, description = "Superuser access required"),
        (status = 404, description = "Not found"),
        (status = 422, description = "Unknown permission")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_permissions(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<PermissionsRequest>,
) -> ApiResult<UserInfo> {
    ensure_superuser(&current)?;
    let permissions = parse_permissions(&request.permissions)
        .map_err(|e| domain_error(DomainError::Invalid(e)))?;
    let user = state
        .accounts
        .set_permissions(&id, permissions)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserInfo::from(&user))))
}

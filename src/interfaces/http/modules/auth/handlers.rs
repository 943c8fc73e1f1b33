//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use super::dto::{LoginRequest, LoginResponse, UserInfo};
use crate::domain::DomainError;
use crate::interfaces::http::common::{api_error, domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/admin/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account has no back-office access")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let session = match state.accounts.login(&request.username, &request.password).await {
        Ok(session) => session,
        Err(DomainError::Invalid(errors)) => {
            let message = errors
                .non_field()
                .first()
                .cloned()
                .unwrap_or_else(|| "Invalid credentials".to_string());
            return Err(api_error(StatusCode::UNAUTHORIZED, message));
        }
        Err(e) => return Err(domain_error(e)),
    };

    if !session.user.can_use_back_office() {
        warn!(username = %session.user.username, "Back-office login by non-staff account");
        return Err(api_error(StatusCode::FORBIDDEN, "Staff access required"));
    }

    Ok(Json(ApiResponse::success(LoginResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
        user: UserInfo::from(&session.user),
    })))
}

#[utoipa::path(
    get,
    path = "/admin/api/v1/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Signed-in account", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(current: CurrentUser) -> ApiResult<UserInfo> {
    match current.user() {
        Some(user) => Ok(Json(ApiResponse::success(UserInfo::from(user)))),
        None => Err(api_error(StatusCode::UNAUTHORIZED, "Not authenticated")),
    }
}

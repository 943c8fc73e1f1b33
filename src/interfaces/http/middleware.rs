//! Session resolution and access guards
//!
//! `session_middleware` runs on every request: it reads a JWT from the
//! `Authorization: Bearer` header or the `sessionid` cookie and stores the
//! resolved account as a [`CurrentUser`] extension. Guards then decide on
//! that extension alone.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error};

use crate::domain::user::{Permission, User};

use super::common::ApiResponse;
use super::state::AppState;
use super::views::ScreenError;

pub const SESSION_COOKIE: &str = "sessionid";

/// The signed-in account, if any
#[derive(Clone, Debug, Default)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn username(&self) -> Option<String> {
        self.0.as_ref().map(|u| u.username.clone())
    }

    /// Screen guard: anonymous users and users lacking `perm` get a 403.
    pub fn require(&self, perm: Permission) -> Result<&User, ScreenError> {
        match self.user() {
            Some(user) if user.has_perm(perm) => Ok(user),
            _ => {
                debug!(permission = %perm, "Permission denied");
                Err(ScreenError::Forbidden)
            }
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned().unwrap_or_default())
    }
}

fn bearer_token(request: &Request<Body>) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = bearer_token(&request).or_else(|| {
        CookieJar::from_headers(request.headers())
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
    });

    let user = match token {
        Some(token) => state.accounts.resolve_session(&token).await.unwrap_or_else(|e| {
            error!("Failed to resolve session: {}", e);
            None
        }),
        None => None,
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

fn auth_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

/// Back-office guard: active staff or superuser.
pub async fn require_staff(request: Request<Body>, next: Next) -> Response {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .unwrap_or_default();

    match current.user() {
        None => auth_error(StatusCode::UNAUTHORIZED, "Missing or invalid authentication token"),
        Some(user) if !user.can_use_back_office() => {
            auth_error(StatusCode::FORBIDDEN, "Staff access required")
        }
        Some(_) => next.run(request).await,
    }
}

/// User management is reserved for superusers.
pub fn ensure_superuser(current: &CurrentUser) -> Result<&User, (StatusCode, Json<ApiResponse<()>>)> {
    match current.user() {
        Some(user) if user.is_superuser && user.is_active => Ok(user),
        _ => Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Superuser access required")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;

    fn user(perms: &[Permission], staff: bool, superuser: bool) -> User {
        User {
            id: "u1".into(),
            username: "testuser".into(),
            password_hash: String::new(),
            is_active: true,
            is_staff: staff,
            is_superuser: superuser,
            permissions: perms.iter().copied().collect::<BTreeSet<_>>(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn require_checks_permission() {
        assert!(CurrentUser(None).require(Permission::ADD_NODE).is_err());

        let plain = CurrentUser(Some(user(&[], false, false)));
        assert!(plain.require(Permission::ADD_NODE).is_err());

        let granted = CurrentUser(Some(user(&[Permission::ADD_NODE], false, false)));
        assert!(granted.require(Permission::ADD_NODE).is_ok());
        assert!(granted.require(Permission::CHANGE_NODE).is_err());

        let root = CurrentUser(Some(user(&[], false, true)));
        assert!(root.require(Permission::VIEW_NODE).is_ok());
    }

    #[test]
    fn superuser_guard() {
        assert!(ensure_superuser(&CurrentUser(None)).is_err());
        assert!(ensure_superuser(&CurrentUser(Some(user(&[], true, false)))).is_err());
        assert!(ensure_superuser(&CurrentUser(Some(user(&[], true, true)))).is_ok());
    }
}

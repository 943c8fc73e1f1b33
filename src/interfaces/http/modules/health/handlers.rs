//! Liveness/readiness check

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub media_root: PathBuf,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
    pub media: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

impl ComponentHealth {
    fn ok(latency_ms: Option<u64>) -> Self {
        Self {
            status: "ok".to_string(),
            latency_ms,
        }
    }

    fn error() -> Self {
        Self {
            status: "error".to_string(),
            latency_ms: None,
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let database = match state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
    {
        Ok(_) => ComponentHealth::ok(Some(started.elapsed().as_millis() as u64)),
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            ComponentHealth::error()
        }
    };

    // Missing media root only means no label has been uploaded yet.
    let media = if state.media_root.is_dir() {
        ComponentHealth::ok(None)
    } else {
        ComponentHealth {
            status: "empty".to_string(),
            latency_ms: None,
        }
    };

    let (status, code) = if database.is_ok() {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
            media,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::migrated_db;

    #[tokio::test]
    async fn reports_ok_with_live_database() {
        let dir = tempfile::tempdir().unwrap();
        let state = HealthState {
            db: migrated_db().await,
            media_root: dir.path().to_path_buf(),
            started_at: Arc::new(Instant::now()),
        };
        let (code, Json(body)) = health_check(State(state)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.database.status, "ok");
        assert_eq!(body.media.status, "ok");
    }

    #[tokio::test]
    async fn reports_degraded_after_close() {
        let db = migrated_db().await;
        let state = HealthState {
            db: db.clone(),
            media_root: PathBuf::from("/nonexistent/media"),
            started_at: Arc::new(Instant::now()),
        };
        db.close().await.unwrap();
        let (code, Json(body)) = health_check(State(state)).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.media.status, "empty");
    }
}

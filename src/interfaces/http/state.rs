//! Router state
//!
//! One state for the whole router; module handlers that only need a slice
//! of it extract that slice via `FromRef`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

use crate::application::{AccountService, LocatorService};
use crate::infrastructure::MediaStore;

use super::modules::health::HealthState;

/// Request-handling settings taken from configuration
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cookie_secure: false,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub locator: Arc<LocatorService>,
    pub accounts: Arc<AccountService>,
    pub media: MediaStore,
    pub settings: HttpSettings,
    pub started_at: Arc<Instant>,
}

impl AppState {
    /// Remove a label image that a node stopped pointing at, unless
    /// another node still shows it. Call after the change is stored.
    pub async fn release_label(&self, label: Option<&str>) {
        let Some(label) = label else {
            return;
        };
        match self.locator.label_in_use(label).await {
            Ok(true) => debug!("Label image {} still referenced; kept", label),
            Ok(false) => {
                if let Err(e) = self.media.remove_label(label).await {
                    warn!("Failed to remove label image {}: {}", label, e);
                }
            }
            Err(e) => warn!("Could not check label image {}: {}", label, e),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: s.db.clone(),
            media_root: s.media.root().to_path_buf(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database, migrations, default
//! superuser, HTTP listener and graceful shutdown. The CLI is a thin
//! wrapper around it.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{AccountService, LocatorService};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::{init_database, run_migrations, DatabaseConfig, MediaStore};
use crate::infrastructure::SeaOrmRepositoryProvider;
use crate::interfaces::http::modules::metrics::MetricsState;
use crate::interfaces::http::{create_router, AppState, HttpSettings};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run pending migrations on startup
    pub auto_migrate: bool,
    /// Create the configured superuser when no accounts exist
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

/// Wire services and router state over an open database.
pub fn build_state(db: DatabaseConnection, config: &AppConfig) -> AppState {
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    AppState {
        locator: Arc::new(LocatorService::new(repos.clone())),
        accounts: Arc::new(AccountService::new(
            repos,
            config.security.jwt(),
            config.security.bcrypt_cost,
        )),
        media: MediaStore::new(config.media.root.clone(), config.media.url.clone()),
        settings: HttpSettings {
            cookie_secure: config.security.cookie_secure,
            max_upload_bytes: config.media.max_upload_bytes,
        },
        started_at: Arc::new(Instant::now()),
        db,
    }
}

/// The global recorder can be installed once per process; restarts reuse it.
fn prometheus_handle() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    if let Some(handle) = PROM_HANDLE.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(PROM_HANDLE.get_or_init(|| handle).clone())
}

/// Handle to a running server
pub struct ServerHandle {
    pub config: AppConfig,
    /// Bound address, useful when port 0 was requested
    pub local_addr: std::net::SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    http_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        info!("Starting equipment locator...");

        let metrics = MetricsState {
            handle: prometheus_handle()?,
        };

        let db_config = DatabaseConfig::from(&config.database);
        info!("Database: {}", db_config.url);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            run_migrations(&db).await?;
            info!("Migrations completed");
        }

        let state = build_state(db.clone(), &config);

        if opts.create_default_admin {
            if let Err(e) = state
                .accounts
                .ensure_default_admin(&config.admin.username, &config.admin.password)
                .await
            {
                error!("Failed to create default admin: {}", e);
            }
        }

        if let Err(e) = tokio::fs::create_dir_all(state.media.root()).await {
            warn!("Media root {} unavailable: {}", state.media.root().display(), e);
        }

        let router = create_router(state, Some(metrics));

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let signal = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on http://{}", local_addr);

        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            signal.wait().await;
            info!("HTTP server received shutdown signal");
        });

        let http_task = tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            config,
            local_addr,
            db,
            shutdown,
            http_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Listen for SIGTERM / SIGINT and trigger shutdown on either.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop, bounded by the configured shutdown
    /// timeout, then close the database.
    pub async fn wait(self) {
        info!("Waiting for in-flight requests...");
        let http_task = self.http_task;
        let drained = self
            .shutdown
            .run_with_timeout(async move {
                match http_task.await {
                    Ok(()) => info!("HTTP server stopped"),
                    Err(e) => error!("HTTP server task panicked: {}", e),
                }
            })
            .await;
        if !drained {
            warn!("Abandoning connections still open after shutdown timeout");
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
        info!("Shutdown complete");
    }

    pub async fn shutdown(self) {
        info!("Shutting down...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.http_task.is_finished()
    }
}

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// `logging.level`; `logging.format = "json"` switches to JSON lines.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("Tracing already initialised: {}", e);
    }
}

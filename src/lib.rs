//! # Equipment Locator
//!
//! Registry of plant equipment organised as substation → motor-control
//! center (MCC) → node, with server-rendered browse/maintenance screens and
//! a JSON back-office API.
//!
//! ## Architecture
//!
//! - **domain**: entities, closed choice sets, repository traits
//! - **application**: forms and services (locator, accounts)
//! - **infrastructure**: SeaORM persistence, crypto, media storage
//! - **interfaces**: axum router, screens, back-office API
//! - **server**: lifecycle, tracing and metrics bootstrap

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, run_migrations, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_router, AppState};

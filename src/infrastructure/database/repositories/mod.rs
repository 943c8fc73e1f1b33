//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod motor_control_center_repository;
pub mod node_repository;
pub mod repository_provider;
pub mod substation_repository;
pub mod user_repository;

pub use motor_control_center_repository::SeaOrmMotorControlCenterRepository;
pub use node_repository::SeaOrmNodeRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use substation_repository::SeaOrmSubstationRepository;
pub use user_repository::SeaOrmUserRepository;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Map storage failures into the domain taxonomy.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Conflict(msg),
        _ => DomainError::Storage(e.to_string()),
    }
}

/// Stored choice strings are guarded by CHECK constraints; a mismatch means
/// the row was written outside the application.
pub(crate) fn corrupt(entity: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("Corrupt {} row: {}", entity, e))
}

//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::motor_control_center::MotorControlCenterRepository;
use super::node::NodeRepository;
use super::substation::SubstationRepository;
use super::user::UserRepository;
use crate::shared::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let mcc = repos.mccs().find_by_slug("mcc-1").await?;
///     let nodes = repos.nodes().find(NodeFilter::for_mcc(mcc.id)).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn substations(&self) -> &dyn SubstationRepository;
    fn mccs(&self) -> &dyn MotorControlCenterRepository;
    fn nodes(&self) -> &dyn NodeRepository;
    fn users(&self) -> &dyn UserRepository;
}

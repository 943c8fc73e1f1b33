//! Motor-control-center repository interface

use async_trait::async_trait;

use super::model::{MotorControlCenter, NewMotorControlCenter};
use crate::domain::DomainResult;

#[async_trait]
pub trait MotorControlCenterRepository: Send + Sync {
    /// Ordered by name
    async fn find_all(&self) -> DomainResult<Vec<MotorControlCenter>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<MotorControlCenter>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<MotorControlCenter>>;
    async fn find_by_substation(&self, substation_id: i32) -> DomainResult<Vec<MotorControlCenter>>;
    /// The slug is derived from the name; nothing the caller passes survives.
    async fn save(&self, mcc: NewMotorControlCenter) -> DomainResult<MotorControlCenter>;
    async fn update(&self, mcc: MotorControlCenter) -> DomainResult<MotorControlCenter>;
    /// Fails with `DomainError::Protected` while nodes reference it
    async fn delete(&self, id: i32) -> DomainResult<()>;
}

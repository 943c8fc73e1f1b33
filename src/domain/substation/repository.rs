//! Substation repository interface

use async_trait::async_trait;

use super::model::{NewSubstation, Substation};
use crate::domain::DomainResult;

#[async_trait]
pub trait SubstationRepository: Send + Sync {
    /// All substations in insertion order
    async fn find_all(&self) -> DomainResult<Vec<Substation>>;
    /// All substations ordered by name (back-office listing)
    async fn find_all_by_name(&self) -> DomainResult<Vec<Substation>>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Substation>>;
    async fn save(&self, substation: NewSubstation) -> DomainResult<Substation>;
    async fn update(&self, substation: Substation) -> DomainResult<Substation>;
    /// Fails with `DomainError::Protected` while motor-control centers reference it
    async fn delete(&self, id: i32) -> DomainResult<()>;
}

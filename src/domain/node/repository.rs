//! Node repository interface

use async_trait::async_trait;

use super::model::{Node, NodeData, NodeFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait NodeRepository: Send + Sync {
    /// Nodes matching `filter`, ordered by slug
    async fn find(&self, filter: NodeFilter) -> DomainResult<Vec<Node>>;
    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<Node>>;
    async fn slug_taken(&self, slug: &str, exclude_id: Option<i32>) -> DomainResult<bool>;
    /// Whether any node other than `exclude_id` points at this label image
    async fn label_in_use(&self, label: &str, exclude_id: Option<i32>) -> DomainResult<bool>;
    async fn save(&self, node: NodeData) -> DomainResult<Node>;
    async fn update(&self, node: Node) -> DomainResult<Node>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}

//! Node aggregate

pub mod model;
pub mod repository;

pub use model::{Node, NodeData, NodeFilter, LABEL_PREFIX};
pub use repository::NodeRepository;

//! Substation aggregate

pub mod model;
pub mod repository;

pub use model::{NewSubstation, Substation};
pub use repository::SubstationRepository;

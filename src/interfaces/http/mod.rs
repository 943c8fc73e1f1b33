//! HTTP interface
//!
//! - `views`: server-rendered locator screens
//! - `modules`: handlers grouped by feature (screens, back office, health, metrics)
//! - `middleware`: session resolution and access guards
//! - `router`: route table and cross-cutting layers

pub mod common;
pub mod middleware;
pub mod modules;
pub mod openapi;
pub mod router;
pub mod state;
pub mod views;

pub use router::create_router;
pub use state::{AppState, HttpSettings};

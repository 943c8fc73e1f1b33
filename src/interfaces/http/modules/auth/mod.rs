//! Back-office authentication: token login and current account

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

//! Public locator screens: browsing, node maintenance, sign in/out

pub mod handlers;
pub mod submission;

pub use handlers::*;

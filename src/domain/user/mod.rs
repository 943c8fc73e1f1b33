//! User aggregate
//!
//! Accounts, flags and per-model permissions.

pub mod model;
pub mod permission;
pub mod repository;

pub use model::{NewUser, User};
pub use permission::{Action, Model, Permission, UnknownPermission};
pub use repository::UserRepository;

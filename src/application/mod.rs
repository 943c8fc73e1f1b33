//! Application layer: forms and use-case services

pub mod forms;
pub mod services;

pub use forms::{LoginForm, NodeForm};
pub use services::{AccountService, LocatorService, SessionToken};

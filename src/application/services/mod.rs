pub mod accounts;
pub mod locator;

pub use accounts::{AccountService, SessionToken};
pub use locator::LocatorService;

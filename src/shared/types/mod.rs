pub mod errors;
pub mod field_errors;

pub use errors::*;
pub use field_errors::*;

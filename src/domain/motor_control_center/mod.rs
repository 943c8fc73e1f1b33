//! Motor-control-center aggregate

pub mod model;
pub mod repository;

pub use model::{MotorControlCenter, NewMotorControlCenter};
pub use repository::MotorControlCenterRepository;

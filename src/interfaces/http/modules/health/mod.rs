pub mod handlers;

pub use handlers::{__path_health_check, health_check, ComponentHealth, HealthResponse, HealthState};

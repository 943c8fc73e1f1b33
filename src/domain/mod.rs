pub mod choices;
pub mod motor_control_center;
pub mod node;
pub mod repositories;
pub mod substation;
pub mod user;

pub use choices::{InvalidChoice, Level, MccName, SubstationName};
pub use motor_control_center::{MotorControlCenter, NewMotorControlCenter};
pub use node::{Node, NodeData, NodeFilter};
pub use repositories::{DomainResult, RepositoryProvider};
pub use substation::{NewSubstation, Substation};
pub use user::{NewUser, Permission, User};

pub use crate::shared::DomainError;

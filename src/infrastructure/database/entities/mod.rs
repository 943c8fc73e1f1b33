//! Database entities module

pub mod motor_control_center;
pub mod node;
pub mod substation;
pub mod user;
pub mod user_permission;

pub use motor_control_center::Entity as MotorControlCenter;
pub use node::Entity as Node;
pub use substation::Entity as Substation;
pub use user::Entity as User;
pub use user_permission::Entity as UserPermission;

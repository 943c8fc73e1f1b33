//! Screen forms: binding raw submissions and cleaning them into domain values

pub mod login_form;
pub mod node_form;

pub use login_form::LoginForm;
pub use node_form::{CleanedNode, LabelChange, NodeForm};

//! Per-model permissions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Add,
    Change,
    Delete,
    View,
}

impl Action {
    pub const ALL: [Action; 4] = [Self::Add, Self::Change, Self::Delete, Self::View];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Change => "change",
            Self::Delete => "delete",
            Self::View => "view",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Model {
    Substation,
    MotorControlCenter,
    Node,
}

impl Model {
    pub const ALL: [Model; 3] = [Self::Substation, Self::MotorControlCenter, Self::Node];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substation => "substation",
            Self::MotorControlCenter => "motorcontrolcenter",
            Self::Node => "node",
        }
    }
}

/// A permission such as `add_node` or `delete_substation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    pub action: Action,
    pub model: Model,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl Permission {
    pub const fn new(action: Action, model: Model) -> Self {
        Self { action, model }
    }

    pub const ADD_NODE: Permission = Permission::new(Action::Add, Model::Node);
    pub const CHANGE_NODE: Permission = Permission::new(Action::Change, Model::Node);
    pub const VIEW_NODE: Permission = Permission::new(Action::View, Model::Node);

    pub fn codename(&self) -> String {
        format!("{}_{}", self.action.as_str(), self.model.as_str())
    }

    /// Every known permission
    pub fn all() -> impl Iterator<Item = Permission> {
        Model::ALL
            .into_iter()
            .flat_map(|m| Action::ALL.into_iter().map(move |a| Permission::new(a, m)))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.action.as_str(), self.model.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::all()
            .find(|p| p.codename() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

impl TryFrom<String> for Permission {
    type Error = UnknownPermission;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Permission> for String {
    fn from(p: Permission) -> String {
        p.codename()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codenames() {
        assert_eq!(Permission::ADD_NODE.codename(), "add_node");
        assert_eq!(
            Permission::new(Action::Delete, Model::MotorControlCenter).to_string(),
            "delete_motorcontrolcenter"
        );
        assert_eq!(Permission::all().count(), 12);
    }

    #[test]
    fn parse() {
        assert_eq!("view_node".parse::<Permission>().unwrap(), Permission::VIEW_NODE);
        assert!("view_user".parse::<Permission>().is_err());
        assert!("node".parse::<Permission>().is_err());
    }
}

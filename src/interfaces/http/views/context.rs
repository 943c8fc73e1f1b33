//! Serializable views of domain records used in page contexts

use serde::Serialize;

use crate::domain::motor_control_center::MotorControlCenter;
use crate::domain::node::Node;
use crate::domain::substation::Substation;

#[derive(Debug, Clone, Serialize)]
pub struct SubstationItem {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub level: String,
    pub url: String,
}

impl From<&Substation> for SubstationItem {
    fn from(s: &Substation) -> Self {
        Self {
            id: s.id,
            name: s.name.to_string(),
            slug: s.slug.clone(),
            level: s.level.to_string(),
            url: s.absolute_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomItem {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub substation_id: i32,
    pub url: String,
}

impl From<&MotorControlCenter> for RoomItem {
    fn from(m: &MotorControlCenter) -> Self {
        Self {
            id: m.id,
            name: m.name.to_string(),
            slug: m.slug.clone(),
            substation_id: m.substation_id,
            url: m.absolute_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeItem {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub label: Option<String>,
    pub label_url: Option<String>,
    pub level: String,
    pub level_label: String,
    pub round_per_minute: i32,
    pub power: String,
    pub mcc_id: i32,
    pub url: String,
}

impl NodeItem {
    pub fn new(n: &Node, media_url: &str) -> Self {
        Self {
            id: n.id,
            title: n.title.clone(),
            slug: n.slug.clone(),
            label: n.label.clone(),
            label_url: n.label_url(media_url),
            level: n.level.to_string(),
            level_label: n.level.label().to_string(),
            round_per_minute: n.round_per_minute,
            power: n.power.to_string(),
            mcc_id: n.mcc_id,
            url: n.absolute_url(),
        }
    }

    pub fn list(nodes: &[Node], media_url: &str) -> Vec<Self> {
        nodes.iter().map(|n| Self::new(n, media_url)).collect()
    }
}

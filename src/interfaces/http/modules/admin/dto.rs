//! Back-office DTOs

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::forms::node_form::{
    clean_label_path, clean_level, clean_power, clean_round_per_minute, clean_slug, clean_title,
};
use crate::domain::choices::{Level, MccName, SubstationName};
use crate::domain::motor_control_center::{MotorControlCenter, NewMotorControlCenter};
use crate::domain::node::{Node, NodeData};
use crate::domain::substation::{NewSubstation, Substation};
use crate::domain::user::Permission;
use crate::interfaces::http::views::templates::escape;
use crate::shared::FieldErrors;

// ── Substations ─────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubstationDto {
    pub id: i32,
    /// One of `РП-4` … `РП-8`
    pub name: String,
    pub slug: String,
    pub level: String,
    pub url: String,
}

impl From<&Substation> for SubstationDto {
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

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubstationRequest {
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "slug must be 1-50 characters"))]
    pub slug: String,
    /// Defaults to the unspecified level
    #[serde(default)]
    pub level: Option<String>,
}

impl SubstationRequest {
    pub fn into_new(self) -> Result<NewSubstation, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = SubstationName::from_str(&self.name)
            .map_err(|e| errors.add("name", e.to_string()))
            .ok();
        let level = parse_level(self.level.as_deref())
            .map_err(|m| errors.add("level", m))
            .ok();
        errors.into_result()?;

        match (name, level) {
            (Some(name), Some(level)) => Ok(NewSubstation {
                name,
                slug: self.slug,
                level,
            }),
            _ => Err(FieldErrors::single("name", "Invalid substation")),
        }
    }
}

// ── Motor-control centers ───────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MccDto {
    pub id: i32,
    /// One of `MCC-1` … `MCC-11`
    pub name: String,
    /// Always derived from the name
    pub slug: String,
    pub substation_id: i32,
    pub url: String,
}

impl From<&MotorControlCenter> for MccDto {
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

/// Any `slug` in the body is ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MccRequest {
    pub name: String,
    #[validate(range(min = 1, message = "substation_id must be positive"))]
    pub substation_id: i32,
}

impl MccRequest {
    pub fn into_new(self) -> Result<NewMotorControlCenter, FieldErrors> {
        let name = MccName::from_str(&self.name)
            .map_err(|e| FieldErrors::single("name", e.to_string()))?;
        Ok(NewMotorControlCenter {
            name,
            substation_id: self.substation_id,
        })
    }
}

// ── Nodes ───────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NodeDto {
    pub id: i32,
    pub title: String,
    pub slug: String,
    /// Media-relative path, e.g. `photos/x.jpg`
    pub label: Option<String>,
    pub label_url: Option<String>,
    /// Thumbnail snippet for list views
    pub label_photo: String,
    pub level: String,
    pub round_per_minute: i32,
    /// Decimal as text, one decimal place at most
    pub power: String,
    pub mcc_id: i32,
    pub url: String,
}

impl NodeDto {
    pub fn new(node: &Node, media_url: &str) -> Self {
        let label_url = node.label_url(media_url);
        let label_photo = match &label_url {
            Some(url) => format!("<img src='{}' width=50>", escape(url)),
            None => "No image".to_string(),
        };
        Self {
            id: node.id,
            title: node.title.clone(),
            slug: node.slug.clone(),
            label: node.label.clone(),
            label_url,
            label_photo,
            level: node.level.to_string(),
            round_per_minute: node.round_per_minute,
            power: node.power.to_string(),
            mcc_id: node.mcc_id,
            url: node.absolute_url(),
        }
    }
}

/// Node fields for create and full update. Field rules are the ones the
/// node form applies.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NodeRequest {
    pub title: String,
    pub slug: String,
    /// Existing media path under `photos/`; upload images via the label endpoint
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    pub round_per_minute: i32,
    pub power: String,
    pub mcc_id: i32,
}

impl NodeRequest {
    pub fn into_data(self) -> Result<NodeData, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = clean_title(&self.title)
            .map_err(|m| errors.add("title", m))
            .ok();
        let slug = clean_slug(&self.slug)
            .map_err(|m| errors.add("slug", m))
            .ok();
        let round_per_minute = clean_round_per_minute(&self.round_per_minute.to_string())
            .map_err(|m| errors.add("round_per_minute", m))
            .ok();
        let level = parse_level(self.level.as_deref())
            .map_err(|m| errors.add("level", m))
            .ok();
        let power = clean_power(&self.power)
            .map_err(|m| errors.add("power", m))
            .ok();
        let label = match self.label.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(path) => clean_label_path(path).map(Some),
        }
        .map_err(|m| errors.add("label", m))
        .ok();

        match (title, slug, round_per_minute, level, power, label) {
            (
                Some(title),
                Some(slug),
                Some(round_per_minute),
                Some(level),
                Some(power),
                Some(label),
            ) if errors.is_empty() => Ok(NodeData {
                title,
                slug,
                label,
                level,
                round_per_minute,
                power,
                mcc_id: self.mcc_id,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_level(raw: Option<&str>) -> Result<Level, String> {
    match raw {
        None => Ok(Level::default()),
        Some(value) => clean_level(value),
    }
}

// ── Accounts ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 150, message = "username must be 1-150 characters"))]
    pub username: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6-128 characters"))]
    pub password: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    /// Permission codenames such as `add_node`
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PermissionsRequest {
    pub permissions: Vec<String>,
}

/// Parse codenames, reporting every unknown one.
pub fn parse_permissions(codenames: &[String]) -> Result<BTreeSet<Permission>, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut parsed = BTreeSet::new();
    for codename in codenames {
        match codename.parse::<Permission>() {
            Ok(p) => {
                parsed.insert(p);
            }
            Err(e) => errors.add("permissions", e.to_string()),
        }
    }
    errors.into_result().map(|_| parsed)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::forms::node_form::INVALID_LABEL;

    #[test]
    fn substation_request_rejects_unknown_name() {
        let req = SubstationRequest {
            name: "РП-1".into(),
            slug: "rp-1".into(),
            level: Some("4.5".into()),
        };
        let errors = req.into_new().unwrap_err();
        assert!(errors.contains("name"));
        assert!(errors.contains("level"));
    }

    #[test]
    fn substation_level_defaults() {
        let new = SubstationRequest {
            name: "РП-4".into(),
            slug: "rp-4".into(),
            level: None,
        }
        .into_new()
        .unwrap();
        assert_eq!(new.level, Level::Unspecified);
        assert_eq!(new.name, SubstationName::Rp4);
    }

    #[test]
    fn node_request_cleans_power_and_label() {
        let data = NodeRequest {
            title: "Node 1".into(),
            slug: "1_1".into(),
            label: Some("photos/a.jpg".into()),
            level: Some("4.8".into()),
            round_per_minute: 1000,
            power: "7.5".into(),
            mcc_id: 1,
        }
        .into_data()
        .unwrap();
        assert_eq!(data.power, Decimal::new(75, 1));
        assert_eq!(data.label.as_deref(), Some("photos/a.jpg"));

        let errors = NodeRequest {
            title: "Node 1".into(),
            slug: "1_1".into(),
            label: Some("/etc/passwd".into()),
            level: None,
            round_per_minute: 1000,
            power: "7.55".into(),
            mcc_id: 1,
        }
        .into_data()
        .unwrap_err();
        assert!(errors.contains("power"));
        assert!(errors.contains("label"));
    }

    #[test]
    fn node_request_shares_form_rules() {
        let request = |title: &str, rpm: i32, label: &str| NodeRequest {
            title: title.into(),
            slug: "1_1".into(),
            label: Some(label.into()),
            level: None,
            round_per_minute: rpm,
            power: "7.5".into(),
            mcc_id: 1,
        };

        assert!(request(&"x".repeat(25), 3100, "photos/a.png").into_data().is_ok());
        assert!(request("Pump", 0, "").into_data().unwrap().label.is_none());

        let errors = request(&"x".repeat(26), 3101, "photos/").into_data().unwrap_err();
        assert_eq!(
            errors.get("title"),
            ["Ensure this value has at most 25 characters (it has 26)."]
        );
        assert_eq!(
            errors.get("round_per_minute"),
            ["Ensure this value is less than or equal to 3100."]
        );
        assert_eq!(errors.get("label"), [INVALID_LABEL]);
    }

    #[test]
    fn label_photo_snippet() {
        let node = Node {
            id: 1,
            title: "Node 1".into(),
            slug: "1_1".into(),
            label: Some("photos/a.jpg".into()),
            level: Level::L48,
            round_per_minute: 1000,
            power: Decimal::new(75, 1),
            mcc_id: 1,
        };
        let dto = NodeDto::new(&node, "/media/");
        assert_eq!(dto.label_photo, "<img src='/media/photos/a.jpg' width=50>");
        assert_eq!(dto.power, "7.5");

        let bare = NodeDto::new(&Node { label: None, ..node }, "/media/");
        assert_eq!(bare.label_photo, "No image");
    }

    #[test]
    fn permissions_parse() {
        let perms = parse_permissions(&["add_node".into(), "view_node".into()]).unwrap();
        assert!(perms.contains(&Permission::ADD_NODE));
        assert_eq!(perms.len(), 2);

        let errors = parse_permissions(&["fly_node".into()]).unwrap_err();
        assert_eq!(errors.get("permissions"), ["Unknown permission: fly_node"]);
    }
}

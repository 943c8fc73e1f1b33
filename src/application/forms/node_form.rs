//! Node create/edit form
//!
//! Every field is bound as text and cleaned here into typed [`NodeData`].
//! The label image is never bound from text: it is set to the stored path
//! of an uploaded file. Messages match what the screens have always shown.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::choices::Level;
use crate::domain::node::{Node, NodeData, LABEL_PREFIX};
use crate::shared::{is_valid_slug, FieldErrors, REQUIRED, SLUG_MAX_LEN};

pub const TITLE_MAX_LEN: usize = 25;
pub const RPM_MIN: i32 = 0;
pub const RPM_MAX: i32 = 3100;
pub const POWER_MAX_DIGITS: u32 = 4;
pub const POWER_DECIMAL_PLACES: u32 = 1;

pub const INVALID_REFERENCE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_SLUG: &str =
    "Enter a valid “slug” consisting of letters, numbers, underscores or hyphens.";
pub const INVALID_LABEL: &str = "Upload a valid image stored under photos/.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const SLUG_TAKEN: &str = "Node with this Slug already exists.";

/// Field names with their on-screen labels, in display order.
pub const FIELDS: [(&str, &str); 7] = [
    ("title", "НАЗВА "),
    ("slug", "НОМЕР"),
    ("label", "ФОТО "),
    ("level", "РІВЕНЬ"),
    ("round_per_minute", "ОБЕРТІВ / ХВ "),
    ("power", "ПОТУЖНІСТЬ"),
    ("mcc", "МСС  "),
];

/// Raw node form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeForm {
    pub title: String,
    pub slug: String,
    /// Stored path of a freshly uploaded image; blank keeps the current one
    #[serde(skip_deserializing)]
    pub label: String,
    /// `on` removes the current image
    #[serde(rename = "label-clear", skip_serializing_if = "String::is_empty")]
    pub label_clear: String,
    pub level: String,
    pub round_per_minute: String,
    pub power: String,
    pub mcc: String,
}

/// Label outcome of a cleaned form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelChange {
    Keep,
    Clear,
    Set(String),
}

/// Typed result of [`NodeForm::clean`]; the MCC reference and slug
/// uniqueness are checked against storage by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedNode {
    pub title: String,
    pub slug: String,
    pub label: LabelChange,
    pub level: Level,
    pub round_per_minute: i32,
    pub power: Decimal,
    pub mcc_id: i32,
}

impl CleanedNode {
    /// Resolve the label against the current value (None on create).
    pub fn into_data(self, current_label: Option<String>) -> NodeData {
        let label = match self.label {
            LabelChange::Keep => current_label,
            LabelChange::Clear => None,
            LabelChange::Set(path) => Some(path),
        };
        NodeData {
            title: self.title,
            slug: self.slug,
            label,
            level: self.level,
            round_per_minute: self.round_per_minute,
            power: self.power,
            mcc_id: self.mcc_id,
        }
    }
}

impl NodeForm {
    /// Initial values for editing an existing node.
    pub fn from_node(node: &Node) -> Self {
        Self {
            title: node.title.clone(),
            slug: node.slug.clone(),
            label: node.label.clone().unwrap_or_default(),
            label_clear: String::new(),
            level: node.level.to_string(),
            round_per_minute: node.round_per_minute.to_string(),
            power: node.power.to_string(),
            mcc: node.mcc_id.to_string(),
        }
    }

    /// Bind one submitted text field; unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "title" => self.title = value,
            "slug" => self.slug = value,
            "label-clear" => self.label_clear = value,
            "level" => self.level = value,
            "round_per_minute" => self.round_per_minute = value,
            "power" => self.power = value,
            "mcc" => self.mcc = value,
            _ => {}
        }
    }

    pub fn clean(&self) -> Result<CleanedNode, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = clean_title(&self.title).map_err(|m| errors.add("title", m)).ok();
        let slug = clean_slug(&self.slug).map_err(|m| errors.add("slug", m)).ok();
        let label = clean_label(&self.label, &self.label_clear)
            .map_err(|m| errors.add("label", m))
            .ok();
        let level = clean_level(&self.level).map_err(|m| errors.add("level", m)).ok();
        let rpm = clean_round_per_minute(&self.round_per_minute)
            .map_err(|m| errors.add("round_per_minute", m))
            .ok();
        let power = clean_power(&self.power).map_err(|m| errors.add("power", m)).ok();
        let mcc_id = clean_mcc(&self.mcc).map_err(|m| errors.add("mcc", m)).ok();

        match (title, slug, label, level, rpm, power, mcc_id) {
            (
                Some(title),
                Some(slug),
                Some(label),
                Some(level),
                Some(round_per_minute),
                Some(power),
                Some(mcc_id),
            ) if errors.is_empty() => Ok(CleanedNode {
                title,
                slug,
                label,
                level,
                round_per_minute,
                power,
                mcc_id,
            }),
            _ => Err(errors),
        }
    }
}

fn required(value: &str) -> Result<&str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(REQUIRED.to_string())
    } else {
        Ok(trimmed)
    }
}

fn max_length(value: &str, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len > max {
        Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            max, len
        ))
    } else {
        Ok(())
    }
}

pub fn clean_title(raw: &str) -> Result<String, String> {
    let title = required(raw)?;
    max_length(title, TITLE_MAX_LEN)?;
    Ok(title.to_string())
}

pub fn clean_slug(raw: &str) -> Result<String, String> {
    let slug = required(raw)?;
    max_length(slug, SLUG_MAX_LEN as usize)?;
    if !is_valid_slug(slug) {
        return Err(INVALID_SLUG.to_string());
    }
    Ok(slug.to_string())
}

fn clean_label(raw: &str, clear: &str) -> Result<LabelChange, String> {
    if matches!(clear.trim(), "on" | "true" | "1") {
        return Ok(LabelChange::Clear);
    }
    let label = raw.trim();
    if label.is_empty() {
        return Ok(LabelChange::Keep);
    }
    clean_label_path(label).map(LabelChange::Set)
}

/// A media path under `photos/` naming a single file.
pub fn clean_label_path(raw: &str) -> Result<String, String> {
    let label = raw.trim();
    let valid = label
        .strip_prefix(LABEL_PREFIX)
        .map(|name| {
            !name.is_empty()
                && !name.starts_with('.')
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        })
        .unwrap_or(false);
    if valid {
        Ok(label.to_string())
    } else {
        Err(INVALID_LABEL.to_string())
    }
}

pub fn clean_level(raw: &str) -> Result<Level, String> {
    let level = required(raw)?;
    Level::from_str(level).map_err(|e| e.to_string())
}

pub fn clean_round_per_minute(raw: &str) -> Result<i32, String> {
    let rpm: i32 = required(raw)?
        .parse()
        .map_err(|_| "Enter a whole number.".to_string())?;
    if rpm < RPM_MIN {
        return Err(format!(
            "Ensure this value is greater than or equal to {}.",
            RPM_MIN
        ));
    }
    if rpm > RPM_MAX {
        return Err(format!("Ensure this value is less than or equal to {}.", RPM_MAX));
    }
    Ok(rpm)
}

/// Parse and bound a decimal the same way for forms and the JSON API.
pub fn clean_power(raw: &str) -> Result<Decimal, String> {
    let text = required(raw)?;
    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| "Enter a number.".to_string())?;
    check_power_digits(value)?;
    Ok(value)
}

/// Digit accounting on the value as written: `7.50` has two decimal places.
pub fn check_power_digits(value: Decimal) -> Result<(), String> {
    let scale = value.scale();
    let mantissa = value.mantissa().unsigned_abs();
    let significant = if mantissa == 0 {
        1
    } else {
        mantissa.to_string().len() as u32
    };

    let (digits, decimals) = if scale > significant {
        (scale, scale)
    } else {
        (significant, scale)
    };
    let whole_digits = digits - decimals;

    if digits > POWER_MAX_DIGITS {
        return Err(format!(
            "Ensure that there are no more than {} digits in total.",
            POWER_MAX_DIGITS
        ));
    }
    if decimals > POWER_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal place.",
            POWER_DECIMAL_PLACES
        ));
    }
    if whole_digits > POWER_MAX_DIGITS - POWER_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            POWER_MAX_DIGITS - POWER_DECIMAL_PLACES
        ));
    }
    Ok(())
}

fn clean_mcc(raw: &str) -> Result<i32, String> {
    required(raw)?.parse().map_err(|_| INVALID_REFERENCE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NodeForm {
        NodeForm {
            title: "Node 1".into(),
            slug: "slug_1".into(),
            level: "4.8".into(),
            round_per_minute: "1000".into(),
            power: "7.5".into(),
            mcc: "1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_form_cleans() {
        let cleaned = valid().clean().unwrap();
        assert_eq!(cleaned.title, "Node 1");
        assert_eq!(cleaned.slug, "slug_1");
        assert_eq!(cleaned.level, Level::L48);
        assert_eq!(cleaned.power, Decimal::new(75, 1));
        assert_eq!(cleaned.label, LabelChange::Keep);
        assert_eq!(cleaned.mcc_id, 1);
    }

    #[test]
    fn missing_rpm_is_required() {
        let form = NodeForm {
            round_per_minute: String::new(),
            ..valid()
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.get("round_per_minute"), [REQUIRED]);
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn rpm_bounds() {
        assert_eq!(clean_round_per_minute("0"), Ok(0));
        assert_eq!(clean_round_per_minute("3100"), Ok(3100));
        assert_eq!(
            clean_round_per_minute("3101").unwrap_err(),
            "Ensure this value is less than or equal to 3100."
        );
        assert_eq!(
            clean_round_per_minute("-1").unwrap_err(),
            "Ensure this value is greater than or equal to 0."
        );
        assert_eq!(clean_round_per_minute("12.5").unwrap_err(), "Enter a whole number.");
    }

    #[test]
    fn power_digit_rules() {
        assert!(clean_power("7.5").is_ok());
        assert!(clean_power("999.9").is_ok());
        assert!(clean_power("-12").is_ok());
        assert!(clean_power("0").is_ok());
        assert_eq!(clean_power("abc").unwrap_err(), "Enter a number.");
        assert_eq!(
            clean_power("7.55").unwrap_err(),
            "Ensure that there are no more than 1 decimal place."
        );
        assert_eq!(
            clean_power("12345").unwrap_err(),
            "Ensure that there are no more than 4 digits in total."
        );
        assert_eq!(
            clean_power("1000").unwrap_err(),
            "Ensure that there are no more than 3 digits before the decimal point."
        );
        assert_eq!(
            clean_power("0.05").unwrap_err(),
            "Ensure that there are no more than 1 decimal place."
        );
    }

    #[test]
    fn slug_and_title_rules() {
        assert_eq!(clean_slug("has space").unwrap_err(), INVALID_SLUG);
        assert_eq!(
            clean_title("x".repeat(26).as_str()).unwrap_err(),
            "Ensure this value has at most 25 characters (it has 26)."
        );
        assert_eq!(clean_title("  Pump  ").unwrap(), "Pump");
    }

    #[test]
    fn level_must_be_a_choice() {
        let form = NodeForm {
            level: "4.5".into(),
            ..valid()
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(
            errors.get("level"),
            ["Select a valid choice. 4.5 is not one of the available choices."]
        );
    }

    #[test]
    fn label_handling() {
        let set = NodeForm {
            label: "photos/pump.jpg".into(),
            ..valid()
        };
        assert_eq!(
            set.clean().unwrap().label,
            LabelChange::Set("photos/pump.jpg".into())
        );

        let bad = NodeForm {
            label: "../etc/passwd".into(),
            ..valid()
        };
        assert_eq!(bad.clean().unwrap_err().get("label"), [INVALID_LABEL]);

        let clear = NodeForm {
            label_clear: "on".into(),
            ..valid()
        };
        let cleaned = clear.clean().unwrap();
        assert_eq!(cleaned.label, LabelChange::Clear);
        assert_eq!(cleaned.into_data(Some("photos/a.png".into())).label, None);

        let keep = valid().clean().unwrap();
        assert_eq!(
            keep.into_data(Some("photos/a.png".into())).label.as_deref(),
            Some("photos/a.png")
        );
    }

    #[test]
    fn label_paths() {
        assert_eq!(clean_label_path(" photos/a-1.png ").unwrap(), "photos/a-1.png");
        assert_eq!(clean_label_path("photos/").unwrap_err(), INVALID_LABEL);
        assert_eq!(clean_label_path("photos/.hidden").unwrap_err(), INVALID_LABEL);
        assert_eq!(clean_label_path("photos/../x.png").unwrap_err(), INVALID_LABEL);
        assert_eq!(clean_label_path("other/x.png").unwrap_err(), INVALID_LABEL);
    }

    #[test]
    fn binds_text_fields_but_not_label() {
        let mut form = NodeForm::default();
        form.set("title", "Pump".into());
        form.set("label-clear", "on".into());
        form.set("mcc", "2".into());
        form.set("label", "photos/x.png".into());
        form.set("csrfmiddlewaretoken", "x".into());
        assert_eq!(form.title, "Pump");
        assert_eq!(form.label_clear, "on");
        assert_eq!(form.mcc, "2");
        assert!(form.label.is_empty());

        let decoded: NodeForm =
            serde_json::from_value(serde_json::json!({ "title": "T", "label": "photos/x.png" }))
                .unwrap();
        assert!(decoded.label.is_empty());
    }

    #[test]
    fn edit_initial_values_round_trip() {
        let node = valid().clean().unwrap().into_data(None).into_node(3);
        let form = NodeForm::from_node(&node);
        assert_eq!(form.power, "7.5");
        assert_eq!(form.mcc, "1");
        assert_eq!(form.clean().unwrap().into_data(None), NodeData::from(&node));
    }
}

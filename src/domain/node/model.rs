//! Node (equipment unit) domain entity

use rust_decimal::Decimal;

use crate::domain::choices::Level;

/// Media prefix under which node labels are stored.
pub const LABEL_PREFIX: &str = "photos/";

/// A single piece of equipment installed under a motor-control center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: i32,
    pub title: String,
    pub slug: String,
    /// Relative media path, e.g. `photos/pump.jpg`
    pub label: Option<String>,
    pub level: Level,
    pub round_per_minute: i32,
    /// One fractional digit, four digits in total
    pub power: Decimal,
    pub mcc_id: i32,
}

impl Node {
    pub fn absolute_url(&self) -> String {
        format!("/node/{}/", self.slug)
    }

    /// Public URL of the label image, if any.
    pub fn label_url(&self, media_url: &str) -> Option<String> {
        self.label
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| format!("{}/{}", media_url.trim_end_matches('/'), l))
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.title, self.slug)
    }
}

/// Node fields prior to insertion or for a full update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub title: String,
    pub slug: String,
    pub label: Option<String>,
    pub level: Level,
    pub round_per_minute: i32,
    pub power: Decimal,
    pub mcc_id: i32,
}

impl NodeData {
    pub fn into_node(self, id: i32) -> Node {
        Node {
            id,
            title: self.title,
            slug: self.slug,
            label: self.label,
            level: self.level,
            round_per_minute: self.round_per_minute,
            power: self.power,
            mcc_id: self.mcc_id,
        }
    }
}

impl From<&Node> for NodeData {
    fn from(node: &Node) -> Self {
        Self {
            title: node.title.clone(),
            slug: node.slug.clone(),
            label: node.label.clone(),
            level: node.level,
            round_per_minute: node.round_per_minute,
            power: node.power,
            mcc_id: node.mcc_id,
        }
    }
}

/// Query predicate for node listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    /// Case-insensitive substring of the slug
    pub slug_contains: Option<String>,
    pub mcc_id: Option<i32>,
}

impl NodeFilter {
    /// Build a filter from the raw `slug` query parameter.
    /// Blank input means no filtering.
    pub fn from_slug_param(slug: Option<&str>) -> Self {
        let slug_contains = slug
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            slug_contains,
            mcc_id: None,
        }
    }

    pub fn for_mcc(mcc_id: i32) -> Self {
        Self {
            slug_contains: None,
            mcc_id: Some(mcc_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(slug: &str) -> Node {
        Node {
            id: 1,
            title: "Node 1".into(),
            slug: slug.into(),
            label: None,
            level: Level::L48,
            round_per_minute: 1000,
            power: Decimal::new(75, 1),
            mcc_id: 1,
        }
    }

    #[test]
    fn display_joins_title_and_slug() {
        assert_eq!(node("1_1").to_string(), "Node 1_1_1");
        assert_eq!(node("1_1").absolute_url(), "/node/1_1/");
    }

    #[test]
    fn label_url_joins_media_prefix() {
        let mut n = node("a");
        assert_eq!(n.label_url("/media/"), None);
        n.label = Some("photos/pump.jpg".into());
        assert_eq!(n.label_url("/media/").as_deref(), Some("/media/photos/pump.jpg"));
        assert_eq!(n.label_url("/media").as_deref(), Some("/media/photos/pump.jpg"));
    }

    #[test]
    fn blank_slug_param_is_unfiltered() {
        assert_eq!(NodeFilter::from_slug_param(None), NodeFilter::default());
        assert_eq!(NodeFilter::from_slug_param(Some("   ")), NodeFilter::default());
        let f = NodeFilter::from_slug_param(Some(" Pump "));
        assert_eq!(f.slug_contains.as_deref(), Some("Pump"));
        assert_eq!(NodeFilter::for_mcc(2).mcc_id, Some(2));
    }
}

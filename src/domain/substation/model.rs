//! Substation domain entity

use crate::domain::choices::{Level, SubstationName};

/// Top-level facility zone supplying power to motor-control centers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substation {
    pub id: i32,
    pub name: SubstationName,
    pub slug: String,
    pub level: Level,
}

impl Substation {
    pub fn absolute_url(&self) -> String {
        format!("/substation/{}/", self.id)
    }
}

impl std::fmt::Display for Substation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name.as_str())
    }
}

/// Substation fields prior to insertion
#[derive(Debug, Clone)]
pub struct NewSubstation {
    pub name: SubstationName,
    pub slug: String,
    pub level: Level,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_url() {
        let s = Substation {
            id: 3,
            name: SubstationName::Rp4,
            slug: "rp-4".into(),
            level: Level::L48,
        };
        assert_eq!(s.to_string(), "РП-4");
        assert_eq!(s.absolute_url(), "/substation/3/");
    }
}

//! Motor-control-center domain entity

use crate::domain::choices::MccName;

/// A grouping of equipment nodes under one substation.
///
/// `slug` always mirrors `slugify(name)`; it is recomputed on every save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotorControlCenter {
    pub id: i32,
    pub name: MccName,
    pub slug: String,
    pub substation_id: i32,
}

impl MotorControlCenter {
    pub fn absolute_url(&self) -> String {
        format!("/mcc/{}/", self.slug)
    }

    /// Heading of the MCC screen, e.g. `MCC-1(PП-4)` for substation id 1.
    pub fn screen_title(&self) -> String {
        format!("{}(PП-{})", self.name, self.substation_id + 3)
    }
}

impl std::fmt::Display for MotorControlCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NewMotorControlCenter {
    pub name: MccName,
    pub substation_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::slugify;

    fn mcc(name: MccName, substation_id: i32) -> MotorControlCenter {
        MotorControlCenter {
            id: 1,
            name,
            slug: slugify(name.as_str()),
            substation_id,
        }
    }

    #[test]
    fn screen_title_offsets_substation_id() {
        assert_eq!(mcc(MccName::Mcc1, 1).screen_title(), "MCC-1(PП-4)");
        assert_eq!(mcc(MccName::Mcc7, 5).screen_title(), "MCC-7(PП-8)");
    }

    #[test]
    fn display_and_url() {
        let m = mcc(MccName::Mcc2, 1);
        assert_eq!(m.to_string(), "MCC-2");
        assert_eq!(m.absolute_url(), "/mcc/mcc-2/");
    }
}

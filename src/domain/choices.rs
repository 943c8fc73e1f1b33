//! Closed choice sets: substation names, MCC names and installation levels.
//!
//! Each variant has a stored value (what goes into the database and forms)
//! and a human-readable label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a value is not one of the available choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Select a valid choice. {value} is not one of the available choices.")]
pub struct InvalidChoice {
    pub value: String,
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($value:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Stored value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $value ),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            pub fn values() -> impl Iterator<Item = &'static str> {
                Self::ALL.iter().map(|c| c.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok(Self::$variant), )+
                    other => Err(InvalidChoice { value: other.to_string() }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidChoice;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(c: $name) -> String {
                c.as_str().to_string()
            }
        }
    };
}

choice_enum! {
    /// Distributive substation names
    SubstationName {
        Rp4 => ("РП-4", "Substation-4"),
        Rp5 => ("РП-5", "Substation-5"),
        Rp6 => ("РП-6", "Substation-6"),
        Rp7 => ("РП-7", "Substation-7"),
        Rp8 => ("РП-8", "Substation-8"),
    }
}

choice_enum! {
    /// Motor-control-center names
    MccName {
        Mcc1 => ("MCC-1", "Motor Control Center 1"),
        Mcc2 => ("MCC-2", "Motor Control Center 2"),
        Mcc3 => ("MCC-3", "Motor Control Center 3"),
        Mcc4 => ("MCC-4", "Motor Control Center 4"),
        Mcc5 => ("MCC-5", "Motor Control Center 5"),
        Mcc6 => ("MCC-6", "Motor Control Center 6"),
        Mcc7 => ("MCC-7", "Motor Control Center 7"),
        Mcc8 => ("MCC-8", "Motor Control Center 8"),
        Mcc9 => ("MCC-9", "Motor Control Center 9"),
        Mcc10 => ("MCC-10", "Motor Control Center 10"),
        Mcc11 => ("MCC-11", "Motor Control Center 11"),
    }
}

choice_enum! {
    /// Installation elevation
    Level {
        Unspecified => ("Не вказaно", "Не вказaно"),
        L48 => ("4.8", "4.8m"),
        L80 => ("8.0", "8.0m"),
        L112 => ("11.2", "11.2m"),
        L154 => ("15.4", "15.4m"),
        L210 => ("21.0", "21.0m"),
        L256 => ("25.6", "25.6m"),
        L280 => ("28.0", "28.0m"),
        L320 => ("32.0", "32.0m"),
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Unspecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let level: Level = "4.8".parse().unwrap();
        assert_eq!(level, Level::L48);
        assert_eq!(level.to_string(), "4.8");
        assert_eq!(level.label(), "4.8m");
        assert_eq!("РП-4".parse::<SubstationName>().unwrap(), SubstationName::Rp4);
        assert_eq!(MccName::Mcc11.as_str(), "MCC-11");
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = "4.5".parse::<Level>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Select a valid choice. 4.5 is not one of the available choices."
        );
        assert!("РП-1".parse::<SubstationName>().is_err());
        assert!("mcc-1".parse::<MccName>().is_err());
    }

    #[test]
    fn choice_sets_are_complete() {
        assert_eq!(SubstationName::ALL.len(), 5);
        assert_eq!(MccName::ALL.len(), 11);
        assert_eq!(Level::ALL.len(), 9);
        assert_eq!(Level::values().next(), Some("Не вказaно"));
    }

    #[test]
    fn serde_uses_stored_value() {
        let json = serde_json::to_string(&Level::L112).unwrap();
        assert_eq!(json, "\"11.2\"");
        let back: MccName = serde_json::from_str("\"MCC-3\"").unwrap();
        assert_eq!(back, MccName::Mcc3);
        assert!(serde_json::from_str::<Level>("\"99\"").is_err());
    }
}

//! Logbook entry categories.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Category of a vehicle logbook entry.
///
/// `Display` yields the label key, to be resolved by whatever translates the
/// user interface; the engine never translates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Taxes,
    Parts,
    Others,
    Services,
    Refueling,
    Insurance,
    Maintenances,
}

impl EntryType {
    pub const ALL: [EntryType; 7] = [
        Self::Taxes,
        Self::Parts,
        Self::Others,
        Self::Services,
        Self::Refueling,
        Self::Insurance,
        Self::Maintenances,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Taxes => "taxes",
            Self::Parts => "parts",
            Self::Others => "others",
            Self::Services => "services",
            Self::Refueling => "refueling",
            Self::Insurance => "insurance",
            Self::Maintenances => "maintenances",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Self::Taxes => "entry-type.taxes",
            Self::Parts => "entry-type.parts",
            Self::Others => "entry-type.others",
            Self::Services => "entry-type.services",
            Self::Refueling => "entry-type.refueling",
            Self::Insurance => "entry-type.insurance",
            Self::Maintenances => "entry-type.maintenances",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_key())
    }
}

impl TryFrom<&str> for EntryType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|entry_type| entry_type.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| EngineError::Validation(format!("invalid entry type: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_label_key() {
        assert_eq!(EntryType::Refueling.to_string(), "entry-type.refueling");
        assert_eq!(EntryType::Maintenances.to_string(), "entry-type.maintenances");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(EntryType::try_from("Taxes").unwrap(), EntryType::Taxes);
        assert_eq!(EntryType::try_from(" insurance ").unwrap(), EntryType::Insurance);
        assert!(EntryType::try_from("fuel").is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&EntryType::Services).unwrap();
        assert_eq!(json, "\"services\"");
    }
}

//! Allow-listed filter values shared by the daemon and client.
//!
//! The upstream provider accepts many more values than these; the service
//! deliberately restricts queries to a fixed catalogue so both binaries can
//! validate and enumerate options without consulting the provider.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Headline and source categories accepted by list queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Business,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

/// Two-letter country codes accepted by list queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Country {
    Au,
    Ca,
    Jp,
    Ac,
    Sa,
    Kr,
    Us,
    Ma,
}

/// Languages accepted by source queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    Ar,
    En,
}

impl Country {
    /// Human-readable name shown in client menus.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Au => "Australia",
            Self::Ca => "Canada",
            Self::Jp => "Japan",
            Self::Ac => "Ascension Island",
            Self::Sa => "Saudi Arabia",
            Self::Kr => "South Korea",
            Self::Us => "United States",
            Self::Ma => "Morocco",
        }
    }
}

impl Language {
    /// Human-readable name shown in client menus.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ar => "Arabic",
            Self::En => "English",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!(Category::from_str("sports").expect("parse"), Category::Sports);
        assert_eq!(Category::from_str("SPORTS").expect("parse"), Category::Sports);
    }

    #[test]
    fn unknown_country_is_rejected() {
        assert!(Country::from_str("xx").is_err());
    }

    #[test]
    fn catalogue_values_render_lowercase() {
        assert_eq!(Country::Us.to_string(), "us");
        assert_eq!(Language::Ar.to_string(), "ar");
        assert_eq!(Category::Technology.to_string(), "technology");
    }
}

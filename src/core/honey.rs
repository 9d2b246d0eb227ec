//! Honey types and jar formats.
//!
//! Both are closed sets. They are stored as their snake-case key in text columns and
//! parsed back with `FromStr`, which also accepts the French display name.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Floral origin of a honey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoneyType {
    AllFlower,
    Forest,
    Chestnut,
    Acacia,
    Lavender,
    Linden,
    Rapeseed,
    Buckwheat,
    Sunflower,
    Mountain,
    Heather,
}

impl HoneyType {
    pub const ALL: [Self; 11] = [
        Self::AllFlower,
        Self::Forest,
        Self::Chestnut,
        Self::Acacia,
        Self::Lavender,
        Self::Linden,
        Self::Rapeseed,
        Self::Buckwheat,
        Self::Sunflower,
        Self::Mountain,
        Self::Heather,
    ];

    /// Key stored in the database.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AllFlower => "all_flower",
            Self::Forest => "forest",
            Self::Chestnut => "chestnut",
            Self::Acacia => "acacia",
            Self::Lavender => "lavender",
            Self::Linden => "linden",
            Self::Rapeseed => "rapeseed",
            Self::Buckwheat => "buckwheat",
            Self::Sunflower => "sunflower",
            Self::Mountain => "mountain",
            Self::Heather => "heather",
        }
    }

    /// Name printed on the label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AllFlower => "Miel toutes fleurs",
            Self::Forest => "Miel de forêt",
            Self::Chestnut => "Miel de châtaignier",
            Self::Acacia => "Miel d'acacia",
            Self::Lavender => "Miel de lavande",
            Self::Linden => "Miel de tilleul",
            Self::Rapeseed => "Miel de colza",
            Self::Buckwheat => "Miel de sarrasin",
            Self::Sunflower => "Miel de tournesol",
            Self::Mountain => "Miel de montagne",
            Self::Heather => "Miel de bruyère",
        }
    }

    /// Default abbreviation used in lot numbers.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::AllFlower => "TF",
            Self::Forest => "FOR",
            Self::Chestnut => "CHA",
            Self::Acacia => "ACA",
            Self::Lavender => "LAV",
            Self::Linden => "TIL",
            Self::Rapeseed => "COL",
            Self::Buckwheat => "SAR",
            Self::Sunflower => "TOU",
            Self::Mountain => "MON",
            Self::Heather => "BRU",
        }
    }
}

impl fmt::Display for HoneyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for HoneyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.key() == wanted || t.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::invalid_argument(format!("Unknown honey type '{s}'")))
    }
}

/// Jar sizes the labels are printed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JarFormat {
    #[serde(rename = "125g")]
    Grams125,
    #[serde(rename = "250g")]
    Grams250,
    #[serde(rename = "500g")]
    Grams500,
    #[serde(rename = "1kg")]
    Kilogram1,
}

impl JarFormat {
    pub const ALL: [Self; 4] = [Self::Grams125, Self::Grams250, Self::Grams500, Self::Kilogram1];

    /// Key stored in the database.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Grams125 => "125g",
            Self::Grams250 => "250g",
            Self::Grams500 => "500g",
            Self::Kilogram1 => "1kg",
        }
    }

    /// Net weight in grams, printed as the mandatory net quantity.
    #[must_use]
    pub const fn net_weight_grams(self) -> u32 {
        match self {
            Self::Grams125 => 125,
            Self::Grams250 => 250,
            Self::Grams500 => 500,
            Self::Kilogram1 => 1000,
        }
    }

    /// Net quantity as printed: `500 g`, `1 kg`.
    #[must_use]
    pub fn net_weight_label(self) -> String {
        match self.net_weight_grams() {
            grams if grams % 1000 == 0 => format!("{} kg", grams / 1000),
            grams => format!("{grams} g"),
        }
    }
}

impl fmt::Display for JarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for JarFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::invalid_argument(format!("Unknown jar format '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_abbreviations_are_unique() {
        let abbreviations: HashSet<_> = HoneyType::ALL.iter().map(|t| t.abbreviation()).collect();
        assert_eq!(abbreviations.len(), HoneyType::ALL.len());
    }

    #[test]
    fn test_known_abbreviations() {
        assert_eq!(HoneyType::AllFlower.abbreviation(), "TF");
        assert_eq!(HoneyType::Forest.abbreviation(), "FOR");
        assert_eq!(HoneyType::Chestnut.abbreviation(), "CHA");
    }

    #[test]
    fn test_honey_type_parses_key_and_display_name() {
        assert_eq!("forest".parse::<HoneyType>().unwrap(), HoneyType::Forest);
        assert_eq!(
            "miel toutes fleurs".parse::<HoneyType>().unwrap(),
            HoneyType::AllFlower
        );
        assert_eq!(HoneyType::Linden.to_string(), "linden");
        assert!("manuka".parse::<HoneyType>().is_err());
    }

    #[test]
    fn test_jar_format_parsing_and_weight() {
        assert_eq!("500 g".parse::<JarFormat>().unwrap(), JarFormat::Grams500);
        assert_eq!("1KG".parse::<JarFormat>().unwrap(), JarFormat::Kilogram1);
        assert_eq!(JarFormat::Kilogram1.net_weight_label(), "1 kg");
        assert_eq!(JarFormat::Grams250.net_weight_label(), "250 g");
        assert!("2kg".parse::<JarFormat>().is_err());
    }
}

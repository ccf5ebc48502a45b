//! Card Classes - Finer Grained Than Layouts
//!
//! The card class picks the template family a card renders with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::card::{CardError, CardRecord, Face};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardClass {
    Normal,
    TransformFront,
    TransformBack,
    Ixalan,
    MdfcFront,
    MdfcBack,
    Adventure,
    Leveler,
    Saga,
    Mutate,
    Miracle,
    Snow,
    Planeswalker,
    Planar,
    Basic,
}

impl CardClass {
    pub const ALL: [CardClass; 15] = [
        CardClass::Normal,
        CardClass::TransformFront,
        CardClass::TransformBack,
        CardClass::Ixalan,
        CardClass::MdfcFront,
        CardClass::MdfcBack,
        CardClass::Adventure,
        CardClass::Leveler,
        CardClass::Saga,
        CardClass::Mutate,
        CardClass::Miracle,
        CardClass::Snow,
        CardClass::Planeswalker,
        CardClass::Planar,
        CardClass::Basic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CardClass::Normal => "normal",
            CardClass::TransformFront => "transform_front",
            CardClass::TransformBack => "transform_back",
            CardClass::Ixalan => "ixalan",
            CardClass::MdfcFront => "mdfc_front",
            CardClass::MdfcBack => "mdfc_back",
            CardClass::Adventure => "adventure",
            CardClass::Leveler => "leveler",
            CardClass::Saga => "saga",
            CardClass::Mutate => "mutate",
            CardClass::Miracle => "miracle",
            CardClass::Snow => "snow",
            CardClass::Planeswalker => "planeswalker",
            CardClass::Planar => "planar",
            CardClass::Basic => "basic",
        }
    }
}

impl fmt::Display for CardClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const BASIC_LAND_NAMES: [&str; 11] = [
    "Plains",
    "Island",
    "Swamp",
    "Mountain",
    "Forest",
    "Wastes",
    "Snow-Covered Plains",
    "Snow-Covered Island",
    "Snow-Covered Swamp",
    "Snow-Covered Mountain",
    "Snow-Covered Forest",
];

pub fn is_basic_land_name(name: &str) -> bool {
    BASIC_LAND_NAMES.contains(&name)
}

/// Resolve the card class for one face of a record.
pub fn resolve_class(record: &CardRecord, face: Face) -> Result<CardClass, CardError> {
    if record.name.as_deref().is_some_and(is_basic_land_name) {
        return Ok(CardClass::Basic);
    }

    let unpacked = record.unpack(face)?;
    let type_line = unpacked.type_line.as_str();
    let class = match (record.layout(), face) {
        ("normal", _) => {
            if type_line.contains("Planeswalker") {
                CardClass::Planeswalker
            } else if record.frame_effects.iter().any(|e| e == "miracle") {
                CardClass::Miracle
            } else if type_line.contains("Snow") {
                CardClass::Snow
            } else {
                CardClass::Normal
            }
        }
        ("transform", Face::Front) => CardClass::TransformFront,
        ("transform", Face::Back) if type_line.contains("Land") => CardClass::Ixalan,
        ("transform", Face::Back) => CardClass::TransformBack,
        ("modal_dfc", Face::Front) => CardClass::MdfcFront,
        ("modal_dfc", Face::Back) => CardClass::MdfcBack,
        ("adventure", _) => CardClass::Adventure,
        ("leveler", _) => CardClass::Leveler,
        ("saga", _) => CardClass::Saga,
        ("mutate", _) => CardClass::Mutate,
        ("planar", _) => CardClass::Planar,
        (other, _) => return Err(CardError::UnsupportedLayout(other.to_string())),
    };
    Ok(class)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> CardRecord {
        CardRecord::from_json(json).unwrap()
    }

    #[test]
    fn test_basic_names_short_circuit() {
        let plains = record(r#"{"name": "Snow-Covered Plains"}"#);
        assert_eq!(resolve_class(&plains, Face::Front).unwrap(), CardClass::Basic);
    }

    #[test]
    fn test_normal_layout_refinements() {
        let walker = record(r#"{"name": "Jace", "type_line": "Legendary Planeswalker — Jace"}"#);
        assert_eq!(resolve_class(&walker, Face::Front).unwrap(), CardClass::Planeswalker);

        let miracle = record(
            r#"{"name": "Temporal Mastery", "type_line": "Sorcery", "frame_effects": ["miracle"]}"#,
        );
        assert_eq!(resolve_class(&miracle, Face::Front).unwrap(), CardClass::Miracle);

        let snow = record(r#"{"name": "Icehide Troll", "type_line": "Snow Creature — Troll"}"#);
        assert_eq!(resolve_class(&snow, Face::Front).unwrap(), CardClass::Snow);
    }

    #[test]
    fn test_transform_land_back_is_ixalan() {
        let card = record(
            r#"{"name": "Search for Azcanta // Azcanta, the Sunken Ruin", "layout": "transform",
                "card_faces": [
                    {"name": "Search for Azcanta", "type_line": "Legendary Enchantment", "mana_cost": "{1}{U}"},
                    {"name": "Azcanta, the Sunken Ruin", "type_line": "Legendary Land", "colors": []}
                ]}"#,
        );
        assert_eq!(resolve_class(&card, Face::Front).unwrap(), CardClass::TransformFront);
        assert_eq!(resolve_class(&card, Face::Back).unwrap(), CardClass::Ixalan);
    }

    #[test]
    fn test_unsupported_layout() {
        let token = record(r#"{"name": "Soldier", "layout": "token", "type_line": "Token Creature"}"#);
        assert!(matches!(
            resolve_class(&token, Face::Front),
            Err(CardError::UnsupportedLayout(layout)) if layout == "token"
        ));
    }

    #[test]
    fn test_class_names_match_serde() {
        for class in CardClass::ALL {
            let json = serde_json::to_string(&class).unwrap();
            assert_eq!(json, format!("\"{}\"", class.as_str()));
        }
    }
}

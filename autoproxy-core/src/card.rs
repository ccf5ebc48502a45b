//! Card Data - Records In, Attributes Out
//!
//! `CardRecord` mirrors a card-data API dump where anything may be absent.
//! `CardAttributes` is the checked input of the frame classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::colour::Colour;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid colour letter: {0}")]
    InvalidColour(String),

    #[error("Card has no {0} face")]
    MissingFace(Face),

    #[error("Layout {0} is not supported")]
    UnsupportedLayout(String),

    #[error("Invalid card JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Classifier input. Empty strings mean "no information".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAttributes {
    #[serde(default)]
    pub mana_cost: String,
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub colour_identity: Vec<Colour>,
}

impl CardAttributes {
    pub fn new(
        mana_cost: impl Into<String>,
        type_line: impl Into<String>,
        oracle_text: impl Into<String>,
        colour_identity: Vec<Colour>,
    ) -> Self {
        Self {
            mana_cost: mana_cost.into(),
            type_line: type_line.into(),
            oracle_text: oracle_text.into(),
            colour_identity,
        }
    }

    pub fn is_land(&self) -> bool {
        self.type_line.contains("Land")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    #[default]
    Front,
    Back,
}

impl Face {
    pub(crate) fn index(self) -> usize {
        match self {
            Face::Front => 0,
            Face::Back => 1,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Front => f.write_str("front"),
            Face::Back => f.write_str("back"),
        }
    }
}

/// One face of a multi-faced card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardFace {
    pub name: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub colors: Option<Vec<String>>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub flavor_text: Option<String>,
}

/// Card-data API record, as dumped to JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: Option<String>,
    pub layout: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    pub colors: Option<Vec<String>>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub rarity: Option<String>,
    pub artist: Option<String>,
    pub set: Option<String>,
    pub collector_number: Option<String>,
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub frame_effects: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub card_faces: Vec<CardFace>,
}

/// A single face with the record-level fields it inherits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpackedFace {
    pub name: String,
    pub layout: String,
    pub mana_cost: String,
    pub type_line: String,
    pub oracle_text: String,
    pub colour_identity: Vec<Colour>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub flavour_text: String,
    pub rarity: String,
    pub artist: Option<String>,
    pub set: Option<String>,
    pub collector_number: Option<String>,
    pub frame_effects: Vec<String>,
}

impl CardRecord {
    pub fn from_json(json: &str) -> Result<Self, CardError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn layout(&self) -> &str {
        self.layout.as_deref().unwrap_or("normal")
    }

    /// Select one face. Single-faced cards only have a front.
    pub fn unpack(&self, face: Face) -> Result<UnpackedFace, CardError> {
        let (name, mana_cost, type_line, oracle_text, colours, power, toughness, loyalty, flavour) =
            if self.card_faces.is_empty() {
                if face == Face::Back {
                    return Err(CardError::MissingFace(face));
                }
                (
                    self.name.as_deref(),
                    self.mana_cost.as_deref(),
                    self.type_line.as_deref(),
                    self.oracle_text.as_deref(),
                    &self.color_identity,
                    self.power.clone(),
                    self.toughness.clone(),
                    self.loyalty.clone(),
                    self.flavor_text.as_deref(),
                )
            } else {
                let card_face = self
                    .card_faces
                    .get(face.index())
                    .ok_or(CardError::MissingFace(face))?;
                // Each face is framed by its own colours, not the whole card's.
                let colours = card_face.colors.as_ref().unwrap_or(&self.color_identity);
                (
                    card_face.name.as_deref(),
                    card_face.mana_cost.as_deref(),
                    card_face.type_line.as_deref(),
                    card_face.oracle_text.as_deref(),
                    colours,
                    card_face.power.clone(),
                    card_face.toughness.clone(),
                    card_face.loyalty.clone(),
                    card_face.flavor_text.as_deref(),
                )
            };

        Ok(UnpackedFace {
            name: name.ok_or(CardError::MissingField("name"))?.to_string(),
            layout: self.layout().to_string(),
            mana_cost: mana_cost.unwrap_or_default().to_string(),
            type_line: type_line.ok_or(CardError::MissingField("type_line"))?.to_string(),
            oracle_text: oracle_text.unwrap_or_default().replace('\u{2212}', "-"),
            colour_identity: parse_colours(colours)?,
            power,
            toughness,
            loyalty,
            flavour_text: flavour.unwrap_or_default().to_string(),
            rarity: self.rarity.clone().unwrap_or_else(|| "common".to_string()),
            artist: self.artist.clone(),
            set: self.set.clone(),
            collector_number: self.collector_number.clone(),
            frame_effects: self.frame_effects.clone(),
        })
    }

    pub fn attributes(&self, face: Face) -> Result<CardAttributes, CardError> {
        Ok(self.unpack(face)?.attributes())
    }
}

impl UnpackedFace {
    pub fn attributes(&self) -> CardAttributes {
        CardAttributes {
            mana_cost: self.mana_cost.clone(),
            type_line: self.type_line.clone(),
            oracle_text: self.oracle_text.clone(),
            colour_identity: self.colour_identity.clone(),
        }
    }

    pub fn traits(&self) -> CardTraits {
        let has_effect = |effect: &str| self.frame_effects.iter().any(|e| e == effect);
        CardTraits {
            is_creature: self.power.is_some() && self.toughness.is_some(),
            is_legendary: self.type_line.contains("Legendary") || has_effect("legendary"),
            is_land: self.type_line.contains("Land"),
            is_land_creature: self.type_line.contains("Land") && self.type_line.contains("Creature"),
            is_nyx: has_effect("nyxtouched"),
            is_companion: has_effect("companion"),
            has_mana_cost: !(self.mana_cost.is_empty() || self.mana_cost == "{0}"),
        }
    }
}

/// Card properties the layer plan needs beyond the frame selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardTraits {
    pub is_creature: bool,
    pub is_legendary: bool,
    pub is_land: bool,
    pub is_land_creature: bool,
    pub is_nyx: bool,
    pub is_companion: bool,
    pub has_mana_cost: bool,
}

pub fn parse_colours(letters: &[String]) -> Result<Vec<Colour>, CardError> {
    letters
        .iter()
        .map(|letter| {
            let mut chars = letter.chars();
            match (chars.next().and_then(Colour::from_char), chars.next()) {
                (Some(colour), None) => Ok(colour),
                _ => Err(CardError::InvalidColour(letter.clone())),
            }
        })
        .collect()
}

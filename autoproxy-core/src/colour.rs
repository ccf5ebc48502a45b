//! Colour System - Letters, Pairs and Frame Layer Names
//!
//! Every value the classifier emits is a `FrameLayer`, whose string form is
//! the layer name inside a template group ("W", "WU", "Gold", ...).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Colour {
    W,
    U,
    B,
    R,
    G,
}

impl Colour {
    /// Fixed enumeration order used for nonland identities.
    pub const ALL: [Colour; 5] = [Colour::W, Colour::U, Colour::B, Colour::R, Colour::G];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'W' => Some(Colour::W),
            'U' => Some(Colour::U),
            'B' => Some(Colour::B),
            'R' => Some(Colour::R),
            'G' => Some(Colour::G),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Colour::W => 'W',
            Colour::U => 'U',
            Colour::B => 'B',
            Colour::R => 'R',
            Colour::G => 'G',
        }
    }

    /// The basic land subtype that produces this colour.
    pub fn basic_land_type(self) -> &'static str {
        match self {
            Colour::W => "Plains",
            Colour::U => "Island",
            Colour::B => "Swamp",
            Colour::R => "Mountain",
            Colour::G => "Forest",
        }
    }

    /// Mana symbol as printed in costs and rules text, e.g. `{G}`.
    pub fn symbol(self) -> &'static str {
        match self {
            Colour::W => "{W}",
            Colour::U => "{U}",
            Colour::B => "{B}",
            Colour::R => "{R}",
            Colour::G => "{G}",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Ordered, duplicate-free collection of colours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColourSet {
    colours: Vec<Colour>,
}

impl ColourSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert preserving first-encounter order. Returns false on duplicates.
    pub fn insert(&mut self, colour: Colour) -> bool {
        if self.colours.contains(&colour) {
            return false;
        }
        self.colours.push(colour);
        true
    }

    /// Build a set ordered by `Colour::ALL` regardless of input order.
    pub fn wubrg(colours: impl IntoIterator<Item = Colour>) -> Self {
        let present: Vec<Colour> = colours.into_iter().collect();
        Self {
            colours: Colour::ALL.into_iter().filter(|c| present.contains(c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    pub fn first(&self) -> Option<Colour> {
        self.colours.first().copied()
    }

    pub fn as_slice(&self) -> &[Colour] {
        &self.colours
    }

    /// The canonical pair when exactly two colours are present.
    pub fn pair(&self) -> Option<ColourPair> {
        match self.colours.as_slice() {
            [a, b] => ColourPair::canonical(*a, *b),
            _ => None,
        }
    }

    /// Identity layer for sets of one or two colours.
    pub fn identity_layer(&self) -> Option<FrameLayer> {
        match self.colours.as_slice() {
            [c] => Some(FrameLayer::Mono(*c)),
            [a, b] => ColourPair::canonical(*a, *b).map(FrameLayer::Pair),
            _ => None,
        }
    }
}

impl fmt::Display for ColourSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pair() {
            Some(pair) => write!(f, "{}", pair),
            None => self.colours.iter().try_for_each(|c| write!(f, "{}", c)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourPair {
    WU,
    UB,
    BR,
    RG,
    GW,
    WB,
    BG,
    GU,
    UR,
    RW,
}

impl ColourPair {
    pub const ALL: [ColourPair; 10] = [
        ColourPair::WU,
        ColourPair::UB,
        ColourPair::BR,
        ColourPair::RG,
        ColourPair::GW,
        ColourPair::WB,
        ColourPair::BG,
        ColourPair::GU,
        ColourPair::UR,
        ColourPair::RW,
    ];

    /// Both orderings of each pair rewrite to one spelling.
    pub fn canonical(a: Colour, b: Colour) -> Option<Self> {
        use Colour::*;
        let pair = match (a, b) {
            (W, U) | (U, W) => ColourPair::WU,
            (U, B) | (B, U) => ColourPair::UB,
            (B, R) | (R, B) => ColourPair::BR,
            (R, G) | (G, R) => ColourPair::RG,
            (G, W) | (W, G) => ColourPair::GW,
            (W, B) | (B, W) => ColourPair::WB,
            (B, G) | (G, B) => ColourPair::BG,
            (G, U) | (U, G) => ColourPair::GU,
            (U, R) | (R, U) => ColourPair::UR,
            (R, W) | (W, R) => ColourPair::RW,
            _ => return None,
        };
        Some(pair)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColourPair::WU => "WU",
            ColourPair::UB => "UB",
            ColourPair::BR => "BR",
            ColourPair::RG => "RG",
            ColourPair::GW => "GW",
            ColourPair::WB => "WB",
            ColourPair::BG => "BG",
            ColourPair::GU => "GU",
            ColourPair::UR => "UR",
            ColourPair::RW => "RW",
        }
    }

    /// Hybrid symbol body for this pair, as it appears inside braces.
    pub fn hybrid_symbol(self) -> &'static str {
        match self {
            ColourPair::WU => "W/U",
            ColourPair::UB => "U/B",
            ColourPair::BR => "B/R",
            ColourPair::RG => "R/G",
            ColourPair::GW => "G/W",
            ColourPair::WB => "W/B",
            ColourPair::BG => "B/G",
            ColourPair::GU => "G/U",
            ColourPair::UR => "U/R",
            ColourPair::RW => "R/W",
        }
    }
}

impl fmt::Display for ColourPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrite a two-letter identity to its canonical spelling.
pub fn canonicalize_pair(identity: &str) -> Option<&'static str> {
    let mut chars = identity.chars();
    let a = Colour::from_char(chars.next()?)?;
    let b = Colour::from_char(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    ColourPair::canonical(a, b).map(ColourPair::as_str)
}

/// A named layer inside a template group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameLayer {
    Mono(Colour),
    Pair(ColourPair),
    Artifact,
    Colourless,
    Land,
    Gold,
    Vehicle,
}

impl FrameLayer {
    pub fn name(&self) -> &'static str {
        match self {
            FrameLayer::Mono(Colour::W) => "W",
            FrameLayer::Mono(Colour::U) => "U",
            FrameLayer::Mono(Colour::B) => "B",
            FrameLayer::Mono(Colour::R) => "R",
            FrameLayer::Mono(Colour::G) => "G",
            FrameLayer::Pair(pair) => pair.as_str(),
            FrameLayer::Artifact => "Artifact",
            FrameLayer::Colourless => "Colourless",
            FrameLayer::Land => "Land",
            FrameLayer::Gold => "Gold",
            FrameLayer::Vehicle => "Vehicle",
        }
    }
}

impl fmt::Display for FrameLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown frame layer: {0}")]
pub struct UnknownLayer(pub String);

impl FromStr for FrameLayer {
    type Err = UnknownLayer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let layer = match s {
            "Artifact" => FrameLayer::Artifact,
            "Colourless" => FrameLayer::Colourless,
            "Land" => FrameLayer::Land,
            "Gold" => FrameLayer::Gold,
            "Vehicle" => FrameLayer::Vehicle,
            _ => {
                let mut chars = s.chars();
                let layer = match (chars.next(), chars.next(), chars.next()) {
                    (Some(c), None, None) => Colour::from_char(c).map(FrameLayer::Mono),
                    (Some(_), Some(_), None) => ColourPair::ALL
                        .into_iter()
                        .find(|p| p.as_str() == s)
                        .map(FrameLayer::Pair),
                    _ => None,
                };
                layer.ok_or_else(|| UnknownLayer(s.to_string()))?
            }
        };
        Ok(layer)
    }
}

impl Serialize for FrameLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FrameLayer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_pairs_cover_all_orderings() {
        let mut seen = 0;
        for a in Colour::ALL {
            for b in Colour::ALL {
                if a == b {
                    assert_eq!(ColourPair::canonical(a, b), None);
                    continue;
                }
                let forward = ColourPair::canonical(a, b).unwrap();
                let reverse = ColourPair::canonical(b, a).unwrap();
                assert_eq!(forward, reverse);
                seen += 1;
            }
        }
        assert_eq!(seen, 20);
    }

    #[test]
    fn test_canonicalize_pair_strings() {
        assert_eq!(canonicalize_pair("UW"), Some("WU"));
        assert_eq!(canonicalize_pair("WG"), Some("GW"));
        assert_eq!(canonicalize_pair("BW"), Some("WB"));
        assert_eq!(canonicalize_pair("WR"), Some("RW"));
        assert_eq!(canonicalize_pair("UG"), Some("GU"));
        assert_eq!(canonicalize_pair("WW"), None);
        assert_eq!(canonicalize_pair("WUB"), None);
        assert_eq!(canonicalize_pair("XY"), None);
    }

    #[test]
    fn test_colour_set_orders() {
        let mut tapped = ColourSet::new();
        assert!(tapped.insert(Colour::G));
        assert!(tapped.insert(Colour::W));
        assert!(!tapped.insert(Colour::G));
        assert_eq!(tapped.as_slice(), &[Colour::G, Colour::W]);
        assert_eq!(tapped.to_string(), "GW");

        let ordered = ColourSet::wubrg([Colour::G, Colour::R, Colour::W]);
        assert_eq!(ordered.to_string(), "WRG");
    }

    #[test]
    fn test_frame_layer_names_parse_back() {
        let layers = [
            FrameLayer::Mono(Colour::B),
            FrameLayer::Pair(ColourPair::GU),
            FrameLayer::Colourless,
            FrameLayer::Vehicle,
        ];
        for layer in layers {
            assert_eq!(layer.name().parse::<FrameLayer>().unwrap(), layer);
        }
        assert!("UG".parse::<FrameLayer>().is_err());
        assert!("Purple".parse::<FrameLayer>().is_err());
    }

    #[test]
    fn test_frame_layer_serializes_as_layer_name() {
        let json = serde_json::to_string(&FrameLayer::Pair(ColourPair::RW)).unwrap();
        assert_eq!(json, r#""RW""#);
        let back: FrameLayer = serde_json::from_str(r#""Gold""#).unwrap();
        assert_eq!(back, FrameLayer::Gold);
    }
}

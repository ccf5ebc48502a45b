//! Frame Classifier - Card Text to Frame Layers
//!
//! A pure function from card text to the background, pinlines and name-box
//! layers of a frame. Lands are judged by the mana they produce; everything
//! else by colour identity.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::card::CardAttributes;
use crate::colour::{Colour, ColourPair, ColourSet, FrameLayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSelection {
    pub background: FrameLayer,
    pub pinlines: FrameLayer,
    pub twins: FrameLayer,
    pub is_colourless: bool,
}

impl FrameSelection {
    fn land(pinlines: FrameLayer, twins: FrameLayer) -> Self {
        Self {
            background: FrameLayer::Land,
            pinlines,
            twins,
            is_colourless: false,
        }
    }
}

const ANY_COLOUR_HINTS: [&str; 4] = ["color ", "colors ", "color.", "colors."];
const LIMITED_MANA_ABILITIES: [&str; 4] = [
    "enters the battlefield",
    "Remove a charge counter",
    "Sacrifice",
    "luck counter",
];

/// Classify a card into frame layers.
pub fn classify(card: &CardAttributes) -> FrameSelection {
    if card.is_land() {
        classify_land(&card.type_line, &card.oracle_text)
    } else {
        classify_nonland(card)
    }
}

pub fn classify_land(type_line: &str, oracle_text: &str) -> FrameSelection {
    let mut basic_types = ColourSet::new();
    for colour in Colour::ALL {
        if type_line.contains(colour.basic_land_type()) {
            basic_types.insert(colour);
        }
    }

    if let Some(pair) = basic_types.pair() {
        debug!(%pair, "dual basic land types");
        return FrameSelection::land(FrameLayer::Pair(pair), FrameLayer::Land);
    }

    for line in oracle_text.lines() {
        if let Some(selection) = fetch_land(line) {
            return selection;
        }
    }

    for line in oracle_text.lines() {
        if produces_any_colour(line) {
            debug!(line, "land taps for any colour");
            return FrameSelection::land(FrameLayer::Gold, FrameLayer::Gold);
        }
    }

    let mut tapped = ColourSet::new();
    for line in oracle_text.lines() {
        if !is_tap_for_mana(line) {
            continue;
        }
        for colour in Colour::ALL {
            if line.contains(colour.symbol()) {
                tapped.insert(colour);
            }
        }
    }
    debug!(colours_tapped = %tapped, basic_types = %basic_types, "tapped mana tally");

    // A single basic land type always names the twins colour, and names the
    // pinlines too when nothing taps for coloured mana.
    let basic = basic_types.first().filter(|_| basic_types.len() == 1);

    let (pinlines, twins) = match tapped.as_slice() {
        [] => (FrameLayer::Land, FrameLayer::Land),
        [colour] => (FrameLayer::Mono(*colour), FrameLayer::Mono(*colour)),
        [a, b] => match ColourPair::canonical(*a, *b) {
            Some(pair) => (FrameLayer::Pair(pair), FrameLayer::Land),
            None => (FrameLayer::Land, FrameLayer::Land),
        },
        _ => (FrameLayer::Gold, FrameLayer::Gold),
    };

    match basic {
        Some(colour) if tapped.is_empty() => {
            FrameSelection::land(FrameLayer::Mono(colour), FrameLayer::Mono(colour))
        }
        Some(colour) => FrameSelection::land(pinlines, FrameLayer::Mono(colour)),
        None => FrameSelection::land(pinlines, twins),
    }
}

/// Fetch-land lines search the library for lands; cycling searches do not count.
fn fetch_land(line: &str) -> Option<FrameSelection> {
    let lower = line.to_lowercase();
    if !lower.contains("search your library") || lower.contains("cycling") {
        return None;
    }

    let mut named = ColourSet::new();
    for colour in Colour::ALL {
        if line.contains(colour.basic_land_type()) {
            named.insert(colour);
        }
    }
    debug!(line, named = %named, "fetch land");

    match named.as_slice() {
        [colour] => Some(FrameSelection::land(
            FrameLayer::Mono(*colour),
            FrameLayer::Mono(*colour),
        )),
        [_, _] => named
            .pair()
            .map(|pair| FrameSelection::land(FrameLayer::Pair(pair), FrameLayer::Land)),
        [] if line.contains("land") => {
            let enters_tapped = line.contains("tapped") && !line.contains("untap");
            if enters_tapped {
                Some(FrameSelection::land(FrameLayer::Land, FrameLayer::Land))
            } else {
                Some(FrameSelection::land(FrameLayer::Gold, FrameLayer::Gold))
            }
        }
        [] => None,
        _ => Some(FrameSelection::land(FrameLayer::Land, FrameLayer::Land)),
    }
}

fn produces_any_colour(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("add")
        && line.contains("mana")
        && ANY_COLOUR_HINTS.iter().any(|hint| line.contains(hint))
        && !LIMITED_MANA_ABILITIES.iter().any(|limit| line.contains(limit))
}

/// `{T}` must sit in the activation cost, before the colon.
fn is_tap_for_mana(line: &str) -> bool {
    match (line.find("{T}"), line.find(':')) {
        (Some(tap), Some(colon)) => tap < colon && line.to_lowercase().contains("add"),
        _ => false,
    }
}

/// Colour identity for a nonland card, in WUBRG order.
pub fn nonland_identity(card: &CardAttributes) -> ColourSet {
    let no_cost = card.mana_cost.is_empty()
        || (card.mana_cost == "{0}" && !card.type_line.contains("Artifact"));

    if card.oracle_text.contains(" is all colors.") {
        return ColourSet::wubrg(Colour::ALL);
    }

    if no_cost {
        return ColourSet::wubrg(card.colour_identity.iter().copied());
    }

    ColourSet::wubrg(Colour::ALL.into_iter().filter(|colour| {
        let letter = colour.letter();
        card.mana_cost.contains(&format!("{{{letter}"))
            || card.mana_cost.contains(&format!("{letter}}}"))
    }))
}

pub fn classify_nonland(card: &CardAttributes) -> FrameSelection {
    let identity = nonland_identity(card);
    let is_artifact = card.type_line.contains("Artifact");
    let is_devoid = card.oracle_text.contains("Devoid") && !identity.is_empty();

    let colourless = (identity.is_empty() && !is_artifact)
        || is_devoid
        || (card.mana_cost.is_empty() && card.type_line.contains("Eldrazi"));

    if colourless {
        let mut selection = FrameSelection {
            background: FrameLayer::Colourless,
            pinlines: FrameLayer::Colourless,
            twins: FrameLayer::Colourless,
            is_colourless: true,
        };
        if is_devoid {
            let devoid = match identity.as_slice() {
                [colour] => FrameLayer::Mono(*colour),
                _ => FrameLayer::Gold,
            };
            selection.background = devoid;
            selection.twins = devoid;
        }
        debug!(identity = %identity, is_devoid, "colourless frame");
        return selection;
    }

    let hybrid = identity.len() == 2
        && ColourPair::ALL
            .iter()
            .any(|pair| card.mana_cost.contains(pair.hybrid_symbol()));

    let identity_layer = identity.identity_layer();

    let mut background = if is_artifact {
        FrameLayer::Artifact
    } else if hybrid {
        identity_layer.unwrap_or(FrameLayer::Gold)
    } else if identity.len() >= 2 {
        FrameLayer::Gold
    } else {
        identity_layer.unwrap_or_else(|| {
            warn!(type_line = %card.type_line, "no identity for coloured background");
            FrameLayer::Artifact
        })
    };
    if card.type_line.contains("Vehicle") {
        background = FrameLayer::Vehicle;
    }

    let pinlines = match identity.len() {
        0 => FrameLayer::Artifact,
        1 | 2 => identity_layer.unwrap_or(FrameLayer::Gold),
        _ => FrameLayer::Gold,
    };

    let twins = match identity.len() {
        0 => FrameLayer::Artifact,
        1 => identity_layer.unwrap_or(FrameLayer::Gold),
        _ if hybrid => FrameLayer::Land,
        _ => FrameLayer::Gold,
    };

    debug!(identity = %identity, hybrid, %background, %pinlines, %twins, "nonland frame");
    FrameSelection {
        background,
        pinlines,
        twins,
        is_colourless: false,
    }
}

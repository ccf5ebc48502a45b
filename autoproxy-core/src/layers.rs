//! Layer Plan - Frame Selection to Layer Visibility
//!
//! The renderer applies these operations in order against the template.

use serde::{Deserialize, Serialize};

use crate::card::CardTraits;
use crate::colour::FrameLayer;
use crate::frame::FrameSelection;

pub mod names {
    pub const TWINS: &str = "Name & Title Boxes";
    pub const PT_BOX: &str = "PT Box";
    pub const PINLINES_TEXTBOX: &str = "Pinlines & Textbox";
    pub const LAND_PINLINES_TEXTBOX: &str = "Land Pinlines & Textbox";
    pub const BACKGROUND: &str = "Background";
    pub const NYX: &str = "Nyx";
    pub const LEGENDARY_CROWN: &str = "Legendary Crown";
    pub const BORDER: &str = "Border";
    pub const NORMAL_BORDER: &str = "Normal Border";
    pub const LEGENDARY_BORDER: &str = "Legendary Border";
    pub const SHADOWS: &str = "Shadows";
    pub const HOLLOW_CROWN_SHADOW: &str = "Hollow Crown Shadow";
    pub const COLOUR_INDICATOR: &str = "Colour Indicator";
    pub const TEXT_AND_ICONS: &str = "Text and Icons";
    pub const TYPE_LINE: &str = "Typeline";
    pub const TYPE_LINE_SHIFT: &str = "Typeline Shift";
    pub const ART_FRAME: &str = "Art Frame";
    pub const FULL_ART_FRAME: &str = "Full Art Frame";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LayerOp {
    Show { group: String, layer: String },
    Hide { group: String, layer: String },
    ShowTopLevel { layer: String },
    EnableMask { layer: String },
}

impl LayerOp {
    fn show(group: &str, layer: impl ToString) -> Self {
        LayerOp::Show {
            group: group.to_string(),
            layer: layer.to_string(),
        }
    }

    fn hide(group: &str, layer: &str) -> Self {
        LayerOp::Hide {
            group: group.to_string(),
            layer: layer.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPlan {
    /// Reference layer the artwork is framed against.
    pub art_frame: String,
    pub ops: Vec<LayerOp>,
}

impl LayerPlan {
    pub fn build(selection: &FrameSelection, traits: &CardTraits) -> Self {
        let mut ops = vec![LayerOp::show(names::TWINS, selection.twins)];

        if traits.is_creature {
            let pt_layer = if selection.background == FrameLayer::Vehicle {
                FrameLayer::Vehicle
            } else {
                selection.twins
            };
            ops.push(LayerOp::show(names::PT_BOX, pt_layer));
        }

        let pinlines_group = if traits.is_land {
            names::LAND_PINLINES_TEXTBOX
        } else {
            names::PINLINES_TEXTBOX
        };
        ops.push(LayerOp::show(pinlines_group, selection.pinlines));

        let background_group = if traits.is_nyx { names::NYX } else { names::BACKGROUND };
        ops.push(LayerOp::show(background_group, selection.background));

        if traits.is_legendary {
            ops.push(LayerOp::show(names::LEGENDARY_CROWN, selection.pinlines));
            ops.push(LayerOp::hide(names::BORDER, names::NORMAL_BORDER));
            ops.push(LayerOp::show(names::BORDER, names::LEGENDARY_BORDER));
        }

        if (traits.is_legendary && traits.is_nyx) || traits.is_companion {
            ops.push(LayerOp::EnableMask {
                layer: pinlines_group.to_string(),
            });
            ops.push(LayerOp::EnableMask {
                layer: names::SHADOWS.to_string(),
            });
            ops.push(LayerOp::ShowTopLevel {
                layer: names::HOLLOW_CROWN_SHADOW.to_string(),
            });
        }

        if needs_colour_indicator(selection, traits) {
            ops.push(LayerOp::show(names::COLOUR_INDICATOR, selection.pinlines));
            ops.push(LayerOp::hide(names::TEXT_AND_ICONS, names::TYPE_LINE));
            ops.push(LayerOp::show(names::TEXT_AND_ICONS, names::TYPE_LINE_SHIFT));
        }

        let art_frame = if selection.is_colourless {
            names::FULL_ART_FRAME
        } else {
            names::ART_FRAME
        };

        Self {
            art_frame: art_frame.to_string(),
            ops,
        }
    }

    /// Layers shown inside `group`, in plan order.
    pub fn shown_in(&self, group: &str) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                LayerOp::Show { group: g, layer } if g == group => Some(layer.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Costless cards show their colour in a dot beside the type line.
/// Lands are exempt unless they are also creatures.
fn needs_colour_indicator(selection: &FrameSelection, traits: &CardTraits) -> bool {
    !traits.has_mana_cost
        && (!traits.is_land || traits.is_land_creature)
        && selection.pinlines != FrameLayer::Artifact
        && !selection.is_colourless
}

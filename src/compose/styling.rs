use std::collections::{BTreeMap, BTreeSet};

use crate::{
    document::model::{Document, LAYER_LABEL_ATTR},
    geometry::element::GeometryElement,
    geometry::style::Style,
};

pub const LINE_STYLE: &str = "fill:none;stroke:#000000;stroke-width:0.58405101;stroke-linecap:butt;stroke-linejoin:miter;stroke-miterlimit:4;stroke-dasharray:none;stroke-opacity:1";
pub const SHADOW_STYLE: &str = "display:inline;fill:none;stroke:#000000;stroke-width:7;stroke-linecap:butt;stroke-linejoin:miter;stroke-miterlimit:4;stroke-dasharray:none;stroke-opacity:1;filter:url(#filter6343)";
pub const OUTLINE_STYLE: &str = "display:inline;opacity:0.5;fill:none;stroke:#000000;stroke-width:0.07;stroke-linecap:butt;stroke-linejoin:miter;stroke-miterlimit:4;stroke-dasharray:none;stroke-opacity:1";
pub const BODY_STYLE: &str = "display:inline;fill:#eac6b6;fill-opacity:1;fill-rule:evenodd;stroke:none";

const EYE_IDS: [&str; 6] = [
    "eye_lower_l",
    "eye_upper_l",
    "eye_lid_l",
    "eye_lower_r",
    "eye_upper_r",
    "eye_lid_r",
];
const BODY_LAYERS: [&str; 5] = ["face", "arms", "legs", "boobs", "torso"];

/// Style preset applied to every element whose id starts with `prefix`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub style: Style,
}

/// Convention-based styling of composed documents.
///
/// First match wins: id prefix, then the body id set, then the body layer set. Elements no
/// rule matches keep their authored style.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleRules {
    pub prefixes: Vec<PrefixRule>,
    pub body_ids: BTreeSet<String>,
    pub body_layers: BTreeSet<String>,
    pub body_style: Style,
}

impl Default for StyleRules {
    fn default() -> Self {
        let preset = |s: &str| Style::parse(s).unwrap_or_default();
        let prefix = |p: &str, s: &str| PrefixRule {
            prefix: p.to_string(),
            style: preset(s),
        };
        Self {
            prefixes: vec![
                prefix("line_", LINE_STYLE),
                prefix("shadow_", SHADOW_STYLE),
                prefix("outline_", OUTLINE_STYLE),
            ],
            body_ids: EYE_IDS.iter().map(|s| s.to_string()).collect(),
            body_layers: BODY_LAYERS.iter().map(|s| s.to_string()).collect(),
            body_style: preset(BODY_STYLE),
        }
    }
}

impl StyleRules {
    /// Preset for `elemid` drawn in layer `layer`, if any rule matches.
    pub fn style_for(&self, elemid: &str, layer: &str) -> Option<&Style> {
        if let Some(rule) = self.prefixes.iter().find(|r| elemid.starts_with(&r.prefix)) {
            return Some(&rule.style);
        }
        if self.body_ids.contains(elemid) || self.body_layers.contains(layer) {
            return Some(&self.body_style);
        }
        None
    }

    /// Style every layer of `doc`; `overrides` beat every rule.
    ///
    /// Layer groups only take an override; rules apply to their contents.
    pub fn apply(&self, doc: &mut Document, overrides: &BTreeMap<String, Style>) {
        for layer in &mut doc.layers {
            let GeometryElement::Group(group) = layer else {
                continue;
            };
            let label = group
                .attributes
                .get(LAYER_LABEL_ATTR)
                .cloned()
                .unwrap_or_else(|| group.id.clone());
            for child in &mut group.children {
                child.walk_mut(&mut |elem| {
                    if let Some(style) = overrides
                        .get(elem.id())
                        .or_else(|| self.style_for(elem.id(), &label))
                    {
                        elem.set_style(Some(style.clone()));
                    }
                });
            }
            if let Some(style) = overrides.get(&group.id) {
                group.style = Some(style.clone());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/styling.rs"]
mod tests;

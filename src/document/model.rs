use std::collections::BTreeMap;

use crate::{
    foundation::core::{PathEl, ViewBox},
    foundation::error::{DollError, DollResult},
    foundation::math::{Fnv1a64, command_letter, map_points},
    geometry::element::GeometryElement,
};

/// Opaque definition node (filter, gradient, ...) copied verbatim from a template source.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DefNode {
    /// XML tag name, e.g. `filter` or `linearGradient`.
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<DefNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DefNode {
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }
}

/// Composed drawing: ordered layer groups plus definitions.
///
/// Produced by the compositor and consumed by serializers; element ids are unique across the
/// whole document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub viewbox: ViewBox,
    /// Layer groups in drawing order.
    pub layers: Vec<GeometryElement>,
    pub defs: Vec<DefNode>,
}

impl Document {
    /// Id of the `<defs>` section.
    pub fn defs_id(&self) -> String {
        format!("defs_{}", self.id)
    }

    /// Every element below the document root, layer groups included, in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = &GeometryElement> {
        self.layers.iter().flat_map(GeometryElement::iter)
    }

    /// Visit every element below the document root mutably.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut GeometryElement)) {
        for layer in &mut self.layers {
            layer.walk_mut(&mut *f);
        }
    }

    /// Flat element id index. Fails on duplicate ids.
    pub fn index(&self) -> DollResult<BTreeMap<&str, &GeometryElement>> {
        let mut index = BTreeMap::new();
        for elem in self.iter() {
            if elem.id() == self.id || index.insert(elem.id(), elem).is_some() {
                return Err(DollError::configuration(format!(
                    "duplicate element id '{}' in composed document",
                    elem.id()
                )));
            }
        }
        Ok(index)
    }

    /// Element by id.
    pub fn get(&self, id: &str) -> Option<&GeometryElement> {
        self.iter().find(|e| e.id() == id)
    }

    /// Layer group by its label.
    pub fn layer(&self, label: &str) -> Option<&GeometryElement> {
        self.layers.iter().find(|l| match l {
            GeometryElement::Group(g) => {
                g.attributes.get(LAYER_LABEL_ATTR).map(String::as_str) == Some(label)
            }
            _ => false,
        })
    }

    /// Prepend `prefix` to the document id and every element id.
    pub fn prefix_ids(&mut self, prefix: &str) {
        self.id = format!("{prefix}{}", self.id);
        self.walk_mut(&mut |e| {
            let id = format!("{prefix}{}", e.id());
            e.set_id(id);
        });
    }

    /// Stable hash over structure, ids, styles and coordinate bits.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_str(&self.id);
        h.write_f64(self.width);
        h.write_f64(self.height);
        h.write_str(&self.viewbox.to_string());
        for elem in self.iter() {
            h.write_str(elem.id());
            h.write_u64(elem.children().len() as u64);
            match elem.style() {
                Some(style) => h.write_str(&style.to_string()),
                None => h.write_u8(0),
            }
            if let GeometryElement::Path(p) = elem {
                for el in p.path.elements() {
                    hash_path_el(&mut h, el);
                }
            }
        }
        h.finish()
    }
}

/// Attribute naming a layer group in Inkscape-compatible output.
pub const LAYER_LABEL_ATTR: &str = "inkscape:label";
/// Attribute marking a group as a layer.
pub const LAYER_MODE_ATTR: &str = "inkscape:groupmode";

fn hash_path_el(h: &mut Fnv1a64, el: &PathEl) {
    h.write_u8(command_letter(el) as u8);
    map_points(*el, |p| {
        h.write_f64(p.x);
        h.write_f64(p.y);
        p
    });
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;

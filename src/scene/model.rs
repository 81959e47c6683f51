use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::{
    animation::anim::InterpMode,
    compose::layer::Layer,
    compose::styling::StyleRules,
    document::model::DefNode,
    foundation::error::{DollError, DollResult},
    geometry::style::Style,
};

/// JSON description of a doll: geometry, animations, dials, layers and template defs.
///
/// One document may describe a whole doll or a part of it; parts are combined with
/// [`DollDef::merge`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DollDef {
    pub geometry: Vec<ElementDef>,
    pub animations: Vec<AnimationDef>,
    pub dials: Vec<DialDef>,
    pub layers: Vec<Layer>,
    /// Template definitions (filters, gradients) copied into drawn documents.
    pub defs: Vec<DefNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleRules>,
}

/// Geometry element as written in a description file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(flatten)]
    pub shape: ShapeDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conform: Option<ConformDef>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDef {
    /// SVG path data.
    Path { d: String },
    Group {
        #[serde(default)]
        children: Vec<ElementDef>,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
}

/// Conforming rule of a path: which target it follows and which commands are pinned.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConformDef {
    pub target: String,
    pub anchors: Vec<AnchorDef>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnchorDef {
    pub command: usize,
    pub target_command: usize,
    /// Distance from the target point. Taken from the authored shapes when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<[f64; 2]>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationDef {
    pub name: String,
    pub minimum: i64,
    pub maximum: i64,
    pub default: i64,
    pub rule: RuleDef,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDef {
    Simple(TrackDef),
    Combined {
        base: ElementDef,
        axes: Vec<AxisDef>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackDef {
    #[serde(default)]
    pub interp: InterpMode,
    pub keys: Vec<KeyDef>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyDef {
    pub at: i64,
    pub frame: ElementDef,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AxisDef {
    pub state: String,
    #[serde(flatten)]
    pub track: TrackDef,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DialDef {
    pub name: String,
    #[serde(default = "default_dial_minimum")]
    pub minimum: i64,
    #[serde(default = "default_dial_maximum")]
    pub maximum: i64,
    #[serde(default)]
    pub animations: Vec<DialAnimationDef>,
}

fn default_dial_minimum() -> i64 {
    1
}

fn default_dial_maximum() -> i64 {
    100
}

/// Animation bound to a dial, with the range the dial drives it through.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DialAnimationDef {
    pub name: String,
    pub minimum: i64,
    pub init: i64,
    pub maximum: i64,
}

impl DollDef {
    /// Parse a description from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DollResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DollError::serde(format!("parse doll description JSON: {e}")))
    }

    /// Parse a description from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> DollResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DollError::Other(anyhow::anyhow!(
                "open doll description '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(f)).map_err(|e| match e {
            DollError::Serde(msg) => DollError::serde(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Load and merge every `*.json` file in `dir`, in file name order.
    #[tracing::instrument]
    pub fn from_dir(dir: &Path) -> DollResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| {
            DollError::Other(anyhow::anyhow!("read description dir '{}': {e}", dir.display()))
        })?;
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| DollError::Other(anyhow::anyhow!("list '{}': {e}", dir.display())))?
                .path();
            if path.is_file() && path.extension().is_some_and(|x| x == "json") {
                files.push(path);
            }
        }
        files.sort();
        if files.is_empty() {
            return Err(DollError::configuration(format!(
                "no description files in '{}'",
                dir.display()
            )));
        }

        let mut merged = Self::default();
        for path in &files {
            tracing::debug!(file = %path.display(), "loading description");
            merged.merge(Self::from_path(path)?);
        }
        Ok(merged)
    }

    /// Fold `other` into `self`. Entries already present win.
    ///
    /// Geometry and animations with a known name are dropped with a warning; dials with a
    /// known name gain the new bindings; layers are appended; defs and style rules are only
    /// taken when `self` has none.
    pub fn merge(&mut self, other: DollDef) {
        let mut known: BTreeSet<String> = self.geometry.iter().map(|g| g.id.clone()).collect();
        for elem in other.geometry {
            if known.insert(elem.id.clone()) {
                self.geometry.push(elem);
            } else {
                tracing::warn!(id = %elem.id, "ignoring duplicate geometry definition");
            }
        }

        let mut known: BTreeSet<String> =
            self.animations.iter().map(|a| a.name.clone()).collect();
        for anim in other.animations {
            if known.insert(anim.name.clone()) {
                self.animations.push(anim);
            } else {
                tracing::warn!(name = %anim.name, "ignoring duplicate animation definition");
            }
        }

        for dial in other.dials {
            match self.dials.iter_mut().find(|d| d.name == dial.name) {
                Some(existing) => existing.animations.extend(dial.animations),
                None => self.dials.push(dial),
            }
        }

        self.layers.extend(other.layers);
        if self.defs.is_empty() {
            self.defs = other.defs;
        }
        if self.style.is_none() {
            self.style = other.style;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

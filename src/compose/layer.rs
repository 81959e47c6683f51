use std::collections::BTreeMap;

/// One content reference inside a layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerEntry {
    /// Current frame of the named animation, flattened to its leaves.
    Animation { name: String },
    /// Path `id` following commands `[start, end)` of `base_geometry`.
    TraceOutline {
        id: String,
        base_geometry: String,
        start: usize,
        end: i64,
    },
    /// Copy of static geometry, conformed against the current draw.
    Geometry { id: String },
    /// Source content the compositor does not interpret.
    Opaque {
        tag: String,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
}

/// Named, ordered list of content entries.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<LayerEntry>,
}

impl Layer {
    pub fn new(name: impl Into<String>, entries: Vec<LayerEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Id of the group this layer becomes in a composed document.
    pub fn group_id(&self) -> String {
        format!("layer_{}", self.name.to_lowercase())
    }
}

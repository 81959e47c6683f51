use std::collections::BTreeMap;

use crate::{
    animation::anim::{
        Animation, AnimationRule, CombinedAxis, CombinedRule, Keyframe, Keyframes,
    },
    compose::layer::{Layer, LayerEntry},
    compose::styling::StyleRules,
    dial::board::DialBoard,
    dial::controller::Dial,
    document::model::DefNode,
    foundation::core::Vec2,
    foundation::error::{DollError, DollResult},
    geometry::delta::{Anchor, Delta},
    geometry::element::{GeometryElement, Group, PathElement},
    geometry::resolver::GeometryTable,
    scene::model::{DollDef, ElementDef, RuleDef, ShapeDef, TrackDef},
    state::store::AnimationState,
};

/// Validated, immutable doll definition shared by every session built from it.
#[derive(Clone, Debug)]
pub struct Doll {
    pub geometry: GeometryTable,
    /// Animations in definition order.
    pub animations: Vec<Animation>,
    /// Dials in their initial position; sessions work on a copy.
    pub dials: DialBoard,
    pub layers: Vec<Layer>,
    pub defs: Vec<DefNode>,
    pub style: StyleRules,
}

impl Doll {
    /// Validate `def` and convert it to runtime types.
    #[tracing::instrument(skip_all, fields(
        geometry = def.geometry.len(),
        animations = def.animations.len(),
        dials = def.dials.len(),
        layers = def.layers.len(),
    ))]
    pub fn build(def: DollDef) -> DollResult<Self> {
        let DollDef {
            geometry,
            animations,
            dials,
            layers,
            defs,
            style,
        } = def;

        // authored shapes, without deltas, for computing anchor offsets
        let mut authored: BTreeMap<String, GeometryElement> = BTreeMap::new();
        for elem in &geometry {
            remember(&mut authored, &plain_element(elem)?);
        }
        for anim in &animations {
            for elem in frame_defs(&anim.rule) {
                remember(&mut authored, &plain_element(elem)?);
            }
        }

        let mut roots = Vec::with_capacity(geometry.len());
        for elem in &geometry {
            roots.push(build_element(elem, &authored)?);
        }
        let table = GeometryTable::from_roots(roots)?;

        let mut runtime_anims: Vec<Animation> = Vec::with_capacity(animations.len());
        for anim in &animations {
            if runtime_anims.iter().any(|a| a.name == anim.name) {
                return Err(DollError::configuration(format!(
                    "animation '{}' is defined twice",
                    anim.name
                )));
            }
            let rule = match &anim.rule {
                RuleDef::Simple(track) => AnimationRule::Simple(build_track(track, &authored)?),
                RuleDef::Combined { base, axes } => {
                    let mut built = Vec::with_capacity(axes.len());
                    for axis in axes {
                        built.push(CombinedAxis {
                            state: axis.state.clone(),
                            keys: build_track(&axis.track, &authored)?,
                        });
                    }
                    AnimationRule::Combined(CombinedRule {
                        base: build_element(base, &authored)?,
                        axes: built,
                    })
                }
            };
            runtime_anims.push(Animation::new(
                anim.name.clone(),
                anim.minimum,
                anim.default,
                anim.maximum,
                rule,
            )?);
        }
        for anim in &runtime_anims {
            for input in anim.inputs() {
                if !runtime_anims.iter().any(|a| a.name == input) {
                    return Err(DollError::configuration(format!(
                        "combined animation '{}' reads unknown state '{input}'",
                        anim.name
                    )));
                }
            }
        }

        let mut board = DialBoard::new();
        for dial in &dials {
            let mut built = Dial::new(dial.name.clone(), dial.minimum, dial.maximum)?;
            for bind in &dial.animations {
                if !runtime_anims.iter().any(|a| a.name == bind.name) {
                    return Err(DollError::configuration(format!(
                        "dial '{}' binds unknown animation '{}'",
                        dial.name, bind.name
                    )));
                }
                built.add_animation(bind.name.clone(), bind.minimum, bind.init, bind.maximum)?;
            }
            if built.bindings().is_empty() {
                return Err(DollError::configuration(format!(
                    "dial '{}' controls no animations",
                    dial.name
                )));
            }
            board.insert(built)?;
        }

        let mut seen_layers: Vec<&str> = Vec::with_capacity(layers.len());
        for layer in &layers {
            if seen_layers.contains(&layer.name.as_str()) {
                return Err(DollError::configuration(format!(
                    "layer '{}' is defined twice",
                    layer.name
                )));
            }
            seen_layers.push(&layer.name);
            for entry in &layer.entries {
                check_entry(layer, entry, &table, &runtime_anims, &authored)?;
            }
        }

        tracing::debug!(
            geometry = table.len(),
            animations = runtime_anims.len(),
            dials = board.len(),
            "doll built"
        );
        Ok(Self {
            geometry: table,
            animations: runtime_anims,
            dials: board,
            layers,
            defs,
            style: style.unwrap_or_default(),
        })
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    /// Every animation at its default value.
    pub fn initial_state(&self) -> DollResult<AnimationState> {
        let mut state = AnimationState::new();
        for anim in &self.animations {
            state.register(anim.name.clone(), anim.minimum, anim.maximum, anim.default)?;
        }
        Ok(state)
    }
}

fn check_entry(
    layer: &Layer,
    entry: &LayerEntry,
    table: &GeometryTable,
    animations: &[Animation],
    authored: &BTreeMap<String, GeometryElement>,
) -> DollResult<()> {
    match entry {
        LayerEntry::Animation { name } if !animations.iter().any(|a| &a.name == name) => {
            Err(DollError::configuration(format!(
                "layer '{}' references unknown animation '{name}'",
                layer.name
            )))
        }
        LayerEntry::Geometry { id } if !table.contains(id) => {
            Err(DollError::configuration(format!(
                "layer '{}' references unknown geometry '{id}'",
                layer.name
            )))
        }
        LayerEntry::TraceOutline {
            id, base_geometry, ..
        } if !authored.contains_key(base_geometry) => Err(DollError::configuration(format!(
            "layer '{}' traces '{id}' from unknown geometry '{base_geometry}'",
            layer.name
        ))),
        _ => Ok(()),
    }
}

fn frame_defs(rule: &RuleDef) -> Vec<&ElementDef> {
    match rule {
        RuleDef::Simple(track) => track.keys.iter().map(|k| &k.frame).collect(),
        RuleDef::Combined { base, axes } => std::iter::once(base)
            .chain(axes.iter().flat_map(|a| a.track.keys.iter().map(|k| &k.frame)))
            .collect(),
    }
}

/// First authored shape per id wins.
fn remember(authored: &mut BTreeMap<String, GeometryElement>, root: &GeometryElement) {
    for elem in root.iter() {
        authored
            .entry(elem.id().to_string())
            .or_insert_with(|| elem.clone());
    }
}

fn build_track(
    track: &TrackDef,
    authored: &BTreeMap<String, GeometryElement>,
) -> DollResult<Keyframes> {
    let mut keys = Vec::with_capacity(track.keys.len());
    for key in &track.keys {
        keys.push(Keyframe {
            at: key.at,
            frame: build_element(&key.frame, authored)?,
        });
    }
    Ok(Keyframes {
        keys,
        mode: track.interp,
    })
}

fn plain_element(def: &ElementDef) -> DollResult<GeometryElement> {
    convert(def, &mut |_, path| Ok(path))
}

fn build_element(
    def: &ElementDef,
    authored: &BTreeMap<String, GeometryElement>,
) -> DollResult<GeometryElement> {
    convert(def, &mut |def, path| {
        let Some(conform) = &def.conform else {
            return Ok(path);
        };
        let target = authored
            .get(&conform.target)
            .ok_or_else(|| {
                DollError::configuration(format!(
                    "'{}' conforms to unknown geometry '{}'",
                    def.id, conform.target
                ))
            })?
            .as_path()
            .ok_or_else(|| {
                DollError::configuration(format!(
                    "'{}' conforms to '{}', which is not a path",
                    def.id, conform.target
                ))
            })?;
        let computed: Vec<(usize, usize)> = conform
            .anchors
            .iter()
            .map(|a| (a.command, a.target_command))
            .collect();
        let mut delta = Delta::between(&conform.target, &path.path, &target.path, &computed)?;
        for (anchor, given) in delta.anchors.iter_mut().zip(&conform.anchors) {
            if let Some([dx, dy]) = given.offset {
                *anchor = Anchor {
                    offset: Vec2::new(dx, dy),
                    ..*anchor
                };
            }
        }
        Ok(path.with_delta(delta))
    })
}

fn convert(
    def: &ElementDef,
    on_path: &mut impl FnMut(&ElementDef, PathElement) -> DollResult<PathElement>,
) -> DollResult<GeometryElement> {
    match &def.shape {
        ShapeDef::Path { d } => {
            let mut path = PathElement::from_svg(def.id.clone(), d)?;
            path.style = def.style.clone();
            Ok(GeometryElement::Path(on_path(def, path)?))
        }
        ShapeDef::Group {
            children,
            attributes,
        } => {
            if def.conform.is_some() {
                return Err(DollError::configuration(format!(
                    "group '{}' cannot conform; only paths carry deltas",
                    def.id
                )));
            }
            let mut built = Vec::with_capacity(children.len());
            for child in children {
                built.push(convert(child, &mut *on_path)?);
            }
            Ok(GeometryElement::Group(Group {
                id: def.id.clone(),
                style: def.style.clone(),
                attributes: attributes.clone(),
                children: built,
            }))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/doll.rs"]
mod tests;

use std::collections::BTreeMap;

use crate::{
    compose::defs::{TEMPLATE_DEF_TAGS, merge_defs},
    compose::layer::LayerEntry,
    document::model::{Document, LAYER_LABEL_ATTR, LAYER_MODE_ATTR},
    foundation::core::DrawOpts,
    foundation::error::{DollError, DollResult},
    foundation::math::{map_points, round_decimal},
    geometry::element::{GeometryElement, Group},
    geometry::resolver::GeometryResolver,
    geometry::style::Style,
    geometry::trace::trace_outline,
    scene::doll::Doll,
    state::store::AnimationState,
};

/// Id of every composed document before export prefixing.
pub const DOCUMENT_ID: &str = "paperdoll1";
/// Fractional digits kept in composed coordinates.
pub const COORD_DIGITS: i32 = 3;

/// Compose the doll for the current state.
///
/// Pure function of `state`, the static definitions in `doll` and the style `overrides`.
/// Any authoring defect aborts the draw; a partial document is never returned.
#[tracing::instrument(skip_all, fields(layers = doll.layers.len()))]
pub fn draw(
    doll: &Doll,
    state: &AnimationState,
    overrides: &BTreeMap<String, Style>,
    opts: &DrawOpts,
) -> DollResult<Document> {
    let mut resolver = GeometryResolver::new(&doll.geometry);

    // animated geometry
    let mut animated: BTreeMap<&str, Vec<GeometryElement>> = BTreeMap::new();
    for entry in doll.layers.iter().flat_map(|l| &l.entries) {
        let LayerEntry::Animation { name } = entry else {
            continue;
        };
        let anim = doll.animation(name).ok_or_else(|| {
            DollError::configuration(format!("layer references unknown animation '{name}'"))
        })?;
        let frame = anim.current_frame(state)?;
        let leaves: Vec<GeometryElement> = frame.leaves().cloned().collect();
        for leaf in &leaves {
            resolver.insert_drawn(leaf.clone())?;
        }
        animated.insert(name.as_str(), leaves);
    }
    tracing::debug!(animations = animated.len(), "animated pass done");

    // traced outlines
    let mut traced: BTreeMap<&str, GeometryElement> = BTreeMap::new();
    for entry in doll.layers.iter().flat_map(|l| &l.entries) {
        let LayerEntry::TraceOutline {
            id,
            base_geometry,
            start,
            end,
        } = entry
        else {
            continue;
        };
        let base = resolver.resolve(base_geometry)?;
        let Some(base) = base.as_path() else {
            return Err(DollError::geometry(format!(
                "trace '{id}' needs a path as base, '{base_geometry}' is not one"
            )));
        };
        let line: GeometryElement = trace_outline(base, id.as_str(), *start, *end)?.into();
        resolver.insert_drawn(line.clone())?;
        traced.insert(id.as_str(), line);
    }
    tracing::debug!(outlines = traced.len(), "trace pass done");

    // assembly
    let mut layers = Vec::with_capacity(doll.layers.len());
    for layer in &doll.layers {
        let mut group = Group::new(layer.group_id(), Vec::new());
        group
            .attributes
            .insert(LAYER_LABEL_ATTR.to_string(), layer.name.clone());
        group
            .attributes
            .insert(LAYER_MODE_ATTR.to_string(), "layer".to_string());

        for entry in &layer.entries {
            match entry {
                LayerEntry::Animation { name } => {
                    for leaf in animated.get(name.as_str()).into_iter().flatten() {
                        group.children.push(resolver.resolve_deep(leaf)?);
                    }
                }
                LayerEntry::TraceOutline { id, .. } => {
                    if let Some(line) = traced.get(id.as_str()) {
                        group.children.push(line.clone());
                    }
                }
                LayerEntry::Geometry { id } => {
                    let elem = doll.geometry.get(id).ok_or_else(|| {
                        DollError::configuration(format!(
                            "layer '{}' references unknown geometry '{id}'",
                            layer.name
                        ))
                    })?;
                    group.children.push(resolver.resolve_deep(elem)?);
                }
                LayerEntry::Opaque { tag, .. } => {
                    tracing::trace!(layer = %layer.name, %tag, "skipping opaque layer content");
                }
            }
        }
        layers.push(GeometryElement::Group(group));
    }

    let mut doc = Document {
        id: DOCUMENT_ID.to_string(),
        width: opts.width,
        height: opts.height,
        viewbox: opts.viewbox,
        layers,
        defs: merge_defs(&doll.defs, &TEMPLATE_DEF_TAGS),
    };
    let count = doc.index()?.len();
    tracing::debug!(elements = count, defs = doc.defs.len(), "assembled");

    doll.style.apply(&mut doc, overrides);
    normalize_coordinates(&mut doc, COORD_DIGITS);
    Ok(doc)
}

/// Round every path coordinate in `doc` to `digits` fractional digits.
pub fn normalize_coordinates(doc: &mut Document, digits: i32) {
    doc.walk_mut(&mut |elem| {
        if let GeometryElement::Path(p) = elem {
            for el in p.path.elements_mut() {
                *el = map_points(*el, |mut pt| {
                    pt.x = round_decimal(pt.x, digits);
                    pt.y = round_decimal(pt.y, digits);
                    pt
                });
            }
        }
    });
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;

use super::*;
use crate::geometry::element::{Group, PathElement};

fn layer(name: &str, children: Vec<GeometryElement>) -> GeometryElement {
    let mut g = Group::new(format!("layer_{name}"), children);
    g.attributes
        .insert(LAYER_LABEL_ATTR.to_string(), name.to_string());
    g.attributes
        .insert(LAYER_MODE_ATTR.to_string(), "layer".to_string());
    g.into()
}

fn doc(layers: Vec<GeometryElement>) -> Document {
    Document {
        id: "paperdoll1".to_string(),
        width: 600.0,
        height: 800.0,
        viewbox: "-300 0 600 800".parse().unwrap(),
        layers,
        defs: Vec::new(),
    }
}

fn p(id: &str) -> GeometryElement {
    PathElement::from_svg(id, "M0 0 L1 1").unwrap().into()
}

#[test]
fn index_covers_nested_elements() {
    let d = doc(vec![
        layer("arms", vec![Group::new("arm", vec![p("hand"), p("line_arm")]).into()]),
        layer("face", vec![p("eye_lid_l")]),
    ]);
    let index = d.index().unwrap();
    let ids: Vec<_> = index.keys().copied().collect();
    assert_eq!(
        ids,
        ["arm", "eye_lid_l", "hand", "layer_arms", "layer_face", "line_arm"]
    );
    assert!(d.get("hand").is_some());
    assert_eq!(d.layer("face").unwrap().id(), "layer_face");
}

#[test]
fn duplicate_ids_across_layers_fail_the_index() {
    let d = doc(vec![layer("a", vec![p("x")]), layer("b", vec![p("x")])]);
    assert!(d.index().unwrap_err().is_configuration());
}

#[test]
fn prefix_ids_rewrites_everything() {
    let mut d = doc(vec![layer("arms", vec![Group::new("arm", vec![p("hand")]).into()])]);
    d.prefix_ids("pdcexp_");
    assert_eq!(d.id, "pdcexp_paperdoll1");
    assert!(d.iter().all(|e| e.id().starts_with("pdcexp_")));
    assert!(d.get("pdcexp_hand").is_some());
}

#[test]
fn fingerprint_tracks_coordinates() {
    let a = doc(vec![layer("a", vec![p("x")])]);
    let b = doc(vec![layer("a", vec![p("x")])]);
    assert_eq!(a.fingerprint(), b.fingerprint());

    let moved: GeometryElement = PathElement::from_svg("x", "M0 0 L1 1.001").unwrap().into();
    let c = doc(vec![layer("a", vec![moved])]);
    assert_ne!(a.fingerprint(), c.fingerprint());
}

use super::*;
use serde_json::json;

fn parse(v: serde_json::Value) -> DollDef {
    serde_json::from_value(v).unwrap()
}

#[test]
fn parses_elements_rules_and_entries() {
    let def = parse(json!({
        "geometry": [{
            "id": "g", "kind": "group",
            "children": [{
                "id": "p", "kind": "path", "d": "M0 0 L1 1", "style": "fill:none",
                "conform": {"target": "t", "anchors": [{"command": 1, "target_command": 0, "offset": [1.0, 2.0]}]}
            }]
        }],
        "animations": [{
            "name": "a", "minimum": 0, "maximum": 5, "default": 1,
            "rule": {"simple": {"interp": "linear", "keys": [{"at": 0, "frame": {"id": "f", "kind": "path", "d": "M0 0"}}]}}
        }],
        "dials": [{"name": "d", "animations": [{"name": "a", "minimum": 0, "init": 1, "maximum": 5}]}],
        "layers": [{"name": "L", "entries": [
            {"kind": "animation", "name": "a"},
            {"kind": "trace_outline", "id": "o", "base_geometry": "p", "start": 0, "end": -1},
            {"kind": "geometry", "id": "g"},
            {"kind": "opaque", "tag": "text"}
        ]}]
    }));

    let ShapeDef::Group { children, .. } = &def.geometry[0].shape else {
        panic!("expected group");
    };
    let conform = children[0].conform.as_ref().unwrap();
    assert_eq!(conform.anchors[0].offset, Some([1.0, 2.0]));
    assert_eq!(children[0].style.as_ref().unwrap().get("fill"), Some("none"));

    let RuleDef::Simple(track) = &def.animations[0].rule else {
        panic!("expected simple rule");
    };
    assert_eq!(track.interp, InterpMode::Linear);
    assert_eq!((def.dials[0].minimum, def.dials[0].maximum), (1, 100));
    assert_eq!(def.layers[0].entries.len(), 4);
    assert!(def.style.is_none());
}

#[test]
fn invalid_json_is_a_serde_error() {
    let err = DollDef::from_reader("{\"geometry\": 3}".as_bytes()).unwrap_err();
    assert!(matches!(err, DollError::Serde(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = DollDef::from_path("tests/data/does_not_exist.json").unwrap_err();
    assert!(matches!(err, DollError::Other(_)));
    assert!(err.to_string().contains("does_not_exist.json"));

    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/scene_unit_missing");
    let _ = std::fs::remove_dir_all(&dir);
    assert!(matches!(DollDef::from_dir(&dir).unwrap_err(), DollError::Other(_)));
}

#[test]
fn merge_keeps_first_definitions_and_joins_dials() {
    let mut a = parse(json!({
        "geometry": [{"id": "g", "kind": "path", "d": "M0 0"}],
        "animations": [{"name": "x", "minimum": 0, "maximum": 1, "default": 0,
            "rule": {"simple": {"keys": [{"at": 0, "frame": {"id": "f", "kind": "path", "d": "M0 0"}}]}}}],
        "dials": [{"name": "d", "animations": [{"name": "x", "minimum": 0, "init": 0, "maximum": 1}]}],
        "layers": [{"name": "one"}]
    }));
    let b = parse(json!({
        "geometry": [{"id": "g", "kind": "path", "d": "M5 5"}, {"id": "h", "kind": "path", "d": "M1 1"}],
        "animations": [{"name": "x", "minimum": 0, "maximum": 9, "default": 0,
            "rule": {"simple": {"keys": [{"at": 0, "frame": {"id": "f", "kind": "path", "d": "M0 0"}}]}}}],
        "dials": [{"name": "d", "animations": [{"name": "y", "minimum": 0, "init": 0, "maximum": 1}]}],
        "layers": [{"name": "two"}],
        "defs": [{"tag": "filter"}]
    }));
    a.merge(b);

    let ids: Vec<&str> = a.geometry.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, ["g", "h"]);
    assert_eq!(a.geometry[0].shape, ShapeDef::Path { d: "M0 0".into() });
    assert_eq!(a.animations.len(), 1);
    assert_eq!(a.animations[0].maximum, 1);
    assert_eq!(a.dials.len(), 1);
    assert_eq!(a.dials[0].animations.len(), 2);
    let layers: Vec<&str> = a.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(layers, ["one", "two"]);
    assert_eq!(a.defs.len(), 1);
}

#[test]
fn from_dir_merges_in_file_name_order() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/scene_unit_dir");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("b.json"),
        r#"{"geometry": [{"id": "g", "kind": "path", "d": "M9 9"}], "layers": [{"name": "second"}]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("a.json"),
        r#"{"geometry": [{"id": "g", "kind": "path", "d": "M1 1"}], "layers": [{"name": "first"}]}"#,
    )
    .unwrap();
    std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let def = DollDef::from_dir(&dir).unwrap();
    assert_eq!(def.geometry.len(), 1);
    assert_eq!(def.geometry[0].shape, ShapeDef::Path { d: "M1 1".into() });
    assert_eq!(def.layers[0].name, "first");
    assert_eq!(def.layers[1].name, "second");
}

#[test]
fn empty_dir_is_a_configuration_error() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/scene_unit_empty");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    assert!(DollDef::from_dir(&dir).unwrap_err().is_configuration());
}

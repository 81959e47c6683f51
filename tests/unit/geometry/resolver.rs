use super::*;
use crate::foundation::core::BezPath;
use crate::geometry::delta::Delta;
use crate::geometry::element::Group;

fn path(id: &str, d: &str) -> PathElement {
    PathElement::from_svg(id, d).unwrap()
}

fn conforming(id: &str, d: &str, target: &PathElement, pairs: &[(usize, usize)]) -> PathElement {
    let own = path(id, d);
    let delta = Delta::between(&target.id, &own.path, &target.path, pairs).unwrap();
    own.with_delta(delta)
}

#[test]
fn element_without_delta_is_returned_unchanged() {
    let c = path("c", "M0 0 L10 0");
    let table = GeometryTable::from_roots(vec![c.clone().into()]).unwrap();
    let mut r = GeometryResolver::new(&table);
    assert_eq!(r.resolve("c").unwrap(), GeometryElement::Path(c));
}

#[test]
fn two_hop_chain_matches_manual_resolution() {
    let c_authored = path("c", "M0 0 L10 0");
    let b = conforming("b", "M0 1 L10 1", &c_authored, &[(1, 1)]);
    let a = conforming("a", "M0 2 L10 2", &b, &[(1, 1)]);

    let mut r_table = GeometryTable::default();
    r_table.insert(a.clone().into()).unwrap();
    r_table.insert(b.clone().into()).unwrap();
    let mut r = GeometryResolver::new(&r_table);

    // the live target comes from this draw's animated geometry
    let c_live = path("c", "M0 0 L20 4");
    r.insert_drawn(c_live.clone().into()).unwrap();
    let resolved = r.resolve("a").unwrap();

    let b_manual = b
        .delta
        .as_ref()
        .unwrap()
        .conform("b", &b.path, &c_live.path)
        .unwrap();
    let a_manual = a
        .delta
        .as_ref()
        .unwrap()
        .conform("a", &a.path, &b_manual)
        .unwrap();
    let resolved = resolved.as_path().unwrap();
    assert_eq!(resolved.path, a_manual);
    assert_eq!(resolved.path, BezPath::from_svg("M0 2 L20 6").unwrap());
    assert!(resolved.delta.is_none());
}

#[test]
fn delta_cycle_is_a_configuration_error() {
    let a0 = path("a", "M0 0 L1 0");
    let b0 = path("b", "M0 0 L1 0");
    let a = conforming("a", "M0 0 L1 0", &b0, &[(1, 1)]);
    let b = conforming("b", "M0 0 L1 0", &a0, &[(1, 1)]);
    let table = GeometryTable::from_roots(vec![a.into(), b.into()]).unwrap();
    let mut r = GeometryResolver::new(&table);
    let err = r.resolve("a").unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("a -> b -> a"));

    // the in-progress set is released after a failure
    let err = r.resolve("b").unwrap_err();
    assert!(err.to_string().contains("b -> a -> b"));
}

#[test]
fn self_conforming_element_is_a_cycle() {
    let a0 = path("a", "M0 0 L1 0");
    let a = conforming("a", "M0 0 L1 0", &a0, &[(1, 1)]);
    let table = GeometryTable::from_roots(vec![a.into()]).unwrap();
    let mut r = GeometryResolver::new(&table);
    assert!(r.resolve("a").unwrap_err().is_configuration());
}

#[test]
fn conform_to_group_is_rejected() {
    let g = Group::new("g", vec![path("p", "M0 0 L1 0").into()]);
    let p0 = path("g", "M0 0 L1 0");
    let a = conforming("a", "M0 0 L1 0", &p0, &[(1, 1)]);
    let table = GeometryTable::from_roots(vec![g.into(), a.into()]).unwrap();
    let mut r = GeometryResolver::new(&table);
    assert!(r.resolve("a").unwrap_err().is_configuration());
}

#[test]
fn unknown_ids_and_duplicate_draws_are_errors() {
    let table = GeometryTable::default();
    let mut r = GeometryResolver::new(&table);
    assert!(r.resolve("nope").unwrap_err().is_configuration());
    r.insert_drawn(path("x", "M0 0 L1 1").into()).unwrap();
    assert!(
        r.insert_drawn(path("x", "M0 0 L2 2").into())
            .unwrap_err()
            .is_configuration()
    );
}

#[test]
fn table_indexes_descendants_and_rejects_duplicates() {
    let g = Group::new(
        "torso",
        vec![path("skin", "M0 0 L1 0").into(), path("line_torso", "M0 0 L1 1").into()],
    );
    let mut table = GeometryTable::from_roots(vec![g.into()]).unwrap();
    assert!(table.contains("skin"));
    assert_eq!(table.len(), 3);
    assert_eq!(table.roots().collect::<Vec<_>>(), ["torso"]);

    let dup = path("skin", "M5 5 L6 6");
    assert!(table.insert(dup.into()).unwrap_err().is_configuration());
    assert_eq!(table.len(), 3);
}

#[test]
fn resolve_deep_conforms_group_members() {
    let body = path("body", "M0 0 L10 0");
    let shadow = conforming("shadow_body", "M0 3 L10 3", &body, &[(0, 0), (1, 1)]);
    let g = Group::new("torso", vec![shadow.into()]);
    let table = GeometryTable::from_roots(vec![g.into()]).unwrap();
    let mut r = GeometryResolver::new(&table);
    r.insert_drawn(path("body", "M0 0 L10 10").into()).unwrap();

    let torso = r.resolve("torso").unwrap();
    let deep = r.resolve_deep(&torso).unwrap();
    let leaf = deep.children()[0].as_path().unwrap();
    assert_eq!(leaf.path, BezPath::from_svg("M0 3 L10 13").unwrap());
    // the static copy is untouched
    let orig = table.get("shadow_body").unwrap().as_path().unwrap();
    assert_eq!(orig.path, BezPath::from_svg("M0 3 L10 3").unwrap());
}

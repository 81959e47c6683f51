use super::*;
use crate::foundation::core::BezPath;
use crate::geometry::element::PathElement;
use crate::state::store::{AnimationState, Origin};

fn frame(d: &str) -> GeometryElement {
    PathElement::from_svg("arm", d).unwrap().into()
}

fn d(elem: &GeometryElement) -> BezPath {
    elem.as_path().unwrap().path.clone()
}

fn track(mode: InterpMode) -> Keyframes {
    Keyframes {
        keys: vec![
            Keyframe {
                at: 0,
                frame: frame("M0 0 L0 10"),
            },
            Keyframe {
                at: 10,
                frame: frame("M0 0 L10 10"),
            },
        ],
        mode,
    }
}

fn simple(mode: InterpMode) -> Animation {
    Animation::new("arm", 0, 0, 20, AnimationRule::Simple(track(mode))).unwrap()
}

#[test]
fn hold_uses_last_key_at_or_below() {
    let a = simple(InterpMode::Hold);
    let st = AnimationState::new();
    assert_eq!(d(&a.get_frame(9, &st).unwrap()), BezPath::from_svg("M0 0 L0 10").unwrap());
    assert_eq!(d(&a.get_frame(10, &st).unwrap()), BezPath::from_svg("M0 0 L10 10").unwrap());
    // above the last key holds the last frame
    assert_eq!(d(&a.get_frame(20, &st).unwrap()), BezPath::from_svg("M0 0 L10 10").unwrap());
}

#[test]
fn linear_interpolates_between_keys() {
    let a = simple(InterpMode::Linear);
    let st = AnimationState::new();
    assert_eq!(d(&a.get_frame(5, &st).unwrap()), BezPath::from_svg("M0 0 L5 10").unwrap());
}

#[test]
fn frame_lookup_is_deterministic() {
    let a = simple(InterpMode::Linear);
    let st = AnimationState::new();
    assert_eq!(a.get_frame(7, &st).unwrap(), a.get_frame(7, &st).unwrap());
}

#[test]
fn out_of_range_value_is_an_error() {
    let a = simple(InterpMode::Hold);
    let st = AnimationState::new();
    assert!(matches!(a.get_frame(21, &st), Err(DollError::Animation(_))));
    assert!(matches!(a.get_frame(-1, &st), Err(DollError::Animation(_))));
}

#[test]
fn invalid_definitions_are_rejected() {
    let unsorted = Keyframes {
        keys: track(InterpMode::Hold).keys.into_iter().rev().collect(),
        mode: InterpMode::Hold,
    };
    assert!(Animation::new("a", 0, 0, 10, AnimationRule::Simple(unsorted)).is_err());

    let empty = Keyframes {
        keys: vec![],
        mode: InterpMode::Hold,
    };
    assert!(Animation::new("a", 0, 0, 10, AnimationRule::Simple(empty)).is_err());

    assert!(Animation::new("a", 0, 11, 10, AnimationRule::Simple(track(InterpMode::Hold))).is_err());
    assert!(Animation::new("a", 5, 5, 1, AnimationRule::Simple(track(InterpMode::Hold))).is_err());

    let mismatched = Keyframes {
        keys: vec![
            Keyframe {
                at: 0,
                frame: frame("M0 0 L0 10"),
            },
            Keyframe {
                at: 1,
                frame: frame("M0 0 L0 10 L1 1"),
            },
        ],
        mode: InterpMode::Linear,
    };
    assert!(Animation::new("a", 0, 0, 1, AnimationRule::Simple(mismatched)).is_err());
}

fn combined() -> Animation {
    let axis = |state: &str, d0: &str, d1: &str| CombinedAxis {
        state: state.to_string(),
        keys: Keyframes {
            keys: vec![
                Keyframe { at: 0, frame: frame(d0) },
                Keyframe { at: 10, frame: frame(d1) },
            ],
            mode: InterpMode::Linear,
        },
    };
    let rule = CombinedRule {
        base: frame("M0 0 L10 0"),
        axes: vec![
            axis("raise", "M0 0 L10 0", "M0 0 L10 -10"),
            axis("reach", "M0 0 L10 0", "M0 0 L20 0"),
        ],
    };
    Animation::new("arm_pose", 0, 0, 0, AnimationRule::Combined(rule)).unwrap()
}

#[test]
fn combined_frame_adds_axis_displacements() {
    let anim = combined();
    let mut st = AnimationState::new();
    st.register("arm_pose", 0, 0, 0).unwrap();
    st.register("raise", 0, 10, 10).unwrap();
    st.register("reach", 0, 10, 5).unwrap();
    assert_eq!(anim.inputs(), ["raise", "reach"]);
    let out = anim.current_frame(&st).unwrap();
    assert_eq!(d(&out), BezPath::from_svg("M0 0 L15 -10").unwrap());

    st.set("reach", 0, Origin::External).unwrap();
    let out = anim.current_frame(&st).unwrap();
    assert_eq!(d(&out), BezPath::from_svg("M0 0 L10 -10").unwrap());
}

#[test]
fn combined_frame_requires_every_input_state() {
    let anim = combined();
    let mut st = AnimationState::new();
    st.register("raise", 0, 10, 0).unwrap();
    assert!(matches!(anim.get_frame(0, &st), Err(DollError::Configuration(_))));
}

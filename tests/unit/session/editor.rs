use super::*;

fn session() -> Session {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/doll.json");
    Session::from_def(DollDef::from_path(path).unwrap()).unwrap()
}

#[test]
fn starts_at_animation_defaults() {
    let s = session();
    assert_eq!(s.state().get("arm_left"), Some(40));
    assert_eq!(s.state().get("blink"), Some(0));
    assert_eq!(s.dial_value("arms").unwrap(), 40);
    assert_eq!(
        s.dial_values().unwrap(),
        [("arms".to_string(), 40), ("mood".to_string(), 0)]
    );
}

#[test]
fn external_edit_moves_dials_and_emits_events() {
    let mut s = session();
    let change = s.set_state("arm_left", 70).unwrap().unwrap();
    assert_eq!((change.old, change.new), (40, 70));
    assert_eq!(s.dial_value("arms").unwrap(), 70);
    assert_eq!(
        s.drain_events(),
        [
            Event::StateChanged(change),
            Event::DialChanged {
                dial: "arms".into(),
                value: 70
            }
        ]
    );
    assert!(s.drain_events().is_empty());

    // same value again: nothing happens
    assert_eq!(s.set_state("arm_left", 70).unwrap(), None);
    assert!(s.drain_events().is_empty());
}

#[test]
fn dial_change_reports_state_and_dial() {
    let mut s = session();
    assert_eq!(s.change_dial("mood", 25).unwrap(), 10);
    assert_eq!(s.state().get("smile"), Some(10));
    let events = s.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], Event::StateChanged(c) if c.animation == "smile"));
    assert_eq!(
        events[1],
        Event::DialChanged {
            dial: "mood".into(),
            value: 10
        }
    );

    // no-op move emits nothing
    s.change_dial("mood", 10).unwrap();
    assert!(s.drain_events().is_empty());
}

#[test]
fn unknown_names_are_configuration_errors() {
    let mut s = session();
    assert!(s.change_dial("tail", 3).unwrap_err().is_configuration());
    assert!(s.set_state("tail", 3).unwrap_err().is_configuration());
    assert!(s.dial_value("tail").unwrap_err().is_configuration());
    assert!(s.animation_frame("tail", None).unwrap_err().is_configuration());
}

#[test]
fn style_overrides_are_recorded() {
    let mut s = session();
    s.set_style("collar", "fill:#ff0000".parse().unwrap());
    assert_eq!(
        s.drain_events(),
        [Event::StyleChanged {
            elemid: "collar".into()
        }]
    );
    assert!(s.clear_style("collar").is_some());
    assert!(s.clear_style("collar").is_none());
    assert!(s.styles().is_empty());
}

#[test]
fn frames_follow_state_and_hypothetical_values_clamp() {
    let s = session();
    let names: Vec<String> = s.frames().unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["arm_left", "blink", "mouth", "smile"]);

    let closed = s.animation_frame("blink", Some(99)).unwrap();
    assert_eq!(closed.id(), "eyes_closed");
    assert_eq!(s.animation_frame("blink", None).unwrap().id(), "eyes_open");
}

#[test]
fn combined_frames_come_from_live_axes() {
    let mut s = session();
    let live = s.animation_frame("mouth", None).unwrap();
    assert_eq!(s.animation_frame("mouth", Some(7)).unwrap(), live);

    s.set_state("smile", 10).unwrap();
    let smiling = s.animation_frame("mouth", Some(0)).unwrap();
    assert_ne!(smiling, live);
    assert_eq!(smiling, s.animation_frame("mouth", None).unwrap());
}

#[test]
fn export_leaves_session_draw_untouched() {
    let s = session();
    let before = s.draw(&DrawOpts::default()).unwrap();
    let exported = s.export(&ExportOpts::default()).unwrap();
    assert_eq!(exported.id, "pdcexp_paperdoll1");
    assert!(exported.iter().all(|e| e.id().starts_with("pdcexp_")));
    assert_eq!(exported.width, 200.0);

    let after = s.draw(&DrawOpts::default()).unwrap();
    assert_eq!(before.fingerprint(), after.fingerprint());
    assert!(after.get("collar").is_some());
}

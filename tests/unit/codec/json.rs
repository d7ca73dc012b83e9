use pretty_assertions::assert_eq;

use super::*;
use crate::state::model::{DeviceClass, Env, Pin};

fn sample() -> State {
    let env = Env {
        ua: "F/122".to_owned(),
        vp: [1280, 720],
        dt: DeviceClass::Desktop,
    };
    let mut state = State::new("https://example.com/", 1280, Some(env));
    state.pins.push(Pin {
        id: 1,
        s: Some("#hero".to_owned()),
        ox: Some(0.0),
        oy: Some(1.0),
        fx: 0.0,
        fy: 720.0,
        text: "line one\nline two".to_owned(),
        ..Pin::default()
    });
    state
}

#[test]
fn pretty_roundtrip() {
    let state = sample();
    let text = to_json(&state).unwrap();
    assert!(text.contains("\n  \"pins\": ["), "{text}");
    assert_eq!(from_json(&text), Some(state));
}

#[test]
fn from_json_rejects_bad_input() {
    assert_eq!(from_json("{"), None);
    assert_eq!(from_json("[]"), None);
    assert_eq!(from_json(r#"{"v":2,"url":"x","viewport":1,"pins":[{"id":1}]}"#), None);
}

#[test]
fn reader_reports_reasons() {
    let parse = read_json_reader("{".as_bytes()).unwrap_err();
    assert!(matches!(parse, PinmentError::Serde(_)), "{parse}");

    let schema = read_json_reader(r#"{"v":2,"url":"x","viewport":1,"pins":{}}"#.as_bytes())
        .unwrap_err();
    assert_eq!(schema.to_string(), "validation error: $.pins: must be an array");
}

#[test]
fn path_roundtrip() {
    let dir = std::env::temp_dir().join(format!("pinment-json-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("state.json");

    let state = sample();
    write_json_path(&path, &state).unwrap();
    assert_eq!(read_json_path(&path).unwrap(), state);

    let missing = read_json_path(dir.join("missing.json")).unwrap_err();
    assert!(matches!(missing, PinmentError::Other(_)));
    assert!(missing.to_string().contains("missing.json"), "{missing}");

    std::fs::remove_dir_all(&dir).unwrap();
}

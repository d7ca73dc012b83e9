use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::state::model::{Category, Pin, Reply};

fn sample() -> State {
    let mut state = State::new("https://example.com/docs#intro", 1440, None);
    state.pins.push(Pin {
        id: 1,
        s: Some("#main>p:nth-of-type(2)".to_owned()),
        ox: Some(0.125),
        oy: Some(0.5),
        fx: 310.0,
        fy: 845.0,
        author: Some("ana".to_owned()),
        text: "Typo: \"recieve\"".to_owned(),
        c: Some(Category::Text),
        resolved: Some(false),
        replies: Some(vec![Reply {
            author: Some("bo".to_owned()),
            text: "fixed 🎉".to_owned(),
        }]),
    });
    state.pins.push(Pin {
        id: 2,
        fx: 12.0,
        fy: 40.5,
        text: String::new(),
        ..Pin::default()
    });
    state
}

#[test]
fn encode_decode_roundtrip() {
    let state = sample();
    let payload = encode(&state).unwrap();
    assert_eq!(decode_state(&payload), Some(state.clone()));
    assert_eq!(decode(&payload), Some(serde_json::to_value(&state).unwrap()));
}

#[test]
fn decode_rejects_corrupt_payloads() {
    assert_eq!(decode(""), None);
    assert_eq!(decode("@@@"), None);
    let not_json = crate::codec::compress::compress_to_fragment("not json").unwrap();
    assert_eq!(decode(&not_json), None);
}

#[test]
fn decode_returns_unvalidated_json() {
    let payload = crate::codec::compress::compress_to_fragment(r#"{"v":9}"#).unwrap();
    assert_eq!(decode(&payload), Some(json!({"v": 9})));
    assert_eq!(decode_state(&payload), None);
}

#[test]
fn share_url_shape() {
    let state = sample();
    let url = to_share_url(&state, "https://example.com/viewer/#old").unwrap();
    let (base, payload) = url.split_once(SHARE_FRAGMENT_MARKER).unwrap();
    assert_eq!(base, "https://example.com/viewer/");
    assert_eq!(payload, encode(&state).unwrap());
    assert_eq!(state_from_share_url(&url), Some(state));
}

#[test]
fn from_share_url_tolerates_decoding() {
    let state = sample();
    let url = to_share_url(&state, "https://example.com/").unwrap();
    let escaped = url.replace('-', "%2D");
    assert_eq!(state_from_share_url(&escaped), Some(state));
}

#[test]
fn from_share_url_failures() {
    assert_eq!(from_share_url("not a url"), None);
    assert_eq!(from_share_url("https://example.com/"), None);
    assert_eq!(from_share_url("https://example.com/#section"), None);
    assert_eq!(from_share_url("https://example.com/#data="), None);
    assert_eq!(from_share_url("https://example.com/#data=%%%"), None);
}

#[test]
fn url_is_stripped_of_fragment_in_state() {
    assert_eq!(sample().url, "https://example.com/docs");
}

use super::*;

const SAMPLE: &str = r#"{"v":2,"url":"https://example.com/","viewport":1280,"env":null,"pins":[]}"#;

#[test]
fn payload_is_fragment_safe() {
    let payload = compress_to_fragment(SAMPLE).unwrap();
    assert!(!payload.is_empty());
    assert!(
        payload
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
        "{payload}"
    );
    assert_eq!(decompress_fragment(&payload).unwrap(), SAMPLE);
}

#[test]
fn repetitive_text_shrinks() {
    let text = "the same comment again. ".repeat(200);
    let payload = compress_to_fragment(&text).unwrap();
    assert!(payload.len() < text.len() / 4, "{}", payload.len());
}

#[test]
fn tolerates_transport_damage() {
    let payload = compress_to_fragment("héllo, wörld").unwrap();
    let padding = "=".repeat((4 - payload.len() % 4) % 4);
    let padded = format!("{payload}{padding}");
    let spaced = format!("  {payload}\n");
    let escaped = padded.replace('=', "%3D");
    for variant in [padded, spaced, escaped] {
        assert_eq!(decompress_fragment(&variant).unwrap(), "héllo, wörld", "{variant}");
    }
}

#[test]
fn rejects_garbage() {
    for bad in ["", "   ", "!!!not base64!!!", "%E0%A4%A"] {
        let err = decompress_fragment(bad).unwrap_err();
        assert!(matches!(err, PinmentError::Codec(_)), "{bad}: {err}");
    }
}

#[test]
fn caps_decompressed_size() {
    let text = "a".repeat(MAX_DECOMPRESSED_BYTES + 10);
    let payload = compress_to_fragment(&text).unwrap();
    let err = decompress_fragment(&payload).unwrap_err();
    assert!(err.to_string().contains("exceeds"), "{err}");

    let fits = "a".repeat(MAX_DECOMPRESSED_BYTES);
    let payload = compress_to_fragment(&fits).unwrap();
    assert_eq!(decompress_fragment(&payload).unwrap().len(), MAX_DECOMPRESSED_BYTES);
}

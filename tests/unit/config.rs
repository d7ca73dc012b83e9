use super::*;

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("pinment-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn defaults() {
    let cfg = ShareConfig::default();
    assert_eq!(cfg.base_url, "https://khawkins98.github.io/pinment/");
    assert_eq!(cfg.max_url_bytes, 8000);
    cfg.validate().unwrap();
}

#[test]
fn partial_file_keeps_defaults() {
    let path = write_temp("partial.json", r#"{"max_url_bytes": 2000}"#);
    let cfg = ShareConfig::from_path(&path).unwrap();
    assert_eq!(cfg.max_url_bytes, 2000);
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn rejects_unknown_and_invalid() {
    let unknown = write_temp("unknown.json", r#"{"base_url": "https://x.test/", "limit": 1}"#);
    assert!(matches!(
        ShareConfig::from_path(&unknown),
        Err(PinmentError::Serde(_))
    ));
    std::fs::remove_file(unknown).unwrap();

    let relative = write_temp("relative.json", r#"{"base_url": "viewer/"}"#);
    let err = ShareConfig::from_path(&relative).unwrap_err();
    assert!(err.to_string().contains("not an absolute URL"), "{err}");
    std::fs::remove_file(relative).unwrap();

    let zero = ShareConfig {
        max_url_bytes: 0,
        ..ShareConfig::default()
    };
    assert!(zero.validate().is_err());
}

#[test]
fn missing_file() {
    let err = ShareConfig::from_path("/nonexistent/pinment.json").unwrap_err();
    assert!(matches!(err, PinmentError::Other(_)), "{err:?}");
    assert!(err.to_string().contains("open share config"), "{err}");
}

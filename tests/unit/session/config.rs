use super::*;

#[test]
fn query_parsing_reads_known_keys() {
    let cfg = SessionConfig::from_query("?seed=42&live=1&foo=bar");
    assert_eq!(cfg.seed.as_deref(), Some("42"));
    assert_eq!(cfg.live.as_deref(), Some("1"));
    assert_eq!(cfg.preview, None);
    assert!(cfg.live_flag());
    assert!(!cfg.preview_flag());
}

#[test]
fn query_parsing_decodes_and_keeps_first_value() {
    let cfg = SessionConfig::from_query("seed=%2B17&seed=99&preview=1");
    assert_eq!(cfg.seed.as_deref(), Some("+17"));
    assert!(cfg.preview_flag());
}

#[test]
fn flags_are_strict_about_truthiness() {
    for (raw, expected) in [
        ("1", true),
        ("true", false),
        ("TRUE", false),
        (" 1", false),
        ("0", false),
        ("", false),
        ("yes", false),
        ("false", false),
    ] {
        let cfg = SessionConfig::from_query(&format!("live={raw}"));
        assert_eq!(cfg.live_flag(), expected, "{raw:?}");
    }
}

#[test]
fn opts_defaults_and_partial_json() {
    let d = SessionOpts::default();
    assert_eq!(d.params_dir, "params");
    assert_eq!(d.request_timeout(), Duration::from_secs(5));

    let o: SessionOpts = serde_json::from_str(r#"{"request_timeout_ms": 0}"#).unwrap();
    assert_eq!(o.request_timeout(), Duration::from_millis(1));
    assert_eq!(o.window_height, 900);
}

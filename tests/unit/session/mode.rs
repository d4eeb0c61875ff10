use super::*;

#[test]
fn no_flags_is_static() {
    let mode = detect(&SessionConfig::from_query("seed=1"));
    assert_eq!(mode, SessionMode::Static);
    assert!(!mode.is_live());
}

#[test]
fn live_and_preview_flags() {
    assert_eq!(detect(&SessionConfig::from_query("live=1")), SessionMode::Live);
    assert_eq!(
        detect(&SessionConfig::from_query("preview=1")),
        SessionMode::LivePreview
    );
    let both = detect(&SessionConfig::from_query("live=1&preview=1"));
    assert!(both.is_live());
    assert!(both.is_preview());
}

#[test]
fn falsy_flags_stay_static() {
    assert_eq!(
        detect(&SessionConfig::from_query("live=0&preview=no")),
        SessionMode::Static
    );
}

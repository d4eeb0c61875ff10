use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CanvasError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CanvasError::transport("x")
            .to_string()
            .contains("transport unavailable:")
    );
    assert!(
        CanvasError::timeout("x")
            .to_string()
            .contains("request timed out:")
    );
    assert!(
        CanvasError::not_found("x")
            .to_string()
            .contains("resource not found:")
    );
    assert!(
        CanvasError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CanvasError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn unanswered_covers_timeout_and_cancel_only() {
    assert!(CanvasError::timeout("x").is_unanswered());
    assert!(CanvasError::cancelled("x").is_unanswered());
    assert!(!CanvasError::transport("x").is_unanswered());
    assert!(!CanvasError::not_found("x").is_unanswered());
}

#[test]
fn json_errors_map_to_serde() {
    let err: CanvasError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, CanvasError::Serde(_)));
}

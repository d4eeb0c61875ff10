use super::*;
use serde_json::json;

#[test]
fn outbound_wire_tags_match_kind() {
    let msgs = vec![
        OutboundMessage::SetSize {
            width: 1400,
            height: 900,
        },
        OutboundMessage::EnableThumbnail,
        OutboundMessage::EnablePrepare,
        OutboundMessage::ConfirmUpdate,
        OutboundMessage::Ready { restore: None },
        OutboundMessage::LoadImage {
            fname: "a.png".to_string(),
        },
        OutboundMessage::SaveBinaryFileFromUint8 {
            uint8: vec![1, 2],
            path: "p".to_string(),
            fname: "f".to_string(),
        },
        OutboundMessage::LoadParamsFileAsBlob {
            request_id: 3,
            fname: "params.json".to_string(),
            mime: "application/json".to_string(),
        },
    ];
    for m in msgs {
        let v: serde_json::Value = serde_json::from_str(&m.to_json().unwrap()).unwrap();
        assert_eq!(v["type"], m.kind());
    }
}

#[test]
fn unit_messages_carry_only_the_tag() {
    let v = serde_json::to_value(OutboundMessage::EnablePrepare).unwrap();
    assert_eq!(v, json!({ "type": "enable_prepare" }));

    let v = serde_json::to_value(OutboundMessage::Ready { restore: None }).unwrap();
    assert_eq!(v, json!({ "type": "ready" }));
}

#[test]
fn inbound_decodes_known_types() {
    assert_eq!(
        InboundMessage::from_json(r#"{"type":"save_thumbnail"}"#).unwrap(),
        InboundMessage::SaveThumbnail
    );
    assert_eq!(
        InboundMessage::from_json(r#"{"type":"confirm_update","extra":1}"#).unwrap(),
        InboundMessage::ConfirmUpdate
    );

    let restore =
        InboundMessage::from_json(r#"{"type":"restore","params":{"restored":{"selected":7}}}"#)
            .unwrap();
    let InboundMessage::Restore { params } = restore else {
        panic!("expected restore");
    };
    assert_eq!(params.restored, Some(json!({ "selected": 7 })));

    let fresh = InboundMessage::from_json(r#"{"type":"restore","params":{}}"#).unwrap();
    assert_eq!(
        fresh,
        InboundMessage::Restore {
            params: RestorePayload::default()
        }
    );
}

#[test]
fn malformed_restore_bodies_still_decode() {
    let restored = |raw: &str| match InboundMessage::from_json(raw).unwrap() {
        InboundMessage::Restore { params } => params.restored,
        other => panic!("expected restore, got {other:?}"),
    };

    assert_eq!(restored(r#"{"type":"restore","params":5}"#), Some(json!(5)));
    assert_eq!(
        restored(r#"{"type":"restore","params":"oops"}"#),
        Some(json!("oops"))
    );
    assert_eq!(restored(r#"{"type":"restore","params":null}"#), None);
    assert_eq!(restored(r#"{"type":"restore"}"#), None);
    assert_eq!(
        restored(r#"{"type":"restore","params":{"restored":null}}"#),
        None
    );
    assert_eq!(
        restored(r#"{"type":"restore","params":{"restored":[1,2]}}"#),
        Some(json!([1, 2]))
    );
}

#[test]
fn inbound_response_without_request_id_is_accepted() {
    let msg = InboundMessage::from_json(
        r#"{"type":"loaded_params_file_as_blob","fname":"params.json","blob":[123,125]}"#,
    )
    .unwrap();
    assert!(msg.is_response());
    let InboundMessage::LoadedParamsFileAsBlob {
        request_id, blob, ..
    } = msg
    else {
        panic!("expected response");
    };
    assert_eq!(request_id, None);
    assert_eq!(blob, b"{}".to_vec());
}

#[test]
fn unknown_types_are_not_errors() {
    let msg = InboundMessage::from_json(r#"{"type":"shiny_new_thing","x":[1,2]}"#).unwrap();
    assert_eq!(msg, InboundMessage::Unknown);
    assert_eq!(msg.kind(), "unknown");
}

#[test]
fn untyped_payloads_are_protocol_errors() {
    for raw in ["null", "42", r#"{"kind":"restore"}"#, r#"{"type":7}"#] {
        let err = InboundMessage::from_json(raw).unwrap_err();
        assert!(matches!(err, CanvasError::Protocol(_)), "{raw}");
    }
}

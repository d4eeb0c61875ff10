use super::*;
use crate::channel::link::{HostPort, host_pair};
use crate::channel::message::RestorePayload;
use crate::foundation::error::CanvasError;
use crate::lifecycle::presentation::FrameRGBA;
use crate::params::catalog::Background;
use serde_json::json;
use std::time::Duration;

#[derive(Default)]
struct RecordingView {
    reloads: Vec<usize>,
    fail_capture: bool,
}

impl Presentation for RecordingView {
    fn capture_frame(&mut self) -> CanvasResult<FrameRGBA> {
        if self.fail_capture {
            return Err(CanvasError::validation("no surface"));
        }
        Ok(FrameRGBA::solid(4, 4, [10, 20, 30, 255]))
    }

    fn reload_background(&mut self, index: usize, _background: &Background) {
        self.reloads.push(index);
    }
}

fn signaler(mode: SessionMode) -> (LifecycleSignaler, HostPort) {
    let (frame, host) = host_pair();
    let transport = Arc::new(ChannelTransport::new(frame.link, Duration::from_secs(1)));
    (LifecycleSignaler::new(mode, transport), host)
}

fn kinds(msgs: &[OutboundMessage]) -> Vec<&'static str> {
    msgs.iter().map(OutboundMessage::kind).collect()
}

#[test]
fn static_mode_sends_nothing() {
    let (sig, mut host) = signaler(SessionMode::Static);
    let cfg = Configuration::with_selected(1);
    let results = [
        sig.set_size(900, 900),
        sig.save_thumbnail(vec![1]),
        sig.save_params(&cfg),
        sig.save_attributes(vec![]),
        sig.enable_thumbnail(),
        sig.enable_prepare(),
        sig.confirm_update(),
        sig.ready(None),
        sig.save_text_file("t", "p", "f"),
        sig.save_binary_file_from_blob(vec![1], "p", "f"),
        sig.save_binary_file_from_uint8(vec![1], "p", "f"),
    ];
    for r in results {
        assert_eq!(r.unwrap(), Delivery::Suppressed);
    }
    assert!(host.drain().is_empty());
}

#[test]
fn live_and_preview_send_in_order() {
    for mode in [SessionMode::Live, SessionMode::LivePreview] {
        let (sig, mut host) = signaler(mode);
        assert_eq!(sig.set_size(1400, 900).unwrap(), Delivery::Sent);
        sig.enable_thumbnail().unwrap();
        sig.enable_prepare().unwrap();
        sig.ready(Some(vec!["params.json".to_string()])).unwrap();
        assert_eq!(
            kinds(&host.drain()),
            ["set_size", "enable_thumbnail", "enable_prepare", "ready"]
        );
    }
}

#[test]
fn closed_host_surfaces_as_result_not_panic() {
    let (sig, host) = signaler(SessionMode::Live);
    drop(host);
    let err = sig.enable_prepare().unwrap_err();
    assert!(matches!(err, CanvasError::TransportUnavailable(_)));
}

#[test]
fn confirm_update_emits_params_attributes_confirm() {
    let (sig, mut host) = signaler(SessionMode::Live);
    let mut store = ParameterStore::default();
    store.set_selected(9);
    let mut view = RecordingView::default();

    let out = sig
        .dispatch(InboundMessage::ConfirmUpdate, &mut store, &mut view)
        .unwrap();
    assert_eq!(out, Dispatched::UpdateConfirmed);
    assert_eq!(store.saves(), 1);

    let sent = host.drain();
    assert_eq!(
        kinds(&sent),
        ["save_params", "save_attributes", "confirm_update"]
    );
    assert_eq!(
        sent[0],
        OutboundMessage::SaveParams {
            params: Configuration::with_selected(9)
        }
    );
    let OutboundMessage::SaveAttributes { attrs } = &sent[1] else {
        panic!("expected attributes");
    };
    assert_eq!(attrs[0].value, "Waterfall from Heavens");
}

#[test]
fn save_thumbnail_sends_png() {
    let (sig, mut host) = signaler(SessionMode::Live);
    let mut store = ParameterStore::default();
    let mut view = RecordingView::default();
    let out = sig
        .dispatch(InboundMessage::SaveThumbnail, &mut store, &mut view)
        .unwrap();
    assert_eq!(out, Dispatched::ThumbnailSaved);

    let sent = host.drain();
    let [OutboundMessage::SaveThumbnail { blob }] = sent.as_slice() else {
        panic!("expected one thumbnail, got {sent:?}");
    };
    assert_eq!(&blob[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn capture_failure_sends_nothing() {
    let (sig, mut host) = signaler(SessionMode::Live);
    let mut store = ParameterStore::default();
    let mut view = RecordingView {
        fail_capture: true,
        ..RecordingView::default()
    };
    assert!(
        sig.dispatch(InboundMessage::SaveThumbnail, &mut store, &mut view)
            .is_err()
    );
    assert!(host.drain().is_empty());
}

#[test]
fn restore_adopts_and_reloads_once() {
    let (sig, _host) = signaler(SessionMode::Live);
    let mut store = ParameterStore::default();
    let mut view = RecordingView::default();
    let msg = InboundMessage::Restore {
        params: RestorePayload {
            restored: Some(json!({ "selected": 7 })),
        },
    };
    let out = sig.dispatch(msg, &mut store, &mut view).unwrap();
    assert_eq!(
        out,
        Dispatched::Restored {
            selected: 7,
            outcome: RestoreOutcome::Adopted
        }
    );
    assert_eq!(store.selected(), 7);
    assert_eq!(view.reloads, vec![7]);
}

#[test]
fn restore_without_saved_data_still_renders() {
    let (sig, _host) = signaler(SessionMode::Live);
    let mut store = ParameterStore::default();
    let mut view = RecordingView::default();
    let out = sig
        .dispatch(InboundMessage::restore(None).unwrap(), &mut store, &mut view)
        .unwrap();
    assert_eq!(
        out,
        Dispatched::Restored {
            selected: 4,
            outcome: RestoreOutcome::Fresh
        }
    );
    assert_eq!(view.reloads, vec![4]);
}

#[test]
fn unknown_messages_are_ignored() {
    let (sig, mut host) = signaler(SessionMode::Live);
    let mut store = ParameterStore::default();
    let mut view = RecordingView::default();
    let out = sig
        .dispatch(InboundMessage::Unknown, &mut store, &mut view)
        .unwrap();
    assert_eq!(out, Dispatched::Ignored);
    assert!(view.reloads.is_empty());
    assert!(host.drain().is_empty());
}

#[test]
fn static_mode_ignores_host_messages() {
    let (sig, mut host) = signaler(SessionMode::Static);
    let mut store = ParameterStore::default();
    let mut view = RecordingView::default();

    let restore = InboundMessage::Restore {
        params: RestorePayload {
            restored: Some(json!({ "selected": 7 })),
        },
    };
    for msg in [
        restore,
        InboundMessage::ConfirmUpdate,
        InboundMessage::SaveThumbnail,
    ] {
        assert_eq!(
            sig.dispatch(msg, &mut store, &mut view).unwrap(),
            Dispatched::Ignored
        );
    }

    assert_eq!(store.selected(), 4);
    assert_eq!(store.saves(), 0);
    assert!(view.reloads.is_empty());
    assert!(host.drain().is_empty());
}

#[test]
fn frame_encoding_rejects_bad_buffers() {
    let bad = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 3],
    };
    assert!(bad.encode_png().is_err());
    assert!(FrameRGBA::solid(0, 0, [0; 4]).encode_png().is_err());
}

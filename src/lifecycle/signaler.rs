use std::sync::Arc;

use crate::channel::message::{InboundMessage, OutboundMessage};
use crate::channel::transport::ChannelTransport;
use crate::foundation::error::CanvasResult;
use crate::lifecycle::presentation::Presentation;
use crate::params::store::{AttributeList, Configuration, ParameterStore, RestoreOutcome};
use crate::session::mode::SessionMode;

/// What happened to an outbound notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Posted to the host.
    Sent,
    /// Not posted: the session has no host.
    Suppressed,
}

/// What an inbound message caused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// A thumbnail was captured and sent.
    ThumbnailSaved,
    /// Params, attributes and the update confirmation were sent.
    UpdateConfirmed,
    /// A restore was applied and the background reloaded once.
    Restored {
        /// Selection after the restore.
        selected: usize,
        /// How the payload was treated.
        outcome: RestoreOutcome,
    },
    /// Unknown or response-only message; nothing done.
    Ignored,
}

/// Lifecycle events between the frame and its host.
///
/// Every outbound call is a no-op outside live modes, so a static rendering never talks to a
/// host.
pub struct LifecycleSignaler {
    mode: SessionMode,
    transport: Arc<ChannelTransport>,
}

impl LifecycleSignaler {
    /// Signaler for `mode` over `transport`.
    pub fn new(mode: SessionMode, transport: Arc<ChannelTransport>) -> Self {
        Self { mode, transport }
    }

    /// Session mode gating outbound traffic.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    fn emit(&self, message: OutboundMessage) -> CanvasResult<Delivery> {
        if !self.mode.is_live() {
            tracing::trace!(kind = message.kind(), "suppressed outside live mode");
            return Ok(Delivery::Suppressed);
        }
        self.transport.send(message)?;
        Ok(Delivery::Sent)
    }

    /// Report the frame size the host should use.
    pub fn set_size(&self, width: u32, height: u32) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::SetSize { width, height })
    }

    /// Send an encoded thumbnail.
    pub fn save_thumbnail(&self, png: Vec<u8>) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::SaveThumbnail { blob: png })
    }

    /// Send the full configuration.
    pub fn save_params(&self, config: &Configuration) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::SaveParams {
            params: config.clone(),
        })
    }

    /// Send display attributes.
    pub fn save_attributes(&self, attrs: AttributeList) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::SaveAttributes { attrs })
    }

    /// Enable the host's thumbnail button.
    pub fn enable_thumbnail(&self) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::EnableThumbnail)
    }

    /// Enable the host's prepare button.
    pub fn enable_prepare(&self) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::EnablePrepare)
    }

    /// Confirm that an update is complete.
    pub fn confirm_update(&self) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::ConfirmUpdate)
    }

    /// Tell the host the frame is ready, optionally listing params files to restore.
    pub fn ready(&self, restore: Option<Vec<String>>) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::Ready { restore })
    }

    /// Save a text file into the params bundle.
    pub fn save_text_file(&self, text: &str, path: &str, fname: &str) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::SaveTextFile {
            text: text.to_string(),
            path: path.to_string(),
            fname: fname.to_string(),
        })
    }

    /// Save binary data that came from a blob.
    pub fn save_binary_file_from_blob(
        &self,
        bytes: Vec<u8>,
        path: &str,
        fname: &str,
    ) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::SaveBinaryFileFromBlob {
            blob: bytes,
            path: path.to_string(),
            fname: fname.to_string(),
        })
    }

    /// Save binary data that came from a byte array.
    pub fn save_binary_file_from_uint8(
        &self,
        bytes: Vec<u8>,
        path: &str,
        fname: &str,
    ) -> CanvasResult<Delivery> {
        self.emit(OutboundMessage::SaveBinaryFileFromUint8 {
            uint8: bytes,
            path: path.to_string(),
            fname: fname.to_string(),
        })
    }

    /// Handle one host-initiated message.
    ///
    /// Outside live modes there is no host, so every message is ignored and the store is left
    /// untouched.
    #[tracing::instrument(skip_all, fields(kind = message.kind()))]
    pub fn dispatch(
        &self,
        message: InboundMessage,
        store: &mut ParameterStore,
        view: &mut dyn Presentation,
    ) -> CanvasResult<Dispatched> {
        if !self.mode.is_live() {
            tracing::debug!("ignored outside live mode");
            return Ok(Dispatched::Ignored);
        }
        match message {
            InboundMessage::SaveThumbnail => {
                let png = view.capture_frame()?.encode_png()?;
                self.save_thumbnail(png)?;
                Ok(Dispatched::ThumbnailSaved)
            }
            InboundMessage::ConfirmUpdate => {
                // Attributes derive from params, so params go first.
                let deliveries = [
                    self.save_params(store.config())?,
                    self.save_attributes(store.attributes())?,
                    self.confirm_update()?,
                ];
                if deliveries.iter().all(|d| *d == Delivery::Sent) {
                    store.mark_saved();
                }
                Ok(Dispatched::UpdateConfirmed)
            }
            InboundMessage::Restore { params } => {
                let outcome = store.restore(params.restored.as_ref());
                view.reload_background(store.selected(), store.background());
                Ok(Dispatched::Restored {
                    selected: store.selected(),
                    outcome,
                })
            }
            InboundMessage::LoadedParamsFileAsBlob { .. } | InboundMessage::Unknown => {
                tracing::debug!("ignored");
                Ok(Dispatched::Ignored)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/signaler.rs"]
mod tests;

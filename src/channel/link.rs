use std::sync::Arc;

use tokio::sync::mpsc;

use crate::channel::message::{InboundMessage, OutboundMessage};
use crate::foundation::error::{CanvasError, CanvasResult};

/// Raw one-way path from this frame to the host context.
///
/// Implementations must preserve send order.
pub trait HostLink: Send + Sync {
    /// Post one message to the host.
    fn post(&self, message: OutboundMessage) -> CanvasResult<()>;
}

/// Link used when there is no embedding context; every post fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedLink;

impl HostLink for DetachedLink {
    fn post(&self, message: OutboundMessage) -> CanvasResult<()> {
        Err(CanvasError::transport(format!(
            "no host frame to receive '{}'",
            message.kind()
        )))
    }
}

/// In-process link backed by an unbounded FIFO channel.
#[derive(Clone, Debug)]
pub struct ChannelLink {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl HostLink for ChannelLink {
    fn post(&self, message: OutboundMessage) -> CanvasResult<()> {
        self.tx
            .send(message)
            .map_err(|e| CanvasError::transport(format!("host channel closed ('{}')", e.0.kind())))
    }
}

/// Frame-side view of a channel: outbound link plus the inbound message stream.
pub struct FrameChannel {
    pub(crate) link: Arc<dyn HostLink>,
    pub(crate) inbound: Option<mpsc::UnboundedReceiver<InboundMessage>>,
}

impl FrameChannel {
    /// No host at all; outbound posts fail and nothing ever arrives.
    pub fn detached() -> Self {
        Self {
            link: Arc::new(DetachedLink),
            inbound: None,
        }
    }

    /// Custom link (e.g. a browser bridge) with its inbound stream.
    pub fn new(
        link: Arc<dyn HostLink>,
        inbound: Option<mpsc::UnboundedReceiver<InboundMessage>>,
    ) -> Self {
        Self { link, inbound }
    }
}

/// Host-side end of an in-process channel: reads what the frame posted and pushes host messages.
///
/// Used by embedding hosts written in Rust and by tests standing in for the platform.
pub struct HostPort {
    outbound: mpsc::UnboundedReceiver<OutboundMessage>,
    inbound: mpsc::UnboundedSender<InboundMessage>,
}

impl HostPort {
    /// Wait for the next message posted by the frame; `None` once the frame is gone.
    pub async fn recv(&mut self) -> Option<OutboundMessage> {
        self.outbound.recv().await
    }

    /// Next already-posted message, without waiting.
    pub fn try_recv(&mut self) -> Option<OutboundMessage> {
        self.outbound.try_recv().ok()
    }

    /// All already-posted messages, in send order.
    pub fn drain(&mut self) -> Vec<OutboundMessage> {
        let mut out = Vec::new();
        while let Some(m) = self.try_recv() {
            out.push(m);
        }
        out
    }

    /// Push a message to the frame.
    pub fn push(&self, message: InboundMessage) -> CanvasResult<()> {
        self.inbound
            .send(message)
            .map_err(|_| CanvasError::transport("frame channel closed"))
    }

    /// Decode and push a JSON wire message.
    pub fn push_json(&self, raw: &str) -> CanvasResult<()> {
        self.push(InboundMessage::from_json(raw)?)
    }
}

/// Build a connected frame/host pair.
pub fn host_pair() -> (FrameChannel, HostPort) {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();
    let frame = FrameChannel {
        link: Arc::new(ChannelLink { tx: out_tx }),
        inbound: Some(in_rx),
    };
    let host = HostPort {
        outbound: out_rx,
        inbound: in_tx,
    };
    (frame, host)
}

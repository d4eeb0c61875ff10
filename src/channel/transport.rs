use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::channel::link::HostLink;
use crate::channel::message::{InboundMessage, OutboundMessage, RequestId};
use crate::foundation::error::{CanvasError, CanvasResult};

struct Pending {
    fname: Option<String>,
    tx: oneshot::Sender<InboundMessage>,
}

type PendingMap = BTreeMap<RequestId, Pending>;

/// Removes its pending entry when dropped, whatever way the request ended.
struct PendingGuard<'a> {
    pending: &'a Mutex<PendingMap>,
    id: RequestId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.pending).remove(&self.id);
    }
}

fn lock(m: &Mutex<PendingMap>) -> MutexGuard<'_, PendingMap> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Bidirectional message primitive to the host context.
///
/// Outbound posts are fire-and-forget. Correlated requests carry a fresh `request_id`, and every
/// inbound response goes through [`ChannelTransport::deliver`], which hands it to the matching
/// pending request. Any number of requests may be in flight at once.
pub struct ChannelTransport {
    link: Arc<dyn HostLink>,
    pending: Mutex<PendingMap>,
    next_id: AtomicU64,
    timeout: Duration,
}

impl ChannelTransport {
    /// Build a transport over `link`; every request is bounded by `timeout`.
    pub fn new(link: Arc<dyn HostLink>, timeout: Duration) -> Self {
        Self {
            link,
            pending: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Number of requests currently waiting for a response.
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Post one message. Never panics; failures are logged and returned.
    pub fn send(&self, message: OutboundMessage) -> CanvasResult<()> {
        let kind = message.kind();
        match self.link.post(message) {
            Ok(()) => {
                tracing::trace!(kind, "posted to host");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(kind, error = %e, "host post failed");
                Err(e)
            }
        }
    }

    /// Send a correlated request and wait for its response.
    ///
    /// `build` receives the request id to embed. The pending entry is registered before the
    /// message is posted and removed exactly once: on response, timeout, cancellation, send
    /// failure, or when the returned future is dropped.
    pub async fn request(
        &self,
        build: impl FnOnce(RequestId) -> OutboundMessage,
        cancel: &CancellationToken,
    ) -> CanvasResult<InboundMessage> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = build(id);
        let kind = message.kind();
        let (tx, rx) = oneshot::channel();
        lock(&self.pending).insert(
            id,
            Pending {
                fname: message.correlation_name().map(str::to_owned),
                tx,
            },
        );
        let _guard = PendingGuard {
            pending: &self.pending,
            id,
        };

        self.send(message)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(kind, request_id = id, "request cancelled");
                Err(CanvasError::cancelled(format!("{kind} #{id}")))
            }
            res = tokio::time::timeout(self.timeout, rx) => match res {
                Ok(Ok(reply)) => Ok(reply),
                Ok(Err(_)) => Err(CanvasError::transport(format!("{kind} #{id} dropped"))),
                Err(_) => {
                    tracing::warn!(kind, request_id = id, timeout_ms = self.timeout.as_millis() as u64, "host did not answer");
                    Err(CanvasError::timeout(format!("{kind} #{id} after {:?}", self.timeout)))
                }
            },
        }
    }

    /// Route one inbound message.
    ///
    /// Responses complete their pending request and are consumed; responses that match nothing
    /// are dropped. Everything else is returned for lifecycle dispatch.
    pub fn deliver(&self, message: InboundMessage) -> Option<InboundMessage> {
        let InboundMessage::LoadedParamsFileAsBlob {
            request_id, fname, ..
        } = &message
        else {
            return Some(message);
        };

        let mut pending = lock(&self.pending);
        let names_agree =
            |p: &Pending| fname.is_none() || p.fname.as_deref() == fname.as_deref();
        let target = match request_id {
            Some(id) => match pending.get(id) {
                Some(p) if names_agree(p) => Some(*id),
                Some(p) => {
                    tracing::warn!(
                        request_id = id,
                        expected = ?p.fname,
                        got = ?fname,
                        "response names a different file; ignoring"
                    );
                    None
                }
                None => None,
            },
            // Hosts without ids: oldest request for the same file.
            None => pending
                .iter()
                .find(|(_, p)| names_agree(p))
                .map(|(id, _)| *id),
        };

        match target.and_then(|id| pending.remove(&id)) {
            Some(p) => {
                drop(pending);
                // The waiter may have just been dropped; nothing to do then.
                let _ = p.tx.send(message);
            }
            None => tracing::debug!(?request_id, ?fname, "unmatched response dropped"),
        }
        None
    }

    /// Drive `inbound` on a background task: responses are delivered here, all other messages
    /// are forwarded, in arrival order, to the returned receiver.
    ///
    /// The task ends when `inbound` closes, the receiver is dropped, or `shutdown` is cancelled.
    /// Must be called from within a tokio runtime.
    pub fn spawn_inbound_pump(
        self: &Arc<Self>,
        mut inbound: mpsc::UnboundedReceiver<InboundMessage>,
        shutdown: CancellationToken,
    ) -> mpsc::UnboundedReceiver<InboundMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let message = tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        tracing::debug!("inbound pump stopped");
                        break;
                    }
                    message = inbound.recv() => match message {
                        Some(message) => message,
                        None => {
                            tracing::debug!("inbound channel closed");
                            break;
                        }
                    },
                };
                if let Some(event) = transport.deliver(message) {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });
        rx
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/transport.rs"]
mod tests;

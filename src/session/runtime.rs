use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::channel::link::FrameChannel;
use crate::channel::message::InboundMessage;
use crate::channel::transport::ChannelTransport;
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::lifecycle::presentation::Presentation;
use crate::lifecycle::signaler::{Delivery, Dispatched, LifecycleSignaler};
use crate::params::catalog::BackgroundCatalog;
use crate::params::store::ParameterStore;
use crate::random::seeded::{Seed, SeededRng, resolve_seed};
use crate::resource::locator::ResourceLocator;
use crate::resource::params::ParamsResource;
use crate::session::config::{SessionConfig, SessionOpts};
use crate::session::layout::CanvasLayout;
use crate::session::mode::{SessionMode, detect};

/// Name of the serialized configuration inside the params bundle.
pub const PARAMS_FILE: &str = "params.json";
/// MIME type requested for [`PARAMS_FILE`].
pub const PARAMS_MIME: &str = "application/json";

/// Summary of [`Session::boot`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BootReport {
    /// Session mode.
    pub mode: SessionMode,
    /// Resolved seed.
    pub seed: Seed,
    /// Locator of the params file, when it could be resolved.
    pub params_locator: Option<ResourceLocator>,
    /// Whether the params file was fetched and adopted.
    pub params_loaded: bool,
    /// Selection the first render used.
    pub selected: usize,
    /// Layout reported to the host.
    pub layout: CanvasLayout,
}

/// One running template instance: every component of the parameter channel, wired once.
///
/// Nothing here is process-global, so independent sessions can coexist.
pub struct Session {
    mode: SessionMode,
    seed: Seed,
    rng: SeededRng,
    opts: SessionOpts,
    layout: CanvasLayout,
    transport: Arc<ChannelTransport>,
    resources: ParamsResource,
    signaler: LifecycleSignaler,
    store: ParameterStore,
    events: Option<mpsc::UnboundedReceiver<InboundMessage>>,
    shutdown: CancellationToken,
}

impl Session {
    /// Build a session from a raw query string with the template's catalog.
    pub fn from_query(query: &str, opts: SessionOpts, channel: FrameChannel) -> CanvasResult<Self> {
        Self::new(
            &SessionConfig::from_query(query),
            opts,
            channel,
            BackgroundCatalog::template(),
        )
    }

    /// Build a session.
    ///
    /// In live modes an inbound stream is routed on a background task, so this must run inside
    /// a tokio runtime. Static sessions drop the stream: there is no host to listen to.
    pub fn new(
        config: &SessionConfig,
        opts: SessionOpts,
        channel: FrameChannel,
        catalog: BackgroundCatalog,
    ) -> CanvasResult<Self> {
        let mode = detect(config);
        let seed = resolve_seed(config.seed.as_deref());
        let transport = Arc::new(ChannelTransport::new(
            channel.link,
            opts.request_timeout(),
        ));

        let shutdown = CancellationToken::new();
        let events = match channel.inbound {
            Some(inbound) if mode.is_live() => {
                tokio::runtime::Handle::try_current().map_err(|e| {
                    CanvasError::validation(format!("session needs a tokio runtime: {e}"))
                })?;
                Some(transport.spawn_inbound_pump(inbound, shutdown.clone()))
            }
            Some(_) => {
                tracing::debug!(?mode, "no host in this mode; inbound stream closed");
                None
            }
            None => None,
        };

        let resources = if mode.is_live() {
            ParamsResource::new_live(mode, Arc::clone(&transport))
        } else {
            ParamsResource::new_static(opts.static_root.clone(), opts.params_dir.clone())
        };
        let signaler = LifecycleSignaler::new(mode, Arc::clone(&transport));
        let layout = CanvasLayout::compute(opts.window_width, opts.window_height, mode);

        tracing::info!(?mode, %seed, "session created");
        Ok(Self {
            mode,
            seed,
            rng: SeededRng::new(seed),
            opts,
            layout,
            transport,
            resources,
            signaler,
            store: ParameterStore::new(catalog),
            events,
            shutdown,
        })
    }

    /// Session mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Session seed.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// The session's deterministic random stream.
    pub fn rng(&mut self) -> &mut SeededRng {
        &mut self.rng
    }

    /// Options the session was built with.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Current layout.
    pub fn layout(&self) -> CanvasLayout {
        self.layout
    }

    /// Parameter store.
    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// Mutable parameter store.
    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    /// Params resolver.
    pub fn resources(&self) -> &ParamsResource {
        &self.resources
    }

    /// Lifecycle signaler.
    pub fn signaler(&self) -> &LifecycleSignaler {
        &self.signaler
    }

    /// Underlying transport.
    pub fn transport(&self) -> &Arc<ChannelTransport> {
        &self.transport
    }

    /// Start the session: load params, report size, enable host buttons, draw the background.
    ///
    /// Always completes; any failure along the way leaves the defaults in place.
    #[tracing::instrument(skip_all, fields(mode = ?self.mode))]
    pub async fn boot(&mut self, view: &mut dyn Presentation) -> BootReport {
        let params_locator = match self.resources.resolve_url(PARAMS_FILE, PARAMS_MIME).await {
            Ok(loc) => Some(loc),
            Err(e) => {
                tracing::warn!(error = %e, "params file unavailable; using defaults");
                None
            }
        };

        let mut params_loaded = false;
        if let Some(loc) = &params_locator {
            let loaded = match self.resources.fetch(loc).await {
                Ok(bytes) => self.store.load_json(&bytes),
                Err(e) => Err(e),
            };
            match loaded {
                Ok(()) => params_loaded = true,
                Err(e) => tracing::warn!(error = %e, %loc, "params file not adopted; using defaults"),
            }
        }

        self.report_size();
        if self.mode.is_live() {
            log_delivery("enable_thumbnail", self.signaler.enable_thumbnail());
            log_delivery("enable_prepare", self.signaler.enable_prepare());
            log_delivery(
                "ready",
                self.signaler.ready(Some(vec![PARAMS_FILE.to_string()])),
            );
        }

        view.reload_background(self.store.selected(), self.store.background());

        BootReport {
            mode: self.mode,
            seed: self.seed,
            params_locator,
            params_loaded,
            selected: self.store.selected(),
            layout: self.layout,
        }
    }

    /// User picked a background: clamp, redraw, save.
    pub fn select_background(&mut self, index: i64, view: &mut dyn Presentation) -> usize {
        let selected = self.store.set_selected(index);
        view.reload_background(selected, self.store.background());
        log_delivery("save_params", self.signaler.save_params(self.store.config()));
        selected
    }

    /// Viewport changed: recompute the layout and report the frame size.
    pub fn resize(&mut self, window_width: u32, window_height: u32) -> CanvasLayout {
        self.opts.window_width = window_width;
        self.opts.window_height = window_height;
        self.layout = CanvasLayout::compute(window_width, window_height, self.mode);
        self.report_size();
        self.layout
    }

    fn report_size(&self) {
        log_delivery(
            "set_size",
            self.signaler
                .set_size(self.layout.frame_width, self.layout.frame_height),
        );
    }

    /// Next host-initiated message; `None` when there is no host or it went away.
    pub async fn next_inbound(&mut self) -> Option<InboundMessage> {
        self.events.as_mut()?.recv().await
    }

    /// Host-initiated message already queued, without waiting.
    pub fn try_next_inbound(&mut self) -> Option<InboundMessage> {
        self.events.as_mut()?.try_recv().ok()
    }

    /// Dispatch one host message. Failures are logged and reported as `None`.
    pub fn handle_inbound(
        &mut self,
        message: InboundMessage,
        view: &mut dyn Presentation,
    ) -> Option<Dispatched> {
        let kind = message.kind();
        match self.signaler.dispatch(message, &mut self.store, view) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(kind, error = %e, "host message not handled");
                None
            }
        }
    }

    /// Handle host messages until the host goes away; returns how many were handled.
    pub async fn run(&mut self, view: &mut dyn Presentation) -> usize {
        let mut handled = 0;
        while let Some(message) = self.next_inbound().await {
            if self.handle_inbound(message, view).is_some() {
                handled += 1;
            }
        }
        handled
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn log_delivery(kind: &'static str, res: CanvasResult<Delivery>) {
    match res {
        Ok(Delivery::Sent) => tracing::debug!(kind, "sent"),
        Ok(Delivery::Suppressed) => {}
        Err(e) => tracing::warn!(kind, error = %e, "notification not delivered"),
    }
}

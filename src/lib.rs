//! cogcanvas is the parameter channel of an embeddable generative-art template.
//!
//! The same application code runs in two places: inside a host frame that offers live
//! configuration of a mint, and standalone, rendering a configuration that was saved earlier.
//! This crate hides the difference.
//!
//! # Components
//!
//! 1. **Mode**: [`detect`] reads the `preview` / `live` query flags once per session.
//! 2. **Seed**: [`resolve_seed`] + [`SeededRng`] give a reproducible stream per configuration.
//! 3. **Channel**: [`ChannelTransport`] posts messages to the host and correlates
//!    request/response pairs by id, with a timeout and cancellation on every request.
//! 4. **Resources**: [`ParamsResource`] turns `"params.json"` (or any saved file) into a
//!    [`ResourceLocator`]: a `./params/...` path when static, a blob handle when live.
//! 5. **Lifecycle**: [`LifecycleSignaler`] sends host notifications (suppressed when static) and
//!    dispatches `save_thumbnail` / `confirm_update` / `restore` from the host.
//! 6. **Parameters**: [`ParameterStore`] holds the [`Configuration`], clamps it into the
//!    [`BackgroundCatalog`] and derives attributes.
//!
//! [`Session`] wires all of them together for one template instance.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Always render**: no failure in this crate is fatal to a session; everything degrades to
//!   defaults or "absent".
//! - **No globals**: every piece of state belongs to a [`Session`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod channel;
mod foundation;
mod lifecycle;
mod params;
mod random;
mod resource;
mod session;

pub use channel::link::{ChannelLink, DetachedLink, FrameChannel, HostLink, HostPort, host_pair};
pub use channel::message::{InboundMessage, OutboundMessage, RequestId, RestorePayload};
pub use channel::transport::ChannelTransport;
pub use foundation::error::{CanvasError, CanvasResult};
pub use lifecycle::presentation::{FrameRGBA, Presentation};
pub use lifecycle::signaler::{Delivery, Dispatched, LifecycleSignaler};
pub use params::catalog::{Background, BackgroundCatalog};
pub use params::store::{
    Attribute, AttributeList, Configuration, DEFAULT_SELECTED, ParameterStore, RestoreOutcome,
    StoreState,
};
pub use random::seeded::{SEED_MODULUS, Seed, SeededRng, resolve_seed};
pub use resource::locator::{
    BLOB_SCHEME, BlobStore, ResourceLocator, StoredBlob, normalize_param_name,
};
pub use resource::params::{ImageSource, ParamsResource};
pub use session::config::{SessionConfig, SessionOpts};
pub use session::layout::{CanvasLayout, LIVE_UI_WIDTH, MAX_CANVAS_EDGE, MIN_CANVAS_EDGE};
pub use session::mode::{SessionMode, detect};
pub use session::runtime::{BootReport, PARAMS_FILE, PARAMS_MIME, Session};

pub use tokio_util::sync::CancellationToken;

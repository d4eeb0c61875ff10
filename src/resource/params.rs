use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::channel::message::{InboundMessage, OutboundMessage};
use crate::channel::transport::ChannelTransport;
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::resource::locator::{BlobStore, ResourceLocator, normalize_param_name};
use crate::session::mode::SessionMode;

/// How a params file was requested through [`ParamsResource::load_image`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Static mode: load the image directly from this locator.
    Direct(ResourceLocator),
    /// Live mode: the host was asked to deliver the image.
    Requested,
}

enum Strategy {
    Static { root: PathBuf, params_dir: String },
    Live { transport: Arc<ChannelTransport> },
}

#[derive(Default)]
struct HandleCache {
    blobs: BlobStore,
    by_name: HashMap<(String, String), ResourceLocator>,
}

/// Dual-mode resolver from params file names to locators.
///
/// The strategy is fixed at construction from the session mode, so callers never branch on
/// mode themselves. Live handles are owned here and released on re-request, on
/// [`ParamsResource::release`], and when the resolver is dropped.
pub struct ParamsResource {
    mode: SessionMode,
    strategy: Strategy,
    cache: Mutex<HandleCache>,
}

impl ParamsResource {
    /// Resolver for a session without host: names map to `./<params_dir>/<name>` under `root`.
    pub fn new_static(root: impl Into<PathBuf>, params_dir: impl Into<String>) -> Self {
        Self {
            mode: SessionMode::Static,
            strategy: Strategy::Static {
                root: root.into(),
                params_dir: params_dir.into(),
            },
            cache: Mutex::new(HandleCache::default()),
        }
    }

    /// Resolver for a live session: names are requested from the host.
    pub fn new_live(mode: SessionMode, transport: Arc<ChannelTransport>) -> Self {
        debug_assert!(mode.is_live());
        Self {
            mode,
            strategy: Strategy::Live { transport },
            cache: Mutex::new(HandleCache::default()),
        }
    }

    /// Session mode this resolver was built for.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Resolve `name` to a locator; see [`ParamsResource::resolve_url_with`].
    pub async fn resolve_url(&self, name: &str, mime: &str) -> CanvasResult<ResourceLocator> {
        self.resolve_url_with(name, mime, &CancellationToken::new())
            .await
    }

    /// Resolve `name` to a locator.
    ///
    /// Static mode returns `./<params_dir>/<name>` with no channel traffic. Live mode sends one
    /// `load_params_file_as_blob` request, waits for its response and returns a fresh blob
    /// handle; an unanswered request becomes [`CanvasError::ResourceNotFound`].
    #[tracing::instrument(skip(self, cancel), fields(mode = ?self.mode))]
    pub async fn resolve_url_with(
        &self,
        name: &str,
        mime: &str,
        cancel: &CancellationToken,
    ) -> CanvasResult<ResourceLocator> {
        let norm = normalize_param_name(name)?;
        let transport = match &self.strategy {
            Strategy::Static { params_dir, .. } => {
                return Ok(ResourceLocator::new(format!("./{params_dir}/{norm}")));
            }
            Strategy::Live { transport } => transport,
        };

        let reply = transport
            .request(
                |request_id| OutboundMessage::LoadParamsFileAsBlob {
                    request_id,
                    fname: norm.clone(),
                    mime: mime.to_string(),
                },
                cancel,
            )
            .await
            .map_err(|e| match e {
                CanvasError::Timeout(_) => {
                    CanvasError::not_found(format!("host has no params file '{norm}'"))
                }
                other => other,
            })?;

        let (blob, reply_mime) = match reply {
            InboundMessage::LoadedParamsFileAsBlob { blob, mime, .. } => (blob, mime),
            other => {
                return Err(CanvasError::protocol(format!(
                    "unexpected '{}' in reply to load_params_file_as_blob",
                    other.kind()
                )));
            }
        };

        let mut cache = self.lock();
        let key = (norm, mime.to_string());
        if let Some(old) = cache.by_name.remove(&key) {
            cache.blobs.revoke(&old);
            tracing::debug!(%old, "released superseded handle");
        }
        let loc = cache
            .blobs
            .create(blob, reply_mime.as_deref().unwrap_or(mime));
        cache.by_name.insert(key, loc.clone());
        Ok(loc)
    }

    /// Read the bytes behind a locator produced by this resolver.
    ///
    /// Blob reads share the stored buffer instead of copying it.
    pub async fn fetch(&self, loc: &ResourceLocator) -> CanvasResult<Arc<Vec<u8>>> {
        if loc.is_blob() {
            let cache = self.lock();
            return cache
                .blobs
                .get(loc)
                .map(|b| Arc::clone(&b.bytes))
                .ok_or_else(|| CanvasError::not_found(format!("handle '{loc}' was released")));
        }

        let Strategy::Static { root, .. } = &self.strategy else {
            return Err(CanvasError::not_found(format!(
                "'{loc}' is not a live-session handle"
            )));
        };
        let rel = loc.as_str().trim_start_matches("./");
        let path = root.join(Path::new(rel));
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Arc::new(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CanvasError::not_found(
                format!("'{}' does not exist", path.display()),
            )),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read params file '{}'", path.display()))
                .into()),
        }
    }

    /// Ask for an image saved in the params bundle.
    ///
    /// Live mode posts `loadImage` and the host delivers the image itself; static mode hands back
    /// the locator to load directly.
    pub fn load_image(&self, name: &str) -> CanvasResult<ImageSource> {
        let norm = normalize_param_name(name)?;
        match &self.strategy {
            Strategy::Static { params_dir, .. } => Ok(ImageSource::Direct(ResourceLocator::new(
                format!("./{params_dir}/{norm}"),
            ))),
            Strategy::Live { transport } => {
                transport.send(OutboundMessage::LoadImage { fname: norm })?;
                Ok(ImageSource::Requested)
            }
        }
    }

    /// Release the live handle for `(name, mime)`. Returns whether one was live.
    pub fn release(&self, name: &str, mime: &str) -> bool {
        let Ok(norm) = normalize_param_name(name) else {
            return false;
        };
        let mut cache = self.lock();
        match cache.by_name.remove(&(norm, mime.to_string())) {
            Some(loc) => cache.blobs.revoke(&loc),
            None => false,
        }
    }

    /// Release every live handle; returns how many were released.
    pub fn release_all(&self) -> usize {
        let mut cache = self.lock();
        cache.by_name.clear();
        cache.blobs.clear()
    }

    /// Number of live handles.
    pub fn live_handles(&self) -> usize {
        self.lock().blobs.len()
    }

    fn lock(&self) -> MutexGuard<'_, HandleCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ParamsResource {
    fn drop(&mut self) {
        let released = self.release_all();
        if released > 0 {
            tracing::debug!(released, "released live handles");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resource/params.rs"]
mod tests;

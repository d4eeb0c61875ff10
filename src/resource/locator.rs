use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::error::{CanvasError, CanvasResult};

/// Prefix of locators that point at a session-local binary handle.
pub const BLOB_SCHEME: &str = "blob:cogcanvas/";

/// Opaque string the presentation layer uses to retrieve a resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Locator text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this locator names a live-session binary handle.
    pub fn is_blob(&self) -> bool {
        self.0.starts_with(BLOB_SCHEME)
    }
}

impl std::fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bytes held behind a blob locator.
#[derive(Clone, Debug)]
pub struct StoredBlob {
    /// MIME type reported by the host.
    pub mime: String,
    /// Contents.
    pub bytes: Arc<Vec<u8>>,
}

/// Session-owned table of materialized binary handles.
#[derive(Debug, Default)]
pub struct BlobStore {
    next: u64,
    blobs: HashMap<ResourceLocator, StoredBlob>,
}

impl BlobStore {
    /// Materialize `bytes` and return a fresh handle for them.
    pub fn create(&mut self, bytes: Vec<u8>, mime: &str) -> ResourceLocator {
        self.next += 1;
        let loc = ResourceLocator(format!("{BLOB_SCHEME}{}", self.next));
        self.blobs.insert(
            loc.clone(),
            StoredBlob {
                mime: mime.to_string(),
                bytes: Arc::new(bytes),
            },
        );
        loc
    }

    /// Look up a live handle.
    pub fn get(&self, loc: &ResourceLocator) -> Option<&StoredBlob> {
        self.blobs.get(loc)
    }

    /// Invalidate a handle. Returns whether it was live.
    pub fn revoke(&mut self, loc: &ResourceLocator) -> bool {
        self.blobs.remove(loc).is_some()
    }

    /// Invalidate every handle; returns how many were live.
    pub fn clear(&mut self) -> usize {
        let n = self.blobs.len();
        self.blobs.clear();
        n
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// True when no handle is live.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

/// Normalize and validate a params-relative resource name.
///
/// The result uses `/` separators, drops `.` segments, and rejects absolute names or parent
/// traversals (`..`).
pub fn normalize_param_name(name: &str) -> CanvasResult<String> {
    let s = name.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CanvasError::validation("resource names must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CanvasError::validation(
                "resource names must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CanvasError::validation(
            "resource name must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/resource/locator.rs"]
mod tests;

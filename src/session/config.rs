use std::path::PathBuf;
use std::time::Duration;

/// Startup query configuration, read once per session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Explicit deterministic seed, as given.
    pub seed: Option<String>,
    /// Raw `preview` flag.
    pub preview: Option<String>,
    /// Raw `live` flag.
    pub live: Option<String>,
}

impl SessionConfig {
    /// Parse a URL query string such as `?seed=42&live=1`.
    ///
    /// Unknown keys are ignored; for repeated keys the first occurrence wins.
    pub fn from_query(query: &str) -> Self {
        let q = query.trim().trim_start_matches('?');
        let mut out = Self::default();
        for (k, v) in url::form_urlencoded::parse(q.as_bytes()) {
            let slot = match k.as_ref() {
                "seed" => &mut out.seed,
                "preview" => &mut out.preview,
                "live" => &mut out.live,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(v.into_owned());
            }
        }
        out
    }

    /// Whether the `preview` flag is set.
    pub fn preview_flag(&self) -> bool {
        is_truthy(self.preview.as_deref())
    }

    /// Whether the `live` flag is set.
    pub fn live_flag(&self) -> bool {
        is_truthy(self.live.as_deref())
    }
}

/// Only the exact value `1` turns a flag on.
fn is_truthy(v: Option<&str>) -> bool {
    v == Some("1")
}

/// Tunables for one session.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SessionOpts {
    /// Upper bound for a correlated host request, in milliseconds.
    pub request_timeout_ms: u64,
    /// Filesystem root that static locators are resolved against.
    pub static_root: PathBuf,
    /// Name of the params directory below `static_root`.
    pub params_dir: String,
    /// Viewport width reported by the embedding page.
    pub window_width: u32,
    /// Viewport height reported by the embedding page.
    pub window_height: u32,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            static_root: PathBuf::from("."),
            params_dir: "params".to_string(),
            window_width: 1400,
            window_height: 900,
        }
    }
}

impl SessionOpts {
    /// Request timeout as a [`Duration`]; never zero.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;

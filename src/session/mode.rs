use crate::session::config::SessionConfig;

/// Whether a host frame is driving this session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// No host; everything comes from the static params bundle.
    Static,
    /// Host present, live mint configuration.
    Live,
    /// Host present, preview of a live mint.
    LivePreview,
}

impl SessionMode {
    /// True for both live variants; they share all protocol behavior.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live | Self::LivePreview)
    }

    /// True only for [`SessionMode::LivePreview`].
    pub fn is_preview(self) -> bool {
        matches!(self, Self::LivePreview)
    }
}

/// Decide the session mode from startup flags. Pure: the host is never probed.
pub fn detect(config: &SessionConfig) -> SessionMode {
    if config.preview_flag() {
        SessionMode::LivePreview
    } else if config.live_flag() {
        SessionMode::Live
    } else {
        SessionMode::Static
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/mode.rs"]
mod tests;

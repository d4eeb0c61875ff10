use crate::session::mode::SessionMode;

/// Smallest canvas edge in pixels.
pub const MIN_CANVAS_EDGE: u32 = 700;
/// Largest canvas edge in pixels.
pub const MAX_CANVAS_EDGE: u32 = 900;
/// Width reserved for the live configuration panel.
pub const LIVE_UI_WIDTH: u32 = 500;

/// Canvas and frame size derived from the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CanvasLayout {
    /// Edge of the square drawing surface.
    pub canvas_edge: u32,
    /// Width the embedding frame should take.
    pub frame_width: u32,
    /// Height the embedding frame should take.
    pub frame_height: u32,
}

impl CanvasLayout {
    /// The canvas follows the viewport height within `[700, 900]`; live sessions widen the frame
    /// for the configuration panel. Viewport width only matters for page alignment.
    pub fn compute(_window_width: u32, window_height: u32, mode: SessionMode) -> Self {
        let edge = window_height.clamp(MIN_CANVAS_EDGE, MAX_CANVAS_EDGE);
        let frame_width = if mode.is_live() {
            edge + LIVE_UI_WIDTH
        } else {
            edge
        };
        Self {
            canvas_edge: edge,
            frame_width,
            frame_height: edge,
        }
    }
}

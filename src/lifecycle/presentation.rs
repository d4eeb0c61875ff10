use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{CanvasError, CanvasResult};
use crate::params::catalog::Background;

/// Straight (non-premultiplied) RGBA8 frame, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Frame filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(n),
        }
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> CanvasResult<Vec<u8>> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.width == 0 || self.height == 0 || self.data.len() != expected {
            return Err(CanvasError::validation(format!(
                "frame {}x{} needs {expected} bytes, has {}",
                self.width,
                self.height,
                self.data.len()
            )));
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CanvasError::validation("frame buffer does not match its size"))?;
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .context("encode thumbnail png")?;
        Ok(out)
    }
}

/// Rendering side of a session: the drawing loop, image loading and UI live behind this.
pub trait Presentation {
    /// Snapshot of the currently rendered surface.
    fn capture_frame(&mut self) -> CanvasResult<FrameRGBA>;

    /// Load (if needed) and draw the background at `index`.
    fn reload_background(&mut self, index: usize, background: &Background);
}

//! Decoded video frame handle
//!
//! The detector contract requires a fully decoded, ready frame — never one
//! mid-decode. `Frame` is the handle the runtime passes across the boundary:
//! dimensions plus a cheaply clonable pixel payload.

use bytes::Bytes;
use frostpane_core::VideoDimensions;

/// A decoded camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Bytes,
}

impl Frame {
    pub fn new(width: u32, height: u32, pixels: Bytes) -> Self {
        Frame {
            width,
            height,
            pixels,
        }
    }

    /// A frame with dimensions but no pixel payload. Useful for tests and
    /// for detectors that only consume geometry.
    pub fn blank(width: u32, height: u32) -> Self {
        Frame::new(width, height, Bytes::new())
    }

    pub fn dimensions(&self) -> VideoDimensions {
        VideoDimensions::new(self.width, self.height)
    }

    /// A stream that has not warmed up yet produces zero-sized frames;
    /// those are skipped, not processed.
    pub fn is_ready(&self) -> bool {
        self.dimensions().is_ready()
    }

    pub fn pixels(&self) -> &Bytes {
        &self.pixels
    }
}

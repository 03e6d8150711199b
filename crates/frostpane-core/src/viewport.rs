//! Video-to-display cover projection
//!
//! The camera feed is presented aspect-filled ("cover"): scaled uniformly
//! until it covers the whole viewport, centered, overflow cropped. Mapping a
//! detection point therefore means simulating that projection, not a plain
//! axis-by-axis rescale.

use crate::{DisplayPoint, VideoPoint};

/// Pixel dimensions of the incoming video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A stream that has not produced a decoded frame yet reports zero
    /// dimensions.
    #[inline]
    pub fn is_ready(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// The display viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Map a video-space point into display space through the cover
    /// projection.
    ///
    /// If the stream is not ready (either dimension zero) the point is
    /// returned unchanged rather than dividing by zero: one frame of a
    /// slightly wrong coordinate beats a crash. Output is normalized and
    /// stays in `[0,1]` for points inside the visible crop; points in the
    /// cropped-off strips map outside and are the caller's to clip.
    ///
    /// Intermediate math is f64: extreme aspect mismatches produce scale
    /// factors that shred f32 precision.
    pub fn map_to_display(self, point: VideoPoint, video: VideoDimensions) -> DisplayPoint {
        if !video.is_ready() {
            return DisplayPoint::new(point.x, point.y);
        }

        let vw = f64::from(video.width);
        let vh = f64::from(video.height);
        let dw = f64::from(self.width);
        let dh = f64::from(self.height);

        let scale = (dw / vw).max(dh / vh);
        let scaled_w = vw * scale;
        let scaled_h = vh * scale;

        let offset_x = (dw - scaled_w) / 2.0;
        let offset_y = (dh - scaled_h) / 2.0;

        let screen_x = f64::from(point.x) * scaled_w + offset_x;
        let screen_y = f64::from(point.y) * scaled_h + offset_y;

        DisplayPoint::new((screen_x / dw) as f32, (screen_y / dh) as f32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

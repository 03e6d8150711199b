//! Error types for Frostpane
//!
//! There is no fatal class in the core: every variant is recovered by
//! substitution (detection faults), identity fallback (geometry faults), or
//! frame skip (resource faults). The enum exists so boundaries can report
//! what they recovered from.

use thiserror::Error;

use crate::FrameTime;

/// Core Frostpane errors.
#[derive(Error, Debug)]
pub enum PaneError {
    // Detection faults
    #[error("detector fault: {0}")]
    DetectorFault(String),

    #[error("detector not initialized")]
    DetectorNotReady,

    #[error("non-monotonic frame timestamp: {last:?} followed by {got:?}")]
    NonMonotonicFrame { last: FrameTime, got: FrameTime },

    // Resource faults
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    #[error("video frame not ready")]
    FrameNotReady,
}

/// Result type for Frostpane operations.
pub type PaneResult<T> = Result<T, PaneError>;

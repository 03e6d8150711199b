//! Frostpane Interaction - The gesture state machine and its channels
//!
//! This crate converts a stream of detection snapshots into the five
//! interaction states and the derived drawing/snow signals:
//!
//! - `InteractionMachine`: pure per-frame transition logic with explicit
//!   timer fields (breath hold, reset cooldown, reset delay)
//! - `MotionCell`: the high-frequency single-writer/multi-reader cell the
//!   render loops read every frame
//! - watch channels: the low-frequency coarse channel for UI state and
//!   indicator flags, which may lag or coalesce by design
//!
//! Per-frame motion data goes through the cell, never through the watch
//! channel; the split is the central concurrency decision of the system.

pub mod cell;
pub mod machine;
pub mod watch;

pub use cell::*;
pub use machine::*;
pub use watch::*;

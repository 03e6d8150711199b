//! Frostpane Perception - The detector boundary
//!
//! Detection as STATE, not inference. The landmark detector itself (model
//! loading, inference, GPU delegates) lives behind the `Detector` trait;
//! this crate owns everything on the near side of that boundary:
//!
//! - the decoded-frame handle the detector consumes
//! - the raw landmark model and its interpretation into a snapshot
//! - the fault-tolerant adapter that turns detector failures into the
//!   neutral "nothing detected" snapshot instead of propagating them

pub mod adapter;
pub mod detector;
pub mod frame;
pub mod landmarks;

pub use adapter::*;
pub use detector::*;
pub use frame::*;
pub use landmarks::*;

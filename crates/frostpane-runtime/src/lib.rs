//! Frostpane Runtime - The per-frame node
//!
//! One detection + state-machine pass per display frame, plus an
//! independent frame loop per visual effect. All passes share one thread's
//! worth of cooperative scheduling: the motion cell is written by the
//! detection pass and read by the effect passes with no preemption in
//! between, so readers always see the current frame's value.
//!
//! - `PaneRuntime`: the staged tick (clock → frame → detect → map → fade →
//!   machine → publish) and its stats
//! - effect loops: individually stoppable tasks owning their canvases
//! - telemetry: opt-in tracing subscriber setup

pub mod loops;
pub mod runtime;
pub mod telemetry;

pub use loops::*;
pub use runtime::*;
pub use telemetry::*;

//! Interaction simulator
//!
//! Drives a full `PaneRuntime` frame by frame on a manual clock: feed a raw
//! detection per frame, collect transitions and published signals, assert on
//! the trace. No real time passes.

use std::time::Duration;

use frostpane_core::InteractionState;
use frostpane_interaction::{FrameOutput, FrameSignals, MotionReader, Transition};
use frostpane_perception::{Frame, RawDetection};
use frostpane_runtime::{PaneRuntime, RuntimeConfig};
use frostpane_time::ManualClock;

use crate::{breath_frame, quiet_frame, ScriptedDetector};

/// Everything observed while a simulation ran.
#[derive(Debug, Default)]
pub struct SimulationTrace {
    /// Frames fed (processed or skipped).
    pub frames: u64,
    /// Every state transition, in order.
    pub transitions: Vec<Transition>,
    /// The signals published each processed frame, in order.
    pub signals: Vec<FrameSignals>,
}

impl SimulationTrace {
    /// Transitions into a given state.
    pub fn entries_into(&self, state: InteractionState) -> Vec<&Transition> {
        self.transitions.iter().filter(|t| t.to == state).collect()
    }
}

/// Frame-by-frame driver around `PaneRuntime`.
pub struct InteractionSimulator {
    runtime: PaneRuntime<ScriptedDetector, ManualClock>,
    feed: ScriptedDetector,
    clock: ManualClock,
    reader: MotionReader,
    frame: Frame,
    frame_interval: Duration,
    trace: SimulationTrace,
}

impl InteractionSimulator {
    /// Simulator at the default 60Hz-ish cadence.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default(), Duration::from_millis(16))
    }

    /// Simulator with explicit config and frame cadence. A 1ms cadence
    /// gives millisecond-exact timing properties.
    pub fn with_config(config: RuntimeConfig, frame_interval: Duration) -> Self {
        let feed = ScriptedDetector::new();
        let clock = ManualClock::new();
        let mut runtime = PaneRuntime::new(feed.clone(), clock.clone(), config);
        runtime
            .initialize()
            .expect("scripted detector always initializes");
        let reader = runtime.motion_reader();

        InteractionSimulator {
            runtime,
            feed,
            clock,
            reader,
            frame: Frame::blank(640, 480),
            frame_interval,
            trace: SimulationTrace::default(),
        }
    }

    /// Feed one detection frame and advance one frame interval.
    pub fn step(&mut self, raw: RawDetection) -> Option<FrameOutput> {
        self.clock.advance(self.frame_interval);
        self.feed.push(raw);
        self.trace.frames += 1;

        let output = self.runtime.tick(Some(&self.frame));
        if let Some(output) = &output {
            if let Some(transition) = output.transition {
                self.trace.transitions.push(transition);
            }
            self.trace.signals.push(self.reader.latest());
        }
        output
    }

    /// Feed the same detection until `duration` has elapsed.
    pub fn run(&mut self, raw: &RawDetection, duration: Duration) {
        let frames = (duration.as_micros() / self.frame_interval.as_micros()) as u64;
        for _ in 0..frames {
            self.step(raw.clone());
        }
    }

    /// Skip one frame (no camera frame available).
    pub fn drop_frame(&mut self) {
        self.clock.advance(self.frame_interval);
        self.trace.frames += 1;
        self.runtime.tick(None);
    }

    pub fn state(&self) -> InteractionState {
        self.runtime.state()
    }

    pub fn fog_opacity(&self) -> f32 {
        self.runtime.fog_opacity()
    }

    pub fn latest_signals(&self) -> FrameSignals {
        self.reader.latest()
    }

    pub fn trace(&self) -> &SimulationTrace {
        &self.trace
    }

    pub fn runtime(&self) -> &PaneRuntime<ScriptedDetector, ManualClock> {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut PaneRuntime<ScriptedDetector, ManualClock> {
        &mut self.runtime
    }
}

impl Default for InteractionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Predefined simulation scenarios.
pub mod scenarios {
    use super::*;

    /// Breath held through the trigger, fog bloomed, machine in Drawing.
    pub fn fogged_pane() -> InteractionSimulator {
        let mut sim = InteractionSimulator::new();
        sim.run(&breath_frame(), Duration::from_millis(900));
        assert_eq!(sim.state(), InteractionState::Fogging);

        // Let the fade cross the drawing threshold.
        sim.run(&quiet_frame(), Duration::from_millis(1200));
        assert_eq!(sim.state(), InteractionState::Drawing);
        sim
    }

    /// Fogged pane with the reset cooldown already lapsed.
    pub fn cooldown_lapsed() -> InteractionSimulator {
        let mut sim = fogged_pane();
        sim.run(&quiet_frame(), Duration::from_millis(2100));
        sim
    }
}

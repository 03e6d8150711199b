//! The runtime node
//!
//! `PaneRuntime` owns the perception adapter, the video clock, the state
//! machine and the publish side of both channels. Its `tick` is the single
//! detection + state pass per frame; everything downstream reads what it
//! published.

use std::time::{Duration, Instant};

use frostpane_core::{DetectionFlags, FrameTime, InteractionState, PaneResult, Viewport};
use frostpane_effects::FogFade;
use frostpane_interaction::{
    motion_cell, FlagsChannel, FrameInput, FrameOutput, FrameSignals, InteractionMachine,
    MachineConfig, MotionReader, MotionWriter, StateChannel,
};
use frostpane_perception::{Detector, Frame, PerceptionAdapter};
use frostpane_time::{Clock, FramePacer, VideoClock};
use tokio::sync::watch;
use tracing::debug;

/// Runtime configuration.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Display viewport at startup.
    pub viewport: Viewport,
    /// Pacing for the detection pass and the effect loops.
    pub pacer: FramePacer,
    /// Gesture machine timings.
    pub machine: MachineConfig,
    /// Full-sweep duration of the fog opacity fade.
    pub fade_duration: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            viewport: Viewport::default(),
            pacer: FramePacer::default(),
            machine: MachineConfig::default(),
            fade_duration: Duration::from_millis(1000),
        }
    }
}

/// Counters for observing the frame loop.
#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub frames: u64,
    pub frames_skipped: u64,
    pub detector_faults: u64,
    pub transitions: u64,
    pub last_tick_duration: Duration,
}

/// The per-frame node.
pub struct PaneRuntime<D: Detector, C: Clock> {
    adapter: PerceptionAdapter<D>,
    clock: VideoClock<C>,
    viewport: Viewport,
    machine: InteractionMachine,
    fade: FogFade,
    writer: MotionWriter,
    state_channel: StateChannel,
    flags_channel: FlagsChannel,
    viewport_tx: watch::Sender<Viewport>,
    pacer: FramePacer,
    stats: RuntimeStats,
    last_frame_at: Option<FrameTime>,
}

impl<D: Detector, C: Clock> PaneRuntime<D, C> {
    pub fn new(detector: D, clock: C, config: RuntimeConfig) -> Self {
        let (writer, _) = motion_cell();
        let (viewport_tx, _) = watch::channel(config.viewport);

        PaneRuntime {
            adapter: PerceptionAdapter::new(detector),
            clock: VideoClock::new(clock),
            viewport: config.viewport,
            machine: InteractionMachine::new(config.machine),
            fade: FogFade::new(config.fade_duration),
            writer,
            state_channel: StateChannel::new(),
            flags_channel: FlagsChannel::new(),
            viewport_tx,
            pacer: config.pacer,
            stats: RuntimeStats::default(),
            last_frame_at: None,
        }
    }

    /// Initialize the detector. Idempotent; must complete before the frame
    /// loop starts consuming detections.
    pub fn initialize(&mut self) -> PaneResult<()> {
        self.adapter.initialize()
    }

    /// One detection + state-machine pass.
    ///
    /// `frame` is the current decoded camera frame, or `None` when the
    /// surface is unavailable — a resource fault: the frame is skipped, no
    /// interaction state mutates, and the next frame retries independently.
    /// Returns the machine output for processed frames.
    pub fn tick(&mut self, frame: Option<&Frame>) -> Option<FrameOutput> {
        let started = Instant::now();
        self.stats.frames += 1;

        let now = self.clock.next_frame_time();

        let frame = match frame {
            Some(frame) if frame.is_ready() => frame,
            _ => {
                self.stats.frames_skipped += 1;
                return None;
            }
        };

        let snapshot = self.adapter.snapshot(frame, now);
        let finger = snapshot
            .index_finger
            .map(|p| self.viewport.map_to_display(p, frame.dimensions()));

        // Ease the fog toward the target set at the end of the previous
        // frame, then feed the machine the value the user currently sees.
        let dt = self
            .last_frame_at
            .map(|last| now - last)
            .unwrap_or(Duration::ZERO);
        self.last_frame_at = Some(now);
        self.fade.step(dt);

        let output = self.machine.advance(&FrameInput {
            snapshot,
            finger,
            fog_opacity: self.fade.current(),
            now,
        });
        if output.transition.is_some() {
            self.stats.transitions += 1;
        }
        self.fade.set_target(output.state.fog_target());

        // High-frequency channel first: the render loops read this within
        // the same frame.
        self.writer.publish(FrameSignals {
            motion: output.signal,
            state: output.state,
            fog_opacity: self.fade.current(),
        });

        // Low-frequency channel: indicator UI may observe these late.
        self.state_channel.publish(output.state);
        self.flags_channel.publish(DetectionFlags {
            mouth_open: snapshot.mouth_open,
            finger_detected: finger.is_some(),
            two_hands: snapshot.two_hands,
        });

        self.stats.detector_faults = self.adapter.fault_count();
        self.stats.last_tick_duration = started.elapsed();

        Some(output)
    }

    /// Adopt a new display viewport and propagate it to the effect loops,
    /// which reprovision their buffers at the top of their next iteration.
    pub fn resize_viewport(&mut self, viewport: Viewport) {
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        self.viewport_tx.send_replace(viewport);
    }

    /// Read handle for render loops.
    pub fn motion_reader(&self) -> MotionReader {
        self.writer.reader()
    }

    /// Coarse state channel for UI observers.
    pub fn state_updates(&self) -> watch::Receiver<InteractionState> {
        self.state_channel.subscribe()
    }

    /// Indicator flags channel for UI observers.
    pub fn flag_updates(&self) -> watch::Receiver<DetectionFlags> {
        self.flags_channel.subscribe()
    }

    /// Viewport channel for effect loops.
    pub fn viewport_updates(&self) -> watch::Receiver<Viewport> {
        self.viewport_tx.subscribe()
    }

    pub fn pacer(&self) -> FramePacer {
        self.pacer
    }

    pub fn state(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn fog_opacity(&self) -> f32 {
        self.fade.current()
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }
}

//! Interaction state machine
//!
//! One advance per processed frame, at most one transition per advance, and
//! transitions are not reentrant: entering a state never evaluates that
//! state's own exit conditions in the same pass.
//!
//! All timers are explicit optional-timestamp fields on the machine, mutated
//! only here. The machine never reads a clock itself; time arrives with the
//! frame input, so every timing property is testable against a manual clock.

use std::time::Duration;

use frostpane_core::{
    DetectionSnapshot, DisplayPoint, FrameTime, InteractionState, MotionSignal,
};
use tracing::debug;

/// Timing knobs for the gesture machine.
#[derive(Clone, Debug)]
pub struct MachineConfig {
    /// How long a breath must be held continuously to trigger fog or reset.
    pub breath_hold: Duration,
    /// Dead time after a fog trigger during which breath cannot start a
    /// reset. Armed the instant Fogging begins.
    pub reset_cooldown: Duration,
    /// Dwell in Resetting before returning to Clear.
    pub reset_duration: Duration,
    /// Fog opacity at which the pane counts as fully fogged.
    pub fogged_threshold: f32,
    /// If the presentation layer never reaches the threshold, leave Fogging
    /// anyway after this long. Keeps a stalled animation from wedging the
    /// machine.
    pub fog_convergence_fallback: Duration,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            breath_hold: Duration::from_millis(800),
            reset_cooldown: Duration::from_millis(2000),
            reset_duration: Duration::from_millis(1000),
            fogged_threshold: 0.8,
            fog_convergence_fallback: Duration::from_millis(3000),
        }
    }
}

impl MachineConfig {
    /// Slower timings for young children: longer holds register more
    /// reliably, longer cooldown avoids accidental resets.
    pub fn relaxed() -> Self {
        MachineConfig {
            breath_hold: Duration::from_millis(1200),
            reset_cooldown: Duration::from_millis(3000),
            ..Default::default()
        }
    }
}

/// Everything the machine consumes for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    /// Interpreted detection for this frame.
    pub snapshot: DetectionSnapshot,
    /// Index finger already mapped into display space, if detected.
    pub finger: Option<DisplayPoint>,
    /// Current fog opacity, animated by the presentation layer. An input,
    /// not derived here.
    pub fog_opacity: f32,
    /// Frame timestamp from the video clock.
    pub now: FrameTime,
}

/// A state change that happened during an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: InteractionState,
    pub to: InteractionState,
    pub at: FrameTime,
}

/// Everything the machine produces for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput {
    pub state: InteractionState,
    pub signal: MotionSignal,
    pub transition: Option<Transition>,
}

/// Breath and cooldown timers. Owned exclusively by the machine.
#[derive(Debug, Clone, Copy, Default)]
struct GestureTimers {
    /// When the current continuous mouth-open run started, if one is live.
    breath_hold_started_at: Option<FrameTime>,
    /// When fog was last triggered; the reset cooldown counts from here.
    last_fog_trigger_at: FrameTime,
}

/// The five-state gesture machine.
pub struct InteractionMachine {
    state: InteractionState,
    timers: GestureTimers,
    entered_fogging_at: Option<FrameTime>,
    entered_resetting_at: Option<FrameTime>,
    config: MachineConfig,
}

impl InteractionMachine {
    pub fn new(config: MachineConfig) -> Self {
        InteractionMachine {
            state: InteractionState::Clear,
            timers: GestureTimers::default(),
            entered_fogging_at: None,
            entered_resetting_at: None,
            config,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Advance one frame. Detection absences are valid input, never errors;
    /// there is no failure path out of this function.
    pub fn advance(&mut self, input: &FrameInput) -> FrameOutput {
        let before = self.state;

        let signal = match self.state {
            InteractionState::Clear => {
                if self.breath_held(input, true) {
                    self.state = InteractionState::Fogging;
                    self.entered_fogging_at = Some(input.now);
                    self.timers.last_fog_trigger_at = input.now;
                }
                MotionSignal::idle()
            }

            InteractionState::Fogging => {
                let fogged = input.fog_opacity >= self.config.fogged_threshold;
                let stalled = self
                    .entered_fogging_at
                    .is_some_and(|entered| {
                        input.now - entered >= self.config.fog_convergence_fallback
                    });

                if fogged || stalled {
                    if stalled && !fogged {
                        debug!(
                            opacity = input.fog_opacity,
                            "fog never converged, falling through to drawing"
                        );
                    }
                    self.state = InteractionState::Drawing;
                    self.entered_fogging_at = None;
                }
                MotionSignal::idle()
            }

            InteractionState::Drawing | InteractionState::Snowing => {
                // Reset breath first: if it fires it is this frame's single
                // transition and gestures are no longer interpreted.
                let cooldown_over =
                    input.now - self.timers.last_fog_trigger_at >= self.config.reset_cooldown;
                if self.breath_held(input, cooldown_over) {
                    self.state = InteractionState::Resetting;
                    self.entered_resetting_at = Some(input.now);
                    MotionSignal::idle()
                } else if input.snapshot.two_hands {
                    // Two hands suppress drawing unconditionally.
                    self.state = InteractionState::Snowing;
                    MotionSignal::snowing()
                } else {
                    self.state = InteractionState::Drawing;
                    MotionSignal::drawing(input.finger)
                }
            }

            InteractionState::Resetting => {
                // Unconditional: no detection input matters here.
                if self
                    .entered_resetting_at
                    .is_some_and(|entered| input.now - entered >= self.config.reset_duration)
                {
                    self.state = InteractionState::Clear;
                    self.entered_resetting_at = None;
                }
                MotionSignal::idle()
            }
        };

        let transition = (self.state != before).then(|| {
            debug!(from = %before, to = %self.state, "interaction transition");
            Transition {
                from: before,
                to: self.state,
                at: input.now,
            }
        });

        FrameOutput {
            state: self.state,
            signal,
            transition,
        }
    }

    /// Track the continuous mouth-open run and report whether it crossed
    /// the hold threshold this frame. No partial credit: any closed-mouth
    /// frame discards the run. `armed` gates starting/continuing a run
    /// without discarding the gesture semantics (used for the reset
    /// cooldown); a closed mouth always discards.
    fn breath_held(&mut self, input: &FrameInput, armed: bool) -> bool {
        if !input.snapshot.mouth_open {
            self.timers.breath_hold_started_at = None;
            return false;
        }
        if !armed {
            return false;
        }

        let started = *self
            .timers
            .breath_hold_started_at
            .get_or_insert(input.now);

        if input.now - started >= self.config.breath_hold {
            self.timers.breath_hold_started_at = None;
            true
        } else {
            false
        }
    }
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    struct Harness {
        machine: InteractionMachine,
        now: FrameTime,
        fog_opacity: f32,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                machine: InteractionMachine::default(),
                now: FrameTime::ZERO,
                fog_opacity: 0.0,
            }
        }

        fn step(&mut self, snapshot: DetectionSnapshot) -> FrameOutput {
            self.now = self.now + FRAME;
            let finger = snapshot.index_finger.map(|p| DisplayPoint::new(p.x, p.y));
            self.machine.advance(&FrameInput {
                snapshot,
                finger,
                fog_opacity: self.fog_opacity,
                now: self.now,
            })
        }

        /// Step with a given snapshot until `duration` has elapsed,
        /// returning all transitions observed.
        fn step_for(&mut self, snapshot: DetectionSnapshot, duration: Duration) -> Vec<Transition> {
            let mut transitions = Vec::new();
            let end = self.now + duration;
            while self.now < end {
                if let Some(t) = self.step(snapshot).transition {
                    transitions.push(t);
                }
            }
            transitions
        }
    }

    fn mouth_open() -> DetectionSnapshot {
        DetectionSnapshot {
            mouth_open: true,
            ..Default::default()
        }
    }

    fn two_hands() -> DetectionSnapshot {
        DetectionSnapshot {
            two_hands: true,
            ..Default::default()
        }
    }

    fn finger_at(x: f32, y: f32) -> DetectionSnapshot {
        DetectionSnapshot {
            index_finger: Some(frostpane_core::VideoPoint::new(x, y)),
            ..Default::default()
        }
    }

    /// Drive a fresh harness through breath + fog bloom into Drawing.
    fn fogged_harness() -> Harness {
        let mut h = Harness::new();
        h.step_for(mouth_open(), Duration::from_millis(900));
        assert_eq!(h.machine.state(), InteractionState::Fogging);
        h.fog_opacity = 0.95;
        h.step(DetectionSnapshot::empty());
        assert_eq!(h.machine.state(), InteractionState::Drawing);
        h
    }

    #[test]
    fn test_breath_hold_triggers_fogging_once() {
        let mut h = Harness::new();

        let transitions = h.step_for(mouth_open(), Duration::from_millis(900));

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from, InteractionState::Clear);
        assert_eq!(transitions[0].to, InteractionState::Fogging);
        // Fires at the frame where the run crosses the hold duration.
        let held = transitions[0].at - FrameTime::from_millis(16);
        assert!(held >= Duration::from_millis(800));
        assert!(held < Duration::from_millis(850));
    }

    #[test]
    fn test_short_breath_never_triggers() {
        let mut h = Harness::new();

        let transitions = h.step_for(mouth_open(), Duration::from_millis(784));

        assert!(transitions.is_empty());
        assert_eq!(h.machine.state(), InteractionState::Clear);
    }

    #[test]
    fn test_interrupted_breath_resets_timer() {
        let mut h = Harness::new();

        // Two 500ms runs separated by a single closed-mouth frame.
        h.step_for(mouth_open(), Duration::from_millis(500));
        h.step(DetectionSnapshot::empty());
        let transitions = h.step_for(mouth_open(), Duration::from_millis(500));

        assert!(transitions.is_empty());
        assert_eq!(h.machine.state(), InteractionState::Clear);
    }

    #[test]
    fn test_fogging_waits_for_opacity() {
        let mut h = Harness::new();
        h.step_for(mouth_open(), Duration::from_millis(900));
        assert_eq!(h.machine.state(), InteractionState::Fogging);

        h.fog_opacity = 0.5;
        h.step(DetectionSnapshot::empty());
        assert_eq!(h.machine.state(), InteractionState::Fogging);

        h.fog_opacity = 0.8;
        h.step(DetectionSnapshot::empty());
        assert_eq!(h.machine.state(), InteractionState::Drawing);
    }

    #[test]
    fn test_fogging_falls_back_when_opacity_stalls() {
        let mut h = Harness::new();
        h.step_for(mouth_open(), Duration::from_millis(900));
        assert_eq!(h.machine.state(), InteractionState::Fogging);

        // Opacity never moves; the fallback window elapses.
        h.fog_opacity = 0.0;
        h.step_for(DetectionSnapshot::empty(), Duration::from_millis(3100));

        assert_eq!(h.machine.state(), InteractionState::Drawing);
    }

    #[test]
    fn test_two_hands_enters_snowing_and_suppresses_draw() {
        let mut h = fogged_harness();

        let mut snap = two_hands();
        snap.index_finger = Some(frostpane_core::VideoPoint::CENTER);

        for i in 0..3 {
            let out = h.step(snap);
            assert_eq!(out.state, InteractionState::Snowing, "frame {i}");
            assert!(out.signal.snow_active, "frame {i}");
            assert!(out.signal.draw_point.is_none(), "frame {i}");
        }
    }

    #[test]
    fn test_hands_down_returns_to_drawing() {
        let mut h = fogged_harness();
        h.step(two_hands());
        assert_eq!(h.machine.state(), InteractionState::Snowing);

        let out = h.step(finger_at(0.3, 0.4));

        assert_eq!(out.state, InteractionState::Drawing);
        assert!(!out.signal.snow_active);
        assert!(out.signal.draw_point.is_some());
    }

    #[test]
    fn test_drawing_publishes_finger_point() {
        let mut h = fogged_harness();

        let out = h.step(finger_at(0.25, 0.75));
        let point = out.signal.draw_point.unwrap();

        assert!((point.x - 0.25).abs() < f32::EPSILON);
        assert!((point.y - 0.75).abs() < f32::EPSILON);

        // No finger: point absent, still Drawing.
        let out = h.step(DetectionSnapshot::empty());
        assert!(out.signal.draw_point.is_none());
        assert_eq!(out.state, InteractionState::Drawing);
    }

    #[test]
    fn test_reset_cooldown_blocks_immediate_reset() {
        let mut h = fogged_harness();

        // Breathe again right after the fog trigger: cooldown still live,
        // so the machine stays in Drawing no matter how long the hold.
        let transitions = h.step_for(mouth_open(), Duration::from_millis(1000));

        assert!(transitions.is_empty());
        assert_eq!(h.machine.state(), InteractionState::Drawing);
    }

    #[test]
    fn test_reset_breath_after_cooldown() {
        let mut h = fogged_harness();

        // Let the cooldown lapse with idle frames, then hold a breath.
        h.step_for(DetectionSnapshot::empty(), Duration::from_millis(2100));
        let transitions = h.step_for(mouth_open(), Duration::from_millis(900));

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].to, InteractionState::Resetting);
    }

    #[test]
    fn test_resetting_returns_to_clear_after_dwell() {
        let mut h = fogged_harness();
        h.step_for(DetectionSnapshot::empty(), Duration::from_millis(2100));
        let entered = h.step_for(mouth_open(), Duration::from_millis(900));
        assert_eq!(h.machine.state(), InteractionState::Resetting);
        let reset_at = entered.last().unwrap().at;

        // Detection input during the dwell is ignored.
        let mut busy = two_hands();
        busy.mouth_open = true;
        let transitions = h.step_for(busy, Duration::from_millis(1100));

        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from, InteractionState::Resetting);
        assert_eq!(transitions[0].to, InteractionState::Clear);
        // Dwell is 1000ms regardless of input.
        let dwell = transitions[0].at - reset_at;
        assert!(dwell >= Duration::from_millis(1000));
        assert!(dwell < Duration::from_millis(1050));
    }

    #[test]
    fn test_one_transition_per_frame() {
        let mut h = Harness::new();

        // Crossing the breath threshold lands in Fogging, not further, even
        // with opacity already past the drawing threshold.
        h.fog_opacity = 0.95;
        let transitions = h.step_for(mouth_open(), Duration::from_millis(900));

        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].to, InteractionState::Fogging);
        assert_eq!(transitions[1].to, InteractionState::Drawing);
        // Distinct frames.
        assert!(transitions[1].at > transitions[0].at);
    }

    #[test]
    fn test_reset_wins_over_snow_in_same_frame() {
        let mut h = fogged_harness();
        h.step_for(DetectionSnapshot::empty(), Duration::from_millis(2100));

        // Hold breath with both hands up: the hold matures into the
        // frame's single transition (to Resetting), and the signal is idle.
        let mut snap = two_hands();
        snap.mouth_open = true;
        // Build up the hold; each pre-threshold frame still snows.
        let transitions = h.step_for(snap, Duration::from_millis(900));

        let reset = transitions
            .iter()
            .find(|t| t.to == InteractionState::Resetting)
            .unwrap();
        assert_eq!(reset.from, InteractionState::Snowing);
        assert_eq!(h.machine.state(), InteractionState::Resetting);
    }

    #[test]
    fn test_relaxed_preset_needs_longer_hold() {
        let mut h = Harness::new();
        h.machine = InteractionMachine::new(MachineConfig::relaxed());

        h.step_for(mouth_open(), Duration::from_millis(900));
        assert_eq!(h.machine.state(), InteractionState::Clear);

        h.step_for(mouth_open(), Duration::from_millis(400));
        assert_eq!(h.machine.state(), InteractionState::Fogging);
    }
}

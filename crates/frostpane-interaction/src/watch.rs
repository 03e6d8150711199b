//! Low-frequency UI channels
//!
//! Coarse state for indicators and the fog animator rides on watch
//! channels: observers see the latest value when they get around to
//! looking, and intermediate values may be skipped entirely. That is
//! acceptable for "which mode are we in" and never acceptable for per-frame
//! geometry, which is why the motion cell exists.

use frostpane_core::{DetectionFlags, InteractionState};
use tokio::sync::watch;

/// Publisher side of the coarse interaction-state channel.
pub struct StateChannel {
    tx: watch::Sender<InteractionState>,
}

impl StateChannel {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(InteractionState::Clear);
        StateChannel { tx }
    }

    /// Publish a state; observers are only woken on actual change.
    pub fn publish(&self, state: InteractionState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<InteractionState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> InteractionState {
        *self.tx.borrow()
    }
}

impl Default for StateChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Publisher side of the indicator-flag channel (mouth open, finger seen,
/// two hands) for kid-facing UI.
pub struct FlagsChannel {
    tx: watch::Sender<DetectionFlags>,
}

impl FlagsChannel {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(DetectionFlags::default());
        FlagsChannel { tx }
    }

    pub fn publish(&self, flags: DetectionFlags) {
        self.tx.send_if_modified(|current| {
            if *current == flags {
                false
            } else {
                *current = flags;
                true
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<DetectionFlags> {
        self.tx.subscribe()
    }
}

impl Default for FlagsChannel {
    fn default() -> Self {
        Self::new()
    }
}

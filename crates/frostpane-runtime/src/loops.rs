//! Independent effect frame loops
//!
//! Each visual effect runs its own frame-driven task with its own
//! persistent canvas; the tasks share only read access to the motion cell
//! and the viewport watch. A loop reads current values at the top of every
//! iteration — never from an earlier iteration's scope — so it can never
//! act on a stale snapshot.
//!
//! Every loop is individually stoppable and leaves nothing scheduled after
//! `stop` returns.

use std::sync::Arc;

use frostpane_core::Viewport;
use frostpane_effects::{FrostCanvas, SnowField};
use frostpane_interaction::MotionReader;
use frostpane_perception::{Detector, Frame};
use frostpane_time::{Clock, FramePacer};
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::PaneRuntime;

/// Shared read handle to the fog loop's canvas. Only the loop mutates it;
/// a renderer reads it to composite.
pub type SharedFrost = Arc<RwLock<FrostCanvas>>;

/// Shared read handle to the snow loop's particle field.
pub type SharedSnow = Arc<RwLock<SnowField>>;

/// Handle to a running effect loop.
pub struct EffectHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl EffectHandle {
    /// Stop the loop and wait for its final iteration to finish. Calling
    /// again is harmless.
    pub async fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.task.is_none()
    }
}

/// Spawn the detection + state-machine pass as its own paced loop. `frames`
/// yields the current decoded camera frame, or `None` while the surface is
/// unavailable (that frame is skipped and retried next tick). Grab channel
/// handles (`motion_reader`, `state_updates`, ...) before handing the
/// runtime over.
pub fn spawn_pane_loop<D, C, F>(
    mut runtime: PaneRuntime<D, C>,
    mut frames: F,
    pacer: FramePacer,
) -> EffectHandle
where
    D: Detector + Send + 'static,
    C: Clock + Send + 'static,
    F: FnMut() -> Option<Frame> + Send + 'static,
{
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = pacer.ticker();
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    let frame = frames();
                    runtime.tick(frame.as_ref());
                }
            }
        }
    });

    EffectHandle {
        shutdown,
        task: Some(task),
    }
}

/// Spawn the fog/ink loop. Each iteration: adopt any pending resize, read
/// the latest signals, step the canvas.
pub fn spawn_frost_loop(
    canvas: SharedFrost,
    reader: MotionReader,
    mut viewport_rx: watch::Receiver<Viewport>,
    pacer: FramePacer,
) -> EffectHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = pacer.ticker();
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    if viewport_rx.has_changed().unwrap_or(false) {
                        let viewport = *viewport_rx.borrow_and_update();
                        canvas
                            .write()
                            .resize(viewport.width as usize, viewport.height as usize);
                    }

                    let signals = reader.latest();
                    canvas.write().step(
                        signals.motion.draw_point,
                        signals.state,
                        signals.fog_opacity,
                    );
                }
            }
        }
    });

    EffectHandle {
        shutdown,
        task: Some(task),
    }
}

/// Spawn the snow loop. Snow ignores fog opacity and reset: flakes decay
/// naturally even after the signal drops.
pub fn spawn_snow_loop(
    field: SharedSnow,
    reader: MotionReader,
    mut viewport_rx: watch::Receiver<Viewport>,
    pacer: FramePacer,
) -> EffectHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = pacer.ticker();
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    if viewport_rx.has_changed().unwrap_or(false) {
                        let viewport = *viewport_rx.borrow_and_update();
                        field.write().resize(viewport.width, viewport.height);
                    }

                    let signals = reader.latest();
                    field.write().step(signals.motion.snow_active);
                }
            }
        }
    });

    EffectHandle {
        shutdown,
        task: Some(task),
    }
}

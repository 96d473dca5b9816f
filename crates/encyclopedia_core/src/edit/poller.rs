//! Cancellable periodic poll for the edit key chord.
//!
//! # Invariants
//! - A poller fires its trigger at most once, then stops itself.
//! - Only the owning `KeyPoller` can cancel it; dropping the owner cancels.
//! - `stop()` never joins, so it is safe to call from inside the trigger.

use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Host input state queried by the poller thread.
pub trait ChordSource: Send + Sync {
    /// Returns whether the edit chord (Ctrl+E) is currently pressed.
    fn edit_chord_pressed(&self) -> bool;
}

/// Handle to a running chord poll.
pub struct KeyPoller {
    stop_tx: Option<Sender<()>>,
    running: Arc<AtomicBool>,
}

impl KeyPoller {
    /// Starts polling `source` after `initial_delay`, then every `interval`.
    ///
    /// `on_trigger` runs on the poller thread the first time the chord is seen.
    pub fn start<F>(
        initial_delay: Duration,
        interval: Duration,
        source: Arc<dyn ChordSource>,
        on_trigger: F,
    ) -> std::io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        thread::Builder::new()
            .name("encyclopedia-key-poll".to_string())
            .spawn(move || {
                let mut wait = initial_delay;
                let mut on_trigger = Some(on_trigger);
                loop {
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    if source.edit_chord_pressed() {
                        thread_running.store(false, Ordering::Release);
                        debug!("event=key_poll module=edit status=triggered");
                        if let Some(trigger) = on_trigger.take() {
                            trigger();
                        }
                        return;
                    }
                    wait = interval;
                }
                thread_running.store(false, Ordering::Release);
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            running,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Cancels the poll. Idempotent.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            if stop_tx.send(()).is_err() {
                // Poller thread already exited after a trigger.
                return;
            }
            self.running.store(false, Ordering::Release);
        }
    }
}

impl Drop for KeyPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Logs and swallows a poller spawn failure.
pub(crate) fn log_spawn_failure(err: &std::io::Error) {
    warn!("event=key_poll module=edit status=error error_code=spawn_failed error={err}");
}

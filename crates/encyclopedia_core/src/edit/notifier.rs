//! User-visible message sink.

use crate::exchange::ExchangeOutcome;
use log::{debug, error, info};

/// Host message display (in-game log lines, toasts, stdout...).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
    /// Verbose diagnostics; implementations may drop these.
    fn debug(&self, message: &str);
}

/// Routes an export/import outcome to `success` or `error`.
pub fn report_outcome(notifier: &dyn Notifier, outcome: &ExchangeOutcome) {
    if outcome.ok {
        notifier.success(&outcome.message);
    } else {
        notifier.error(&outcome.message);
    }
}

/// Notifier that only writes to the process log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier {
    debug_enabled: bool,
}

impl LogNotifier {
    pub fn new(debug_enabled: bool) -> Self {
        Self { debug_enabled }
    }
}

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!("event=notify module=edit level=success message={message}");
    }

    fn error(&self, message: &str) {
        error!("event=notify module=edit level=error message={message}");
    }

    fn info(&self, message: &str) {
        info!("event=notify module=edit level=info message={message}");
    }

    fn debug(&self, message: &str) {
        if self.debug_enabled {
            debug!("event=notify module=edit level=debug message=[EE Debug] {message}");
        }
    }
}

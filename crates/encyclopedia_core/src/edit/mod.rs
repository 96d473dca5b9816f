//! Edit-session glue between encyclopedia pages and the description store.
//!
//! # Responsibility
//! - Turn "page opened" notifications into a cancellable edit-chord poll.
//! - Drive one edit dialog round-trip (prefill, save, reset) per trigger.
//! - Report user-visible messages through a host-supplied notifier.
//!
//! # Invariants
//! - At most one key poller is alive per `PageTracker`.
//! - Saving applies the configured length limit by truncation, never rejection.

pub mod dialog;
pub mod notifier;
pub mod page;
pub mod poller;

//! User-notification port.
//!
//! The gateway surfaces every non-suppressed failure through this trait
//! exactly once per call, so business logic never needs a UI dependency
//! and callers never duplicate toasts.

/// Sink for user-visible error notifications.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Default sink: forwards to `tracing` at warn level. Embedders swap in
/// their own toast/alert implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(%message, "backend request failed");
    }
}

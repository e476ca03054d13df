//! kiln-client - Client toolkit for the kiln ML training platform.
//!
//! Layering, leaves first:
//!
//! 1. [`gateway::Gateway`] wraps outbound HTTP, unwraps the backend's
//!    `{code, message, data}` envelope and maps every failure into the
//!    [`ClientError`] taxonomy exactly once per call.
//! 2. [`api::ApiClient`] exposes typed, stateless operations over the
//!    gateway (datasets, models, tasks, inference, stats).
//! 3. [`tracker`] turns point-in-time progress snapshots into a
//!    cancellable polling subscription with ordered callbacks.
//! 4. [`upload`] streams multipart bodies with progress observation and
//!    cooperative cancellation.
//! 5. [`session`] decides, purely and synchronously, whether a navigation
//!    target is reachable for the current session.

pub mod api;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod session;
pub mod tracker;
pub mod upload;


pub use api::ApiClient;
pub use error::ClientError;
pub use gateway::{DEFAULT_TIMEOUT, Gateway};
pub use notify::{Notifier, TracingNotifier};
pub use session::{Decision, GuardPaths, MemoryStore, RouteMeta, SessionStore, decide};
pub use tracker::{
    Clock, TaskProbe, TokioClock, TrackCallbacks, TrackConfig, TrackHandle, track,
};
pub use upload::{FilePart, ProgressFn, UploadHandle};

//! kiln-types - Shared wire and domain types for the kiln training platform.
//!
//! Everything in this crate mirrors the JSON shapes emitted by the backend's
//! `{code, message, data}` envelope API. The types are read-mostly views: the
//! client never mutates resources beyond delete/download requests, so these
//! structs carry no behavior besides (de)serialization and a handful of
//! predicates.

pub mod dataset;
pub mod envelope;
pub mod inference;
pub mod model;
pub mod stats;
pub mod task;
pub mod wire;

pub use dataset::{Dataset, DatasetStatus};
pub use envelope::{CODE_NOT_FOUND, CODE_OK, Envelope};
pub use inference::{Detection, Prediction};
pub use model::{ModelInfo, TrainingImage};
pub use stats::StatsSummary;
pub use task::{ProgressDetail, Task, TaskProgress, TaskSpec, TaskStatus};

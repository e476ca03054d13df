use serde::{Deserialize, Serialize};

/// Platform-wide counters from `GET /stats`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub dataset_count: u64,
    #[serde(default)]
    pub model_count: u64,
    #[serde(default)]
    pub task_count: u64,
    /// Tasks currently in the `Running` state.
    #[serde(default)]
    pub training_count: u64,
}

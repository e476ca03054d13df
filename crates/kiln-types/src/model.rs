use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::wire;

/// A trained model as returned by `/models` and `/models/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(with = "wire::id")]
    pub id: String,
    pub name: String,
    /// The training task that produced this model, if any.
    #[serde(default, with = "wire::id_opt")]
    pub task_id: Option<String>,
    pub task_type: String,
    pub model_type: String,
    #[serde(default)]
    pub weight_path: Option<String>,
    #[serde(default)]
    pub config_path: Option<String>,
    /// Backend-defined evaluation metrics (mAP, precision, ...). Kept
    /// untyped: the client only displays them.
    #[serde(default)]
    pub metrics: Value,
    #[serde(default)]
    pub size: u64,
    #[serde(default, with = "wire::datetime_opt")]
    pub created_at: Option<NaiveDateTime>,
}

/// One sample image from a model's training run, served by
/// `/models/{id}/training-images`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingImage {
    pub name: String,
    pub url: String,
}

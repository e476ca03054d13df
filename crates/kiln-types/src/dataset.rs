use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::wire;

/// Ingestion state of an uploaded dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    #[default]
    Processing,
    Ready,
    Error,
}

/// A dataset as returned by `/datasets` and `/datasets/{id}`.
///
/// Pass-through metadata owned by the backend; the client never mutates a
/// dataset beyond delete/download requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(with = "wire::id")]
    pub id: String,
    pub name: String,
    pub task_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub file_count: u64,
    /// Size of the uploaded archive in bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub status: DatasetStatus,
    #[serde(default, with = "wire::datetime_opt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "wire::datetime_opt")]
    pub updated_at: Option<NaiveDateTime>,
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::wire;

/// Lifecycle state of a training task as reported by the backend.
///
/// `Succeeded`, `Failed` and `Stopped` are absorbing: once the backend
/// reports one of them the task never transitions again, so pollers can
/// stop after the first terminal observation.
///
/// The backend writes `pending`, `training`, `completed`, `failed` and
/// `stopped`; the aliases keep older spellings parseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[serde(alias = "starting")]
    Pending,
    #[serde(alias = "training")]
    Running,
    #[serde(alias = "completed")]
    Succeeded,
    Failed,
    Stopped,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Stopped)
    }
}

/// A training task as returned by `/tasks` and `/tasks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(with = "wire::id")]
    pub id: String,
    pub name: String,
    #[serde(default, with = "wire::id_opt")]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub dataset_name: Option<String>,
    pub model_type: String,
    pub task_type: String,
    #[serde(default)]
    pub epochs: u32,
    #[serde(default)]
    pub batch_size: u32,
    #[serde(default)]
    pub img_size: u32,
    pub status: TaskStatus,
    /// Percentage in `0..=100`, non-decreasing while the task is live.
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub current_epoch: u32,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub error_msg: Option<String>,
    #[serde(default, with = "wire::datetime_opt")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, with = "wire::datetime_opt")]
    pub started_at: Option<NaiveDateTime>,
    #[serde(default, with = "wire::datetime_opt")]
    pub completed_at: Option<NaiveDateTime>,
}

/// Request body for `POST /tasks/create`.
///
/// Hyperparameter defaults match the backend's (100 epochs, batch 16,
/// 640px images, detection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub dataset_id: String,
    pub task_name: String,
    pub model_type: String,
    pub task_type: String,
    pub epochs: u32,
    pub batch_size: u32,
    pub img_size: u32,
}

impl TaskSpec {
    pub fn new(dataset_id: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            task_name: task_name.into(),
            model_type: "yolo11n".to_owned(),
            task_type: "detect".to_owned(),
            epochs: 100,
            batch_size: 16,
            img_size: 640,
        }
    }
}

/// Live progress detail kept in memory by the training service, nested
/// inside the `/tasks/{id}/progress` payload next to the task record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressDetail {
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub progress: f32,
    #[serde(default)]
    pub current_epoch: u32,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Payload of `GET /tasks/{id}/progress`: the task record plus the live
/// in-memory progress snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskProgress {
    pub task: Task,
    #[serde(default)]
    pub progress: ProgressDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Running.is_terminal());
        assert!(TaskStatus::Succeeded.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
        assert!(TaskStatus::Stopped.is_terminal());
    }

    #[test]
    fn backend_status_spellings_parse() {
        for (raw, expect) in [
            ("\"pending\"", TaskStatus::Pending),
            ("\"starting\"", TaskStatus::Pending),
            ("\"training\"", TaskStatus::Running),
            ("\"running\"", TaskStatus::Running),
            ("\"completed\"", TaskStatus::Succeeded),
            ("\"failed\"", TaskStatus::Failed),
            ("\"stopped\"", TaskStatus::Stopped),
        ] {
            let parsed: TaskStatus = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, expect, "spelling {raw}");
        }
    }

    #[test]
    fn backend_task_record_parses() {
        let task: Task = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "street-signs",
                "dataset_id": 1,
                "dataset_name": "signs-v2",
                "model_type": "yolo11n",
                "task_type": "detect",
                "epochs": 100,
                "batch_size": 16,
                "img_size": 640,
                "status": "training",
                "progress": 42.5,
                "current_epoch": 43,
                "logs": null,
                "output_path": null,
                "created_at": "2024-05-01 10:00:00",
                "started_at": "2024-05-01 10:00:05",
                "completed_at": null
            }"#,
        )
        .unwrap();
        assert_eq!(task.id, "3");
        assert_eq!(task.dataset_id.as_deref(), Some("1"));
        assert_eq!(task.status, TaskStatus::Running);
        assert_eq!(task.progress, 42.5);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn progress_payload_parses() {
        let snap: TaskProgress = serde_json::from_str(
            r#"{
                "task": {"id": 3, "name": "t", "model_type": "yolo11n",
                         "task_type": "detect", "status": "completed",
                         "progress": 100.0},
                "progress": {"status": "completed", "progress": 100.0,
                             "current_epoch": 100, "logs": ["done"]}
            }"#,
        )
        .unwrap();
        assert!(snap.task.status.is_terminal());
        assert_eq!(snap.progress.logs, vec!["done"]);
    }
}

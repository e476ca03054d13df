use kiln_types::{Task, TaskProgress, TaskSpec};

use crate::error::ClientError;
use crate::gateway::Gateway;

/// Operations on `/tasks`.
pub struct TasksApi<'a> {
    gw: &'a Gateway,
}

impl<'a> TasksApi<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        self.gw.get_json("/tasks").await
    }

    pub async fn get(&self, id: &str) -> Result<Task, ClientError> {
        self.gw.get_json(&format!("/tasks/{id}")).await
    }

    /// `POST /tasks/create` — the returned task starts out `Pending` or
    /// `Running`.
    pub async fn create(&self, spec: &TaskSpec) -> Result<Task, ClientError> {
        self.gw.post_json("/tasks/create", spec).await
    }

    /// `POST /tasks/{id}/stop`. Idempotent: stopping a task that already
    /// reached a terminal state is a success no-op. Unknown ids fail with
    /// [`ClientError::NotFound`].
    pub async fn stop(&self, id: &str) -> Result<(), ClientError> {
        let _: serde_json::Value = self.gw.post_empty(&format!("/tasks/{id}/stop")).await?;
        Ok(())
    }

    /// `GET /tasks/{id}/progress` — the polled progress snapshot.
    pub async fn progress(&self, id: &str) -> Result<TaskProgress, ClientError> {
        self.gw.get_json(&format!("/tasks/{id}/progress")).await
    }
}

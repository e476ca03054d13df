use bytes::Bytes;

use kiln_types::Dataset;

use crate::error::ClientError;
use crate::gateway::Gateway;
use crate::upload::{FilePart, ProgressFn, UploadHandle};

/// Metadata accompanying a dataset archive upload, matching the
/// multipart form fields the backend expects alongside `file`.
#[derive(Debug, Clone)]
pub struct DatasetUpload {
    pub name: String,
    pub task_type: String,
    pub description: String,
    pub file_name: String,
}

impl DatasetUpload {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            task_type: "detect".to_owned(),
            description: String::new(),
            file_name: file_name.into(),
        }
    }

    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Operations on `/datasets`.
pub struct DatasetsApi<'a> {
    gw: &'a Gateway,
}

impl<'a> DatasetsApi<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    pub async fn list(&self) -> Result<Vec<Dataset>, ClientError> {
        self.gw.get_json("/datasets").await
    }

    pub async fn get(&self, id: &str) -> Result<Dataset, ClientError> {
        self.gw.get_json(&format!("/datasets/{id}")).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.gw.delete(&format!("/datasets/{id}")).await
    }

    /// Upload a dataset archive. `handle` may be cancelled while the
    /// transfer is in flight; `progress` observes percent sent.
    pub async fn upload(
        &self,
        meta: DatasetUpload,
        archive: Bytes,
        progress: Option<ProgressFn>,
        handle: &UploadHandle,
    ) -> Result<Dataset, ClientError> {
        let fields = [
            ("name", meta.name),
            ("task_type", meta.task_type),
            ("description", meta.description),
        ];
        let file = FilePart::new("file", meta.file_name, archive).with_mime("application/zip");
        self.gw
            .post_multipart("/datasets/upload", &fields, file, progress, handle)
            .await
    }

    /// Download the dataset archive as opaque bytes.
    pub async fn download(&self, id: &str) -> Result<Bytes, ClientError> {
        self.gw.get_bytes(&format!("/datasets/{id}/download")).await
    }
}

use bytes::Bytes;

use kiln_types::{ModelInfo, TrainingImage};

use crate::error::ClientError;
use crate::gateway::Gateway;

/// Operations on `/models`.
pub struct ModelsApi<'a> {
    gw: &'a Gateway,
}

impl<'a> ModelsApi<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    pub async fn list(&self) -> Result<Vec<ModelInfo>, ClientError> {
        self.gw.get_json("/models").await
    }

    pub async fn get(&self, id: &str) -> Result<ModelInfo, ClientError> {
        self.gw.get_json(&format!("/models/{id}")).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.gw.delete(&format!("/models/{id}")).await
    }

    /// Download the model weights as opaque bytes.
    pub async fn download(&self, id: &str) -> Result<Bytes, ClientError> {
        self.gw.get_bytes(&format!("/models/{id}/download")).await
    }

    /// Sample images captured during the model's training run.
    pub async fn training_images(&self, id: &str) -> Result<Vec<TrainingImage>, ClientError> {
        self.gw
            .get_json(&format!("/models/{id}/training-images"))
            .await
    }
}

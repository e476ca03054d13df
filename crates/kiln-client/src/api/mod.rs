//! Typed resource clients over the [`Gateway`].
//!
//! Each operation is a thin declaration of method, path and response
//! shape. No business logic lives here; failures propagate unchanged
//! (the gateway already notified).

mod datasets;
mod inference;
mod models;
mod tasks;

pub use datasets::{DatasetUpload, DatasetsApi};
pub use inference::InferenceApi;
pub use models::ModelsApi;
pub use tasks::TasksApi;

use kiln_types::StatsSummary;

use crate::error::ClientError;
use crate::gateway::Gateway;

/// Entry point to the backend's typed API surface.
#[derive(Clone)]
pub struct ApiClient {
    gateway: Gateway,
}

impl ApiClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// `GET /stats` — platform-wide counters.
    pub async fn stats(&self) -> Result<StatsSummary, ClientError> {
        self.gateway.get_json("/stats").await
    }

    pub fn datasets(&self) -> DatasetsApi<'_> {
        DatasetsApi::new(&self.gateway)
    }

    pub fn models(&self) -> ModelsApi<'_> {
        ModelsApi::new(&self.gateway)
    }

    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi::new(&self.gateway)
    }

    pub fn inference(&self) -> InferenceApi<'_> {
        InferenceApi::new(&self.gateway)
    }
}

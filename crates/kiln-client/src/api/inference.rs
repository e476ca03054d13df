use bytes::Bytes;

use kiln_types::Prediction;

use crate::error::ClientError;
use crate::gateway::Gateway;
use crate::upload::{FilePart, ProgressFn, UploadHandle};

/// Operations on `/inference`.
pub struct InferenceApi<'a> {
    gw: &'a Gateway,
}

impl<'a> InferenceApi<'a> {
    pub(crate) fn new(gw: &'a Gateway) -> Self {
        Self { gw }
    }

    /// `POST /inference/predict` — run a model against one input image,
    /// submitted as a multipart body like dataset uploads (inference
    /// inputs can be large enough to want progress and cancellation).
    pub async fn predict(
        &self,
        model_id: &str,
        image_name: &str,
        image: Bytes,
        progress: Option<ProgressFn>,
        handle: &UploadHandle,
    ) -> Result<Prediction, ClientError> {
        let fields = [("model_id", model_id.to_owned())];
        let file = FilePart::new("file", image_name, image).with_mime("image/jpeg");
        self.gw
            .post_multipart("/inference/predict", &fields, file, progress, handle)
            .await
    }
}

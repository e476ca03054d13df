use serde::{Deserialize, Serialize};

/// One detected object in an inference result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    pub confidence: f32,
    /// `[x1, y1, x2, y2]` in pixel coordinates of the submitted image.
    #[serde(default)]
    pub bbox: [f32; 4],
}

/// Result of `POST /inference/predict`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prediction {
    /// Base64-encoded annotated image, when the backend renders one.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzePhotoRequest {
    /// Base64 image bytes, or a complete `data:` URI.
    #[serde(default)]
    #[validate(length(min = 1, message = "image is required"))]
    pub image: String,
    pub notes: Option<String>,
}

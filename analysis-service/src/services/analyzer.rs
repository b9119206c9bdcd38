use crate::error::AnalysisError;
use crate::models::{AnalysisResult, HazardSummary};
use crate::services::parser::{parse_reply, ParseTier};
use crate::services::providers::{VisionProvider, VisionRequest};
use metrics::counter;
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = "You are a mining safety expert AI. Inspect site photos for \
safety hazards including missing PPE, structural issues, equipment problems, spills and \
unsafe conditions. Report each detected hazard with a tag, a confidence between 0 and 1, \
and notes. Be thorough and specific.";

const NO_NOTES: &str = "None provided";

/// Media type assumed for raw base64 uploads.
const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

/// Runs one photo through the vision provider and interprets the reply.
pub struct PhotoAnalyzer {
    provider: Arc<dyn VisionProvider>,
}

impl PhotoAnalyzer {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    /// Upstream failures are returned as errors; anything the provider
    /// answers successfully produces a result.
    pub async fn analyze(
        &self,
        image: &str,
        notes: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let image_url = to_data_uri(image);
        let prompt = user_prompt(notes);

        tracing::info!(
            model = %self.provider.model(),
            image_len = image.len(),
            has_notes = notes.is_some_and(|n| !n.trim().is_empty()),
            "Analyzing photo"
        );

        let reply = self
            .provider
            .describe(&VisionRequest {
                system_prompt: SYSTEM_PROMPT,
                prompt: &prompt,
                image_url: &image_url,
            })
            .await?;

        tracing::debug!(reply = ?reply, "AI reply received");

        let parsed = parse_reply(reply.as_deref());
        if parsed.tier != ParseTier::Structured {
            counter!("hazard_analysis_fallbacks_total", "tier" => parsed.tier.as_str())
                .increment(1);
        }

        let summary = HazardSummary::from_hazards(&parsed.hazards);
        tracing::info!(
            tier = parsed.tier.as_str(),
            hazards = parsed.hazards.len(),
            high = summary.high,
            medium = summary.medium,
            low = summary.low,
            "Photo analysis complete"
        );

        Ok(AnalysisResult {
            hazards: parsed.hazards,
            annotated_image: Some(image_url),
        })
    }
}

/// Wrap raw base64 in a data URI; complete data URIs pass through.
pub fn to_data_uri(image: &str) -> String {
    if image.starts_with("data:") {
        image.to_string()
    } else {
        format!("data:{};base64,{}", DEFAULT_IMAGE_MEDIA_TYPE, image)
    }
}

fn user_prompt(notes: Option<&str>) -> String {
    let context = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(NO_NOTES);

    format!(
        "Analyze this mining site photo for safety hazards. Additional context: {}. \
         Return ONLY a valid JSON object with this structure: \
         {{\"hazards\": [{{\"tag\": \"hazard name\", \"confidence\": 0.85, \"notes\": \"description\"}}]}}",
        context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetectedHazard;
    use crate::services::parser::GENERAL_CONCERN_TAG;
    use crate::services::providers::mock::{MockReply, MockVisionProvider};

    fn analyzer(provider: Arc<MockVisionProvider>) -> PhotoAnalyzer {
        PhotoAnalyzer::new(provider)
    }

    #[test]
    fn test_to_data_uri() {
        assert_eq!(to_data_uri("aGVsbG8="), "data:image/jpeg;base64,aGVsbG8=");
        assert_eq!(
            to_data_uri("data:image/png;base64,aGVsbG8="),
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn test_user_prompt_includes_notes() {
        let prompt = user_prompt(Some("Bench 4, north wall"));
        assert!(prompt.contains("Additional context: Bench 4, north wall."));
        assert!(prompt.contains(r#"{"hazards": [{"tag": "hazard name""#));
    }

    #[test]
    fn test_user_prompt_without_notes() {
        assert!(user_prompt(None).contains("Additional context: None provided."));
        assert!(user_prompt(Some("   ")).contains("Additional context: None provided."));
    }

    #[tokio::test]
    async fn test_structured_reply_is_relayed() {
        let provider = Arc::new(MockVisionProvider::text(
            r#"{"hazards":[{"tag":"Loose Rock","confidence":0.92,"notes":"Overhang above walkway"}]}"#,
        ));

        let result = analyzer(provider.clone())
            .analyze("aGVsbG8=", Some("Pit ramp"))
            .await
            .unwrap();

        assert_eq!(
            result.hazards,
            vec![DetectedHazard::new(
                "Loose Rock",
                0.92,
                "Overhang above walkway"
            )]
        );
        assert_eq!(
            result.annotated_image.as_deref(),
            Some("data:image/jpeg;base64,aGVsbG8=")
        );

        assert_eq!(provider.calls(), 1);
        let request = provider.last_request().unwrap();
        assert_eq!(request.system_prompt, SYSTEM_PROMPT);
        assert_eq!(request.image_url, "data:image/jpeg;base64,aGVsbG8=");
        assert!(request.prompt.contains("Pit ramp"));
    }

    #[tokio::test]
    async fn test_prose_reply_degrades() {
        let provider = Arc::new(MockVisionProvider::text("Workers appear to lack vests."));

        let result = analyzer(provider).analyze("aGVsbG8=", None).await.unwrap();

        assert_eq!(result.hazards.len(), 1);
        assert_eq!(result.hazards[0].tag, GENERAL_CONCERN_TAG);
        assert_eq!(result.hazards[0].notes, "Workers appear to lack vests.");
    }

    #[tokio::test]
    async fn test_upstream_status_is_an_error() {
        let provider = Arc::new(MockVisionProvider::new(MockReply::Status(
            429,
            "Too many requests".to_string(),
        )));

        let err = analyzer(provider).analyze("aGVsbG8=", None).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Upstream { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_maps_to_configuration_error() {
        let provider = Arc::new(MockVisionProvider::new(MockReply::NotConfigured));

        let err = analyzer(provider).analyze("aGVsbG8=", None).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_no_reply_asks_for_review() {
        let provider = Arc::new(MockVisionProvider::new(MockReply::NoReply));

        let result = analyzer(provider).analyze("aGVsbG8=", None).await.unwrap();

        assert_eq!(result.hazards[0].tag, "Analysis Required");
        assert_eq!(result.hazards[0].confidence, 0.5);
    }
}

use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env};
use service_core::error::AppError;

/// Chat-completion endpoint of the AI gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Vision-capable model used when `AI_GATEWAY_MODEL` is unset.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default request body limit (20MB). Photos arrive base64-encoded inside JSON.
const DEFAULT_MAX_REQUEST_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub common: core_config::Config,
    pub gateway: GatewayConfig,
    /// Largest accepted `POST /analyze-photo` body in bytes.
    pub max_request_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    /// Bearer credential. Absent means every analysis request fails with a
    /// configuration error until it is provided.
    pub api_key: Option<Secret<String>>,
    pub model: String,
    /// Upstream request timeout. `None` waits for the transport to give up.
    pub timeout_secs: Option<u64>,
}

impl GatewayConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl AnalysisConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = core_config::is_production();

        Ok(AnalysisConfig {
            common: common_config,
            gateway: GatewayConfig {
                url: get_env("AI_GATEWAY_URL", Some(DEFAULT_GATEWAY_URL), is_prod)?,
                api_key: get_optional_env("AI_GATEWAY_API_KEY").map(Secret::new),
                model: get_env("AI_GATEWAY_MODEL", Some(DEFAULT_MODEL), is_prod)?,
                timeout_secs: parse_optional(
                    "AI_GATEWAY_TIMEOUT_SECS",
                    get_optional_env("AI_GATEWAY_TIMEOUT_SECS"),
                )?,
            },
            max_request_bytes: parse_optional(
                "ANALYSIS_MAX_REQUEST_BYTES",
                get_optional_env("ANALYSIS_MAX_REQUEST_BYTES"),
            )?
            .unwrap_or(DEFAULT_MAX_REQUEST_BYTES),
        })
    }
}

fn parse_optional<T>(key: &str, value: Option<String>) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "{} has an invalid value '{}': {}",
                    key,
                    raw,
                    e
                ))
            })
        })
        .transpose()
}

use service_core::config as core_config;
use service_core::error::AppError;

/// The heat map serves an embedded catalog, so only the common settings apply.
#[derive(Debug, Clone)]
pub struct HeatmapConfig {
    pub common: core_config::Config,
}

impl HeatmapConfig {
    pub fn load() -> Result<Self, AppError> {
        Ok(HeatmapConfig {
            common: core_config::Config::load()?,
        })
    }
}

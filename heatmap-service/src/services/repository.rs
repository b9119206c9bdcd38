//! Read-only access to hazard records.

use crate::models::HazardRecord;
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::Arc;

/// Reference data compiled into the binary.
const SEED_CATALOG: &str = include_str!("../../data/hazards.json");

/// Source of hazard records for the heat map.
#[async_trait]
pub trait HazardRepository: Send + Sync {
    /// All known hazards, in catalog order.
    async fn list_hazards(&self) -> Result<Vec<HazardRecord>, AppError>;
}

/// Immutable in-memory catalog.
#[derive(Clone)]
pub struct StaticHazardRepository {
    records: Arc<[HazardRecord]>,
}

impl StaticHazardRepository {
    pub fn new(records: Vec<HazardRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Load the embedded seed catalog.
    pub fn seeded() -> Result<Self, AppError> {
        let records: Vec<HazardRecord> = serde_json::from_str(SEED_CATALOG).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Embedded hazard catalog is invalid: {}", e))
        })?;

        tracing::info!(records = records.len(), "Loaded hazard catalog");

        Ok(Self::new(records))
    }
}

#[async_trait]
impl HazardRepository for StaticHazardRepository {
    async fn list_hazards(&self) -> Result<Vec<HazardRecord>, AppError> {
        Ok(self.records.to_vec())
    }
}

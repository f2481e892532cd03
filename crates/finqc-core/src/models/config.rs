//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{FinqcError, Result};
use crate::models::metric::MetricDefinition;
use crate::sop::SopTaxonomy;

/// Main configuration for the finqc pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinqcConfig {
    /// Frame building configuration.
    pub extraction: ExtractionConfig,

    /// Metric vocabulary configuration.
    pub metrics: MetricsConfig,

    /// Line item classification configuration.
    pub classification: ClassificationConfig,
}

/// Frame building configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Demand a Group/Consolidated indicator on the first pass.
    pub require_group_tables: bool,

    /// Accept tables without the indicator for statements still missing.
    pub fallback_without_group: bool,

    /// Drop Company-only value columns when a Group column exists.
    pub drop_company_columns: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            require_group_tables: true,
            fallback_without_group: true,
            drop_company_columns: true,
        }
    }
}

/// Metric vocabulary configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Extra names offered to the classifier next to the defaults.
    pub additional_candidate_metrics: Vec<String>,

    /// JSON file with base metric definitions replacing the built-in table.
    pub taxonomy_path: Option<PathBuf>,
}

/// Line item classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Run the classifier at all.
    pub enabled: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl FinqcConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            FinqcError::Config(format!("{}: {}", path.display(), e))
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the metric taxonomy, honoring `metrics.taxonomy_path`.
    pub fn taxonomy(&self) -> Result<SopTaxonomy> {
        match &self.metrics.taxonomy_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                let base: Vec<MetricDefinition> = serde_json::from_str(&content).map_err(|e| {
                    FinqcError::Config(format!("invalid taxonomy {}: {}", path.display(), e))
                })?;
                if base.is_empty() {
                    return Err(FinqcError::Config(format!(
                        "taxonomy {} defines no metrics",
                        path.display()
                    )));
                }
                Ok(SopTaxonomy::default().with_base(base))
            }
            None => Ok(SopTaxonomy::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FinqcConfig =
            serde_json::from_str(r#"{"extraction": {"require_group_tables": false}}"#).unwrap();

        assert!(!config.extraction.require_group_tables);
        assert!(config.extraction.fallback_without_group);
        assert!(config.classification.enabled);
        assert!(config.metrics.additional_candidate_metrics.is_empty());
    }

    #[test]
    fn test_default_taxonomy_without_path() {
        let taxonomy = FinqcConfig::default().taxonomy().unwrap();
        assert_eq!(taxonomy.summary_order.len(), 29);
    }

    #[test]
    fn test_missing_taxonomy_file_is_error() {
        let mut config = FinqcConfig::default();
        config.metrics.taxonomy_path = Some(PathBuf::from("/nonexistent/taxonomy.json"));
        assert!(config.taxonomy().is_err());
    }
}

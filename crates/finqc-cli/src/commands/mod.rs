//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod metrics;
pub mod process;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use finqc_core::error::Result as CoreResult;
use finqc_core::extract::Suggestions;
use finqc_core::{
    AiRecord, ExtractionPipeline, FinqcConfig, HeadingTableExtractor, LineItemClassifier,
    NoopClassifier, ResponseClassifier, SopExtractionEngine, Utf8TextExtractor,
};

/// Pipeline used by the file-based commands.
pub type FilePipeline = ExtractionPipeline<Utf8TextExtractor, HeadingTableExtractor, StoredClassifier>;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("finqc")
        .join("config.json")
}

/// Explicit `--config` path, or the default path when none was given.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the explicit config file, the default file if present, or defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<FinqcConfig> {
    if let Some(path) = explicit {
        return Ok(FinqcConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(FinqcConfig::from_file(&default_path)?)
    } else {
        Ok(FinqcConfig::default())
    }
}

/// Build the file pipeline, optionally fed by a stored classification response.
pub fn build_pipeline(config: FinqcConfig, classifications: Option<&Path>) -> anyhow::Result<FilePipeline> {
    let classifier = match classifications {
        Some(path) => StoredClassifier::Response(ResponseClassifier::from_file(path)?),
        None => StoredClassifier::None(NoopClassifier),
    };
    let engine = SopExtractionEngine::new(config.taxonomy()?);

    Ok(ExtractionPipeline::new(Utf8TextExtractor, HeadingTableExtractor, classifier, config).with_engine(engine))
}

/// Classifier choice for the command line.
pub enum StoredClassifier {
    None(NoopClassifier),
    Response(ResponseClassifier),
}

#[async_trait]
impl LineItemClassifier for StoredClassifier {
    async fn classify(&self, records: &[AiRecord], candidate_metrics: &[String]) -> CoreResult<Suggestions> {
        match self {
            Self::None(classifier) => classifier.classify(records, candidate_metrics).await,
            Self::Response(classifier) => classifier.classify(records, candidate_metrics).await,
        }
    }
}

//! End-to-end extraction over a single document.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ExtractionError, Result};
use crate::line_items::{build_candidate_metrics, merge_classification, prepare_line_items};
use crate::models::config::FinqcConfig;
use crate::models::frame::StatementFrames;
use crate::models::line_item::{AiRecord, LineItemRecord};
use crate::models::sop::{SopMetadata, SopResult};
use crate::models::statement::StatementKind;
use crate::sop::SopExtractionEngine;
use crate::table::{build_frames_with_fallback, StatementTable};

use super::{DocumentTextExtractor, LineItemClassifier, StatementTableExtractor, Suggestions};

/// Everything produced for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionBundle {
    /// Name of the source document.
    pub file_name: String,

    /// Raw table text per statement, empty where extraction failed.
    pub tables_markdown: Vec<StatementTable>,

    /// Accepted frames in statement order.
    pub frames: StatementFrames,

    /// Union of value columns across frames.
    pub value_columns: Vec<String>,

    /// Vocabulary offered to the classifier.
    pub candidate_metrics: Vec<String>,

    /// Line items with merged classifications.
    pub line_items: Vec<LineItemRecord>,

    /// SOP summary in canonical order.
    pub sop_summary: Vec<SopResult>,

    /// Latest column per statement.
    pub sop_metadata: SopMetadata,
}

/// Text extraction, statement fan-out, frame building, SOP resolution and
/// classification for one document at a time.
pub struct ExtractionPipeline<T, S, C> {
    text_extractor: T,
    table_extractor: S,
    classifier: C,
    engine: SopExtractionEngine,
    config: FinqcConfig,
}

impl<T, S, C> ExtractionPipeline<T, S, C>
where
    T: DocumentTextExtractor,
    S: StatementTableExtractor,
    C: LineItemClassifier,
{
    pub fn new(text_extractor: T, table_extractor: S, classifier: C, config: FinqcConfig) -> Self {
        Self {
            text_extractor,
            table_extractor,
            classifier,
            engine: SopExtractionEngine::default(),
            config,
        }
    }

    /// Use a specific SOP engine, e.g. one built from a custom taxonomy.
    pub fn with_engine(mut self, engine: SopExtractionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Process one document.
    ///
    /// Only a missing document text is fatal; failing statements and a
    /// failing classifier degrade to empty results.
    pub async fn process(&self, bytes: &[u8], filename: &str) -> Result<ExtractionBundle> {
        let text = match self.text_extractor.extract_text(bytes, filename).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return Err(ExtractionError::NoSourceText(filename.to_string()).into()),
            Err(e) => {
                warn!("Text extraction failed for {}: {}", filename, e);
                return Err(ExtractionError::NoSourceText(filename.to_string()).into());
            }
        };
        info!("Extracted {} characters from {}", text.len(), filename);

        let tables = self.extract_tables(&text).await;
        let frames = build_frames_with_fallback(&tables, &self.config.extraction);
        info!("{}: {}/{} statement frame(s) accepted", filename, frames.len(), tables.len());

        let prepared = prepare_line_items(frames.iter());
        let sop = self.engine.extract(&frames);
        let candidate_metrics = build_candidate_metrics(self.config.metrics.additional_candidate_metrics.as_slice());

        let suggestions = self
            .classify(&prepared.ai_records, &candidate_metrics)
            .await;
        let line_items = merge_classification(&prepared.line_items, &suggestions);

        Ok(ExtractionBundle {
            file_name: filename.to_string(),
            tables_markdown: tables,
            frames,
            value_columns: prepared.value_columns,
            candidate_metrics,
            line_items,
            sop_summary: sop.summary,
            sop_metadata: sop.metadata,
        })
    }

    /// Request every statement concurrently and wait for all of them.
    async fn extract_tables(&self, text: &str) -> Vec<StatementTable> {
        let requests = StatementKind::ALL
            .into_iter()
            .map(|kind| async move { (kind, self.table_extractor.extract_table(text, kind).await) });

        join_all(requests)
            .await
            .into_iter()
            .map(|(kind, result)| {
                let markdown = result.unwrap_or_else(|e| {
                    warn!("Table extraction failed for {}: {}", kind, e);
                    String::new()
                });
                StatementTable::new(kind.name(), markdown)
            })
            .collect()
    }

    async fn classify(&self, records: &[AiRecord], candidates: &[String]) -> Suggestions {
        if !self.config.classification.enabled || records.is_empty() {
            return Suggestions::new();
        }

        match self.classifier.classify(records, candidates).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!("Auto classification failed: {}", e);
                Suggestions::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::error::{ClassificationError, FinqcError};
    use crate::extract::{HeadingTableExtractor, NoopClassifier, ResponseClassifier, Utf8TextExtractor};
    use crate::models::line_item::ClassificationSuggestion;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const REPORT: &str = "\
CONSOLIDATED INCOME STATEMENT
| | Group 3 months to 31 Mar 2025 | Group 3 months to 31 Mar 2024 | Company 31 Mar 2025 |
|---|---|---|---|
| Revenue | 1,500 | 1,200 | 300 |
| Income tax expense | (120) | (100) | (20) |

STATEMENT OF CASH FLOWS
| Item | Q1 2025 | Q1 2024 |
|---|---|---|
| Net cash generated from operating activities | 1,000 | 900 |
| Purchase of property, plant and equipment | (200) | (150) |
";

    /// Table extractor that fails for one statement.
    struct FlakyTables {
        failing: StatementKind,
    }

    #[async_trait]
    impl StatementTableExtractor for FlakyTables {
        async fn extract_table(&self, text: &str, statement: StatementKind) -> Result<String> {
            if statement == self.failing {
                return Err(ExtractionError::Collaborator("timeout".to_string()).into());
            }
            HeadingTableExtractor.extract_table(text, statement).await
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl LineItemClassifier for FailingClassifier {
        async fn classify(&self, _records: &[AiRecord], _candidates: &[String]) -> Result<Suggestions> {
            Err(ClassificationError::Service("503".to_string()).into())
        }
    }

    struct FirstItemClassifier;

    #[async_trait]
    impl LineItemClassifier for FirstItemClassifier {
        async fn classify(&self, records: &[AiRecord], candidates: &[String]) -> Result<Suggestions> {
            assert!(candidates.contains(&"Revenue".to_string()));
            Ok(HashMap::from([(
                records[0].id.clone(),
                ClassificationSuggestion::new("Revenue", Some(0.87654)),
            )]))
        }
    }

    #[tokio::test]
    async fn test_process_report() {
        let pipeline = ExtractionPipeline::new(
            Utf8TextExtractor,
            HeadingTableExtractor,
            FirstItemClassifier,
            FinqcConfig::default(),
        );

        let bundle = pipeline.process(REPORT.as_bytes(), "q1.md").await.unwrap();

        assert_eq!(bundle.file_name, "q1.md");
        assert_eq!(bundle.tables_markdown.len(), 5);
        assert_eq!(bundle.frames.names(), vec!["Profit or Loss", "Cash Flows"]);

        let revenues = bundle.sop_summary.iter().find(|r| r.metric == "Revenues").unwrap();
        assert_eq!(revenues.value, "1,500.00");
        assert_eq!(revenues.column, "Group 3 months to 31 Mar 2025");

        let fcf = bundle.sop_summary.iter().find(|r| r.metric == "FCF Qtrly").unwrap();
        assert_eq!(fcf.value, "800");
        assert_eq!(fcf.column, "Q1 2025");

        assert_eq!(bundle.line_items.len(), 4);
        assert_eq!(bundle.line_items[0].classification, "Revenue");
        assert_eq!(bundle.line_items[0].confidence, Some(0.8765));
        assert_eq!(bundle.line_items[1].classification, "Unassigned");
        assert!(!bundle.value_columns.iter().any(|c| c.starts_with("Company")));
    }

    #[tokio::test]
    async fn test_failed_statement_degrades_to_absent() {
        let pipeline = ExtractionPipeline::new(
            Utf8TextExtractor,
            FlakyTables {
                failing: StatementKind::CashFlows,
            },
            NoopClassifier,
            FinqcConfig::default(),
        );

        let bundle = pipeline.process(REPORT.as_bytes(), "q1.md").await.unwrap();
        assert_eq!(bundle.frames.names(), vec!["Profit or Loss"]);
        assert_eq!(bundle.tables_markdown[4].markdown, "");
        assert!(bundle.sop_summary.iter().any(|r| r.metric == "FCF Qtrly" && r.value == "-"));
    }

    #[tokio::test]
    async fn test_classifier_failure_is_not_fatal() {
        let pipeline = ExtractionPipeline::new(
            Utf8TextExtractor,
            HeadingTableExtractor,
            FailingClassifier,
            FinqcConfig::default(),
        );

        let bundle = pipeline.process(REPORT.as_bytes(), "q1.md").await.unwrap();
        assert!(bundle.line_items.iter().all(|item| item.classification == "Unassigned"));
    }

    #[tokio::test]
    async fn test_classification_disabled() {
        let mut config = FinqcConfig::default();
        config.classification.enabled = false;
        let pipeline = ExtractionPipeline::new(
            Utf8TextExtractor,
            HeadingTableExtractor,
            ResponseClassifier::new("not json"),
            config,
        );

        let bundle = pipeline.process(REPORT.as_bytes(), "q1.md").await.unwrap();
        assert!(bundle.line_items.iter().all(|item| item.confidence.is_none()));
    }

    #[tokio::test]
    async fn test_blank_document_is_fatal() {
        let pipeline = ExtractionPipeline::new(
            Utf8TextExtractor,
            HeadingTableExtractor,
            NoopClassifier,
            FinqcConfig::default(),
        );

        let err = pipeline.process(b"  \n ", "empty.md").await.unwrap_err();
        assert!(matches!(
            err,
            FinqcError::Extraction(ExtractionError::NoSourceText(ref name)) if name == "empty.md"
        ));
    }

    #[tokio::test]
    async fn test_bundle_uses_camel_case_keys() {
        let pipeline = ExtractionPipeline::new(
            Utf8TextExtractor,
            HeadingTableExtractor,
            NoopClassifier,
            FinqcConfig::default(),
        );

        let bundle = pipeline.process(REPORT.as_bytes(), "q1.md").await.unwrap();
        let json = serde_json::to_value(&bundle).unwrap();

        assert!(json.get("sopSummary").is_some());
        assert!(json["sopMetadata"]["latestColumns"].get("Cash Flows").is_some());
        assert_eq!(json["frames"][0]["statement"], "Profit or Loss");
    }
}

//! Collaborator seams and the end-to-end extraction pipeline.

mod heading;
mod pipeline;
mod response;

pub use heading::{find_statement_table, HeadingTableExtractor};
pub use pipeline::{ExtractionBundle, ExtractionPipeline};
pub use response::{extract_json, parse_classification_response, ResponseClassifier};

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::line_item::{AiRecord, ClassificationSuggestion};
use crate::models::statement::StatementKind;

/// Classifier output keyed by line item id.
pub type Suggestions = HashMap<String, ClassificationSuggestion>;

/// Turns a source document into plain text.
#[async_trait]
pub trait DocumentTextExtractor: Send + Sync {
    /// Best-effort text of the whole document.
    async fn extract_text(&self, bytes: &[u8], filename: &str) -> Result<String>;
}

/// Pulls the table text of one statement out of document text.
#[async_trait]
pub trait StatementTableExtractor: Send + Sync {
    /// Pipe-delimited table text for `statement`.
    async fn extract_table(&self, text: &str, statement: StatementKind) -> Result<String>;
}

/// Assigns candidate metrics to line items.
#[async_trait]
pub trait LineItemClassifier: Send + Sync {
    /// Suggestions for any subset of `records`; missing ids stay unassigned.
    async fn classify(&self, records: &[AiRecord], candidate_metrics: &[String]) -> Result<Suggestions>;
}

/// Reads document bytes as UTF-8 text, replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8TextExtractor;

#[async_trait]
impl DocumentTextExtractor for Utf8TextExtractor {
    async fn extract_text(&self, bytes: &[u8], _filename: &str) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Classifier that never suggests anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopClassifier;

#[async_trait]
impl LineItemClassifier for NoopClassifier {
    async fn classify(&self, _records: &[AiRecord], _candidate_metrics: &[String]) -> Result<Suggestions> {
        Ok(Suggestions::new())
    }
}

//! SOP summary models.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display value of an unresolved metric.
pub const UNRESOLVED: &str = "-";

/// Resolved value of one canonical metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SopResult {
    /// Canonical metric name.
    pub metric: String,

    /// Display value, "-" when unresolved.
    pub value: String,

    /// Numeric value, when the source cell was parseable.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub numeric_value: Option<Decimal>,

    /// Statement the value was sourced from.
    pub statement: String,

    /// Column header the value was read from.
    pub column: String,

    /// Row label the value was read from.
    pub source_line: String,
}

impl SopResult {
    /// Default result for a metric nothing matched.
    pub fn unresolved(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: UNRESOLVED.to_string(),
            numeric_value: None,
            statement: String::new(),
            column: String::new(),
            source_line: String::new(),
        }
    }

    /// Whether a source row or derivation produced this result.
    pub fn is_resolved(&self) -> bool {
        !self.statement.is_empty()
    }
}

/// Base metric results after the matching phase, read-only.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMetrics {
    results: HashMap<String, SopResult>,
}

impl ResolvedMetrics {
    pub fn new(results: HashMap<String, SopResult>) -> Self {
        Self { results }
    }

    /// Result for a metric, resolved or not.
    pub fn get(&self, metric: &str) -> Option<&SopResult> {
        self.results.get(metric)
    }

    /// Numeric value of a resolved metric.
    pub fn numeric(&self, metric: &str) -> Option<Decimal> {
        self.get(metric).and_then(|r| r.numeric_value)
    }

    pub(crate) fn into_inner(self) -> HashMap<String, SopResult> {
        self.results
    }
}

/// Which column was treated as the latest period, per statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SopMetadata {
    pub latest_columns: BTreeMap<String, String>,
}

/// Ordered SOP summary plus metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SopSummary {
    pub summary: Vec<SopResult>,
    pub metadata: SopMetadata,
}

impl SopSummary {
    /// Summary entry for a metric.
    pub fn get(&self, metric: &str) -> Option<&SopResult> {
        self.summary.iter().find(|r| r.metric == metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_numeric_value_serializes_as_number() {
        let result = SopResult {
            metric: "Revenues".to_string(),
            value: "1,500.00".to_string(),
            numeric_value: Some(Decimal::from_str("1500").unwrap()),
            statement: "Profit or Loss".to_string(),
            column: "2025".to_string(),
            source_line: "Revenue".to_string(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["numericValue"], serde_json::json!(1500.0));
        assert!(json["numericValue"].is_number());
    }

    #[test]
    fn test_unresolved_numeric_value_is_null() {
        let json = serde_json::to_value(SopResult::unresolved("Cash")).unwrap();
        assert!(json["numericValue"].is_null());

        let back: SopResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, SopResult::unresolved("Cash"));
    }
}

//! Line item records handed to and merged back from classification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Classification used when no metric applies.
pub const UNASSIGNED: &str = "Unassigned";

/// A flattened statement row with a stable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRecord {
    /// Stable identifier (`<statement>__<row>`).
    pub id: String,

    /// Source statement name.
    pub statement: String,

    /// Row label from the first column.
    pub label: String,

    /// Sanitized value per value column, padded across all frames.
    pub values: BTreeMap<String, String>,

    /// Assigned metric; empty until classification is merged.
    pub classification: String,

    /// Classifier confidence in [0, 1].
    pub confidence: Option<f64>,
}

/// Compact record sent to the classification service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiRecord {
    pub id: String,
    pub statement: String,
    /// Row label.
    pub label: String,
    /// Only the non-empty sanitized values.
    pub values: BTreeMap<String, String>,
}

/// A classifier suggestion for one line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationSuggestion {
    pub classification: String,
    pub confidence: Option<f64>,
}

impl ClassificationSuggestion {
    pub fn new(classification: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            classification: classification.into(),
            confidence,
        }
    }
}

/// Output of line item preparation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedLineItems {
    /// Full records for display.
    pub line_items: Vec<LineItemRecord>,

    /// Compact records for classification.
    pub ai_records: Vec<AiRecord>,

    /// Union of value column names across all frames, first-seen order.
    pub value_columns: Vec<String>,
}

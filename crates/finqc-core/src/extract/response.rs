//! Reading classification responses.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClassificationError, Result};
use crate::models::line_item::{AiRecord, ClassificationSuggestion, UNASSIGNED};
use crate::rules::patterns::{ANY_FENCE, JSON_FENCE};

use super::{LineItemClassifier, Suggestions};

/// Find a JSON document in free text.
///
/// Tries a ```json fenced block, then any fenced block, then the span from
/// the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<Value> {
    let fenced = JSON_FENCE
        .captures(text)
        .or_else(|| ANY_FENCE.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|body| serde_json::from_str(body.as_str().trim()).ok());
    if fenced.is_some() {
        return fenced;
    }

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    serde_json::from_str(&text[first..=last]).ok()
}

/// Parse `{"classifications": [{"id", "classification", "confidence"}]}`.
///
/// Entries without a string id are skipped. Confidence may be a number or a
/// numeric string and is clamped to [0, 1].
pub fn parse_classification_response(text: &str) -> Result<Suggestions> {
    let document = extract_json(text)
        .ok_or_else(|| ClassificationError::MalformedResponse("no JSON document found".to_string()))?;

    let entries = document
        .get("classifications")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ClassificationError::MalformedResponse("missing \"classifications\" array".to_string())
        })?;

    let mut suggestions = Suggestions::new();
    for entry in entries {
        let Some(id) = entry.get("id").and_then(Value::as_str) else {
            continue;
        };

        let classification = entry
            .get("classification")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNASSIGNED);

        let confidence = entry
            .get("confidence")
            .and_then(read_confidence)
            .map(|c| c.clamp(0.0, 1.0));

        suggestions.insert(
            id.to_string(),
            ClassificationSuggestion::new(classification, confidence),
        );
    }

    Ok(suggestions)
}

fn read_confidence(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Classifier backed by a stored classification response.
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    response: String,
}

impl ResponseClassifier {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    /// Load the response text from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

#[async_trait]
impl LineItemClassifier for ResponseClassifier {
    async fn classify(&self, records: &[AiRecord], _candidate_metrics: &[String]) -> Result<Suggestions> {
        let requested: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let mut suggestions = parse_classification_response(&self.response)?;

        let before = suggestions.len();
        suggestions.retain(|id, _| requested.contains(id.as_str()));
        if suggestions.len() < before {
            warn!("Ignoring {} suggestion(s) for unknown line items", before - suggestions.len());
        }

        debug!("Classified {}/{} line item(s)", suggestions.len(), records.len());
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinqcError;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[test]
    fn test_extract_json_from_fenced_block() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nThanks";
        assert_eq!(extract_json(text), Some(serde_json::json!({"a": 1})));

        let plain_fence = "```\n{\"b\": 2}\n```";
        assert_eq!(extract_json(plain_fence), Some(serde_json::json!({"b": 2})));
    }

    #[test]
    fn test_extract_json_from_brace_span() {
        let text = "Result: {\"a\": {\"b\": 2}} -- end";
        assert_eq!(extract_json(text), Some(serde_json::json!({"a": {"b": 2}})));
        assert_eq!(extract_json("no json here"), None);
        assert_eq!(extract_json("} backwards {"), None);
    }

    #[test]
    fn test_parse_classification_response() {
        let text = r#"{"classifications": [
            {"id": "Profit or Loss__0", "classification": " Revenue ", "confidence": 0.93},
            {"id": "Profit or Loss__1", "classification": "", "confidence": "1.4"},
            {"id": "Profit or Loss__2", "confidence": "high"},
            {"classification": "Taxation"},
            {"id": 7, "classification": "Taxation"}
        ]}"#;

        let suggestions = parse_classification_response(text).unwrap();
        assert_eq!(suggestions.len(), 3);
        assert_eq!(
            suggestions["Profit or Loss__0"],
            ClassificationSuggestion::new("Revenue", Some(0.93))
        );
        assert_eq!(
            suggestions["Profit or Loss__1"],
            ClassificationSuggestion::new("Unassigned", Some(1.0))
        );
        assert_eq!(
            suggestions["Profit or Loss__2"],
            ClassificationSuggestion::new("Unassigned", None)
        );
    }

    #[test]
    fn test_malformed_response() {
        let err = parse_classification_response("{\"items\": []}").unwrap_err();
        assert!(matches!(
            err,
            FinqcError::Classification(ClassificationError::MalformedResponse(_))
        ));
        assert!(parse_classification_response("not json").is_err());
    }

    #[tokio::test]
    async fn test_response_classifier_keeps_requested_ids() {
        let classifier = ResponseClassifier::new(
            r#"```json
{"classifications": [{"id": "a", "classification": "Revenue", "confidence": 0.5},
                     {"id": "zz", "classification": "Taxation", "confidence": 0.5}]}
```"#,
        );
        let records = vec![AiRecord {
            id: "a".to_string(),
            statement: "Profit or Loss".to_string(),
            label: "Revenue".to_string(),
            values: BTreeMap::new(),
        }];

        let suggestions = classifier.classify(&records, &[]).await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions.contains_key("a"));
    }
}

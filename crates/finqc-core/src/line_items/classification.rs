//! Candidate vocabulary and merging classifier suggestions into line items.

use std::collections::{BTreeSet, HashMap};

use crate::models::line_item::{ClassificationSuggestion, LineItemRecord, UNASSIGNED};

/// Metric names the classifier may always choose from.
pub const DEFAULT_CLASSIFICATION_METRICS: [&str; 34] = [
    "Revenue",
    "Net Revenue",
    "Gross Profit",
    "Operating Profit",
    "EBITDA",
    "Profit Before Tax",
    "Net Profit",
    "Total Assets",
    "Total Liabilities",
    "Total Equity",
    "Cash and Cash Equivalents",
    "Cash and Cash Equivalents at End of Period",
    "Cost of Sales",
    "Operating Expenses",
    "Administrative Expenses",
    "Selling and Distribution Expenses",
    "Impairment Charges",
    "Depreciation",
    "Amortisation",
    "Interest Income",
    "Interest Expense",
    "Loan Loss Provision",
    "Other Operating Income",
    "Other Operating Expenses",
    "Total Debt",
    "Short Term Borrowings",
    "Long Term Borrowings",
    "Share Capital",
    "Retained Earnings",
    "Taxation",
    "Operating Cash Flow",
    "Investing Cash Flow",
    "Financing Cash Flow",
    "Net Cash Flow",
];

/// Default vocabulary plus trimmed, non-empty extras, deduplicated and sorted.
pub fn build_candidate_metrics<S: AsRef<str>>(extra: &[S]) -> Vec<String> {
    DEFAULT_CLASSIFICATION_METRICS
        .iter()
        .map(|m| m.to_string())
        .chain(
            extra
                .iter()
                .map(|m| m.as_ref().trim())
                .filter(|m| !m.is_empty())
                .map(str::to_string),
        )
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// Apply classifier suggestions to line items, returning new records.
///
/// Items without a suggestion keep a non-empty classification or become
/// "Unassigned"; suggested confidences are clamped to [0, 1] and rounded to
/// four decimals.
pub fn merge_classification(
    line_items: &[LineItemRecord],
    suggestions: &HashMap<String, ClassificationSuggestion>,
) -> Vec<LineItemRecord> {
    line_items
        .iter()
        .map(|item| {
            let mut merged = item.clone();
            match suggestions.get(&item.id) {
                Some(suggestion) => {
                    merged.classification = non_blank(&suggestion.classification);
                    merged.confidence = suggestion.confidence.and_then(normalize_confidence);
                }
                None => {
                    merged.classification = non_blank(&item.classification);
                }
            }
            merged
        })
        .collect()
}

fn non_blank(classification: &str) -> String {
    let trimmed = classification.trim();
    if trimmed.is_empty() {
        UNASSIGNED.to_string()
    } else {
        trimmed.to_string()
    }
}

fn normalize_confidence(confidence: f64) -> Option<f64> {
    if !confidence.is_finite() {
        return None;
    }
    let clamped = confidence.clamp(0.0, 1.0);
    Some((clamped * 10_000.0).round() / 10_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn item(id: &str, classification: &str) -> LineItemRecord {
        LineItemRecord {
            id: id.to_string(),
            statement: "Profit or Loss".to_string(),
            label: "Revenue".to_string(),
            values: BTreeMap::from([("2024".to_string(), "10".to_string())]),
            classification: classification.to_string(),
            confidence: None,
        }
    }

    #[test]
    fn test_candidate_metrics_merge_and_sort() {
        let metrics = build_candidate_metrics(&["  Dividends Paid ", "", "Revenue", "EBITDA"]);

        assert_eq!(metrics.len(), 35);
        assert!(metrics.contains(&"Dividends Paid".to_string()));
        assert!(metrics.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(metrics[0], "Administrative Expenses");
    }

    #[test]
    fn test_candidate_metrics_without_extras() {
        let none: [&str; 0] = [];
        assert_eq!(build_candidate_metrics(&none).len(), DEFAULT_CLASSIFICATION_METRICS.len());
    }

    #[test]
    fn test_merge_applies_suggestions() {
        let items = vec![item("a", ""), item("b", ""), item("c", "Revenue"), item("d", "")];
        let suggestions = HashMap::from([
            ("a".to_string(), ClassificationSuggestion::new(" Revenue ", Some(0.912345))),
            ("b".to_string(), ClassificationSuggestion::new("   ", Some(1.7))),
            ("d".to_string(), ClassificationSuggestion::new("Taxation", None)),
        ]);

        let merged = merge_classification(&items, &suggestions);

        assert_eq!(merged[0].classification, "Revenue");
        assert_eq!(merged[0].confidence, Some(0.9123));
        assert_eq!(merged[1].classification, "Unassigned");
        assert_eq!(merged[1].confidence, Some(1.0));
        assert_eq!(merged[2].classification, "Revenue");
        assert_eq!(merged[2].confidence, None);
        assert_eq!(merged[3].confidence, None);
    }

    #[test]
    fn test_merge_without_suggestion_defaults_to_unassigned() {
        let merged = merge_classification(&[item("a", "")], &HashMap::new());
        assert_eq!(merged[0].classification, "Unassigned");
        assert_eq!(merged[0].confidence, None);
    }

    #[test]
    fn test_merge_is_pure() {
        let items = vec![item("a", ""), item("b", "Revenue")];
        let before = items.clone();
        let suggestions = HashMap::from([(
            "a".to_string(),
            ClassificationSuggestion::new("Net Profit", Some(-0.5)),
        )]);

        let first = merge_classification(&items, &suggestions);
        let second = merge_classification(&items, &suggestions);

        assert_eq!(first, second);
        assert_eq!(items, before);
        assert_eq!(first[0].confidence, Some(0.0));
    }
}

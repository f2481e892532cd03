//! Row matching against metric aliases.

use rust_decimal::Decimal;

use crate::models::frame::Frame;

use super::amounts::parse_numeric;

/// Bonus that lets an exact label match outrank any substring match.
const EXACT_MATCH_BONUS: usize = 1000;

/// The row selected for a metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMatch {
    /// Row position in the frame.
    pub row: usize,
    /// Raw row label.
    pub label: String,
    /// Raw cell text in the chosen column, "-" when empty.
    pub value: String,
    /// Parsed cell value.
    pub numeric_value: Option<Decimal>,
    /// Match score.
    pub score: usize,
}

/// Lowercase and keep only ASCII letters and digits.
pub fn normalize_label(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Scores frame rows against an alias set, honoring exclusions.
#[derive(Debug, Clone)]
pub struct MetricMatcher {
    aliases: Vec<String>,
    excludes: Vec<String>,
}

impl MetricMatcher {
    /// Create a matcher; aliases and exclusions are normalized up front.
    pub fn new<S: AsRef<str>>(aliases: &[S], excludes: &[S]) -> Self {
        let normalize_all = |terms: &[S]| -> Vec<String> {
            terms
                .iter()
                .map(|t| normalize_label(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect()
        };

        Self {
            aliases: normalize_all(aliases),
            excludes: normalize_all(excludes),
        }
    }

    /// Score a label against the aliases; `None` when nothing matches.
    pub fn score(&self, label: &str) -> Option<usize> {
        let normalized = normalize_label(label);
        if normalized.is_empty() || self.is_excluded(&normalized) {
            return None;
        }

        let mut best: Option<usize> = None;
        for alias in &self.aliases {
            if let Some(score) = alias_score(&normalized, alias) {
                if best.is_none_or(|b| score > b) {
                    best = Some(score);
                }
            }
        }
        best
    }

    /// Best row of `frame` for the aliases, reading values from `column`.
    ///
    /// Ties keep the earliest row.
    pub fn find_best_row(&self, frame: &Frame, column: usize) -> Option<RowMatch> {
        if self.aliases.is_empty() || column == 0 || column >= frame.headers.len() {
            return None;
        }

        let mut best: Option<RowMatch> = None;
        for row in 0..frame.len() {
            let label = frame.label(row).trim();
            if label.is_empty() {
                continue;
            }

            let Some(score) = self.score(label) else {
                continue;
            };

            if best.as_ref().is_none_or(|b| score > b.score) {
                let raw = frame.cell(row, column).trim();
                best = Some(RowMatch {
                    row,
                    label: label.to_string(),
                    value: if raw.is_empty() { "-".to_string() } else { raw.to_string() },
                    numeric_value: parse_numeric(raw),
                    score,
                });
            }
        }

        best
    }

    fn is_excluded(&self, normalized_label: &str) -> bool {
        self.excludes.iter().any(|term| normalized_label.contains(term.as_str()))
    }
}

fn alias_score(normalized_label: &str, alias: &str) -> Option<usize> {
    if normalized_label == alias {
        Some(EXACT_MATCH_BONUS + alias.len())
    } else if normalized_label.contains(alias) {
        Some(alias.len())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn frame(rows: &[(&str, &str)]) -> Frame {
        Frame::new(
            vec!["Item".into(), "2024".into()],
            rows.iter()
                .map(|(label, value)| vec![label.to_string(), value.to_string()])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Property, Plant & Equipment"), "propertyplantequipment");
        assert_eq!(normalize_label("  Net (loss)/profit - 2024 "), "netlossprofit2024");
    }

    #[test]
    fn test_exact_match_beats_substring() {
        let frame = frame(&[("Other Revenue", "50"), ("Total Revenue", "1,500")]);
        let matcher = MetricMatcher::new(&["revenue", "total revenue"], &[]);

        let found = matcher.find_best_row(&frame, 1).unwrap();
        assert_eq!(found.label, "Total Revenue");
        assert_eq!(found.value, "1,500");
        assert_eq!(found.numeric_value, Some(Decimal::from_str("1500").unwrap()));
        assert_eq!(found.score, 1000 + "totalrevenue".len());
    }

    #[test]
    fn test_longer_alias_outranks_shorter() {
        let frame = frame(&[("Revenue from contracts", "10"), ("Total revenue for the year", "20")]);
        let matcher = MetricMatcher::new(&["revenue", "total revenue"], &[]);

        assert_eq!(matcher.find_best_row(&frame, 1).unwrap().label, "Total revenue for the year");
    }

    #[test]
    fn test_excluded_row_is_never_selected() {
        let frame = frame(&[("Total liabilities and equity", "900"), ("Total liabilities", "400")]);
        let matcher = MetricMatcher::new(&["total liabilities"], &["equity"]);

        let found = matcher.find_best_row(&frame, 1).unwrap();
        assert_eq!(found.label, "Total liabilities");

        let only_excluded = self::frame(&[("Total liabilities and equity", "900")]);
        assert_eq!(matcher.find_best_row(&only_excluded, 1), None);
    }

    #[test]
    fn test_ties_keep_first_row() {
        let frame = frame(&[("Revenue", "1"), ("Revenue", "2")]);
        let matcher = MetricMatcher::new(&["revenue"], &[]);

        let found = matcher.find_best_row(&frame, 1).unwrap();
        assert_eq!(found.row, 0);
        assert_eq!(found.value, "1");
    }

    #[test]
    fn test_empty_cell_reads_as_dash() {
        let frame = frame(&[("Inventories", "")]);
        let matcher = MetricMatcher::new(&["inventories"], &[]);

        let found = matcher.find_best_row(&frame, 1).unwrap();
        assert_eq!(found.value, "-");
        assert_eq!(found.numeric_value, None);
    }

    #[test]
    fn test_no_match() {
        let frame = frame(&[("Cost of sales", "(90)")]);
        let matcher = MetricMatcher::new(&["revenue"], &[]);
        assert_eq!(matcher.find_best_row(&frame, 1), None);
        assert_eq!(matcher.find_best_row(&frame, 0), None);
    }
}

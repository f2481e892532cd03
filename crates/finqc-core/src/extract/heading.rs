//! Locating statement tables under their published headings.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ExtractionError, Result};
use crate::models::statement::StatementKind;

use super::StatementTableExtractor;

/// Offline table extractor for documents already rendered as text.
///
/// Finds the first line containing one of the statement's headings and
/// returns the first contiguous block of `|` lines after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingTableExtractor;

#[async_trait]
impl StatementTableExtractor for HeadingTableExtractor {
    async fn extract_table(&self, text: &str, statement: StatementKind) -> Result<String> {
        find_statement_table(text, statement).ok_or_else(|| {
            ExtractionError::StatementTable {
                statement: statement.name().to_string(),
                reason: "no heading followed by a table".to_string(),
            }
            .into()
        })
    }
}

/// Table text following the first heading of `statement`, if any.
pub fn find_statement_table(text: &str, statement: StatementKind) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let titles: Vec<String> = statement.titles().iter().map(|t| t.to_lowercase()).collect();

    let heading = lines.iter().position(|line| {
        let lower = line.to_lowercase();
        titles.iter().any(|title| lower.contains(title.as_str()))
    })?;

    let start = heading + 1 + lines[heading + 1..].iter().position(|line| is_table_line(line))?;
    let block: Vec<&str> = lines[start..]
        .iter()
        .take_while(|line| is_table_line(line))
        .map(|line| line.trim())
        .collect();

    debug!(
        "{}: heading at line {}, {} table line(s)",
        statement,
        heading + 1,
        block.len()
    );
    Some(block.join("\n"))
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = "\
Interim report

CONSOLIDATED STATEMENT OF FINANCIAL POSITION
As at 31 March 2025

| | Group 2025 | Group 2024 |
|---|---|---|
| Total assets | 900 | 800 |

Notes follow.

Statement of Cash Flows
| Item | Group Q1 2025 |
| Net cash generated from operating activities | 120 |
";

    #[test]
    fn test_finds_table_under_heading() {
        let table = find_statement_table(DOCUMENT, StatementKind::FinancialPosition).unwrap();
        assert_eq!(
            table,
            "| | Group 2025 | Group 2024 |\n|---|---|---|\n| Total assets | 900 | 800 |"
        );
    }

    #[test]
    fn test_heading_match_is_case_insensitive() {
        let table = find_statement_table(DOCUMENT, StatementKind::CashFlows).unwrap();
        assert_eq!(table.lines().count(), 2);
    }

    #[test]
    fn test_missing_heading() {
        assert_eq!(find_statement_table(DOCUMENT, StatementKind::ChangesInEquity), None);
    }

    #[tokio::test]
    async fn test_extractor_reports_missing_table() {
        let err = HeadingTableExtractor
            .extract_table(DOCUMENT, StatementKind::ChangesInEquity)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Changes in Equity"));
    }
}

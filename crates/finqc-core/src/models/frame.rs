//! Parsed table frames.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A parsed table: ordered headers plus positional rows.
///
/// The first header names the label column; the rest are value columns.
/// Headers need not be unique, so cells are addressed by position and every
/// row holds exactly one cell per header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Column headers, label column first.
    pub headers: Vec<String>,

    /// Rows of raw cell text, one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl Frame {
    /// Build a frame, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ParseError> {
        if headers.len() < 2 {
            return Err(ParseError::InsufficientColumns {
                found: headers.len(),
            });
        }

        let width = headers.len();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        if rows.is_empty() {
            return Err(ParseError::NoRows);
        }

        Ok(Self { headers, rows })
    }

    /// Headers of the value columns, in original order.
    pub fn value_headers(&self) -> &[String] {
        &self.headers[1..]
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw label of a row.
    pub fn label(&self, row: usize) -> &str {
        self.cell(row, 0)
    }

    /// Raw cell text, empty when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A frame tagged with the statement it was extracted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementFrame {
    /// Statement name (e.g. "Cash Flows").
    pub statement: String,

    /// The parsed frame.
    #[serde(flatten)]
    pub frame: Frame,
}

/// Frames keyed by statement name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementFrames {
    entries: Vec<StatementFrame>,
}

impl StatementFrames {
    /// Create an empty frame set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a frame, replacing any frame already stored for the statement.
    pub fn insert(&mut self, statement: impl Into<String>, frame: Frame) {
        let statement = statement.into();
        match self.entries.iter_mut().find(|e| e.statement == statement) {
            Some(entry) => entry.frame = frame,
            None => self.entries.push(StatementFrame { statement, frame }),
        }
    }

    /// Frame for a statement, if present.
    pub fn get(&self, statement: &str) -> Option<&Frame> {
        self.entries
            .iter()
            .find(|e| e.statement == statement)
            .map(|e| &e.frame)
    }

    /// Whether a frame exists for the statement.
    pub fn contains(&self, statement: &str) -> bool {
        self.get(statement).is_some()
    }

    /// Iterate `(statement, frame)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Frame)> {
        self.entries.iter().map(|e| (e.statement.as_str(), &e.frame))
    }

    /// Statement names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.statement.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Frame)> for StatementFrames {
    fn from_iter<I: IntoIterator<Item = (String, Frame)>>(iter: I) -> Self {
        let mut frames = Self::new();
        for (statement, frame) in iter {
            frames.insert(statement, frame);
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_pads_short_rows() {
        let frame = Frame::new(
            headers(&["Item", "2024", "2023"]),
            vec![vec!["Revenue".to_string(), "100".to_string()]],
        )
        .unwrap();

        assert_eq!(frame.rows[0].len(), 3);
        assert_eq!(frame.cell(0, 2), "");
        assert_eq!(frame.value_headers(), &["2024".to_string(), "2023".to_string()]);
    }

    #[test]
    fn test_new_rejects_single_column() {
        let err = Frame::new(headers(&["Item"]), vec![vec!["x".to_string()]]).unwrap_err();
        assert_eq!(err, ParseError::InsufficientColumns { found: 1 });
    }

    #[test]
    fn test_new_rejects_no_rows() {
        let err = Frame::new(headers(&["Item", "2024"]), Vec::new()).unwrap_err();
        assert_eq!(err, ParseError::NoRows);
    }

    #[test]
    fn test_statement_frames_replace_keeps_order() {
        let frame = Frame::new(headers(&["Item", "2024"]), vec![vec!["A".into(), "1".into()]]).unwrap();
        let mut frames = StatementFrames::new();
        frames.insert("Cash Flows", frame.clone());
        frames.insert("Profit or Loss", frame.clone());
        frames.insert("Cash Flows", frame);

        assert_eq!(frames.names(), vec!["Cash Flows", "Profit or Loss"]);
        assert_eq!(frames.len(), 2);
    }
}

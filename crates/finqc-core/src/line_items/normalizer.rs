//! Flattening statement frames into line item records.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::models::frame::Frame;
use crate::models::line_item::{AiRecord, LineItemRecord, PreparedLineItems};
use crate::rules::amounts::sanitize_value;
use crate::rules::patterns::PLACEHOLDER_LABEL;

/// Labels that carry no line item.
const NULL_LABELS: [&str; 2] = ["nan", "none"];

/// Flatten `(statement, frame)` pairs into line item records.
///
/// Every record carries every value column seen across all frames, empty
/// where its own frame lacks the column. Ids are `<statement>__<row>`, with a
/// `_<n>` suffix when that id is already taken.
pub fn prepare_line_items<'a, I>(frames: I) -> PreparedLineItems
where
    I: IntoIterator<Item = (&'a str, &'a Frame)>,
{
    let frames: Vec<(&str, &Frame)> = frames.into_iter().collect();
    if frames.is_empty() {
        return PreparedLineItems::default();
    }

    let value_columns = collect_value_columns(&frames);
    let mut ids = IdAllocator::default();
    let mut line_items = Vec::new();
    let mut ai_records = Vec::new();

    for (statement, frame) in &frames {
        for row in 0..frame.len() {
            let label = frame.label(row).trim();
            if is_placeholder_label(label) {
                continue;
            }

            let id = ids.allocate(&format!("{}__{}", statement, row));

            let mut values: BTreeMap<String, String> = BTreeMap::new();
            let mut payload: BTreeMap<String, String> = BTreeMap::new();
            for (col, header) in frame.headers.iter().enumerate().skip(1) {
                let name = header.trim();
                if name.is_empty() {
                    continue;
                }
                let value = sanitize_value(frame.cell(row, col));
                if !value.is_empty() {
                    payload.insert(name.to_string(), value.clone());
                }
                values.insert(name.to_string(), value);
            }
            for column in &value_columns {
                values.entry(column.clone()).or_default();
            }

            ai_records.push(AiRecord {
                id: id.clone(),
                statement: statement.to_string(),
                label: label.to_string(),
                values: payload,
            });
            line_items.push(LineItemRecord {
                id,
                statement: statement.to_string(),
                label: label.to_string(),
                values,
                classification: String::new(),
                confidence: None,
            });
        }
    }

    debug!(
        "Prepared {} line item(s) over {} value column(s)",
        line_items.len(),
        value_columns.len()
    );

    PreparedLineItems {
        line_items,
        ai_records,
        value_columns,
    }
}

/// Union of value column names across frames, first-seen order.
fn collect_value_columns(frames: &[(&str, &Frame)]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for (_, frame) in frames {
        for header in frame.value_headers() {
            let name = header.trim();
            if !name.is_empty() && seen.insert(name.to_string()) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

fn is_placeholder_label(label: &str) -> bool {
    if label.is_empty() || PLACEHOLDER_LABEL.is_match(label) {
        return true;
    }
    let lower = label.to_lowercase();
    NULL_LABELS.contains(&lower.as_str())
}

/// Hands out unique row ids within one preparation run.
#[derive(Debug, Default)]
struct IdAllocator {
    taken: HashSet<String>,
}

impl IdAllocator {
    fn allocate(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut suffix = 1;
        while self.taken.contains(&id) {
            id = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        self.taken.insert(id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frame::StatementFrames;
    use pretty_assertions::assert_eq;

    fn frame(headers: &[&str], rows: &[&[&str]]) -> Frame {
        Frame::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_colliding_ids_are_made_unique() {
        let first = frame(&["Item", "2024"], &[&["Revenue", "10"]]);
        let second = frame(&["Item", "2024"], &[&["Revenue", "11"]]);

        let prepared = prepare_line_items(vec![("StatementA", &first), ("StatementA", &second)]);
        let ids: Vec<&str> = prepared.line_items.iter().map(|r| r.id.as_str()).collect();

        assert_eq!(ids, vec!["StatementA__0", "StatementA__0_1"]);
        assert_eq!(prepared.ai_records[1].id, "StatementA__0_1");
    }

    #[test]
    fn test_values_are_padded_across_frames() {
        let mut frames = StatementFrames::new();
        frames.insert("Profit or Loss", frame(&["Item", "2024", "2023"], &[&["Revenue", "1,000", "\u{2014}"]]));
        frames.insert("Cash Flows", frame(&["Item", "Q1 2025"], &[&["Net cash", "(50)"]]));

        let prepared = prepare_line_items(frames.iter());
        assert_eq!(prepared.value_columns, vec!["2024", "2023", "Q1 2025"]);

        let revenue = &prepared.line_items[0];
        assert_eq!(revenue.values.len(), 3);
        assert_eq!(revenue.values["2024"], "1,000");
        assert_eq!(revenue.values["2023"], "");
        assert_eq!(revenue.values["Q1 2025"], "");
        assert_eq!(revenue.classification, "");
        assert_eq!(revenue.confidence, None);

        let ai = &prepared.ai_records[0];
        assert_eq!(ai.label, "Revenue");
        assert_eq!(ai.values.len(), 1);
        assert_eq!(ai.values["2024"], "1,000");

        let wire = serde_json::to_value(ai).unwrap();
        assert_eq!(wire["label"], "Revenue");
        assert_eq!(wire["statement"], "Profit or Loss");
        assert!(wire.get("lineItem").is_none());
    }

    #[test]
    fn test_placeholder_labels_are_skipped() {
        let frame = frame(
            &["Item", "2024"],
            &[&["", "1"], &["- -", "2"], &["NaN", "3"], &["None", "4"], &["Revenue", "5"]],
        );

        let prepared = prepare_line_items(vec![("Profit or Loss", &frame)]);
        assert_eq!(prepared.line_items.len(), 1);
        assert_eq!(prepared.line_items[0].id, "Profit or Loss__4");
    }

    #[test]
    fn test_no_frames() {
        let prepared = prepare_line_items(StatementFrames::new().iter());
        assert_eq!(prepared, PreparedLineItems::default());
    }
}

//! Pipe-delimited table parsing.

use crate::error::ParseError;
use crate::models::frame::Frame;
use crate::rules::patterns::SEPARATOR_ROW;

/// Parse a markdown-style table into a frame.
///
/// The first `|` line is the header row. Lines right below it with the same
/// width and an empty first cell are folded into the header. Separator lines
/// and fully empty rows are skipped; short rows are padded.
pub fn parse_table(text: &str) -> Result<Frame, ParseError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.contains('|'))
        .collect();

    if lines.len() < 2 {
        return Err(ParseError::NoUsableTable);
    }

    let mut headers = placeholder_headers(split_row(lines[0]));
    if headers.len() < 2 {
        return Err(ParseError::InsufficientColumns {
            found: headers.len(),
        });
    }

    let mut data_start = 1;
    while let Some(line) = lines.get(data_start) {
        let candidate = split_row(line);
        if candidate.len() != headers.len() || !candidate[0].is_empty() {
            break;
        }
        headers = merge_header_row(&headers, &candidate);
        data_start += 1;
    }

    let rows: Vec<Vec<String>> = lines[data_start..]
        .iter()
        .filter(|line| !SEPARATOR_ROW.is_match(line))
        .map(|line| split_row(line))
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .map(|mut cells| {
            cells.resize(headers.len(), String::new());
            cells
        })
        .collect();

    if rows.is_empty() {
        return Err(ParseError::NoRows);
    }

    Frame::new(headers, rows)
}

/// Split one table line into trimmed cells, ignoring the outer pipes.
fn split_row(line: &str) -> Vec<String> {
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn placeholder_headers(cells: Vec<String>) -> Vec<String> {
    cells
        .into_iter()
        .enumerate()
        .map(|(idx, cell)| placeholder(idx, cell))
        .collect()
}

fn placeholder(idx: usize, cell: String) -> String {
    if cell.is_empty() {
        format!("Column {}", idx + 1)
    } else {
        cell
    }
}

fn merge_header_row(headers: &[String], continuation: &[String]) -> Vec<String> {
    headers
        .iter()
        .zip(continuation)
        .enumerate()
        .map(|(idx, (header, extra))| placeholder(idx, format!("{} {}", header, extra).trim().to_string()))
        .collect()
}

//! Frame acceptance rules for extracted statement tables.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::frame::{Frame, StatementFrames};
use crate::rules::amounts::sanitize_value;
use crate::rules::patterns::COMPANY_DESCRIPTOR;

use super::parser::parse_table;

const GROUP_KEYWORDS: [&str; 2] = ["group", "consolidated"];

/// Raw table text extracted for one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTable {
    /// Statement name.
    pub statement: String,
    /// Table text as returned by the extractor, empty on failure.
    pub markdown: String,
}

impl StatementTable {
    pub fn new(statement: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            markdown: markdown.into(),
        }
    }
}

/// Options for a single frame-building pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    /// Reject tables without a Group/Consolidated indicator.
    pub require_group: bool,
    /// Drop Company-only value columns when a Group column exists.
    pub drop_company_columns: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            require_group: true,
            drop_company_columns: true,
        }
    }
}

/// Parse and filter one statement table.
pub fn build_frame(statement: &str, markdown: &str, options: FrameOptions) -> Option<Frame> {
    if markdown.trim().is_empty() {
        return None;
    }

    let parsed = match parse_table(markdown) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Unable to parse table for {}: {}", statement, e);
            return None;
        }
    };

    if options.require_group && !mentions_group(&markdown.to_lowercase()) {
        info!("Rejecting {}: no Group/Consolidated indicator found", statement);
        return None;
    }

    let keep = kept_columns(&parsed, options.drop_company_columns);
    let headers: Vec<String> = parsed
        .headers
        .iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(header, _)| header.clone())
        .collect();

    if headers.len() < 2 {
        warn!("{}: all value columns removed after filtering", statement);
        return None;
    }

    let rows: Vec<Vec<String>> = parsed
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&keep)
                .filter(|(_, keep)| **keep)
                .map(|(cell, _)| cell.clone())
                .collect::<Vec<String>>()
        })
        .filter(|row| row[1..].iter().any(|cell| !sanitize_value(cell).is_empty()))
        .collect();

    if rows.is_empty() {
        warn!("{}: no rows remain after filtering", statement);
        return None;
    }

    if headers.len() != parsed.headers.len() {
        info!(
            "{}: columns reduced from {} to {}",
            statement,
            parsed.headers.len(),
            headers.len()
        );
    }

    let frame = Frame::new(headers, rows).ok()?;
    info!(
        "Frame \"{}\" ready with {} row(s) (require_group={})",
        statement,
        frame.len(),
        options.require_group
    );
    Some(frame)
}

/// Build frames for every table in order with a single set of options.
pub fn build_frames(tables: &[StatementTable], options: FrameOptions) -> StatementFrames {
    let mut frames = StatementFrames::new();
    for table in tables {
        if let Some(frame) = build_frame(&table.statement, &table.markdown, options) {
            frames.insert(table.statement.clone(), frame);
        }
    }
    frames
}

/// Build frames with the strict pass first and, where allowed, a relaxed
/// pass for statements the strict pass rejected.
pub fn build_frames_with_fallback(tables: &[StatementTable], config: &ExtractionConfig) -> StatementFrames {
    let strict = FrameOptions {
        require_group: config.require_group_tables,
        drop_company_columns: config.drop_company_columns,
    };
    let relaxed = FrameOptions {
        require_group: false,
        ..strict
    };
    let use_fallback = config.require_group_tables && config.fallback_without_group;

    let mut frames = StatementFrames::new();
    for table in tables {
        let frame = build_frame(&table.statement, &table.markdown, strict).or_else(|| {
            if !use_fallback || table.markdown.trim().is_empty() {
                return None;
            }
            let fallback = build_frame(&table.statement, &table.markdown, relaxed);
            if fallback.is_some() {
                warn!(
                    "Fallback accepted for {}: no Group/Consolidated indicator found but data extracted",
                    table.statement
                );
            }
            fallback
        });

        if let Some(frame) = frame {
            frames.insert(table.statement.clone(), frame);
        }
    }

    debug!("Frames generated: {:?}", frames.names());
    frames
}

fn mentions_group(lower: &str) -> bool {
    GROUP_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn kept_columns(frame: &Frame, drop_company_columns: bool) -> Vec<bool> {
    let lower: Vec<String> = frame.headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let has_group_column = lower.iter().skip(1).any(|h| mentions_group(h));

    lower
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            if idx == 0 {
                return true;
            }
            if header.is_empty() {
                return false;
            }
            let company_only = header.contains("company") && !COMPANY_DESCRIPTOR.is_match(header);
            !(drop_company_columns && has_group_column && company_only)
        })
        .collect()
}

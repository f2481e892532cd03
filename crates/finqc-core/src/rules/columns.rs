//! Latest-period column selection.
//!
//! Statement extractors usually put the newest period first, so a first value
//! column that looks like a quarter is trusted as-is. Otherwise every value
//! column is scored from the date its header describes:
//!
//! 1. a parsed date scores its timestamp in milliseconds;
//! 2. a bare year scores `year * 1000 - index`;
//! 3. anything else scores `-index`.
//!
//! The first column reaching the maximum score wins.

use chrono::{Days, NaiveDate};

use crate::models::frame::Frame;

use super::patterns::{
    find_month, DAY_BEFORE_MONTH, DAY_OF_MONTH, HEADER_ASIDE, HEADER_NOISE, NON_ALNUM,
    PERIOD_WORD, QUARTER_TOKEN, WHITESPACE, YEAR, YEAR_WORD,
};

/// Formats tried against a cleaned header before token inference.
const STRUCTURED_FORMATS: &[&str] = &["%d %B %Y", "%B %d %Y", "%Y %B %d", "%Y %m %d", "%d %m %Y"];

/// The value column chosen as the most recent period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestColumn {
    /// Position in `Frame::headers`.
    pub index: usize,
    /// Header text.
    pub header: String,
}

/// Choose the latest-period column of a frame.
pub fn latest_column(frame: &Frame) -> Option<LatestColumn> {
    let candidates: Vec<(usize, &str)> = frame
        .headers
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, header)| (idx, header.trim()))
        .filter(|(_, header)| !header.is_empty())
        .collect();

    let headers: Vec<&str> = candidates.iter().map(|(_, h)| *h).collect();
    let chosen = select_latest_column(&headers)?;
    let (index, header) = candidates[chosen];

    Some(LatestColumn {
        index,
        header: header.to_string(),
    })
}

/// Pick the latest-period header among value headers, returning its position.
pub fn select_latest_column<S: AsRef<str>>(value_headers: &[S]) -> Option<usize> {
    let first = value_headers.first()?;
    if is_quarter_like(first.as_ref()) {
        return Some(0);
    }

    let mut best: Option<(usize, i64)> = None;
    for (idx, header) in value_headers.iter().enumerate() {
        let score = score_column(header.as_ref(), idx);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((idx, score));
        }
    }

    best.map(|(idx, _)| idx)
}

/// Whether a header names a quarter, a dated period, or a month of a year.
pub fn is_quarter_like(header: &str) -> bool {
    let lower = header.to_lowercase();
    if lower.trim().is_empty() {
        return false;
    }

    if QUARTER_TOKEN.is_match(&lower) {
        return true;
    }

    let has_year = YEAR_WORD.is_match(&lower);
    if has_year && PERIOD_WORD.is_match(&lower) {
        return true;
    }

    has_year && find_month(&lower).is_some()
}

/// Score a header at a position among the value columns.
pub fn score_column(header: &str, index: usize) -> i64 {
    if let Some(date) = parse_column_date(header) {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().timestamp_millis();
        }
    }

    let index = index as i64;
    match YEAR.captures(header).and_then(|caps| caps[1].parse::<i64>().ok()) {
        Some(year) => year * 1000 - index,
        None => -index,
    }
}

/// Infer the period-end date a column header describes.
///
/// A structured parse of the cleaned header is tried first; failing that,
/// the date is assembled from a year token plus any month, quarter and day
/// tokens. Missing month defaults to December, missing day to the 1st.
pub fn parse_column_date(header: &str) -> Option<NaiveDate> {
    if header.trim().is_empty() {
        return None;
    }

    parse_structured_date(&clean_header(header)).or_else(|| infer_date_from_tokens(header))
}

fn clean_header(header: &str) -> String {
    let cleaned = HEADER_ASIDE.replace_all(header, " ");
    let cleaned = HEADER_NOISE.replace_all(&cleaned, " ");
    let cleaned = NON_ALNUM.replace_all(&cleaned, " ");
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

fn parse_structured_date(cleaned: &str) -> Option<NaiveDate> {
    if cleaned.is_empty() {
        return None;
    }

    if cleaned.len() == 4 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        let year: i32 = cleaned.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    STRUCTURED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("1 {}", cleaned), "%d %B %Y").ok())
}

fn infer_date_from_tokens(header: &str) -> Option<NaiveDate> {
    let lower = header.to_lowercase();
    let year: i32 = YEAR.captures(&lower)?[1].parse().ok()?;

    let month = find_month(&lower)
        .or_else(|| {
            QUARTER_TOKEN
                .captures(&lower)
                .and_then(|caps| caps[1].parse::<u32>().ok())
                .map(|quarter| quarter * 3)
        })
        .unwrap_or(12);

    let day = DAY_BEFORE_MONTH
        .captures(&lower)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .or_else(|| {
            DAY_OF_MONTH
                .captures(&lower)
                .and_then(|caps| caps[1].parse::<u32>().ok())
        })
        .filter(|day| (1..=31).contains(day))
        .unwrap_or(1);

    // Days past the end of the month roll into the next one.
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(day - 1)))
}

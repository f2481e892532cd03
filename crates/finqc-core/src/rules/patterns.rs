//! Common regex patterns for statement tables and headers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Table structure
    pub static ref SEPARATOR_ROW: Regex = Regex::new(
        r"^[:\-\s|]+$"
    ).unwrap();

    // Cell values
    pub static ref DASH_ONLY: Regex = Regex::new(
        r"^[-\u{2013}\u{2014}]+$"
    ).unwrap();

    pub static ref NOTE_REFERENCE: Regex = Regex::new(
        r"(?i)\(Note.*?\)"
    ).unwrap();

    pub static ref NOTE_WORD: Regex = Regex::new(
        r"(?i)\bNote\s*\d+\b"
    ).unwrap();

    pub static ref THOUSANDS_SEPARATOR: Regex = Regex::new(
        r"[, ]+"
    ).unwrap();

    pub static ref NON_NUMERIC: Regex = Regex::new(
        r"[^0-9.\-]"
    ).unwrap();

    // Column headers
    pub static ref HEADER_ASIDE: Regex = Regex::new(
        r"\([^)]*\)"
    ).unwrap();

    pub static ref HEADER_NOISE: Regex = Regex::new(
        r"(?i)\b(group|company|consolidated|unaudited|audited|figures|for|the|period|quarter|months?|results|financial statements|ended|as at|rs|lkr|mn|million|billion|lakhs|000)\b"
    ).unwrap();

    pub static ref NON_ALNUM: Regex = Regex::new(
        r"[^a-zA-Z0-9\s]"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    pub static ref YEAR: Regex = Regex::new(
        r"(20\d{2}|19\d{2})"
    ).unwrap();

    pub static ref YEAR_WORD: Regex = Regex::new(
        r"\b(20\d{2}|19\d{2})\b"
    ).unwrap();

    pub static ref QUARTER_TOKEN: Regex = Regex::new(
        r"q\s*([1-4])"
    ).unwrap();

    pub static ref PERIOD_WORD: Regex = Regex::new(
        r"quarter|months?|period"
    ).unwrap();

    pub static ref DAY_BEFORE_MONTH: Regex = Regex::new(
        r"(\d{1,2})\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)"
    ).unwrap();

    pub static ref DAY_OF_MONTH: Regex = Regex::new(
        r"\b(3[01]|[12]\d|0?[1-9])\b"
    ).unwrap();

    // Frame acceptance
    pub static ref COMPANY_DESCRIPTOR: Regex = Regex::new(
        r"owner|holders|equity|shareholders?|attributable|parent"
    ).unwrap();

    // Line item labels
    pub static ref PLACEHOLDER_LABEL: Regex = Regex::new(
        r"^[-\s]+$"
    ).unwrap();

    // Classifier responses
    pub static ref JSON_FENCE: Regex = Regex::new(
        r"(?is)```json(.*?)```"
    ).unwrap();

    pub static ref ANY_FENCE: Regex = Regex::new(
        r"(?s)```(.*?)```"
    ).unwrap();
}

/// Month tokens checked by substring, in lookup order. Months are 1-based.
pub const MONTH_TOKENS: &[(&str, u32)] = &[
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

/// First month token contained in an already-lowercased string.
pub fn find_month(lower: &str) -> Option<u32> {
    MONTH_TOKENS
        .iter()
        .find(|(token, _)| lower.contains(token))
        .map(|(_, month)| *month)
}

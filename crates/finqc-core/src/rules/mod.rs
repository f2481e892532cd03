//! Rule-based cell, column and row heuristics.

pub mod amounts;
pub mod columns;
pub mod matcher;
pub mod patterns;

pub use amounts::{format_number, is_dash, parse_numeric, sanitize_opt, sanitize_value, NumberFormat};
pub use columns::{is_quarter_like, latest_column, parse_column_date, score_column, select_latest_column, LatestColumn};
pub use matcher::{normalize_label, MetricMatcher, RowMatch};

//! Core library for financial statement table normalization.
//!
//! This crate provides:
//! - Pipe-delimited statement table parsing and frame acceptance rules
//! - Cell sanitizing, accounting-style amount parsing and formatting
//! - Latest-period column selection from header dates
//! - SOP metric resolution against a canonical taxonomy, including derived metrics
//! - Line item preparation and classification merging
//! - An async extraction pipeline over pluggable text, table and classifier services

pub mod error;
pub mod extract;
pub mod line_items;
pub mod models;
pub mod rules;
pub mod sop;
pub mod table;

pub use error::{FinqcError, Result};
pub use extract::{
    DocumentTextExtractor, ExtractionBundle, ExtractionPipeline, HeadingTableExtractor,
    LineItemClassifier, NoopClassifier, ResponseClassifier, StatementTableExtractor,
    Utf8TextExtractor,
};
pub use line_items::{build_candidate_metrics, merge_classification, prepare_line_items};
pub use models::config::FinqcConfig;
pub use models::frame::{Frame, StatementFrames};
pub use models::line_item::{AiRecord, ClassificationSuggestion, LineItemRecord, PreparedLineItems};
pub use models::metric::{DerivedMetric, MetricDefinition};
pub use models::sop::{SopMetadata, SopResult, SopSummary};
pub use models::statement::StatementKind;
pub use sop::{SopExtractionEngine, SopTaxonomy};
pub use table::{build_frames_with_fallback, parse_table, StatementTable};

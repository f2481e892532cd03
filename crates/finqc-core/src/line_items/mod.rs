//! Line item normalization for classification and review.

mod classification;
mod normalizer;

pub use classification::{build_candidate_metrics, merge_classification, DEFAULT_CLASSIFICATION_METRICS};
pub use normalizer::prepare_line_items;

//! SOP (summary of performance) metric resolution.

pub mod definitions;
mod engine;

pub use engine::SopExtractionEngine;

use crate::models::metric::{DerivedMetric, MetricDefinition};

/// The metric vocabulary the engine resolves.
#[derive(Debug, Clone)]
pub struct SopTaxonomy {
    /// Metrics matched against statement rows, resolved in order.
    pub base: Vec<MetricDefinition>,

    /// Metrics computed from base results after every base metric is resolved.
    pub derived: Vec<DerivedMetric>,

    /// Order of the summary; every listed metric appears in the output.
    pub summary_order: Vec<String>,
}

impl Default for SopTaxonomy {
    fn default() -> Self {
        Self {
            base: definitions::base_definitions(),
            derived: definitions::derived_definitions(),
            summary_order: definitions::SUMMARY_ORDER.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl SopTaxonomy {
    /// Replace the base definitions.
    ///
    /// Base metrics missing from the summary order are appended to it.
    pub fn with_base(mut self, base: Vec<MetricDefinition>) -> Self {
        for definition in &base {
            if !self.summary_order.contains(&definition.metric) {
                self.summary_order.push(definition.metric.clone());
            }
        }
        self.base = base;
        self
    }
}

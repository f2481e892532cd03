//! Canonical metric definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sop::ResolvedMetrics;

/// A metric matched directly against statement rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Canonical metric name.
    pub metric: String,

    /// Statements to search, in priority order.
    pub statements: Vec<String>,

    /// Label phrases accepted as evidence for the metric.
    pub aliases: Vec<String>,

    /// Label phrases that disqualify a row.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

impl MetricDefinition {
    pub fn new(metric: impl Into<String>, statements: &[&str], aliases: &[&str]) -> Self {
        Self {
            metric: metric.into(),
            statements: statements.iter().map(|s| s.to_string()).collect(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            excludes: Vec::new(),
        }
    }

    /// Add exclusion phrases.
    pub fn with_excludes(mut self, excludes: &[&str]) -> Self {
        self.excludes = excludes.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Output of a derive step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    /// Computed value.
    pub value: Decimal,
    /// Statement label recorded for the derived result.
    pub statement: String,
    /// Column recorded for the derived result.
    pub column: String,
    /// Description of the computation.
    pub source_line: String,
}

/// Derive step over already-resolved base metrics.
pub type DeriveFn = fn(&ResolvedMetrics) -> Option<Derivation>;

/// A metric computed from base metric results.
#[derive(Debug, Clone)]
pub struct DerivedMetric {
    /// Canonical metric name.
    pub metric: String,
    /// Pure derive step.
    pub derive: DeriveFn,
}

impl DerivedMetric {
    pub fn new(metric: impl Into<String>, derive: DeriveFn) -> Self {
        Self {
            metric: metric.into(),
            derive,
        }
    }
}

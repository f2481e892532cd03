//! Two-phase SOP resolution over a set of statement frames.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::models::frame::{Frame, StatementFrames};
use crate::models::metric::MetricDefinition;
use crate::models::sop::{ResolvedMetrics, SopMetadata, SopResult, SopSummary};
use crate::rules::amounts::NumberFormat;
use crate::rules::columns::{latest_column, LatestColumn};
use crate::rules::matcher::MetricMatcher;

use super::SopTaxonomy;

/// Resolves the SOP summary for one extraction run.
///
/// Base metrics are matched first and frozen into a [`ResolvedMetrics`] set;
/// derived metrics then read only that set.
#[derive(Debug, Clone, Default)]
pub struct SopExtractionEngine {
    taxonomy: SopTaxonomy,
}

impl SopExtractionEngine {
    pub fn new(taxonomy: SopTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &SopTaxonomy {
        &self.taxonomy
    }

    /// Resolve every metric of the taxonomy against `frames`.
    pub fn extract(&self, frames: &StatementFrames) -> SopSummary {
        let mut columns = LatestColumnCache::default();
        let resolved = self.resolve_base(frames, &mut columns);
        let derived = self.resolve_derived(&resolved);

        let mut results = resolved.into_inner();
        results.extend(derived);

        let summary: Vec<SopResult> = self
            .taxonomy
            .summary_order
            .iter()
            .map(|metric| {
                results
                    .remove(metric)
                    .unwrap_or_else(|| SopResult::unresolved(metric.as_str()))
            })
            .collect();

        let resolved_count = summary.iter().filter(|r| r.is_resolved()).count();
        info!("Resolved {}/{} SOP metrics", resolved_count, summary.len());

        SopSummary {
            summary,
            metadata: columns.into_metadata(),
        }
    }

    fn resolve_base(&self, frames: &StatementFrames, columns: &mut LatestColumnCache) -> ResolvedMetrics {
        let results = self
            .taxonomy
            .base
            .iter()
            .map(|definition| {
                let result = resolve_metric(definition, frames, columns)
                    .unwrap_or_else(|| SopResult::unresolved(definition.metric.as_str()));
                (definition.metric.clone(), result)
            })
            .collect::<HashMap<_, _>>();

        ResolvedMetrics::new(results)
    }

    fn resolve_derived(&self, resolved: &ResolvedMetrics) -> HashMap<String, SopResult> {
        self.taxonomy
            .derived
            .iter()
            .map(|derived| {
                let result = match (derived.derive)(resolved) {
                    Some(derivation) => SopResult {
                        metric: derived.metric.clone(),
                        value: NumberFormat::ACCOUNTING.format(derivation.value),
                        numeric_value: Some(derivation.value),
                        statement: derivation.statement,
                        column: derivation.column,
                        source_line: derivation.source_line,
                    },
                    None => {
                        debug!("Cannot derive {}: inputs unresolved", derived.metric);
                        SopResult::unresolved(derived.metric.as_str())
                    }
                };
                (derived.metric.clone(), result)
            })
            .collect()
    }
}

/// First statement in priority order whose latest column yields a row match.
fn resolve_metric(
    definition: &MetricDefinition,
    frames: &StatementFrames,
    columns: &mut LatestColumnCache,
) -> Option<SopResult> {
    let matcher = MetricMatcher::new(definition.aliases.as_slice(), definition.excludes.as_slice());

    for statement in &definition.statements {
        let Some(frame) = frames.get(statement) else {
            continue;
        };
        let Some(column) = columns.get_or_select(statement, frame) else {
            continue;
        };
        let Some(found) = matcher.find_best_row(frame, column.index) else {
            continue;
        };

        let value = match found.numeric_value {
            Some(amount) => NumberFormat::FIXED_2.format(amount),
            None => found.value,
        };

        debug!(
            "{} <- \"{}\" [{} / {}]",
            definition.metric, found.label, statement, column.header
        );

        return Some(SopResult {
            metric: definition.metric.clone(),
            value,
            numeric_value: found.numeric_value,
            statement: statement.clone(),
            column: column.header.clone(),
            source_line: found.label,
        });
    }

    None
}

/// Latest column per statement, selected at most once per run.
#[derive(Debug, Default)]
struct LatestColumnCache {
    selected: HashMap<String, Option<LatestColumn>>,
}

impl LatestColumnCache {
    fn get_or_select(&mut self, statement: &str, frame: &Frame) -> Option<&LatestColumn> {
        self.selected
            .entry(statement.to_string())
            .or_insert_with(|| latest_column(frame))
            .as_ref()
    }

    fn into_metadata(self) -> SopMetadata {
        SopMetadata {
            latest_columns: self
                .selected
                .into_iter()
                .filter_map(|(statement, column)| column.map(|c| (statement, c.header)))
                .collect(),
        }
    }
}

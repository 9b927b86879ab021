use rand::Rng;
use tracing::warn;

use crate::config::{
    EXPERIMENTAL_SAMPLE_SIZE, LinkerType, Metric, Reagent, TableSpec,
};
use crate::input::TableSet;

/// One metric column per configuration. Columns may have differing lengths;
/// the melt step tolerates the raggedness.
#[derive(Debug, Clone)]
pub struct CombinedTable {
    pub metric: Metric,
    pub columns: Vec<(TableSpec, Vec<f64>)>,
}

impl CombinedTable {
    /// Extracts the metric column from each listed table. The column
    /// presence gate has already run, so a missing column here is a
    /// programming error, not an input condition.
    pub fn assemble(metric: Metric, specs: &[TableSpec], tables: &TableSet) -> Self {
        let mut columns = Vec::with_capacity(specs.len());
        for &spec in specs {
            let table = tables
                .get(spec)
                .unwrap_or_else(|| panic!("table '{}' not loaded", spec.label()));
            let values = table
                .column(metric.column_name())
                .unwrap_or_else(|| panic!("column '{}' not validated", metric.column_name()))
                .to_vec();
            columns.push((spec, values));
        }
        Self { metric, columns }
    }

    /// Wide-to-long reshape: one row per (configuration, value). Non-finite
    /// values are padding from ragged source tables and are dropped.
    pub fn melt(&self) -> LongForm {
        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for (spec, values) in &self.columns {
            for &value in values {
                if value.is_finite() {
                    rows.push(LongRow {
                        linker: spec.linker,
                        count: spec.count,
                        value,
                    });
                } else {
                    dropped += 1;
                }
            }
        }
        if dropped > 0 {
            warn!(
                "dropped {} non-finite value(s) while melting '{}'",
                dropped, self.metric
            );
        }
        LongForm {
            metric: self.metric,
            rows,
        }
    }
}

/// Long-form synthetic data: the type and count fields come from the
/// structured configuration, not from re-parsing a label string.
#[derive(Debug, Clone)]
pub struct LongForm {
    pub metric: Metric,
    pub rows: Vec<LongRow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongRow {
    pub linker: LinkerType,
    pub count: u32,
    pub value: f64,
}

impl LongForm {
    /// Distinct configuration labels, in first-seen order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for row in &self.rows {
            let label = TableSpec::new(row.linker, row.count).label();
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    pub fn values_for(&self, linker: LinkerType, count: u32) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|r| r.linker == linker && r.count == count)
            .map(|r| r.value)
            .collect()
    }
}

/// Experimental reference rows for the third panel.
#[derive(Debug, Clone)]
pub struct ExperimentalTable {
    pub metric: Metric,
    pub rows: Vec<ExperimentalRow>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExperimentalRow {
    pub reagent: Reagent,
    pub value: f64,
    pub sample_size: u32,
}

/// Placeholder value reported for the single DSSO measurement.
pub const DSSO_REFERENCE_VALUE: f64 = 11.11;

/// Number of placeholder TSTO draws, and their uniform range.
pub const TSTO_DRAWS: usize = 5;
pub const TSTO_RANGE: (f64, f64) = (0.7, 0.9);

impl ExperimentalTable {
    /// Synthesizes the placeholder reference: five uniform TSTO draws in
    /// [0.7, 0.9) and the single fixed DSSO value, all tagged with the
    /// constant sample-size field. The random source is injected so runs
    /// can be made reproducible with a fixed seed.
    pub fn synthesize<R: Rng>(metric: Metric, rng: &mut R) -> Self {
        let mut rows = Vec::with_capacity(TSTO_DRAWS + 1);
        for _ in 0..TSTO_DRAWS {
            rows.push(ExperimentalRow {
                reagent: Reagent::Tsto,
                value: rng.gen_range(TSTO_RANGE.0..TSTO_RANGE.1),
                sample_size: EXPERIMENTAL_SAMPLE_SIZE,
            });
        }
        rows.push(ExperimentalRow {
            reagent: Reagent::Dsso,
            value: DSSO_REFERENCE_VALUE,
            sample_size: EXPERIMENTAL_SAMPLE_SIZE,
        });
        Self { metric, rows }
    }

    pub fn values_for(&self, reagent: Reagent) -> Vec<f64> {
        self.rows
            .iter()
            .filter(|r| r.reagent == reagent)
            .map(|r| r.value)
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/frame.rs"]
mod tests;

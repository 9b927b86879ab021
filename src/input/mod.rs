use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

pub mod csv;

use crate::config::{Metric, TableSpec, all_tables};
use self::csv::{TransposedCsv, parse_transposed};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("parse error in {path} (line {line}): {msg}")]
    Parse {
        path: String,
        line: usize,
        msg: String,
    },
    #[error("required column '{column}' not found in table '{table}' ({path})")]
    MissingColumn {
        table: String,
        column: String,
        path: String,
    },
}

/// One loaded input table together with the configuration it belongs to.
#[derive(Debug, Clone)]
pub struct MetricTable {
    pub spec: TableSpec,
    pub path: PathBuf,
    table: TransposedCsv,
}

impl MetricTable {
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.table.column(name)
    }

    pub fn n_samples(&self) -> usize {
        self.table.samples.len()
    }
}

/// All nine input tables, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct TableSet {
    tables: Vec<MetricTable>,
}

impl TableSet {
    pub fn load(input_dir: &Path) -> Result<Self, InputError> {
        let mut tables = Vec::new();
        for spec in all_tables() {
            let path = input_dir.join(spec.file_name());
            if !path.is_file() {
                return Err(InputError::MissingInput(format!(
                    "expected table file {} for configuration '{}'",
                    path.display(),
                    spec.label()
                )));
            }
            let reader = BufReader::new(File::open(&path)?);
            let table = parse_transposed(reader, &path)?;
            info!(
                "loaded {} ({} samples, {} columns)",
                path.display(),
                table.samples.len(),
                table.columns.len()
            );
            tables.push(MetricTable { spec, path, table });
        }
        Ok(Self { tables })
    }

    pub fn get(&self, spec: TableSpec) -> Option<&MetricTable> {
        self.tables.iter().find(|t| t.spec == spec)
    }

    pub fn tables(&self) -> &[MetricTable] {
        &self.tables
    }

    /// All-or-nothing gate: every table must carry every required metric
    /// column before any plotting starts. The first violation names both
    /// the column and the offending table.
    pub fn validate_required_columns(&self) -> Result<(), InputError> {
        for metric in Metric::ALL {
            for table in &self.tables {
                if table.column(metric.column_name()).is_none() {
                    return Err(InputError::MissingColumn {
                        table: table.spec.label(),
                        column: metric.column_name().to_string(),
                        path: table.path.display().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;

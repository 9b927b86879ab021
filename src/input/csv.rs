use std::io::BufRead;
use std::path::Path;

use crate::input::InputError;

/// A CSV table read with its first column as row index, then transposed:
/// index entries become column names, header entries become row (sample)
/// identifiers.
#[derive(Debug, Clone)]
pub struct TransposedCsv {
    pub samples: Vec<String>,
    pub columns: Vec<String>,
    /// Column-major values, `values[col][sample]`.
    pub values: Vec<Vec<f64>>,
}

impl TransposedCsv {
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|idx| self.values[idx].as_slice())
    }
}

pub fn parse_transposed<R: BufRead>(reader: R, path: &Path) -> Result<TransposedCsv, InputError> {
    let parse_err = |line: usize, msg: String| InputError::Parse {
        path: path.display().to_string(),
        line,
        msg,
    };

    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(parse_err(1, "file is empty".to_string())),
    };

    // First header cell names the index column; the rest are sample ids.
    let mut fields = split_fields(&header);
    if fields.is_empty() {
        return Err(parse_err(1, "header is empty".to_string()));
    }
    fields.remove(0);
    let samples = fields;
    if samples.is_empty() {
        return Err(parse_err(1, "header has no sample columns".to_string()));
    }

    let mut columns = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    let mut line_no = 1usize;

    for line in lines {
        let line = line?;
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_fields(&line);
        let name = fields[0].clone();
        if name.is_empty() {
            return Err(parse_err(line_no, "row has empty index cell".to_string()));
        }
        if fields.len() - 1 != samples.len() {
            return Err(parse_err(
                line_no,
                format!(
                    "row '{}' has {} values, expected {}",
                    name,
                    fields.len() - 1,
                    samples.len()
                ),
            ));
        }
        let mut row_values = Vec::with_capacity(samples.len());
        for cell in &fields[1..] {
            row_values.push(parse_cell(cell).ok_or_else(|| {
                parse_err(
                    line_no,
                    format!("invalid numeric cell '{}' in row '{}'", cell, name),
                )
            })?);
        }
        columns.push(name);
        values.push(row_values);
    }

    if columns.is_empty() {
        return Err(parse_err(line_no, "file has no data rows".to_string()));
    }

    Ok(TransposedCsv {
        samples,
        columns,
        values,
    })
}

fn split_fields(line: &str) -> Vec<String> {
    line.trim_end_matches(['\r', '\n'])
        .split(',')
        .map(|s| s.trim().to_string())
        .collect()
}

// Empty cells and the usual NaN spellings are carried as NaN, matching the
// ragged-column padding the source tables can contain.
fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("na") {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/csv.rs"]
mod tests;

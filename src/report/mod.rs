use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

/// Machine-readable record of one run, written next to the figures.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub version: String,
    /// Seed actually used for the experimental draws and strip jitter.
    pub seed: u64,
    pub input_dir: String,
    pub figures: Vec<FigureRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FigureRecord {
    pub metric: String,
    pub path: String,
    pub main_rows: usize,
    pub isolated_rows: usize,
    pub experimental_rows: usize,
}

impl RunSummary {
    pub fn new(seed: u64, input_dir: &Path) -> Self {
        Self {
            tool: "xl-whiskerqc".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            seed,
            input_dir: input_dir.display().to_string(),
            figures: Vec::new(),
        }
    }

    pub fn write(&self, out_dir: &Path) -> std::io::Result<PathBuf> {
        let path = out_dir.join("run_summary.json");
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        info!("wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/tests.rs"]
mod tests;

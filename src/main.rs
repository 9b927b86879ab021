mod config;
mod frame;
mod input;
mod plot;
mod report;

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Metric, PlotStyle, isolated_group, main_group};
use crate::frame::{CombinedTable, ExperimentalTable};
use crate::input::TableSet;
use crate::plot::{FigureData, write_figure};
use crate::report::{FigureRecord, RunSummary};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = parse_args(&args)?;

    let seed = config
        .seed
        .unwrap_or_else(|| rand::rngs::OsRng.next_u64());
    info!("rng seed: {}", seed);

    let tables = TableSet::load(&config.input_dir).map_err(|e| e.to_string())?;
    // All-or-nothing: both metric columns must exist in every table before
    // any figure is produced.
    tables
        .validate_required_columns()
        .map_err(|e| e.to_string())?;

    let mut rng = StdRng::seed_from_u64(seed);
    let style = PlotStyle::default();
    let mut summary = RunSummary::new(seed, &config.input_dir);

    for metric in Metric::ALL {
        let record = build_figure(metric, &tables, &style, &mut rng, &config.out_dir)
            .map_err(|e| e.to_string())?;
        summary.figures.push(record);
    }

    summary.write(&config.out_dir).map_err(|e| e.to_string())?;
    Ok(())
}

fn build_figure(
    metric: Metric,
    tables: &TableSet,
    style: &PlotStyle,
    rng: &mut StdRng,
    out_dir: &Path,
) -> Result<FigureRecord, plot::PlotError> {
    let main = CombinedTable::assemble(metric, &main_group(), tables).melt();
    let isolated = CombinedTable::assemble(metric, &isolated_group(), tables).melt();
    let experimental = ExperimentalTable::synthesize(metric, rng);
    info!(
        "{}: {} main configurations ({} rows), {} isolated ({} rows)",
        metric,
        main.labels().len(),
        main.rows.len(),
        isolated.labels().len(),
        isolated.rows.len()
    );

    let data = FigureData {
        metric,
        main: &main,
        isolated: &isolated,
        experimental: &experimental,
    };
    let path = write_figure(&data, style, rng, out_dir)?;

    Ok(FigureRecord {
        metric: metric.to_string(),
        path: path.display().to_string(),
        main_rows: main.rows.len(),
        isolated_rows: isolated.rows.len(),
        experimental_rows: experimental.rows.len(),
    })
}

#[derive(Debug, Clone)]
struct RunConfig {
    input_dir: PathBuf,
    out_dir: PathBuf,
    seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_data"),
            out_dir: PathBuf::from("output_files"),
            seed: None,
        }
    }
}

// Every flag is optional; a bare invocation uses the conventional
// input_data/ and output_files/ directories.
fn parse_args(args: &[String]) -> Result<RunConfig, String> {
    let mut config = RunConfig::default();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                if i >= args.len() {
                    return Err("missing value for --input".to_string());
                }
                config.input_dir = PathBuf::from(&args[i]);
            }
            "--out" => {
                i += 1;
                if i >= args.len() {
                    return Err("missing value for --out".to_string());
                }
                config.out_dir = PathBuf::from(&args[i]);
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("missing value for --seed".to_string());
                }
                config.seed = Some(
                    args[i]
                        .parse::<u64>()
                        .map_err(|_| format!("invalid --seed value: {}", args[i]))?,
                );
            }
            other => {
                return Err(format!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

#[cfg(test)]
#[path = "../tests/src_inline/main.rs"]
mod tests;

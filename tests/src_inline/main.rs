use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::SeedableRng;

use super::*;
use crate::config::all_tables;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("xl_whiskerqc_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

const WELL_FORMED: &str = ",s1,s2,s3\n\
    Model Accuracy,0.81,0.77,0.85\n\
    Cluster Precision,1.5,1.2,1.3\n";

fn write_input_dir() -> PathBuf {
    let dir = make_temp_dir();
    for spec in all_tables() {
        write_file(&dir.join(spec.file_name()), WELL_FORMED);
    }
    dir
}

#[test]
fn test_parse_args_defaults() {
    let config = parse_args(&[]).unwrap();
    assert_eq!(config.input_dir, PathBuf::from("input_data"));
    assert_eq!(config.out_dir, PathBuf::from("output_files"));
    assert_eq!(config.seed, None);
}

#[test]
fn test_parse_args_overrides() {
    let args: Vec<String> = ["--input", "in", "--out", "out", "--seed", "7"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let config = parse_args(&args).unwrap();
    assert_eq!(config.input_dir, PathBuf::from("in"));
    assert_eq!(config.out_dir, PathBuf::from("out"));
    assert_eq!(config.seed, Some(7));
}

#[test]
fn test_parse_args_rejects_unknown_flag() {
    let args = vec!["--frobnicate".to_string()];
    assert!(parse_args(&args).is_err());
}

#[test]
fn test_build_both_figures_end_to_end() {
    let input_dir = write_input_dir();
    let out_dir = make_temp_dir().join("output_files");

    let tables = TableSet::load(&input_dir).unwrap();
    tables.validate_required_columns().unwrap();

    let style = PlotStyle::default();
    let mut rng = StdRng::seed_from_u64(11);
    for metric in Metric::ALL {
        let record = build_figure(metric, &tables, &style, &mut rng, &out_dir).unwrap();
        assert_eq!(record.experimental_rows, 6);
        assert_eq!(record.main_rows, 8 * 3);
        assert_eq!(record.isolated_rows, 3);
    }

    assert!(out_dir.join("whisker_plot_model_accuracy.pdf").is_file());
    assert!(out_dir.join("whisker_plot_cluster_precision.pdf").is_file());
}

#[test]
fn test_missing_column_aborts_before_any_figure() {
    let input_dir = write_input_dir();
    write_file(
        &input_dir.join("trifunctional_30.csv"),
        ",s1\nModel Accuracy,0.5\n",
    );
    let out_dir = make_temp_dir().join("output_files");

    let tables = TableSet::load(&input_dir).unwrap();
    let err = tables.validate_required_columns().unwrap_err();
    assert!(err.to_string().contains("Cluster Precision"));
    assert!(err.to_string().contains("Trifunctional 30 XLs"));

    // The gate fires before plotting, so nothing was written.
    assert!(!out_dir.exists());
}

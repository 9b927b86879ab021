use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::config::{LinkerType, all_tables};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("xl_whiskerqc_input_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_all_tables(dir: &Path, body: &str) {
    for spec in all_tables() {
        write_file(&dir.join(spec.file_name()), body);
    }
}

const WELL_FORMED: &str = ",s1,s2\n\
    Model Accuracy,0.8,0.9\n\
    Cluster Precision,1.5,1.2\n";

#[test]
fn test_load_all_nine_tables() {
    let dir = make_temp_dir();
    write_all_tables(&dir, WELL_FORMED);

    let set = TableSet::load(&dir).unwrap();
    assert_eq!(set.tables().len(), 9);
    let bi_120 = set
        .get(TableSpec::new(LinkerType::Bifunctional, 120))
        .unwrap();
    assert_eq!(bi_120.n_samples(), 2);
    assert_eq!(bi_120.column("Model Accuracy").unwrap(), &[0.8, 0.9]);
}

#[test]
fn test_load_fails_on_missing_file() {
    let dir = make_temp_dir();
    write_all_tables(&dir, WELL_FORMED);
    fs::remove_file(dir.join("trifunctional_40.csv")).unwrap();

    let err = TableSet::load(&dir).unwrap_err();
    match err {
        InputError::MissingInput(msg) => {
            assert!(msg.contains("trifunctional_40.csv"));
            assert!(msg.contains("Trifunctional 40 XLs"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validate_passes_when_all_columns_present() {
    let dir = make_temp_dir();
    write_all_tables(&dir, WELL_FORMED);
    let set = TableSet::load(&dir).unwrap();
    assert!(set.validate_required_columns().is_ok());
}

#[test]
fn test_validate_names_column_and_table() {
    let dir = make_temp_dir();
    write_all_tables(&dir, WELL_FORMED);
    // One table lacking Cluster Precision must fail the whole set.
    write_file(
        &dir.join("bifunctional_30.csv"),
        ",s1,s2\nModel Accuracy,0.8,0.9\n",
    );

    let set = TableSet::load(&dir).unwrap();
    let err = set.validate_required_columns().unwrap_err();
    match err {
        InputError::MissingColumn {
            table,
            column,
            path,
        } => {
            assert_eq!(table, "Bifunctional 30 XLs");
            assert_eq!(column, "Cluster Precision");
            assert!(path.ends_with("bifunctional_30.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

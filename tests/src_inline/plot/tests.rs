use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::config::TableSpec;
use crate::frame::{CombinedTable, ExperimentalTable};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("xl_whiskerqc_plot_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn fixture(metric: Metric, seed: u64) -> (LongForm, LongForm, ExperimentalTable) {
    let mut main_cols = Vec::new();
    for &count in &MAIN_COUNTS {
        for &linker in &LINKER_ORDER {
            let base = count as f64 / 100.0;
            main_cols.push((
                TableSpec::new(linker, count),
                vec![base, base + 0.05, base + 0.1, base - 0.02],
            ));
        }
    }
    let main = CombinedTable {
        metric,
        columns: main_cols,
    }
    .melt();
    let isolated = CombinedTable {
        metric,
        columns: vec![(isolated_group()[0], vec![0.9, 0.95, 0.97])],
    }
    .melt();
    let experimental =
        ExperimentalTable::synthesize(metric, &mut StdRng::seed_from_u64(seed));
    (main, isolated, experimental)
}

#[test]
fn test_render_svg_contains_panel_furniture() {
    let (main, isolated, experimental) = fixture(Metric::ModelAccuracy, 1);
    let data = FigureData {
        metric: Metric::ModelAccuracy,
        main: &main,
        isolated: &isolated,
        experimental: &experimental,
    };
    let svg = render_svg(&data, &PlotStyle::default(), &mut StdRng::seed_from_u64(2))
        .unwrap();

    assert!(svg.contains("Synthetic Data"));
    assert!(svg.contains("Experimental Data"));
    assert!(svg.contains("No. of XL sites"));
    assert!(svg.contains("Crosslinker"));
    assert!(svg.contains("Model Accuracy"));
    assert!(svg.contains("Bifunctional"));
    assert!(svg.contains("Trifunctional"));
}

#[test]
fn test_render_svg_is_seed_deterministic() {
    let (main, isolated, experimental) = fixture(Metric::ClusterPrecision, 5);
    let data = FigureData {
        metric: Metric::ClusterPrecision,
        main: &main,
        isolated: &isolated,
        experimental: &experimental,
    };
    let style = PlotStyle::default();
    let a = render_svg(&data, &style, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = render_svg(&data, &style, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_write_figure_emits_pdf_with_expected_name() {
    let out_dir = make_temp_dir().join("output_files");
    let (main, isolated, experimental) = fixture(Metric::ModelAccuracy, 3);
    let data = FigureData {
        metric: Metric::ModelAccuracy,
        main: &main,
        isolated: &isolated,
        experimental: &experimental,
    };

    let path = write_figure(
        &data,
        &PlotStyle::default(),
        &mut StdRng::seed_from_u64(4),
        &out_dir,
    )
    .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "whisker_plot_model_accuracy.pdf"
    );
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_empty_data_is_rejected() {
    let metric = Metric::ModelAccuracy;
    let empty = CombinedTable {
        metric,
        columns: vec![],
    }
    .melt();
    let experimental = ExperimentalTable {
        metric,
        rows: vec![],
    };
    let data = FigureData {
        metric,
        main: &empty,
        isolated: &empty,
        experimental: &experimental,
    };
    let err = render_svg(&data, &PlotStyle::default(), &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, PlotError::Empty(_)));
}

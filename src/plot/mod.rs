use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use rand::Rng;
use thiserror::Error;
use tracing::info;

mod panels;

use crate::config::{LinkerType, MAIN_COUNTS, Metric, PlotStyle, isolated_group};
use crate::frame::{ExperimentalTable, LongForm};
use self::panels::{backend_err, draw_box_strip};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render error: {0}")]
    Backend(String),
    #[error("no finite values to plot for '{0}'")]
    Empty(String),
    #[error("PDF conversion error: {0}")]
    Pdf(String),
}

/// Everything one figure needs; the experimental panel uses a higher strip
/// alpha than the synthetic panels.
pub struct FigureData<'a> {
    pub metric: Metric,
    pub main: &'a LongForm,
    pub isolated: &'a LongForm,
    pub experimental: &'a ExperimentalTable,
}

const SYNTHETIC_POINT_ALPHA: f64 = 0.5;
const EXPERIMENTAL_POINT_ALPHA: f64 = 0.7;

const LINKER_ORDER: [LinkerType; 2] = [LinkerType::Bifunctional, LinkerType::Trifunctional];
/// Horizontal dodge between the two linker boxes within one count group.
const DODGE: f32 = 0.19;

/// Renders the three-panel figure to an SVG document. All randomness
/// (strip jitter) comes from the injected rng.
pub fn render_svg<R: Rng>(
    data: &FigureData<'_>,
    style: &PlotStyle,
    rng: &mut R,
) -> Result<String, PlotError> {
    let y_range = shared_y_range(data)?;

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&WHITE).map_err(backend_err)?;

        // Three adjacent panels at the configured width ratios, y label
        // area only on the first so the panels sit tight together.
        let areas = root.split_by_breakpoints(style.panel_breakpoints(), [0u32; 0]);

        draw_main_panel(&areas[0], data, y_range.clone(), style, rng)?;
        draw_isolated_panel(&areas[1], data, y_range.clone(), style, rng)?;
        draw_experimental_panel(&areas[2], data, y_range, style, rng)?;

        root.present().map_err(backend_err)?;
    }
    Ok(svg)
}

/// Renders the figure and writes it as `whisker_plot_<metric>.pdf` under
/// `out_dir`, creating the directory if needed.
pub fn write_figure<R: Rng>(
    data: &FigureData<'_>,
    style: &PlotStyle,
    rng: &mut R,
    out_dir: &Path,
) -> Result<PathBuf, PlotError> {
    let svg = render_svg(data, style, rng)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(data.metric.file_name());
    let pdf = svg2pdf::convert_str(&svg, svg2pdf::Options::default())
        .map_err(|e| PlotError::Pdf(e.to_string()))?;
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(&pdf)?;
    writer.flush()?;

    info!("wrote {}", path.display());
    Ok(path)
}

fn draw_main_panel<DB: DrawingBackend, R: Rng>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    data: &FigureData<'_>,
    y_range: Range<f32>,
    style: &PlotStyle,
    rng: &mut R,
) -> Result<(), PlotError> {
    let mut chart = ChartBuilder::on(area)
        .caption("Synthetic Data", ("sans-serif", style.title_font()))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5f32..3.5f32, y_range)
        .map_err(backend_err)?;

    let x_fmt = |x: &f32| count_label(*x, &MAIN_COUNTS);
    chart
        .configure_mesh()
        .x_labels(4)
        .x_label_formatter(&x_fmt)
        .x_desc("No. of XL sites")
        .y_desc(format!("{} (Å)", data.metric))
        .label_style(("sans-serif", style.label_font()))
        .axis_desc_style(("sans-serif", style.axis_desc_font()))
        .draw()
        .map_err(backend_err)?;

    for (i, &count) in MAIN_COUNTS.iter().enumerate() {
        for (j, &linker) in LINKER_ORDER.iter().enumerate() {
            let x = i as f32 + (j as f32 - 0.5) * 2.0 * DODGE;
            let values = data.main.values_for(linker, count);
            // Label only the first count group: one legend entry per type.
            let label = (i == 0).then(|| linker.to_string());
            draw_box_strip(
                &mut chart,
                x,
                &values,
                linker.color(style),
                label,
                SYNTHETIC_POINT_ALPHA,
                style,
                rng,
            )?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", style.label_font()))
        .draw()
        .map_err(backend_err)?;

    Ok(())
}

fn draw_isolated_panel<DB: DrawingBackend, R: Rng>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    data: &FigureData<'_>,
    y_range: Range<f32>,
    style: &PlotStyle,
    rng: &mut R,
) -> Result<(), PlotError> {
    let spec = isolated_group()[0];

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(0)
        .build_cartesian_2d(-0.5f32..0.5f32, y_range)
        .map_err(backend_err)?;

    let counts = [spec.count];
    let x_fmt = |x: &f32| count_label(*x, &counts);
    chart
        .configure_mesh()
        .x_labels(1)
        .x_label_formatter(&x_fmt)
        .x_desc("No. of XL sites")
        .label_style(("sans-serif", style.label_font()))
        .axis_desc_style(("sans-serif", style.axis_desc_font()))
        .draw()
        .map_err(backend_err)?;

    let values = data.isolated.values_for(spec.linker, spec.count);
    draw_box_strip(
        &mut chart,
        0.0,
        &values,
        spec.linker.color(style),
        None,
        SYNTHETIC_POINT_ALPHA,
        style,
        rng,
    )?;

    Ok(())
}

fn draw_experimental_panel<DB: DrawingBackend, R: Rng>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    data: &FigureData<'_>,
    y_range: Range<f32>,
    style: &PlotStyle,
    rng: &mut R,
) -> Result<(), PlotError> {
    use crate::config::Reagent;

    let mut chart = ChartBuilder::on(area)
        .caption("Experimental Data", ("sans-serif", style.title_font()))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(0)
        .build_cartesian_2d(-0.5f32..1.5f32, y_range)
        .map_err(backend_err)?;

    let x_fmt = |x: &f32| {
        let i = x.round();
        if (x - i).abs() < 0.01 && (0.0..2.0).contains(&i) {
            Reagent::ALL[i as usize].to_string()
        } else {
            String::new()
        }
    };
    chart
        .configure_mesh()
        .x_labels(2)
        .x_label_formatter(&x_fmt)
        .x_desc("Crosslinker")
        .label_style(("sans-serif", style.label_font()))
        .axis_desc_style(("sans-serif", style.axis_desc_font()))
        .draw()
        .map_err(backend_err)?;

    for (i, &reagent) in Reagent::ALL.iter().enumerate() {
        let values = data.experimental.values_for(reagent);
        draw_box_strip(
            &mut chart,
            i as f32,
            &values,
            reagent.color(style),
            None,
            EXPERIMENTAL_POINT_ALPHA,
            style,
            rng,
        )?;
    }

    Ok(())
}

fn count_label(x: f32, counts: &[u32]) -> String {
    let i = x.round();
    if (x - i).abs() < 0.01 && i >= 0.0 && (i as usize) < counts.len() {
        counts[i as usize].to_string()
    } else {
        String::new()
    }
}

/// One y-range shared by all three panels, wide enough for every group's
/// whiskers, padded by 5% of the span.
fn shared_y_range(data: &FigureData<'_>) -> Result<Range<f32>, PlotError> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;

    let mut extend = |values: &[f64]| {
        if values.is_empty() {
            return;
        }
        let fences = Quartiles::new(values).values();
        for v in values {
            lo = lo.min(*v);
            hi = hi.max(*v);
        }
        lo = lo.min(fences[0] as f64);
        hi = hi.max(fences[4] as f64);
    };

    for &linker in &LINKER_ORDER {
        for &count in &MAIN_COUNTS {
            extend(&data.main.values_for(linker, count));
        }
    }
    let spec = isolated_group()[0];
    extend(&data.isolated.values_for(spec.linker, spec.count));
    for reagent in crate::config::Reagent::ALL {
        extend(&data.experimental.values_for(reagent));
    }

    if !lo.is_finite() || !hi.is_finite() {
        return Err(PlotError::Empty(data.metric.to_string()));
    }
    let pad = ((hi - lo) * 0.05).max(0.05);
    Ok((lo - pad) as f32..(hi + pad) as f32)
}

#[cfg(test)]
#[path = "../../tests/src_inline/plot/tests.rs"]
mod tests;

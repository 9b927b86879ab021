use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf32;
use plotters::prelude::*;
use rand::Rng;

use crate::config::PlotStyle;
use crate::plot::PlotError;

pub(super) type PanelCoord = Cartesian2d<RangedCoordf32, RangedCoordf32>;

pub(super) fn backend_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Backend(e.to_string())
}

/// Draws one box-and-whisker glyph with an overlaid jittered strip of the
/// raw points, centered at `x`. A `label` registers the series in the panel
/// legend; passing it only for the first box per group deduplicates the
/// legend entries.
pub(super) fn draw_box_strip<DB: DrawingBackend, R: Rng>(
    chart: &mut ChartContext<'_, DB, PanelCoord>,
    x: f32,
    values: &[f64],
    color: RGBColor,
    label: Option<String>,
    point_alpha: f64,
    style: &PlotStyle,
    rng: &mut R,
) -> Result<(), PlotError> {
    if values.is_empty() {
        return Ok(());
    }

    let quartiles = Quartiles::new(values);
    let boxplot = Boxplot::new_vertical(x, &quartiles)
        .width(28)
        .whisker_width(0.6)
        .style(color.stroke_width(2));

    let anno = chart
        .draw_series(std::iter::once(boxplot))
        .map_err(backend_err)?;
    if let Some(label) = label {
        anno.label(label).legend(move |(lx, ly)| {
            Rectangle::new([(lx, ly - 6), (lx + 14, ly + 6)], color.filled())
        });
    }

    // Jitter is drawn from the injected rng so a seeded run reproduces the
    // exact same figure.
    let jittered: Vec<(f32, f32)> = values
        .iter()
        .map(|&v| {
            let dx = rng.gen_range(-style.jitter..style.jitter) as f32;
            (x + dx, v as f32)
        })
        .collect();
    chart
        .draw_series(jittered.into_iter().map(|(px, py)| {
            Circle::new((px, py), style.point_size, BLACK.mix(point_alpha).filled())
        }))
        .map_err(backend_err)?;

    Ok(())
}

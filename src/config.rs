use std::fmt;

use plotters::style::RGBColor;

/// Crosslinker chemistry of a synthetic configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkerType {
    Bifunctional,
    Trifunctional,
}

impl LinkerType {
    pub fn file_token(&self) -> &'static str {
        match self {
            LinkerType::Bifunctional => "bifunctional",
            LinkerType::Trifunctional => "trifunctional",
        }
    }

    pub fn color(&self, style: &PlotStyle) -> RGBColor {
        match self {
            LinkerType::Bifunctional => style.palette.bifunctional,
            LinkerType::Trifunctional => style.palette.trifunctional,
        }
    }
}

impl fmt::Display for LinkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkerType::Bifunctional => write!(f, "Bifunctional"),
            LinkerType::Trifunctional => write!(f, "Trifunctional"),
        }
    }
}

/// Experimental reference reagents shown in the third panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reagent {
    Tsto,
    Dsso,
}

impl Reagent {
    pub const ALL: [Reagent; 2] = [Reagent::Tsto, Reagent::Dsso];

    pub fn color(&self, style: &PlotStyle) -> RGBColor {
        match self {
            Reagent::Tsto => style.palette.tsto,
            Reagent::Dsso => style.palette.dsso,
        }
    }
}

impl fmt::Display for Reagent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reagent::Tsto => write!(f, "TSTO"),
            Reagent::Dsso => write!(f, "DSSO"),
        }
    }
}

/// Sample-size tag carried by every experimental reference row.
pub const EXPERIMENTAL_SAMPLE_SIZE: u32 = 83;

/// The two metric columns every input table must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ModelAccuracy,
    ClusterPrecision,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::ModelAccuracy, Metric::ClusterPrecision];

    /// Exact column header expected in the input CSVs.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::ModelAccuracy => "Model Accuracy",
            Metric::ClusterPrecision => "Cluster Precision",
        }
    }

    /// Output file name: lowercased column name, spaces to underscores.
    pub fn file_name(&self) -> String {
        format!(
            "whisker_plot_{}.pdf",
            self.column_name().to_lowercase().replace(' ', "_")
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// One input table: a crosslinker chemistry at a fixed crosslink count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableSpec {
    pub linker: LinkerType,
    pub count: u32,
}

impl TableSpec {
    pub const fn new(linker: LinkerType, count: u32) -> Self {
        Self { linker, count }
    }

    /// Configuration label, e.g. "Bifunctional 20 XLs".
    pub fn label(&self) -> String {
        format!("{} {} XLs", self.linker, self.count)
    }

    /// CSV file name under the input directory, e.g. "bifunctional_20.csv".
    pub fn file_name(&self) -> String {
        format!("{}_{}.csv", self.linker.file_token(), self.count)
    }
}

/// Crosslink counts shared by both chemistries in the main comparison.
pub const MAIN_COUNTS: [u32; 4] = [20, 30, 40, 60];

/// The eight main-group configurations, interleaved by count as plotted.
pub fn main_group() -> Vec<TableSpec> {
    let mut specs = Vec::with_capacity(MAIN_COUNTS.len() * 2);
    for &count in &MAIN_COUNTS {
        specs.push(TableSpec::new(LinkerType::Bifunctional, count));
        specs.push(TableSpec::new(LinkerType::Trifunctional, count));
    }
    specs
}

/// The isolated high-count group plotted in its own narrow panel.
pub fn isolated_group() -> Vec<TableSpec> {
    vec![TableSpec::new(LinkerType::Bifunctional, 120)]
}

/// All nine input tables, main group first.
pub fn all_tables() -> Vec<TableSpec> {
    let mut specs = main_group();
    specs.extend(isolated_group());
    specs
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bifunctional: RGBColor,
    pub trifunctional: RGBColor,
    pub tsto: RGBColor,
    pub dsso: RGBColor,
}

/// Explicit style record; replaces mutable global plotting state.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub font_scale: f64,
    pub width: u32,
    pub height: u32,
    /// Relative widths of the main / isolated / experimental panels.
    pub panel_ratios: [f64; 3],
    /// Horizontal jitter amplitude for strip points, in axis units.
    pub jitter: f64,
    pub point_size: i32,
    pub point_alpha: f64,
    pub palette: Palette,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_scale: 1.8,
            width: 1800,
            height: 800,
            panel_ratios: [4.0, 0.5, 1.0],
            jitter: 0.08,
            point_size: 4,
            point_alpha: 0.5,
            palette: Palette {
                bifunctional: RGBColor(0x1b, 0x85, 0xb8),
                trifunctional: RGBColor(0xff, 0x69, 0x61),
                tsto: RGBColor(0xff, 0x7f, 0x0e),
                dsso: RGBColor(0x2c, 0xa0, 0x2c),
            },
        }
    }
}

impl PlotStyle {
    pub fn title_font(&self) -> u32 {
        (20.0 * self.font_scale).round() as u32
    }

    pub fn axis_desc_font(&self) -> u32 {
        (15.0 * self.font_scale).round() as u32
    }

    pub fn label_font(&self) -> u32 {
        (12.0 * self.font_scale).round() as u32
    }

    /// Pixel x-offsets where the figure splits into its three panels.
    pub fn panel_breakpoints(&self) -> [u32; 2] {
        let total: f64 = self.panel_ratios.iter().sum();
        let first = (self.width as f64 * self.panel_ratios[0] / total).round() as u32;
        let second = first
            + (self.width as f64 * self.panel_ratios[1] / total).round() as u32;
        [first, second]
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;

//! SVG rendering of population samples.
//!
//! The grid shows `rows * cols` consecutive samples of a population, one
//! chart per sample. Each chart plots the sample's labels sorted ascending
//! as touching bars and prints the sample mean in the middle, which makes
//! it easy to see how much small groups drift from the overall
//! distribution.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use stackrank_types::Label;

use crate::error::CliError;

/// Width and height of one chart cell, in pixels.
const CELL_PX: u32 = 36;

/// Space above the grid reserved for the title.
const TITLE_PX: u32 = 18;

const BAR_FILL: RGBColor = RGBColor(0xc6, 0xd9, 0xec);
const CELL_FILL: RGBColor = RGBColor(0xec, 0xf2, 0xf9);

/// Grid geometry for a sample chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleGrid {
    /// Individuals per chart.
    pub sample_size: usize,
    /// Rows of charts.
    pub rows: usize,
    /// Columns of charts.
    pub cols: usize,
    /// Label value drawn at full cell height.
    pub y_max: Label,
}

impl SampleGrid {
    /// Individuals needed to fill every chart in the grid.
    pub fn population_size(&self) -> Result<usize, CliError> {
        self.rows
            .checked_mul(self.cols)
            .and_then(|charts| charts.checked_mul(self.sample_size))
            .ok_or_else(|| CliError::InvalidArgument {
                message: "plot grid is too large".to_owned(),
            })
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.sample_size == 0 || self.rows == 0 || self.cols == 0 {
            return Err(CliError::InvalidArgument {
                message: "sample size, rows, and cols must all be positive".to_owned(),
            });
        }
        if self.y_max == 0 {
            return Err(CliError::InvalidArgument {
                message: "chart height must be at least one label".to_owned(),
            });
        }
        Ok(())
    }
}

/// Mean of a sample, rounded to one decimal place for display.
pub fn sample_mean(sample: &[Label]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    // Sample sizes and labels are tiny compared to f64's exact range.
    #[allow(clippy::cast_precision_loss)]
    let mean = sample.iter().sum::<usize>() as f64 / sample.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn plot_error(err: impl std::fmt::Display) -> CliError {
    CliError::Plot {
        message: err.to_string(),
    }
}

/// Pixel size of the whole image for `grid`.
fn image_size(grid: &SampleGrid) -> Result<(u32, u32), CliError> {
    let cells = |count: usize| {
        u32::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(CELL_PX))
    };
    cells(grid.cols)
        .zip(cells(grid.rows).and_then(|height| height.checked_add(TITLE_PX)))
        .ok_or_else(|| CliError::InvalidArgument {
            message: "plot grid is too large".to_owned(),
        })
}

/// Render the grid of sorted sample charts as an SVG document.
///
/// Charts are filled row by row from consecutive `sample_size` slices of
/// `population`. Cells without a full sample draw whatever individuals
/// remain, or stay empty.
pub fn render_sample_grid(population: &[Label], grid: &SampleGrid) -> Result<String, CliError> {
    grid.validate()?;
    let size = image_size(grid)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        let title = format!("Sample Size = {}", grid.sample_size);
        let body = root
            .titled(&title, ("sans-serif", 12))
            .map_err(plot_error)?;

        let mean_style = TextStyle::from(("sans-serif", 9.0).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        let mut chunks = population.chunks(grid.sample_size);

        for cell in body.split_evenly((grid.rows, grid.cols)) {
            cell.fill(&CELL_FILL).map_err(plot_error)?;
            let Some(chunk) = chunks.next() else {
                continue;
            };
            let mut sample = chunk.to_vec();
            sample.sort_unstable();

            let mut chart = ChartBuilder::on(&cell)
                .build_cartesian_2d(0..grid.sample_size, 0..grid.y_max)
                .map_err(plot_error)?;
            chart
                .draw_series(sample.iter().enumerate().map(|(i, &label)| {
                    Rectangle::new(
                        [(i, 0), (i.saturating_add(1), label.min(grid.y_max))],
                        BAR_FILL.filled(),
                    )
                }))
                .map_err(plot_error)?;

            let (width, height) = cell.dim_in_pixel();
            let center = (
                i32::try_from(width / 2).unwrap_or_default(),
                i32::try_from(height / 2).unwrap_or_default(),
            );
            cell.draw_text(
                &format!("{:.1}", sample_mean(&sample)),
                &mean_style,
                center,
            )
            .map_err(plot_error)?;
        }

        root.present().map_err(plot_error)?;
    }
    Ok(svg)
}

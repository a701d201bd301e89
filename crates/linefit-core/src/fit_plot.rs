use crate::dataset::Dataset;
use crate::stats::LinReg;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;

pub const PLOT_HEIGHT: u32 = 256;
pub const PLOT_WIDTH: u32 = PLOT_HEIGHT;

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("invalid x range [{0}, {1}]")]
    InvalidRange(f64, f64),
    #[error("invalid canvas size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("failed to draw plot: {0}")]
    Draw(String),
}

fn draw_err<E: Display>(e: E) -> PlotError {
    PlotError::Draw(e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub width: u32,
    pub height: u32,
    /// Line is drawn from x_min to x_max regardless of where the data is.
    pub x_min: f64,
    pub x_max: f64,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self { width: PLOT_WIDTH, height: PLOT_HEIGHT, x_min: 1., x_max: 30. }
    }
}

impl PlotSettings {
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.width == 0 || self.height == 0 {
            return Err(PlotError::InvalidSize(self.width, self.height));
        }
        if !self.x_min.is_finite() || !self.x_max.is_finite() {
            return Err(PlotError::InvalidRange(self.x_min, self.x_max));
        }
        Ok(())
    }
}

/// A snapshot of everything one frame needs.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub dataset: &'a Dataset,
    pub model: LinReg,
    pub x_min: f64,
    pub x_max: f64,
}

impl<'a> RenderRequest<'a> {
    pub fn new(dataset: &'a Dataset, model: LinReg, settings: &PlotSettings) -> Self {
        Self { dataset, model, x_min: settings.x_min, x_max: settings.x_max }
    }

    pub fn line_endpoints(&self) -> [(f64, f64); 2] {
        line_endpoints(self.model, self.x_min, self.x_max)
    }
}

pub fn line_endpoints(model: LinReg, x_min: f64, x_max: f64) -> [(f64, f64); 2] {
    [(x_min, model.calculate(x_min)), (x_max, model.calculate(x_max))]
}

/// Draws the frame to `path`. The file is written and closed before this
/// returns; the image format follows the extension.
pub fn draw_fit_plot<P: AsRef<Path>>(
    request: &RenderRequest,
    path: P,
    settings: &PlotSettings,
) -> Result<(), PlotError> {
    settings.validate()?;
    let root_area =
        BitMapBackend::new(path.as_ref(), (settings.width, settings.height)).into_drawing_area();
    draw_on(&root_area, request)?;
    root_area.present().map_err(draw_err)?;
    Ok(())
}

/// Same frame as [`draw_fit_plot`] as a packed RGB buffer.
pub fn render_to_buffer(
    request: &RenderRequest,
    settings: &PlotSettings,
) -> Result<Vec<u8>, PlotError> {
    settings.validate()?;
    let mut buf = vec![0u8; settings.width as usize * settings.height as usize * 3];
    {
        let root_area = BitMapBackend::with_buffer(&mut buf, (settings.width, settings.height))
            .into_drawing_area();
        draw_on(&root_area, request)?;
        root_area.present().map_err(draw_err)?;
    }
    Ok(buf)
}

fn draw_on<DB: DrawingBackend>(
    root_area: &DrawingArea<DB, Shift>,
    request: &RenderRequest,
) -> Result<(), PlotError> {
    root_area.fill(&WHITE).map_err(draw_err)?;

    let endpoints = request.line_endpoints();
    let line_is_finite = endpoints.iter().all(|(x, y)| x.is_finite() && y.is_finite());

    let (xmin, xmax) = padded(
        request.dataset.x_bounds().into_iter().flat_map(|(a, b)| [a, b]).chain([
            request.x_min,
            request.x_max,
        ]),
    );
    let line_ys = if line_is_finite { vec![endpoints[0].1, endpoints[1].1] } else { vec![] };
    let (ymin, ymax) = padded(
        request.dataset.y_bounds().into_iter().flat_map(|(a, b)| [a, b]).chain(line_ys),
    );

    let mut ctx = ChartBuilder::on(root_area)
        .margin(5)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)
        .map_err(draw_err)?;

    ctx.draw_series(request.dataset.iter().map(|obs| Cross::new((obs.x, obs.y), 3, RED)))
        .map_err(draw_err)?;
    if line_is_finite {
        ctx.draw_series(std::iter::once(PathElement::new(
            endpoints.to_vec(),
            BLUE.stroke_width(2),
        )))
        .map_err(draw_err)?;
    }
    Ok(())
}

// 5% buffer around the values, a flat range is opened up to +-1
fn padded(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return (0., 1.);
    }
    let range = hi - lo;
    if range == 0.0 || !range.is_finite() {
        return (lo - 1., hi + 1.);
    }
    (lo - range * 0.05, hi + range * 0.05)
}

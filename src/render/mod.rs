// ABOUTME: Chart rendering seam for Sakila Charts
// ABOUTME: Renderer trait, its errors, and construction of the configured renderer

pub mod text;
pub mod vega_lite;

use std::path::Path;
use thiserror::Error;

use crate::config::RendererKind;
use crate::models::{ChartKind, RenderOptions, SeriesBundle};

pub use text::TextRenderer;
pub use vega_lite::VegaLiteRenderer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Report '{0}' has no value columns to chart")]
    NoSeries(String),
    #[error("Report '{0}' has no numeric series for a {1} chart")]
    NonNumeric(String, ChartKind),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Draws one report's series as the requested kind of chart
pub trait Renderer {
    fn render(
        &mut self,
        bundle: &SeriesBundle,
        kind: ChartKind,
        options: &RenderOptions,
    ) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(
        &mut self,
        bundle: &SeriesBundle,
        kind: ChartKind,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        (**self).render(bundle, kind, options)
    }
}

/// Index of the first series whose values are all numeric
pub(crate) fn first_numeric_series(bundle: &SeriesBundle) -> Option<(usize, Vec<f64>)> {
    (0..bundle.series_count()).find_map(|i| bundle.numeric_series(i).map(|values| (i, values)))
}

/// Build the renderer selected in preferences or on the command line
pub fn build(kind: RendererKind, output_dir: &Path) -> Box<dyn Renderer> {
    match kind {
        RendererKind::Text => Box::new(TextRenderer::new(std::io::stdout())),
        RendererKind::VegaLite => Box::new(VegaLiteRenderer::new(output_dir)),
    }
}

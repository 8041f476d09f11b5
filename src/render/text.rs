// ABOUTME: Terminal chart renderer
// ABOUTME: Draws bar, line, histogram and pie charts as text on any writer

use std::io::Write;

use super::{first_numeric_series, RenderError, Renderer};
use crate::models::{Cell, ChartKind, RenderOptions, SeriesBundle};

const DEFAULT_WIDTH: usize = 50;
const MAX_LABEL_WIDTH: usize = 24;
const HISTOGRAM_BINS: usize = 10;

pub struct TextRenderer<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            width: DEFAULT_WIDTH,
        }
    }

    /// Columns available for the longest bar
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(&mut self, options: &RenderOptions) -> std::io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", options.title)?;
        writeln!(self.out, "{}", "=".repeat(options.title.chars().count()))?;
        writeln!(self.out, "x: {}  y: {}", options.x_label, options.y_label)?;
        Ok(())
    }

    fn scaled(&self, value: f64, top: f64) -> usize {
        if top <= 0.0 || value <= 0.0 {
            return 0;
        }
        ((value / top) * self.width as f64).round().min(self.width as f64) as usize
    }

    fn series(
        &mut self,
        bundle: &SeriesBundle,
        kind: ChartKind,
        options: &RenderOptions,
    ) -> std::io::Result<()> {
        let labels: Vec<String> = bundle.categories.iter().map(label).collect();
        let pad = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        for index in 0..bundle.series_count() {
            if bundle.series_count() > 1 {
                writeln!(self.out, "-- {}", series_name(options, index))?;
            }
            let Some(values) = bundle.numeric_series(index) else {
                for (label, cell) in labels.iter().zip(&bundle.values[index]) {
                    writeln!(self.out, "{:<pad$} | {}", label, cell, pad = pad)?;
                }
                continue;
            };

            let top = options
                .y_bounds
                .map(|(_, hi)| hi)
                .unwrap_or_else(|| values.iter().cloned().fold(0.0, f64::max));
            for (label, value) in labels.iter().zip(&values) {
                let length = self.scaled(*value, top);
                let drawn = match kind {
                    ChartKind::Line if length > 0 => format!("{}*", "·".repeat(length - 1)),
                    ChartKind::Line => "*".to_string(),
                    _ => "#".repeat(length),
                };
                writeln!(self.out, "{:<pad$} | {} {}", label, drawn, value, pad = pad)?;
            }
        }
        Ok(())
    }

    fn histogram(&mut self, values: &[f64]) -> std::io::Result<()> {
        let bins = histogram_bins(values, HISTOGRAM_BINS);
        let top = bins.iter().map(|b| b.2).max().unwrap_or(0) as f64;
        for (lo, hi, count) in bins {
            let bar = "#".repeat(self.scaled(count as f64, top));
            writeln!(self.out, "{:>10.2} - {:<10.2} | {} {}", lo, hi, bar, count)?;
        }
        Ok(())
    }

    fn pie(&mut self, bundle: &SeriesBundle, values: &[f64]) -> std::io::Result<()> {
        let labels: Vec<String> = bundle.categories.iter().map(label).collect();
        let pad = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
        for (label, value) in labels.iter().zip(values) {
            let share = if total > 0.0 { value.max(0.0) / total } else { 0.0 };
            let bar = "#".repeat(self.scaled(share, 1.0));
            writeln!(
                self.out,
                "{:<pad$} {:>6.1}% {}",
                label,
                share * 100.0,
                bar,
                pad = pad
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(
        &mut self,
        bundle: &SeriesBundle,
        kind: ChartKind,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        if bundle.series_count() == 0 {
            return Err(RenderError::NoSeries(options.title.clone()));
        }

        match kind {
            ChartKind::Bar | ChartKind::Line => {
                self.header(options)?;
                self.series(bundle, kind, options)?;
            }
            ChartKind::Histogram | ChartKind::Pie => {
                let (_, values) = first_numeric_series(bundle)
                    .ok_or_else(|| RenderError::NonNumeric(options.title.clone(), kind))?;
                self.header(options)?;
                if kind == ChartKind::Histogram {
                    self.histogram(&values)?;
                } else {
                    self.pie(bundle, &values)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

fn label(cell: &Cell) -> String {
    let text = cell.to_string();
    if text.chars().count() > MAX_LABEL_WIDTH {
        let cut: String = text.chars().take(MAX_LABEL_WIDTH - 1).collect();
        format!("{}~", cut)
    } else {
        text
    }
}

fn series_name(options: &RenderOptions, index: usize) -> String {
    options
        .series_names
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Series {}", index + 1))
}

/// Split `values` into equal-width bins spanning min..max: (low, high, count)
fn histogram_bins(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![(min, max, values.len())];
    }

    let step = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let slot = (((v - min) / step).floor() as usize).min(bins - 1);
        counts[slot] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = min + step * i as f64;
            (lo, lo + step, count)
        })
        .collect()
}

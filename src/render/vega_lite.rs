// ABOUTME: Vega-Lite chart renderer
// ABOUTME: Writes one Vega-Lite JSON spec per report into the output directory

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

use super::{first_numeric_series, RenderError, Renderer};
use crate::models::{ChartKind, RenderOptions, SeriesBundle};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const COLOR_SCHEME: &str = "viridis";

pub struct VegaLiteRenderer {
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl VegaLiteRenderer {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            written: Vec::new(),
        }
    }

    /// Files written so far, in render order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Renderer for VegaLiteRenderer {
    fn render(
        &mut self,
        bundle: &SeriesBundle,
        kind: ChartKind,
        options: &RenderOptions,
    ) -> Result<(), RenderError> {
        let spec = chart_spec(bundle, kind, options)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("{}.vl.json", slug(&options.title)));
        fs::write(&path, serde_json::to_string_pretty(&spec)?)?;

        log::info!("Wrote {} chart for '{}' to {}", kind, options.title, path.display());
        self.written.push(path);
        Ok(())
    }
}

/// File-name friendly form of a report title
pub fn slug(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "report".to_string()
    } else {
        trimmed.to_string()
    }
}

fn series_name(options: &RenderOptions, index: usize) -> String {
    options
        .series_names
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Series {}", index + 1))
}

/// Long-format records: one per (series, category) pair
fn records(bundle: &SeriesBundle, options: &RenderOptions, only: Option<usize>) -> Vec<Value> {
    let mut values = Vec::new();
    for (index, series) in bundle.values.iter().enumerate() {
        if only.is_some_and(|o| o != index) {
            continue;
        }
        let name = series_name(options, index);
        for (category, cell) in bundle.categories.iter().zip(series) {
            values.push(json!({
                "category": category.to_string(),
                "series": name,
                "value": cell,
            }));
        }
    }
    values
}

fn y_scale(options: &RenderOptions) -> Value {
    match options.y_bounds {
        Some((lo, hi)) => json!({ "domain": [lo, hi] }),
        None => json!({ "zero": true }),
    }
}

/// Build the Vega-Lite document for one report
pub fn chart_spec(
    bundle: &SeriesBundle,
    kind: ChartKind,
    options: &RenderOptions,
) -> Result<Value, RenderError> {
    if bundle.series_count() == 0 {
        return Err(RenderError::NoSeries(options.title.clone()));
    }
    let grouped = bundle.series_count() > 1;

    let x_axis = json!({
        "field": "category",
        "type": "nominal",
        "title": options.x_label,
        "sort": null,
        "axis": { "labelAngle": -45 },
    });

    let (data, mark, encoding) = match kind {
        ChartKind::Bar => {
            let color = if grouped {
                json!({ "field": "series", "type": "nominal", "title": null, "scale": { "scheme": COLOR_SCHEME } })
            } else {
                json!({ "field": "category", "type": "nominal", "legend": null, "scale": { "scheme": COLOR_SCHEME } })
            };
            let mut encoding = json!({
                "x": x_axis,
                "y": { "field": "value", "type": "quantitative", "title": options.y_label, "scale": y_scale(options) },
                "color": color,
            });
            if grouped {
                encoding["xOffset"] = json!({ "field": "series" });
            }
            (records(bundle, options, None), json!({ "type": "bar" }), encoding)
        }
        ChartKind::Line => {
            let mut encoding = json!({
                "x": x_axis,
                "y": { "field": "value", "type": "quantitative", "title": options.y_label, "scale": y_scale(options) },
            });
            if grouped {
                encoding["color"] = json!({ "field": "series", "type": "nominal", "title": null, "scale": { "scheme": COLOR_SCHEME } });
            }
            (
                records(bundle, options, None),
                json!({ "type": "line", "point": true }),
                encoding,
            )
        }
        ChartKind::Histogram => {
            let (index, _) = first_numeric_series(bundle)
                .ok_or_else(|| RenderError::NonNumeric(options.title.clone(), kind))?;
            let encoding = json!({
                "x": { "field": "value", "type": "quantitative", "bin": { "maxbins": 10 }, "title": options.x_label },
                "y": { "aggregate": "count", "type": "quantitative", "title": options.y_label },
                "color": { "value": "#31688e" },
            });
            (records(bundle, options, Some(index)), json!({ "type": "bar" }), encoding)
        }
        ChartKind::Pie => {
            let (index, _) = first_numeric_series(bundle)
                .ok_or_else(|| RenderError::NonNumeric(options.title.clone(), kind))?;
            let encoding = json!({
                "theta": { "field": "value", "type": "quantitative", "title": options.y_label },
                "color": { "field": "category", "type": "nominal", "title": options.x_label, "sort": null, "scale": { "scheme": COLOR_SCHEME } },
            });
            (records(bundle, options, Some(index)), json!({ "type": "arc" }), encoding)
        }
    };

    let mut spec = json!({
        "$schema": SCHEMA,
        "title": options.title,
        "description": format!(
            "{} chart generated by sakila-charts at {}",
            kind,
            chrono::Utc::now().to_rfc3339()
        ),
        "data": { "values": data },
        "mark": mark,
        "encoding": encoding,
    });
    if let Some((width, height)) = options.figure_size {
        spec["width"] = json!(width);
        spec["height"] = json!(height);
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use crate::pivot::pivot;

    fn options(series: &[&str]) -> RenderOptions {
        RenderOptions {
            title: "Rentals by Category".to_string(),
            x_label: "Category".to_string(),
            y_label: "Rentals / Revenue".to_string(),
            y_bounds: Some((0.0, 12.0)),
            series_names: series.iter().map(|s| s.to_string()).collect(),
            figure_size: Some((1000, 600)),
        }
    }

    fn bundle() -> SeriesBundle {
        pivot(vec![
            vec![Cell::from("Action"), Cell::Int(4), Cell::Float(7.5)],
            vec![Cell::from("Comedy"), Cell::Int(2), Cell::Float(3.0)],
        ])
        .unwrap()
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Average Rental Duration"), "average-rental-duration");
        assert_eq!(slug("  Num rentals / customer!"), "num-rentals-customer");
        assert_eq!(slug("???"), "report");
    }

    #[test]
    fn test_grouped_bar_spec() {
        let spec = chart_spec(&bundle(), ChartKind::Bar, &options(&["num_rentals", "revenue"]))
            .unwrap();

        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["width"], 1000);
        assert_eq!(spec["encoding"]["y"]["scale"]["domain"], json!([0.0, 12.0]));
        assert_eq!(spec["encoding"]["x"]["axis"]["labelAngle"], -45);
        assert_eq!(spec["encoding"]["xOffset"]["field"], "series");

        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(
            values[0],
            json!({ "category": "Action", "series": "num_rentals", "value": 4 })
        );
        assert_eq!(values[3]["series"], "revenue");
    }

    #[test]
    fn test_pie_uses_first_numeric_series() {
        let bundle = pivot(vec![
            vec![Cell::from("G"), Cell::from("x"), Cell::Int(3)],
            vec![Cell::from("PG"), Cell::from("y"), Cell::Int(5)],
        ])
        .unwrap();
        let spec = chart_spec(&bundle, ChartKind::Pie, &options(&["label", "num_films"])).unwrap();

        assert_eq!(spec["mark"]["type"], "arc");
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v["series"] == "num_films"));
    }

    #[test]
    fn test_histogram_bins_first_numeric_series() {
        let bundle = pivot(vec![
            vec![Cell::Int(1), Cell::Int(32)],
            vec![Cell::Int(2), Cell::Int(27)],
            vec![Cell::Int(3), Cell::Int(32)],
        ])
        .unwrap();
        let spec = chart_spec(&bundle, ChartKind::Histogram, &options(&["num_rentals"])).unwrap();

        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["encoding"]["x"]["field"], "value");
        assert_eq!(spec["encoding"]["x"]["bin"]["maxbins"], 10);
        assert_eq!(spec["encoding"]["y"]["aggregate"], "count");
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[1]["value"], 27);
    }

    #[test]
    fn test_render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = VegaLiteRenderer::new(&dir.path().join("charts"));
        renderer
            .render(&bundle(), ChartKind::Line, &options(&["num_rentals", "revenue"]))
            .unwrap();

        let path = dir.path().join("charts").join("rentals-by-category.vl.json");
        assert_eq!(renderer.written(), &[path.clone()]);
        let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["mark"]["type"], "line");
        assert_eq!(written["title"], "Rentals by Category");
    }
}

// ABOUTME: Report dispatcher for Sakila Charts
// ABOUTME: Drives lookup, binding, execution, pivoting and rendering for one report or all of them

use thiserror::Error;

use crate::binder::{bind, BindError};
use crate::catalog::{Catalog, CatalogError};
use crate::db::{ExecutionError, QueryRunner};
use crate::models::{Parameters, QueryDefinition, RenderOptions, SeriesBundle};
use crate::pivot::{pivot, PivotError};
use crate::render::{RenderError, Renderer};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unknown report: {0}")]
    UnknownReport(String),
    #[error(transparent)]
    Catalog(CatalogError),
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error("Query execution failed: {0}")]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Pivot(#[from] PivotError),
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedReport>,
}

#[derive(Debug)]
pub struct FailedReport {
    pub name: String,
    pub error: String,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct ReportDispatcher<'a, R, V> {
    catalog: &'a Catalog,
    runner: R,
    renderer: V,
    figure_size: Option<(u32, u32)>,
}

impl<'a, R: QueryRunner, V: Renderer> ReportDispatcher<'a, R, V> {
    pub fn new(catalog: &'a Catalog, runner: R, renderer: V) -> Self {
        Self {
            catalog,
            runner,
            renderer,
            figure_size: None,
        }
    }

    pub fn with_figure_size(mut self, figure_size: (u32, u32)) -> Self {
        self.figure_size = Some(figure_size);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn into_parts(self) -> (R, V) {
        (self.runner, self.renderer)
    }

    /// Run one report by name and hand its chart to the renderer
    pub fn run(&mut self, name: &str, supplied: &Parameters) -> Result<(), ReportError> {
        let catalog = self.catalog;
        let query = catalog.lookup_by_name(name).map_err(|err| match err {
            CatalogError::NotFound(name) => ReportError::UnknownReport(name),
            other => ReportError::Catalog(other),
        })?;
        log::info!("Running report '{}'", query.name);

        let sql = bind(
            &query.template,
            query.requires_parameters,
            supplied,
            &query.default_parameters,
        )?;
        log::debug!("Bound query for '{}': {}", query.name, sql.trim());

        let result = self.runner.execute(&sql)?;
        if !result.columns.is_empty() && result.columns.len() != query.expected_columns {
            log::warn!(
                "Report '{}' returned {} columns, expected {}",
                query.name,
                result.columns.len(),
                query.expected_columns
            );
        }

        let columns = result.columns;
        let bundle = pivot(result.rows)?;
        if !bundle.skipped.is_empty() {
            let names: Vec<String> = bundle
                .skipped
                .iter()
                .map(|i| series_label(&columns, *i))
                .collect();
            log::warn!(
                "Report '{}': non-numeric series left out of the y-axis bound: {}",
                query.name,
                names.join(", ")
            );
        }

        let options = self.render_options(query, &columns, &bundle);
        self.renderer.render(&bundle, query.chart_kind, &options)?;
        log::info!(
            "Rendered '{}' as a {} chart ({} rows, {} series)",
            query.name,
            query.chart_kind,
            bundle.len(),
            bundle.series_count()
        );
        Ok(())
    }

    /// Run every report in catalog order with no supplied parameters.
    ///
    /// A failing report is logged and recorded; the rest still run.
    pub fn run_all(&mut self) -> BatchSummary {
        let catalog = self.catalog;
        let empty = Parameters::new();
        let mut summary = BatchSummary::default();

        for name in catalog.list_names() {
            match self.run(name, &empty) {
                Ok(()) => summary.succeeded.push(name.to_string()),
                Err(e) => {
                    log::error!("Report '{}' failed: {}", name, e);
                    summary.failed.push(FailedReport {
                        name: name.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Batch finished: {} succeeded, {} failed",
            summary.succeeded.len(),
            summary.failed.len()
        );
        summary
    }

    fn render_options(
        &self,
        query: &QueryDefinition,
        columns: &[String],
        bundle: &SeriesBundle,
    ) -> RenderOptions {
        RenderOptions {
            title: query.name.clone(),
            x_label: query.x_label.clone(),
            y_label: query.y_label.clone(),
            y_bounds: bundle.y_bound.map(|hi| (0.0, hi)),
            series_names: (0..bundle.series_count())
                .map(|i| series_label(columns, i))
                .collect(),
            figure_size: self.figure_size,
        }
    }
}

/// Column name of value series `index` (column `index + 1` of the result)
fn series_label(columns: &[String], index: usize) -> String {
    columns
        .get(index + 1)
        .cloned()
        .unwrap_or_else(|| format!("Series {}", index + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, ChartKind, ResultSet};
    use std::collections::HashMap;

    /// Runner that answers from a table of canned results keyed by query text
    #[derive(Default)]
    struct FakeRunner {
        results: HashMap<String, ResultSet>,
        failing: Vec<String>,
        executed: Vec<String>,
    }

    impl FakeRunner {
        fn answer(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<Cell>>) -> Self {
            self.results.insert(
                sql.to_string(),
                ResultSet::new(columns.iter().map(|c| c.to_string()).collect(), rows),
            );
            self
        }

        fn fail(mut self, sql: &str) -> Self {
            self.failing.push(sql.to_string());
            self
        }
    }

    impl QueryRunner for FakeRunner {
        fn execute(&mut self, sql: &str) -> Result<ResultSet, ExecutionError> {
            self.executed.push(sql.to_string());
            if self.failing.iter().any(|f| f == sql) {
                return Err(ExecutionError::Driver("connection reset".to_string()));
            }
            Ok(self.results.get(sql).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Vec<(SeriesBundle, ChartKind, RenderOptions)>,
    }

    impl Renderer for RecordingRenderer {
        fn render(
            &mut self,
            bundle: &SeriesBundle,
            kind: ChartKind,
            options: &RenderOptions,
        ) -> Result<(), RenderError> {
            self.rendered.push((bundle.clone(), kind, options.clone()));
            Ok(())
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            QueryDefinition::new(1, "ratings", "SELECT rating", 2, ChartKind::Pie)
                .labels("Rating", "Films"),
            QueryDefinition::new(1, "broken", "SELECT broken", 2, ChartKind::Bar),
            QueryDefinition::new(2, "by day", "SELECT {day}", 3, ChartKind::Bar)
                .labels("Day", "Rentals")
                .parameters(&[("day", "15")]),
        ])
        .unwrap()
    }

    fn runner() -> FakeRunner {
        FakeRunner::default()
            .answer(
                "SELECT rating",
                &["rating", "num_films"],
                vec![
                    vec![Cell::from("G"), Cell::Int(178)],
                    vec![Cell::from("PG"), Cell::Int(194)],
                ],
            )
            .answer(
                "SELECT 15",
                &["day", "rentals", "revenue"],
                vec![vec![Cell::Int(15), Cell::Int(4), Cell::Float(9.5)]],
            )
            .answer(
                "SELECT 3",
                &["day", "rentals", "revenue"],
                vec![vec![Cell::Int(3), Cell::Int(2), Cell::from("n/a")]],
            )
            .fail("SELECT broken")
    }

    #[test]
    fn test_run_builds_render_options() {
        let catalog = catalog();
        let mut dispatcher = ReportDispatcher::new(&catalog, runner(), RecordingRenderer::default())
            .with_figure_size((800, 400));

        dispatcher.run("ratings", &Parameters::new()).unwrap();

        let (_, renderer) = dispatcher.into_parts();
        let (bundle, kind, options) = &renderer.rendered[0];
        assert_eq!(*kind, ChartKind::Pie);
        assert_eq!(bundle.categories, vec![Cell::from("G"), Cell::from("PG")]);
        assert_eq!(options.title, "ratings");
        assert_eq!(options.x_label, "Rating");
        assert_eq!(options.y_label, "Films");
        assert_eq!(options.series_names, vec!["num_films".to_string()]);
        assert_eq!(options.y_bounds, Some((0.0, 291.0)));
        assert_eq!(options.figure_size, Some((800, 400)));
    }

    #[test]
    fn test_run_binds_supplied_and_default_parameters() {
        let catalog = catalog();
        let mut dispatcher = ReportDispatcher::new(&catalog, runner(), RecordingRenderer::default());

        dispatcher.run("by day", &Parameters::new()).unwrap();
        let mut supplied = Parameters::new();
        supplied.insert("day".to_string(), serde_json::json!(3));
        dispatcher.run("by day", &supplied).unwrap();

        let (runner, renderer) = dispatcher.into_parts();
        assert_eq!(runner.executed, vec!["SELECT 15", "SELECT 3"]);
        assert_eq!(renderer.rendered[0].2.y_bounds, Some((0.0, 15.0)));
        // revenue is text in the second result, so only rentals bound the axis
        assert_eq!(renderer.rendered[1].0.skipped, vec![1]);
        assert_eq!(renderer.rendered[1].2.y_bounds, Some((0.0, 3.0)));
    }

    #[test]
    fn test_run_errors_surface_to_caller() {
        let catalog = catalog();
        let mut dispatcher = ReportDispatcher::new(&catalog, runner(), RecordingRenderer::default());

        assert!(matches!(
            dispatcher.run("nope", &Parameters::new()),
            Err(ReportError::UnknownReport(name)) if name == "nope"
        ));
        assert_eq!(
            dispatcher
                .run("nope", &Parameters::new())
                .unwrap_err()
                .to_string(),
            "Unknown report: nope"
        );
        assert!(matches!(
            dispatcher.run("broken", &Parameters::new()),
            Err(ReportError::Execution(ExecutionError::Driver(_)))
        ));

        let mut bad = Parameters::new();
        bad.insert("day".to_string(), serde_json::json!({ "n": 1 }));
        assert!(matches!(
            dispatcher.run("by day", &bad),
            Err(ReportError::Bind(BindError::UnsupportedParameterType { .. }))
        ));

        let (_, renderer) = dispatcher.into_parts();
        assert!(renderer.rendered.is_empty());
    }

    #[test]
    fn test_empty_result_is_a_pivot_error() {
        let catalog = Catalog::new(vec![QueryDefinition::new(
            1,
            "empty",
            "SELECT nothing",
            2,
            ChartKind::Line,
        )])
        .unwrap();
        let mut dispatcher =
            ReportDispatcher::new(&catalog, FakeRunner::default(), RecordingRenderer::default());

        assert!(matches!(
            dispatcher.run("empty", &Parameters::new()),
            Err(ReportError::Pivot(PivotError::EmptyResultSet))
        ));
    }

    #[test]
    fn test_run_all_continues_past_failures() {
        let catalog = catalog();
        let mut dispatcher = ReportDispatcher::new(&catalog, runner(), RecordingRenderer::default());

        let summary = dispatcher.run_all();

        assert_eq!(summary.succeeded, vec!["ratings", "by day"]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].name, "broken");
        assert!(summary.failed[0].error.contains("connection reset"));
        assert!(!summary.is_success());

        let (_, renderer) = dispatcher.into_parts();
        let titles: Vec<&str> = renderer
            .rendered
            .iter()
            .map(|(_, _, options)| options.title.as_str())
            .collect();
        assert_eq!(titles, vec!["ratings", "by day"]);
    }
}

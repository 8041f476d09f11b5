// ABOUTME: Report commands for the Sakila Charts CLI
// ABOUTME: Lists the catalog, previews bound queries, and runs reports against the database

use anyhow::Result;

use super::Context;
use crate::binder::{bind, placeholders};
use crate::db;
use crate::dispatcher::{BatchSummary, ReportDispatcher};
use crate::models::Parameters;
use crate::render;

/// Print every report with its section, chart kind and parameters
pub fn list(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog()?;
    let width = catalog.list_names().map(|n| n.len()).max().unwrap_or(0);

    for query in catalog.iter() {
        let params = if query.requires_parameters {
            let defaults: Vec<String> = placeholders(&query.template)
                .into_iter()
                .map(|name| match query.default_parameters.get(&name) {
                    Some(value) => format!("{}={}", name, value),
                    None => name,
                })
                .collect();
            format!("  [{}]", defaults.join(", "))
        } else {
            String::new()
        };
        println!(
            "{:>2}  {:<width$}  {:<9}{}",
            query.section,
            query.name,
            query.chart_kind,
            params,
            width = width
        );
    }
    Ok(())
}

/// Print the query text a report would run with the given parameters
pub fn show(ctx: &Context, name: &str, params: &Parameters) -> Result<()> {
    let catalog = ctx.catalog()?;
    let query = catalog.lookup_by_name(name)?;
    let sql = bind(
        &query.template,
        query.requires_parameters,
        params,
        &query.default_parameters,
    )?;
    println!("-- {} ({} chart, {})", query.name, query.chart_kind, ctx.profile.db_type);
    println!("{}", sql.trim());
    Ok(())
}

pub fn run(ctx: &Context, name: &str, params: &Parameters) -> Result<()> {
    let catalog = ctx.catalog()?;
    // Fail on an unknown name before opening a connection
    catalog.lookup_by_name(name)?;

    let runner = db::connect(&ctx.profile)?;
    let renderer = render::build(ctx.renderer, &ctx.output_dir);
    let mut dispatcher = ReportDispatcher::new(&catalog, runner, renderer)
        .with_figure_size(ctx.config.preferences.figure_size());

    dispatcher.run(name, params)?;
    Ok(())
}

pub fn run_all(ctx: &Context) -> Result<BatchSummary> {
    let catalog = ctx.catalog()?;
    let runner = db::connect(&ctx.profile)?;
    let renderer = render::build(ctx.renderer, &ctx.output_dir);
    let mut dispatcher = ReportDispatcher::new(&catalog, runner, renderer)
        .with_figure_size(ctx.config.preferences.figure_size());

    let summary = dispatcher.run_all();
    for failed in &summary.failed {
        eprintln!("FAILED  {}: {}", failed.name, failed.error);
    }
    Ok(summary)
}

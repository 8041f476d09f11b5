// ABOUTME: Main library for the Sakila Charts report runner
// ABOUTME: Module declarations and the command-line entry point

use clap::Parser;

// Module declarations
pub mod binder;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod dispatcher;
pub mod logging;
pub mod models;
pub mod pivot;
pub mod render;

pub use catalog::Catalog;
pub use dispatcher::{BatchSummary, ReportDispatcher, ReportError};
pub use models::{Cell, ChartKind, Parameters, QueryDefinition, RenderOptions, ResultSet, SeriesBundle};

/// Parse the command line, set up logging, and run the requested command
pub fn run() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();
    logging::init_logging(cli.verbose);
    commands::execute(cli)
}

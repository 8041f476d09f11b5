// ABOUTME: Command-line interface for Sakila Charts
// ABOUTME: Argument parsing, shared command context, and subcommand dispatch

pub mod connection;
pub mod reports;
pub mod settings;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use crate::catalog::{sakila, Catalog};
use crate::config::{AppConfig, ConnectionProfile, RendererKind};
use crate::models::Parameters;

#[derive(Parser, Debug)]
#[command(
    name = "sakila-charts",
    version,
    about = "Run the Sakila report catalog and chart the results"
)]
pub struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Connection profile to use instead of the active one
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Database password, overriding the one stored in the profile
    #[arg(long, global = true, env = "SAKILA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Chart renderer
    #[arg(long, global = true, value_enum)]
    pub renderer: Option<RendererKind>,

    /// Directory for rendered chart files
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the reports in the catalog
    List,
    /// Print the query a report would run
    Show {
        name: String,
        /// Report parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_parameter)]
        params: Vec<(String, Value)>,
    },
    /// Run one report and render its chart
    Run {
        name: String,
        /// Report parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_parameter)]
        params: Vec<(String, Value)>,
    },
    /// Run every report, continuing past failures
    RunAll,
    /// Test the database connection
    Check,
    /// Show the config file location and its settings
    Config,
}

/// Parse `key=value`. Numbers and booleans keep their type; anything else is text.
pub fn parse_parameter(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", raw));
    }

    let value = match serde_json::from_str::<Value>(value) {
        Ok(v @ (Value::Number(_) | Value::Bool(_))) => v,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

pub fn to_parameters(pairs: Vec<(String, Value)>) -> Parameters {
    pairs.into_iter().collect()
}

/// Settings resolved from the config file and command-line overrides
pub struct Context {
    pub config_path: PathBuf,
    pub config: AppConfig,
    pub profile: ConnectionProfile,
    pub renderer: RendererKind,
    pub output_dir: PathBuf,
}

impl Context {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => AppConfig::config_path()?,
        };
        let config = AppConfig::load_from(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let mut profile = match &cli.profile {
            Some(key) => config.profile(key)?.clone(),
            None => config.active_profile()?.clone(),
        };
        if let Some(password) = &cli.password {
            profile.password = password.clone();
        }

        let renderer = cli.renderer.unwrap_or(config.preferences.renderer);
        let output_dir = cli
            .output_dir
            .clone()
            .unwrap_or_else(|| config.preferences.output_dir.clone());

        Ok(Self {
            config_path,
            config,
            profile,
            renderer,
            output_dir,
        })
    }

    /// Catalog written in the dialect of the selected database
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(sakila::catalog(&self.profile.db_type)?)
    }
}

/// Entry point for a parsed command line
pub fn execute(cli: Cli) -> Result<()> {
    let ctx = Context::resolve(&cli)?;

    match cli.command {
        Command::List => reports::list(&ctx),
        Command::Show { name, params } => reports::show(&ctx, &name, &to_parameters(params)),
        Command::Run { name, params } => reports::run(&ctx, &name, &to_parameters(params)),
        Command::RunAll => {
            let summary = reports::run_all(&ctx)?;
            if !summary.is_success() {
                bail!(
                    "{} of {} reports failed",
                    summary.failed.len(),
                    summary.failed.len() + summary.succeeded.len()
                );
            }
            Ok(())
        }
        Command::Check => connection::check(&ctx),
        Command::Config => settings::show(&ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_parameter_types() {
        assert_eq!(parse_parameter("day=5").unwrap(), ("day".to_string(), json!(5)));
        assert_eq!(
            parse_parameter("category=Sci-Fi").unwrap(),
            ("category".to_string(), json!("Sci-Fi"))
        );
        assert_eq!(parse_parameter("flag=true").unwrap().1, json!(true));
        assert_eq!(parse_parameter("where=a=b").unwrap().1, json!("a=b"));
        assert_eq!(parse_parameter("empty=").unwrap().1, json!(""));
        assert!(parse_parameter("novalue").is_err());
        assert!(parse_parameter("=5").is_err());
    }

    #[test]
    fn test_cli_parses_run_with_params() {
        let cli = Cli::try_parse_from([
            "sakila-charts",
            "--renderer",
            "vega-lite",
            "run",
            "Top Films in Category",
            "-p",
            "category=Comedy",
            "--param",
            "limit=5",
        ])
        .unwrap();

        assert_eq!(cli.renderer, Some(RendererKind::VegaLite));
        match cli.command {
            Command::Run { name, params } => {
                assert_eq!(name, "Top Films in Category");
                let params = to_parameters(params);
                assert_eq!(params["category"], json!("Comedy"));
                assert_eq!(params["limit"], json!(5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_context_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let cli = Cli::try_parse_from([
            "sakila-charts",
            "--config",
            config_path.to_str().unwrap(),
            "--password",
            "s3cret",
            "--output-dir",
            "out",
            "list",
        ])
        .unwrap();

        let ctx = Context::resolve(&cli).unwrap();
        assert_eq!(ctx.profile.password, "s3cret");
        assert_eq!(ctx.output_dir, PathBuf::from("out"));
        assert_eq!(ctx.renderer, RendererKind::Text);
        assert_eq!(ctx.catalog().unwrap().len(), 8);
    }
}

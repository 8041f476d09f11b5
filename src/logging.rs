// ABOUTME: Logging setup for the Sakila Charts binary
// ABOUTME: Installs a tracing-subscriber formatter that also receives `log` records

use tracing_subscriber::{fmt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins unless `verbose` is set.
///
/// Logs go to stderr so text charts on stdout stay clean.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sakila_charts_lib=debug,info,tiberius=warn")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,tiberius=warn"))
    };

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = subscriber.try_init() {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}

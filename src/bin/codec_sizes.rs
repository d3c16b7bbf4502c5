//! Print encoded and compressed sizes of a dataset for every configured format.
//!
//! Usage: `codec-sizes [CONFIG.toml]`. Without a config file the defaults
//! apply (see `BenchConfig`). Log level comes from `RUST_LOG`.

use std::process::ExitCode;

use codec_sizes::{load_ndjson, BenchConfig};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Codec panics are caught by the harness and reported as failures;
    // keep the default hook from printing them to stderr as well.
    std::panic::set_hook(Box::new(|info| debug!(%info, "codec panicked")));

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => BenchConfig::load(path)?,
        None => BenchConfig::default(),
    };

    let entries = config.entries()?;
    let document = load_ndjson(&config.dataset, config.record_limit())?;
    let report = config.harness().run(&document, &entries)?;

    print!("{}", report);
    Ok(())
}

// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, read configuration, run the UI.
// - Logs go to stderr and default to `warn`; override with `RUST_LOG`.

use hashnode_publisher::{api::ClientConfig, ui::run};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // `HASHNODE_API_KEY` and the optional `HASHNODE_API_ENDPOINT` are read
    // here once and passed down explicitly.
    let config = ClientConfig::from_env();

    let outcome = run(config)?;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

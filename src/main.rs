use classbook::cli::{parse_args, run_cli_command, Context};
use classbook::config::ClientConfig;

use color_eyre::Result;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "classbook=info";

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let command = parse_args(std::env::args());
    let config = ClientConfig::from_env();
    tracing::debug!(base_url = %config.base_url, data_dir = %config.data_dir.display(), "starting");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let ctx = Context::from_config(&config)?;
        run_cli_command(command, &ctx).await
    })
}

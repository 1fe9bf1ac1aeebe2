use std::process::ExitCode;

use clap::Parser;
use did_helper::{Config, ExitStatus, core::Classified};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = match Config::try_parse() {
        Ok(config) => config,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitStatus::Config.into();
        }
    };

    match did_helper::run(config).await {
        Ok(()) => ExitStatus::Success.into(),
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            e.exit_status().into()
        }
    }
}

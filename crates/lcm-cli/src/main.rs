//! lcm - Local Container Manager CLI

mod logging;
mod report;

use clap::Parser;
use lcm_provider::{
    candidate_targets, resolve, CandidateEnv, DockerConnector, DEFAULT_PROBE_TIMEOUT,
};
use lcm_tui::AppConfig;
use std::path::PathBuf;
use std::time::Duration;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "lcm")]
#[command(author, version, about = "Local Container Manager", long_about = None)]
struct Cli {
    /// Daemon address to try before DOCKER_HOST and the well-known sockets
    #[arg(long, value_name = "ADDR")]
    host: Option<String>,

    /// Background refresh interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(100..))]
    refresh_ms: u64,

    /// Number of log lines fetched for the logs view
    #[arg(long, value_name = "N", default_value_t = 100)]
    log_tail: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file while the dashboard is open
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            refresh_interval: Duration::from_millis(self.refresh_ms),
            log_tail: self.log_tail,
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let env = CandidateEnv::from_process(cli.host.clone());
    let targets = candidate_targets(&env);
    let connection = match resolve(&DockerConnector, &targets, &env, DEFAULT_PROBE_TIMEOUT).await {
        Ok(connection) => connection,
        Err(e) => {
            eprint!("{}", report::attempts(e.attempts()));
            return Err(e.into());
        }
    };
    tracing::info!("Connected to {} at {}", connection.label, connection.address);

    // Logs would corrupt the display unless they go to a file
    let suppress_logs = cli.log_file.is_none();
    lcm_tui::run(connection, cli.app_config(), suppress_logs).await?;

    Ok(())
}

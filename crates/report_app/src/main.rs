mod logging;
mod run;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use report_engine::FetchSettings;
use report_logging::{report_error, report_warn};
use tokio_util::sync::CancellationToken;

use crate::run::RunOptions;

#[derive(Debug, Parser)]
#[command(
    name = "fly-report",
    version,
    about = "Build the Poudre River fly report manifest"
)]
struct Cli {
    /// Where to write the manifest JSON.
    #[arg(short, long, value_name = "FILE", default_value = "data.json")]
    output: PathBuf,

    /// RON file overriding the built-in sources, dictionary and keywords.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "SECS", default_value_t = 10)]
    request_timeout_secs: u64,

    #[arg(long, value_name = "N", default_value_t = 5)]
    redirect_limit: usize,

    /// Minimum gap between product page requests.
    #[arg(long, value_name = "MS", default_value_t = 200)]
    pacing_ms: u64,

    /// Also write the log to this file.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(level, cli.log_file.as_deref());

    let config = match settings::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            report_error!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            report_warn!("Interrupted; cancelling run");
            trigger.cancel();
        }
    });

    let options = RunOptions {
        config,
        fetch: FetchSettings {
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            redirect_limit: cli.redirect_limit,
            ..FetchSettings::default()
        },
        pacing: Duration::from_millis(cli.pacing_ms),
        output: cli.output,
    };

    match run::run(options, &cancel).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            report_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

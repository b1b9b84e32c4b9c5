use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use queue_behavior_bench::domain::profile::ProfileRegistry;
use queue_behavior_bench::error::Error;
use queue_behavior_bench::submission::driver::{SubmissionDriver, SubmissionOutcome};
use queue_behavior_bench::submission::endpoint::HostPort;
use queue_behavior_bench::{DEFAULT_MAX_LATENCY_MS, build_benchmark_topology, logger};

/// Submits the queue behavior benchmark (number source -> prime tester -> latency logger)
/// to a job manager and waits until the job terminates.
#[derive(Debug, Parser)]
#[command(name = "queue-behavior-bench", version)]
struct Cli {
    /// Control endpoint of the job manager.
    #[arg(value_name = "JOBMANAGER_HOST:PORT")]
    endpoint: String,

    /// Name of the parallelism profile to run.
    #[arg(value_name = "PROFILE_NAME")]
    profile: String,

    /// JSON file with profile definitions replacing the built-in ones.
    #[arg(long, value_name = "FILE")]
    profiles: Option<String>,

    /// Latency bound between the number source and the prime tester.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_MAX_LATENCY_MS)]
    max_latency_ms: u64,
}

fn print_usage(available: &[String]) {
    eprintln!("Parameters: <jobmanager-host>:<port> <profile-name>");
    eprintln!("Available profiles: {}", format!("{:?}", available).bold());
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{}", e.render());
            print_usage(&ProfileRegistry::builtin().names());
            return ExitCode::FAILURE;
        }
    };

    logger::init();

    let token = CancellationToken::new();
    let driver = SubmissionDriver::with_cancellation(token.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, no longer waiting for the job.");
            token.cancel();
        }
    });

    match run(&cli, &driver).await {
        Ok(SubmissionOutcome::Completed { job_id }) => {
            log::info!("Job {} completed.", job_id);
            ExitCode::SUCCESS
        }
        Ok(SubmissionOutcome::Cancelled { job_id }) => {
            log::info!("Stopped waiting for job {}.", job_id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(Error::ProfileNotFound { name, available }) => {
                    eprintln!("Unknown profile: {}", name.red());
                    print_usage(available);
                }
                _ => log::error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, driver: &SubmissionDriver) -> anyhow::Result<SubmissionOutcome> {
    // Fail on a malformed endpoint before doing anything else.
    let endpoint: HostPort = cli.endpoint.parse()?;

    let registry = match &cli.profiles {
        Some(path) => ProfileRegistry::from_json_file(path).with_context(|| format!("Failed to load profiles from '{}'", path))?,
        None => ProfileRegistry::builtin(),
    };

    let topology = build_benchmark_topology(&registry, &cli.profile, cli.max_latency_ms)?;

    let outcome = driver.submit(topology, &endpoint.to_string()).await?;
    Ok(outcome)
}

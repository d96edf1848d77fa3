// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use chrono::{DateTime, Utc};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use log_export::{ExportError, Orchestrator, TimeWindow, TokioSleeper};
use log_export_aws::{
    load_sdk_config, resolve_credentials, CloudWatchLogsClient, CredentialsError, SnsClient,
};

mod config;

use config::ExportConfig;

/// Exports every CloudWatch log group to S3 and publishes a per-group report
/// to SNS.
#[derive(Debug, Parser)]
#[command(name = "log-export", version)]
struct Args {
    /// Start of the export window, in hours before now.
    #[arg(value_name = "HOURS_BACK", default_value_t = 36)]
    hours_back: u32,

    /// End of the export window, in hours before now.
    #[arg(value_name = "STALENESS_BOUND_HOURS", default_value_t = 12)]
    staleness_bound_hours: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match ExportConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // the subscriber needs the config's log level
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter = format!(
        "h2=off,hyper=off,rustls=off,aws_smithy_runtime=off,aws_config=warn,{}",
        config.log_level
    );
    let filter = match EnvFilter::try_new(&env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Could not parse log level '{}': {e}", config.log_level);
            return ExitCode::FAILURE;
        }
    };
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }
    debug!("Logging subsystem enabled");

    match run(&args, &config).await {
        Ok(receipt) => {
            println!("{receipt}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Log export failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Errors that end the binary with a non-zero exit.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

async fn run(args: &Args, config: &ExportConfig) -> Result<String, RunError> {
    let window = export_window(args, Utc::now())?;
    let sdk = load_sdk_config(&config.profile, &config.region, config.http_timeout).await;
    resolve_credentials(&sdk, &config.profile).await?;
    info!(
        "Exporting log groups in {} with profile '{}'",
        config.region, config.profile
    );

    let logs_client = CloudWatchLogsClient::new(&sdk, config.logs_endpoint.as_deref());
    let sns_client = SnsClient::new(&sdk, config.sns_endpoint.as_deref());

    let settings = config.settings();
    let receipt = Orchestrator::new(&logs_client, &sns_client, &TokioSleeper, &settings)
        .run(&window)
        .await?;
    Ok(receipt.to_string())
}

/// The window is validated before any AWS configuration is loaded.
fn export_window(args: &Args, now: DateTime<Utc>) -> Result<TimeWindow, RunError> {
    let window = TimeWindow::lookback(now, args.hours_back, args.staleness_bound_hours)
        .map_err(ExportError::from)?;
    Ok(window)
}

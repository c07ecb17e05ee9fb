use clap::{CommandFactory, Parser};
use colored::*;
use eyre::{Context, Result};
use indicatif::ProgressBar;
use tracing::{debug, trace};

mod api;
mod cli;
mod constants;
mod model;
mod renderer;
mod utils;

use api::{ApiClient, ApiClientError, ApiConfig};
use cli::{Cli, Commands};
use constants::POLL_INTERVAL;
use model::Measurement;
use renderer::MeasurementOutput;
use utils::{logging::init_logging, progress::create_spinner};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let request = match cli.command.to_request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            print_help(&cli.command);
            std::process::exit(1);
        }
    };
    debug!(?request, "measurement request");

    let config = ApiConfig::new(cli.global.api_url.clone()).with_token(cli.global.token.clone());
    let client = ApiClient::new(config).wrap_err("Failed to create HTTP client")?;

    let created = match client.create_measurement(&request).await {
        Ok(created) => created,
        Err(e) => {
            report_error(&e);
            if e.show_help() {
                print_help(&cli.command);
            }
            std::process::exit(1);
        }
    };
    debug!(id = %created.id, probes = created.probes_count, "measurement created");

    let spinner = create_spinner(format!("Waiting for {} probe(s)...", created.probes_count));
    let finished = wait_for_results(&client, &created.id, &spinner).await;
    let (measurement, body) = match finished {
        Ok(finished) => finished,
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    };

    if cli.global.json {
        println!("{body}");
    } else {
        print!(
            "{}",
            MeasurementOutput {
                measurement: &measurement,
                latency: cli.global.latency,
            }
        );
    }

    Ok(())
}

/// Polls the measurement until the API stops reporting it as in progress.
///
/// The spinner is cleared whether polling succeeds or fails. Returns the decoded
/// measurement along with the raw body of the last poll.
async fn wait_for_results(
    client: &ApiClient,
    id: &str,
    spinner: &ProgressBar,
) -> Result<(Measurement, String), ApiClientError> {
    let finished = poll_measurement(client, id).await;
    spinner.finish_and_clear();
    finished
}

async fn poll_measurement(
    client: &ApiClient,
    id: &str,
) -> Result<(Measurement, String), ApiClientError> {
    loop {
        let body = client.get_measurement_json(id).await?;
        let measurement: Measurement =
            serde_json::from_str(&body).map_err(ApiClientError::Decode)?;

        if !measurement.is_in_progress() {
            return Ok((measurement, body));
        }

        trace!(id, results = measurement.results.len(), "measurement in progress");
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn report_error(e: &ApiClientError) {
    eprintln!("{}", e.to_string().red());

    match e {
        ApiClientError::Validation { params } => {
            for (field, message) in params {
                eprintln!("  • {}: {}", field.yellow(), message);
            }
        }
        ApiClientError::ApiInternal { kind, message } => {
            debug!(?kind, server_message = %message, "api error");
        }
        _ => {}
    }
}

fn print_help(command: &Commands) {
    let mut cli = Cli::command();
    if let Some(subcommand) = cli.find_subcommand_mut(command.name()) {
        let _ = subcommand.print_help();
    }
}

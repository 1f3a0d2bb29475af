//! community-events CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use community_events_client::CommunityEventsService;
use community_events_client::cli::{Cli, Command};
use community_events_client::error::CliError;
use community_events_core::{ServiceConfig, TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ServiceConfig::load_from(&cli.config)?;
    let service = CommunityEventsService::from_config(&config)?;

    let query = cli.command.query();
    let options = cli.request_options();

    let output = match cli.command {
        Command::Events { .. } => {
            serde_json::to_string_pretty(&service.list_events(&query, &options).await?)?
        }
        Command::Event { .. } => {
            serde_json::to_string_pretty(&service.get_event(&query, &options).await?)?
        }
        Command::Attendees { .. } => {
            serde_json::to_string_pretty(&service.list_attendees(&query, &options).await?)?
        }
    };
    println!("{}", output);
    Ok(())
}

mod cli;

use std::process::ExitCode;

use anyhow::Result;
use badge_api::{count_projects_with_language, BadgeApiClient, BadgeApiConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, DownloadArgs, WriteArgs};

fn main() -> ExitCode {
    // Diagnostics go to stderr; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<bool> {
    match command {
        Command::Write(args) => write(&args),
        Command::Download(args) => download(&args),
    }
}

fn write(args: &WriteArgs) -> Result<bool> {
    let session_cookie = args.session_cookie()?;
    let base_url = args.base_url()?;
    let updates = args.updates()?;

    tracing::info!(
        "writing data to project {} at base URL {base_url}",
        args.project_id
    );

    let client = BadgeApiClient::new(BadgeApiConfig::new(base_url))?;
    Ok(client.write_to_project(args.project_id, &updates, session_cookie)?)
}

fn download(args: &DownloadArgs) -> Result<bool> {
    let client = BadgeApiClient::new(BadgeApiConfig::new(args.base_url()))?;
    let projects = client.load_projects(&args.cache, &args.options())?;

    println!("Number of projects = {}", projects.len());
    if let Some(language) = args.language.as_deref() {
        println!(
            "{language} projects = {}",
            count_projects_with_language(&projects, language)
        );
    }
    Ok(true)
}

mod api;
mod config;
mod database;
mod error;
mod forms;
mod invitations;
mod members;
mod network;
mod server;
mod tasks;
mod templates;
mod users;

use crate::config::RawConfig;
use anyhow::{anyhow, Context};
use clap::{
    crate_authors, crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches,
    Command,
};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    if env::var("RUST_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt().json().flatten_event(true).init();
    } else {
        tracing_subscriber::fmt::init();
    }

    // Install default crypto provider.
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default RusTLS crypto provider."))?;

    let matches = Command::new("Clubroll server.")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("CONFIG")
                .env("CLUBROLL_CONFIG")
                .short('c')
                .long("config")
                .global(true)
                .default_value("clubroll.toml")
                .help("Path to the Clubroll configuration file."),
        )
        .arg(
            Arg::new("PORT")
                .env("CLUBROLL_PORT")
                .short('p')
                .long("port")
                .global(true)
                .value_parser(value_parser!(u16))
                .help("Defines a TCP port to listen on."),
        )
        .subcommand(Command::new("serve").about("Runs the HTTP server (default)."))
        .subcommand(
            Command::new("run-tasks").about("Runs the background worker that processes tasks."),
        )
        .subcommand(
            Command::new("create-staff")
                .about("Creates a user that can manage invitations.")
                .arg(
                    Arg::new("EMAIL")
                        .long("email")
                        .required(true)
                        .help("Email address the user signs in with."),
                )
                .arg(
                    Arg::new("PASSWORD")
                        .long("password")
                        .required(true)
                        .help("Password the user signs in with."),
                )
                .arg(
                    Arg::new("SUPERUSER")
                        .long("superuser")
                        .action(ArgAction::SetTrue)
                        .help("Marks the user as a superuser."),
                ),
        )
        .get_matches();

    let mut raw_config = RawConfig::read_from_file(
        matches
            .get_one::<String>("CONFIG")
            .ok_or_else(|| anyhow!("<CONFIG> argument is not provided."))?,
    )?;

    // CLI argument takes precedence.
    if let Some(port) = matches.get_one::<u16>("PORT") {
        raw_config.port = *port;
    }

    info!(config = ?raw_config, "Clubroll raw configuration.");

    match matches.subcommand() {
        Some(("run-tasks", _)) => run_tasks(raw_config).await,
        Some(("create-staff", create_staff_matches)) => {
            create_staff(raw_config, create_staff_matches).await
        }
        _ => server::run(raw_config).await,
    }
}

/// Processes queued tasks until the process is interrupted.
async fn run_tasks(raw_config: RawConfig) -> Result<(), anyhow::Error> {
    let api = server::create_api(raw_config).await?;
    let tasks = api.tasks();

    tokio::select! {
        _ = tasks.run(api.config.tasks.poll_interval) => Ok(()),
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for the interrupt signal.")?;
            info!("Received interrupt signal, stopping tasks worker.");
            std::process::exit(130);
        }
    }
}

async fn create_staff(raw_config: RawConfig, matches: &ArgMatches) -> Result<(), anyhow::Error> {
    let email = matches
        .get_one::<String>("EMAIL")
        .ok_or_else(|| anyhow!("<EMAIL> argument is not provided."))?;
    let password = matches
        .get_one::<String>("PASSWORD")
        .ok_or_else(|| anyhow!("<PASSWORD> argument is not provided."))?;

    let api = server::create_api(raw_config).await?;
    let user = api
        .users()
        .create_staff(email, password, matches.get_flag("SUPERUSER"))
        .await?;
    info!(
        user.id = user.id,
        user.is_superuser = user.is_superuser,
        "Created staff user {}.",
        user.email
    );

    Ok(())
}

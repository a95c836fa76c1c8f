mod backend;
mod console;
mod credentials;
mod directory;
mod error;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::backend::{FirebaseClient, FirebaseEndpoints};
use crate::console::Console;
use crate::console::prompter::TerminalPrompter;
use crate::console::render::TerminalRenderer;
use crate::error::{AdminError, ConfigError};
use crate::ui::prelude::*;

/// Firebase Authentication admin console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the service-account JSON file
    #[arg(value_name = "CREDENTIALS")]
    credentials: PathBuf,

    /// Web API key, needed for the sign-in token methods
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Use the Auth emulator at host:port instead of production
    #[arg(long, env = "FIREBASE_AUTH_EMULATOR_HOST", value_name = "HOST:PORT")]
    emulator_host: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Activate debug mode
    #[arg(short, long)]
    debug: bool,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();

    ui::init(!cli.no_color && std::env::var_os("NO_COLOR").is_none());
    ui::set_debug_mode(cli.debug);

    if let Err(err) = run(&cli) {
        emit(
            Level::Error,
            "fireadmin.fatal",
            &format!("{} {:#}", Glyph::Cross, err),
        );
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    let account = credentials::load(&cli.credentials).with_context(|| {
        format!(
            "loading service account from {}",
            cli.credentials.display()
        )
    })?;
    emit(
        Level::Debug,
        "credentials.loaded",
        &format!(
            "project {} as {}",
            account.project_id, account.client_email
        ),
    );

    let endpoints = match cli.emulator_host.as_deref() {
        Some(host) => {
            emit(
                Level::Info,
                "backend.emulator",
                &format!("{} Using the Auth emulator at {}", Glyph::Info, host),
            );
            FirebaseEndpoints::emulator(host)
        }
        None => FirebaseEndpoints::production(),
    };

    let client = FirebaseClient::new(
        account,
        endpoints,
        cli.api_key.clone(),
        Duration::from_secs(cli.timeout),
    )
    .context("building the Firebase client")?;
    emit(
        Level::Info,
        "backend.ready",
        &format!("Connected to project {}", client.project_id()),
    );

    let prompter = TerminalPrompter::new()?;
    let mut console = Console::new(client, prompter, TerminalRenderer);
    console.run()?;
    emit(
        Level::Debug,
        "console.closed",
        &format!("session ended with {} users cached", console.directory().len()),
    );
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<ConfigError>()
                .map(ConfigError::exit_code)
                .or_else(|| cause.downcast_ref::<AdminError>().map(AdminError::exit_code))
        })
        .unwrap_or(1)
}

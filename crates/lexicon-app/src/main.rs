use std::sync::Arc;

use clap::Parser;
use lexicon_config::Config;
use lexicon_config::log::LogConfig;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod controller;
pub mod events;
pub mod io;
pub mod render;
pub mod state;

use self::commands::Cli;
use self::controller::AppController;
use self::events::{Outcome, handle_command};
use self::state::AppState;


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::new(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    init_tracing(&config.log);
    tracing::debug!("Using backend {}", config.api.base_url);

    let state = Arc::new(AppState::from_config(config)?);
    match state.lexicon.restore().await {
        Ok(true) => tracing::info!("Session restored"),
        Ok(false) => {}
        Err(e) => tracing::warn!("Could not restore session: {e}"),
    }

    match cli.command {
        Some(command) => {
            if let Outcome::Print(text) = handle_command(&state, command).await {
                println!("{}", text.trim_end());
            }
            Ok(())
        }
        None => run_shell(state).await,
    }
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let json = log.json.unwrap_or_else(|| !atty::is(atty::Stream::Stdout));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run_shell(state: Arc<AppState>) -> anyhow::Result<()> {
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks().await;
    println!("Type `help` for commands, `quit` to leave");

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for ctrl+c: {e}");
            }
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::debug!("Task finished"),
                Ok(Err(e)) => tracing::error!("Task failed: {e}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("Task failed: {e}"),
            Err(e) => tracing::error!("Task panicked: {e}"),
        }
    }

    Ok(())
}

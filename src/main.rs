// Exam coach entry point.
// Loads configuration, wires the coordinator, and runs the TUI.

mod app;
mod cache;
mod coach;
mod config;
mod diagnostics;
mod error;
mod groq;
mod ui;

use std::fs::{self, File};
use std::process::ExitCode;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::coach::QueryCoordinator;
use crate::config::Config;
use crate::diagnostics::DiagnosticsSink;
use crate::groq::GroqClient;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("exam-coach: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> error::Result<()> {
    // Fail before touching the terminal if the key is missing
    let config = Config::load()?;
    init_tracing();
    info!(?config, "starting exam coach");

    let sink = DiagnosticsSink::new();
    let client = GroqClient::new(&config.base_url, &config.model)?;
    sink.info(format!("Using model {}", client.model()));

    let coach = QueryCoordinator::new(client, config.cache_ttl, sink.clone());
    let mut app = App::new(config.api_key.clone(), sink);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal, &coach).await;
    ratatui::restore();

    Ok(result?)
}

/// Send traces to a file in the cache dir; stdout belongs to the TUI.
fn init_tracing() {
    let Some(dir) = config::cache_dir() else {
        return;
    };
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("exam-coach.log")) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

mod command;
mod helper;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use finrag_application::{Dispatch, IgnoreReason, SessionController, SessionSnapshot};
use finrag_core::config::ClientConfig;
use finrag_infrastructure::{ConfigService, read_file_selection};
use finrag_interaction::HttpRagBackend;

use crate::command::Command;
use crate::helper::CliHelper;

/// Terminal client for the financial question-answering backend.
#[derive(Parser, Debug)]
#[command(name = "finrag", version, about)]
struct Args {
    /// Backend base address (overrides config file and FINRAG_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Ticker symbol to start with
    #[arg(long)]
    symbol: Option<String>,

    /// Path to a config.toml (defaults to ~/.config/finrag/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let service = match &args.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let mut config = service.load().context("Failed to load configuration")?;

    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(symbol) = &args.symbol {
        config.default_symbol = symbol.to_uppercase();
    }
    Ok(config)
}

/// Prints messages appended since the last change, plus busy indicators.
async fn render_changes(mut changes: tokio::sync::watch::Receiver<SessionSnapshot>) {
    let mut printed = 0;
    let mut was_loading = false;

    while changes.changed().await.is_ok() {
        let snapshot = changes.borrow_and_update().clone();

        for message in snapshot.log.messages().iter().skip(printed) {
            println!("{}", render::message(message));
        }
        printed = snapshot.log.len();

        if snapshot.is_loading && !was_loading {
            println!("{}", "Thinking...".bright_black());
        }
        was_loading = snapshot.is_loading;
    }
}

fn report_ignored(outcome: Dispatch) {
    let Dispatch::Ignored(reason) = outcome else {
        return;
    };
    let text = match reason {
        IgnoreReason::QueryInFlight => "Still waiting for the previous answer.",
        IgnoreReason::UploadInFlight => "An upload is already in progress.",
        IgnoreReason::Disposed => "Session closed.",
        IgnoreReason::EmptyInput | IgnoreReason::NoFile | IgnoreReason::AlreadyStarted => return,
    };
    println!("{}", text.yellow());
}

/// The main entry point for the finrag REPL.
///
/// Questions and uploads run as background tasks so the prompt stays
/// responsive; a renderer task prints every new conversation entry.
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;
    tracing::info!("Using backend at {}", config.normalized_base_url());

    // ===== Session Initialization =====
    let backend = Arc::new(HttpRagBackend::from_config(&config)?);
    let controller = SessionController::start(backend, &config);
    let renderer = tokio::spawn(render_changes(controller.subscribe()));

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", render::welcome());
    println!("{}", format!("Backend: {}", config.normalized_base_url()).bright_black());
    println!();

    // ===== Main REPL Loop =====
    loop {
        let prompt = format!("{}> ", controller.snapshot().symbol);
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let Some(command) = Command::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.as_str());

        match command {
            Command::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Command::Ask(question) => {
                let snapshot = controller.snapshot();
                println!("{}", render::routing(&snapshot).bright_black());
                controller.set_input(question);
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    report_ignored(controller.send_query().await);
                });
            }
            Command::Symbol(Some(symbol)) => {
                controller.set_symbol(symbol.clone());
                println!("{}", format!("Symbol set to {}", symbol).bright_black());
            }
            Command::Symbol(None) => {
                println!("{}", controller.snapshot().symbol);
            }
            Command::Docs => {
                println!("{}", render::documents(&controller.snapshot()));
            }
            Command::Select(id) => {
                let selected = controller.toggle_selection(&id);
                let verb = if selected { "Selected" } else { "Deselected" };
                println!("{}", format!("{verb} {id}").bright_black());
                println!("{}", render::routing(&controller.snapshot()).bright_black());
            }
            Command::Refresh => {
                if controller.snapshot().is_loading_documents() {
                    println!("{}", "Already loading documents...".yellow());
                    continue;
                }
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    controller.refresh_documents().await;
                    println!("{}", render::documents(&controller.snapshot()));
                });
            }
            Command::Upload(None) => {
                let snapshot = controller.snapshot();
                if snapshot.is_uploading {
                    println!("{}", "Uploading... Processing document.".yellow());
                    continue;
                }
                let visible = !snapshot.show_upload;
                controller.set_upload_form_visible(visible);
                if visible {
                    println!(
                        "{}",
                        "Upload a document with /upload <path> (only PDF files supported), or /cancel."
                            .bright_black()
                    );
                }
            }
            Command::Upload(Some(path)) => {
                controller.set_upload_form_visible(true);
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    match read_file_selection(&path).await {
                        Ok(file) => report_ignored(controller.upload_document(Some(file)).await),
                        Err(e) => eprintln!(
                            "{}",
                            format!("Cannot read {}: {}", path.display(), e).red()
                        ),
                    }
                });
            }
            Command::Cancel => {
                controller.set_upload_form_visible(false);
            }
            Command::Health => match controller.check_health().await {
                Ok(report) => println!("{}", render::health(&report)),
                Err(e) => eprintln!("{}", format!("Health check failed: {}", e).red()),
            },
            Command::Help => {
                println!("{}", render::help());
            }
            Command::Unknown(text) => {
                println!("{}", text.bright_black());
            }
        }
    }

    // Late completions are dropped once the session is disposed
    controller.dispose();
    renderer.abort();
    let _ = renderer.await;

    Ok(())
}

//! promptlab - A terminal workbench for versioning and testing LLM prompts
//!
//! Without a subcommand the TUI starts; any subcommand runs headless.

mod cli;
mod headless;

use std::path::Path;

use clap::Parser;
use promptlab_app::config::{self, Settings};
use promptlab_app::Engine;
use promptlab_core::prelude::*;

use cli::{Args, Command};
use headless::HeadlessEvent;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    promptlab_core::logging::init()?;

    info!("═══════════════════════════════════════════════════════");
    info!("promptlab {}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════════════════");

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);

    let Some(command) = args.command.clone() else {
        let engine = Engine::from_settings(settings(&args, &config_path))?;
        let result = promptlab_tui::run(engine).await;
        if let Err(ref e) = result {
            error!("Application error: {:?}", e);
        }
        info!("promptlab exiting");
        return result;
    };

    let result = match command {
        Command::InitConfig => headless::runner::init_config(&config_path, args.json),
        command => run_headless(&args, &config_path, command).await,
    };

    if let Err(e) = result {
        error!("Headless command failed: {:?}", e);
        HeadlessEvent::error(e.to_string(), e.is_fatal()).emit_error(args.json);
        std::process::exit(1);
    }
    Ok(())
}

async fn run_headless(args: &Args, config_path: &Path, command: Command) -> Result<()> {
    let mut engine = Engine::from_settings(settings(args, config_path))?;
    headless::runner::run_command(&mut engine, command, args.json).await
}

/// Settings file, then environment, then `--api-url`
fn settings(args: &Args, config_path: &Path) -> Settings {
    let mut settings = config::load_settings(config_path);
    if let Some(url) = args.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        settings.api.base_url = url.to_string();
    }
    settings
}

//! CLI application for ai_vx

use ai_vx::visual::{map_color, map_size};
use ai_vx::{
    AnalysisClient, AnalysisResult, App, ConfigManager, HttpAnalysisClient, VisualParams,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// ai_vx - see what a song's tempo and mood look like
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,

    /// Base URL of the analysis backend (overrides the config file)
    #[clap(long, global = true)]
    server: Option<String>,

    /// Path to a config file instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a song and print its analysis and visual parameters
    Upload { file: PathBuf },
    /// Map a tempo and mood to visual parameters without contacting the backend
    Map {
        #[clap(allow_hyphen_values = true)]
        tempo: f64,
        mood: Option<String>,
    },
    /// Ask the backend to compute visual parameters itself
    Visuals { tempo: f64, mood: String },
    /// Check that the backend is reachable
    Status,
    /// Open the viewer, optionally uploading a song right away
    View { file: Option<PathBuf> },
}

#[derive(Serialize)]
struct Report<'a> {
    analysis: &'a AnalysisResult,
    visuals: VisualParams,
}

fn init_logging(debug: bool, command: &Command) {
    // The viewer owns the terminal, so only warnings get through by default
    let default_filter = match (debug, command) {
        (true, _) => "debug",
        (false, Command::View { .. }) => "warn",
        (false, _) => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Uploads `file` and reads back the parameters the upload left in the
/// app's visual state
async fn upload_report(app: &App, file: &Path) -> Result<(AnalysisResult, VisualParams)> {
    let analysis = app.upload(file).await?;
    Ok((analysis, app.state().current()))
}

fn build_app(server: Option<String>, config: Option<PathBuf>) -> Result<App> {
    let config = match config {
        Some(path) => ConfigManager::with_file(path),
        None => ConfigManager::new(),
    }
    .context("Failed to load settings")?;

    let mut settings = config.into_settings();
    if let Some(server) = server {
        settings.server_url = server;
    }
    info!("Using analysis backend at {}", settings.server_url);

    let client = Arc::new(HttpAnalysisClient::new(settings.server_url.clone())?);
    Ok(App::new(settings, client))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug, &args.command);
    debug!("Arguments: {:?}", args);

    match args.command {
        Command::Map { tempo, mood } => {
            let analysis = AnalysisResult::new(tempo, mood.clone().unwrap_or_default());
            let visuals = VisualParams {
                size: map_size(tempo),
                color: map_color(mood.as_deref()),
            };
            print_json(&Report {
                analysis: &analysis,
                visuals,
            })?;
        }
        Command::Upload { file } => {
            let app = build_app(args.server, args.config)?;
            let (analysis, visuals) = upload_report(&app, &file).await?;
            print_json(&Report {
                analysis: &analysis,
                visuals,
            })?;
        }
        Command::Visuals { tempo, mood } => {
            let app = build_app(args.server, args.config)?;
            let analysis = AnalysisResult::new(tempo, mood);
            let visuals = app.fetch_remote_visuals(&analysis).await?;
            print_json(&Report {
                analysis: &analysis,
                visuals,
            })?;
        }
        Command::Status => {
            let app = build_app(args.server, args.config)?;
            let status = app.client().status().await?;
            print_json(&status)?;
        }
        Command::View { file } => {
            let app = build_app(args.server, args.config)?;
            app.run_tui(file).await?;
        }
    }

    Ok(())
}

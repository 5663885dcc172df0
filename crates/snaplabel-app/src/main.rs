use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use snaplabel_config::{Config, PermissionPolicy};
use snaplabel_types::{AppEvent, UiEvent};
use tokio::signal;
use tokio::task::JoinSet;

pub mod controller;
pub mod events;
pub mod io;
pub mod permissions;
pub mod profile;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::profile::{ProfileStore, load_config_file};
use self::state::AppState;

#[derive(Parser)]
#[command(name = "snaplabel")]
#[command(about = "Capture a photo and show what the labeling service sees in it")]
#[command(version)]
struct Cli {
    /// Plain JSON config file; skips the profile store
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Profile to load from the user config directory
    #[arg(short, long, default_value = "main")]
    profile: String,

    /// Image file or directory the camera reads from
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Override the permission policy (granted, denied, prompt)
    #[arg(long)]
    permission: Option<PermissionPolicy>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session driven from stdin (default)
    Run,

    /// Check permission, run a single capture cycle and exit
    Once,

    /// Create a new profile cloned from main
    NewProfile { name: String },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, the display surface owns stdout.
    // Set RUST_LOG to control the level, e.g. RUST_LOG=snaplabel=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli));
    // A stdin read may still be parked on a blocking thread
    runtime.shutdown_timeout(Duration::from_millis(250));
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env loaded: {}", e);
    }
    // Profiles hold plain defaults; the environment is overlaid on every load
    let defaults = Config::default();

    if let Some(Commands::NewProfile { name }) = &cli.command {
        let store = ProfileStore::user()?;
        store.init(&defaults)?;
        let path = store.add_from_main(name, &defaults)?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => {
            let store = ProfileStore::user()?;
            store.init(&defaults)?;
            store.load(&cli.profile, &defaults)?
        }
    };
    config.apply_env();
    if let Some(source) = cli.source {
        config.camera.source = source;
    }
    if let Some(policy) = cli.permission {
        config.permission.policy = policy;
    }

    let once = matches!(cli.command, Some(Commands::Once));
    if once && config.permission.policy == PermissionPolicy::Prompt {
        anyhow::bail!("`once` cannot answer a prompt; pass --permission granted or denied");
    }

    tracing::info!(
        "Camera source: {}, labeler: {:?}, permission: {:?}",
        config.camera.source.display(),
        config.labeler.backend,
        config.permission.policy
    );

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(!once);

    if once {
        let backend = controller.backend_sender();
        backend.send(AppEvent::CapturePressed).await?;
        backend.send(AppEvent::UiEvent(UiEvent::Close)).await?;
    }

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        _ = join_all(&controller, &mut tasks) => {}
    }

    controller.shutdown();
    join_all(&controller, &mut tasks).await;
    Ok(())
}

/// Wait for every task; the first failure shuts the rest down
async fn join_all(controller: &AppController, tasks: &mut JoinSet<anyhow::Result<()>>) {
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => tracing::debug!("task exited"),
            Ok(Err(e)) => {
                tracing::error!("task failed: {:#}", e);
                controller.shutdown();
            }
            Err(e) => {
                tracing::error!("task panicked: {e}");
                controller.shutdown();
            }
        }
    }
}

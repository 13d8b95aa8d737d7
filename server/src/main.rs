// Juwoo points - family points, rewards and learning tracker
// Entry point and command line

use anyhow::Context;
use clap::{Parser, Subcommand};
use juwoo_points::{app, config, routes, services};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "juwoo-points", version, about = "Family points and rewards server")]
struct Cli {
    /// Directory holding the database, settings and backups
    #[arg(long, env = "JUWOO_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Hours east of UTC used for day boundaries
    #[arg(
        long,
        env = "JUWOO_UTC_OFFSET_HOURS",
        default_value_t = config::DEFAULT_UTC_OFFSET_HOURS,
        allow_hyphen_values = true
    )]
    utc_offset_hours: i32,

    /// Address the HTTP server listens on
    #[arg(long, env = "JUWOO_BIND", default_value = config::DEFAULT_BIND_ADDR)]
    bind: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Set the caregiver PIN
    SetPin { pin: String },
    /// Verify a backup archive and restore it (server must be stopped)
    Restore { backup_file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "juwoo_points=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let tz = app::utc_offset(cli.utc_offset_hours)?;

    match cli.command {
        None | Some(Command::Serve) => serve(cli.data_dir, tz, &cli.bind).await,
        Some(Command::SetPin { pin }) => {
            tokio::fs::create_dir_all(&cli.data_dir).await?;
            services::SettingsService::new(cli.data_dir)
                .set_caregiver_pin(&pin)
                .await?;
            println!("Caregiver PIN updated");
            Ok(())
        }
        Some(Command::Restore { backup_file }) => {
            let staged = services::backup::stage_restore(&cli.data_dir, &backup_file)
                .await
                .with_context(|| format!("Failed to read backup {:?}", backup_file))?;
            services::backup::apply_pending_restore(&cli.data_dir).await?;
            println!("Restored backup from {}", staged.backup_timestamp);
            Ok(())
        }
    }
}

async fn serve(data_dir: PathBuf, tz: chrono::FixedOffset, bind: &str) -> anyhow::Result<()> {
    tracing::info!("Starting Juwoo points server");

    let state = app::setup(&data_dir, tz)
        .await
        .context("Failed to initialize application")?;

    let router = routes::create_router(state.clone());
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!("Listening on http://{}", bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.shutdown().await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

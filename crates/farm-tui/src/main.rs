mod action;
mod app;
mod component;
mod components;
mod dispatcher;
mod engine;
mod intent;
mod loading;
mod mapper;
mod notifier;
mod poller;
mod render_state;
mod theme;
mod widgets;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use farm_proto::client::DeviceClient;
use farm_proto::config::Config;

use crate::engine::{SyncEngine, SyncEvent};

/// Terminal dashboard for the farm relay controller.
#[derive(Parser, Debug)]
#[command(name = "farmdash")]
#[command(version, about, long_about = None)]
struct Args {
    /// Controller base URL (overrides config).
    #[arg(short, long)]
    url: Option<String>,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fetch status once, print it and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = farm_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = farm_proto::platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    if !args.once {
        eprintln!("farmdash log: {}", log_path.display());
    }
    tracing::info!("farmdash starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config unreadable, using defaults: {e:#}");
            Config::default()
        }),
    };
    if let Some(url) = args.url {
        config.device.base_url = url;
    }

    let client = DeviceClient::new(&config.device.base_url, config.device.request_timeout())?;

    if args.once {
        return print_once(client, &config).await;
    }

    app::App::new(client, &config).run().await
}

/// One poll through the same engine the dashboard uses, printed as text.
async fn print_once(client: DeviceClient, config: &Config) -> anyhow::Result<()> {
    let snapshot = client
        .fetch_status()
        .await
        .with_context(|| format!("fetching status from {}", client.base_url()))?;

    let mut engine = SyncEngine::new(config.sync.ordering, false);
    engine.apply(SyncEvent::PollCompleted {
        seq: 1,
        result: Ok(snapshot),
    });
    for line in engine.state().text_lines() {
        println!("{line}");
    }
    Ok(())
}

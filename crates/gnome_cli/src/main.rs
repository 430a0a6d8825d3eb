mod console;
mod sensor;

use anyhow::Result;
use clap::Parser;
use gnome_agent::{AgentCore, AgentEvent, AgentRunner};
use gnome_core::{AutognomeConfig, LightLevel};
use gnome_memory::{JsonlMemoryStore, JsonStateStore};
use gnome_mind::build_mind;
use sensor::FileSensor;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "autognome.toml")]
    config: String,

    /// Data directory (overrides the config)
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Seconds between pulses (overrides the config)
    #[arg(short, long)]
    tick_interval: Option<f64>,

    /// RNG seed for a reproducible mind
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = AutognomeConfig::load_or_default(&args.config);
    if let Some(dir) = args.data_dir {
        config.runtime.data_dir = dir;
    }
    if let Some(interval) = args.tick_interval {
        config.runtime.tick_interval_secs = interval;
    }

    let data_dir = PathBuf::from(&config.runtime.data_dir).join(&config.version);

    // Logs go to a rolling file so the console stays readable.
    let file_appender = tracing_appender::rolling::daily(data_dir.join("logs"), "gnome.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!("Initializing {} (AG-{})", config.name, config.version);

    let sensor = Arc::new(FileSensor::new(&data_dir)?);
    let long_term = Arc::new(JsonlMemoryStore::new(&data_dir).await?);
    let state_store = Arc::new(JsonStateStore::new(&data_dir).await?);
    let mind = build_mind(&config.mind, args.seed)?;

    console::print_startup(
        &config.name,
        &config.version,
        config.runtime.tick_interval_secs,
    );

    let tick_interval = config.runtime.tick_interval();
    let agent = Arc::new(
        AgentCore::new(config, mind, sensor.clone(), long_term, state_store).await?,
    );

    let (runner, mut events) = AgentRunner::new(agent.clone(), tick_interval);
    let runner_handle = runner.spawn();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(AgentEvent::Message(message)) => console::print_message(&message),
                Some(AgentEvent::Stopped) | None => break,
            },
            line = lines.next_line() => {
                match line? {
                    Some(line) => match handle_command(line.trim(), &agent, &sensor).await {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("command failed: {e}"),
                    },
                    // stdin closed
                    None => break,
                }
            }
        }
    }

    println!("\n{} going to sleep...", agent.config().name);
    agent.stop().await?;
    runner_handle.abort();
    Ok(())
}

/// Returns true when the user asked to quit.
async fn handle_command(
    line: &str,
    agent: &Arc<AgentCore>,
    sensor: &Arc<FileSensor>,
) -> Result<bool> {
    match line {
        "" => {}
        "quit" | "exit" => return Ok(true),
        "status" => console::print_status(&agent.get_status().await?),
        "stats" => console::print_stats(&agent.lifetime_stats().await),
        "summary" => match agent.session_summary().await {
            Ok(summary) => console::print_summary(&summary),
            Err(e) => println!("No session summary available: {e}"),
        },
        "rest" => {
            if let Some(message) = agent.start_rest().await? {
                console::print_message(&message);
            }
        }
        "light" => sensor.set(LightLevel::Light)?,
        "dark" => sensor.set(LightLevel::Dark)?,
        other => {
            if let Some(text) = other.strip_prefix("say ") {
                agent.record_user_message(text).await;
            } else {
                println!("Unknown command: {other}");
            }
        }
    }
    Ok(false)
}

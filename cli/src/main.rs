// ringer — desktop harness for the ringtone controller
//
// Drives the same controller the mobile bridge uses, backed by the simulated
// platform, so the lifecycle can be exercised without a device.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use config::{CapabilityPreset, Config};
use ringer_core::platform::SimulatedPlatform;
use ringer_core::{PlaybackState, RingtoneController, SoundCategory};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "ringer")]
#[command(about = "Ringer — system ringtone controller harness", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file (read-only)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Capabilities reported by the simulated engine
    #[arg(long, global = true, value_enum)]
    capabilities: Option<CapabilityPreset>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ring for a while, then stop
    Play {
        #[arg(short, long)]
        duration_ms: Option<u64>,
        #[arg(long, value_parser = parse_category)]
        category: Option<SoundCategory>,
        #[arg(long)]
        no_loop: bool,
        #[arg(long)]
        no_attributes: bool,
    },
    /// Stop (nothing is playing in a fresh process)
    Stop,
    /// Run play, play, stop, stop and check the handle count after each step
    Scenario,
    /// Read play/stop/state commands from stdin
    Shell,
    /// Show effective configuration
    Config,
}

fn parse_category(value: &str) -> Result<SoundCategory, String> {
    match value.to_ascii_lowercase().as_str() {
        "ringtone" => Ok(SoundCategory::Ringtone),
        "notification" => Ok(SoundCategory::Notification),
        "alarm" => Ok(SoundCategory::Alarm),
        other => Err(format!(
            "unknown category '{}' (expected ringtone, notification or alarm)",
            other
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(preset) = cli.capabilities {
        config.capabilities = preset;
    }
    tracing::debug!("Harness config: {:?}", config);

    match cli.command {
        Commands::Play {
            duration_ms,
            category,
            no_loop,
            no_attributes,
        } => {
            if let Some(ms) = duration_ms {
                config.play_duration_ms = ms;
            }
            if let Some(category) = category {
                config.ringtone.category = category;
            }
            if no_loop {
                config.ringtone.looping = false;
            }
            if no_attributes {
                config.ringtone.attributes = None;
            }
            cmd_play(config).await
        }
        Commands::Stop => cmd_stop(config).await,
        Commands::Scenario => cmd_scenario(config).await,
        Commands::Shell => cmd_shell(config).await,
        Commands::Config => cmd_config(&config),
    }
}

fn build(config: &Config) -> Result<(SimulatedPlatform, RingtoneController)> {
    let sim = SimulatedPlatform::new(config.capabilities.capabilities());
    let controller =
        RingtoneController::new(Arc::new(sim.clone()), Arc::new(sim.clone()), config.ringtone)
            .context("Invalid ringtone settings")?;
    Ok((sim, controller))
}

fn print_handles(sim: &SimulatedPlatform) {
    for id in sim.live_handles() {
        if let Some(handle) = sim.handle(id) {
            println!(
                "    handle {} {} looping={} attributes={}",
                id.to_string().bright_cyan(),
                handle.sound_uri.bright_yellow(),
                handle.looping,
                handle
                    .attributes
                    .map(|a| format!("{:?}/{:?}", a.usage, a.content_type))
                    .unwrap_or_else(|| "none".to_string()),
            );
        }
    }
}

async fn cmd_play(config: Config) -> Result<()> {
    let (sim, controller) = build(&config)?;

    println!("{}", "Playing default sound...".bold());
    controller
        .play()
        .await
        .context("Ringtone did not start")?;
    println!("  {} playing", "✓".green());
    print_handles(&sim);

    tokio::time::sleep(Duration::from_millis(config.play_duration_ms)).await;

    controller.stop().await?;
    println!(
        "  {} stopped after {} ms",
        "✓".green(),
        config.play_duration_ms
    );
    Ok(())
}

async fn cmd_stop(config: Config) -> Result<()> {
    let (_sim, controller) = build(&config)?;

    controller.stop().await?;
    println!("  {} stop resolved (state: {})", "✓".green(), controller.state().await);
    Ok(())
}

async fn cmd_scenario(config: Config) -> Result<()> {
    let (sim, controller) = build(&config)?;

    println!("{}", "Running lifecycle scenario".bold());
    println!();

    let mut failures = 0;
    let steps: [(&str, bool, usize); 4] = [
        ("play", true, 1),
        ("play", true, 1),
        ("stop", false, 0),
        ("stop", false, 0),
    ];

    for (name, is_play, expected) in steps {
        let result = if is_play {
            controller.play().await
        } else {
            controller.stop().await
        };
        let live = sim.live_handles().len();

        if result.is_ok() && live == expected {
            println!(
                "  {} {:<5} → ok, {} active handle(s)",
                "✓".green(),
                name,
                live
            );
        } else {
            failures += 1;
            println!(
                "  {} {:<5} → {:?}, {} active handle(s), expected {}",
                "✗".red(),
                name,
                result,
                live,
                expected
            );
        }
    }

    println!();
    if failures > 0 {
        anyhow::bail!("{} scenario step(s) failed", failures);
    }
    println!("{}", "All steps passed".green().bold());
    Ok(())
}

async fn cmd_shell(config: Config) -> Result<()> {
    let (sim, controller) = build(&config)?;

    println!("{}", "Commands: play, stop, state, handles, quit".dimmed());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match line.trim() {
            "" => continue,
            "play" => match controller.play().await {
                Ok(()) => println!("  {} true", "✓".green()),
                Err(e) => println!("  {} ERROR: {}", "✗".red(), e),
            },
            "stop" => {
                controller.stop().await?;
                println!("  {} true", "✓".green());
            }
            "state" => {
                let state = controller.state().await;
                let label = match state {
                    PlaybackState::Playing => state.to_string().green(),
                    PlaybackState::Idle => state.to_string().normal(),
                };
                println!("  {}", label);
            }
            "handles" => print_handles(&sim),
            "quit" | "exit" => break,
            other => println!("  {} unknown command '{}'", "?".yellow(), other),
        }
    }

    controller.stop().await?;
    Ok(())
}

fn cmd_config(config: &Config) -> Result<()> {
    println!("{}", "Effective configuration".bold());
    for key in Config::keys() {
        if let Some(value) = config.get(key) {
            println!("  {:<18} {}", key, value.bright_cyan());
        }
    }
    Ok(())
}

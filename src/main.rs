// src/main.rs
//! NMEA Fleet - simulated vehicles emitting NMEA 0183 sentences

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, SeedableRng};
use nmea_fleet::{display::terminal::TerminalDisplay, *};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Live fleet table
    Table,
    /// Raw sentences, one per line
    Nmea,
    /// Vehicle snapshot as JSON, one document per tick
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "nmea-fleet", version, about = "Simulated vehicle fleet emitting NMEA 0183 sentences")]
struct Args {
    /// Config file (defaults to ~/.config/nmea-fleet/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick period in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Place a vehicle at LAT,LON (repeatable, replaces configured vehicles)
    #[arg(short, long = "vehicle", value_name = "LAT,LON", value_parser = parse_position, allow_hyphen_values = true)]
    vehicles: Vec<Position>,

    /// Stop after this many ticks (the table is then printed once per tick)
    #[arg(short, long)]
    ticks: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = Output::Table)]
    output: Output,

    /// Seed for the telemetry random source (reproducible runs)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the effective configuration back to the config file
    #[arg(long)]
    save_config: bool,
}

fn parse_position(s: &str) -> std::result::Result<Position, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{}'", s))?;
    let latitude: f64 = lat.trim().parse().map_err(|e| format!("bad latitude '{}': {}", lat, e))?;
    let longitude: f64 = lon.trim().parse().map_err(|e| format!("bad longitude '{}': {}", lon, e))?;
    Ok(Position::new(latitude, longitude))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load_from(path),
        None => SimConfig::load(),
    }
    .context("loading configuration")?;

    if let Some(ms) = args.interval_ms {
        config.tick_interval_ms = ms;
    }
    if !args.vehicles.is_empty() {
        config.vehicles = args.vehicles.clone();
    }
    config.validate()?;

    if args.save_config {
        match &args.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
        .context("saving configuration")?;
    }

    let simulator = FleetSimulator::new(
        Fleet::with_trail_capacity(config.trail_capacity),
        config.tick_interval(),
    );
    for position in &config.vehicles {
        simulator.place_vehicle(position.latitude, position.longitude)?;
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    let mut updates = simulator.subscribe();
    let _ = updates.borrow_and_update();
    let handle = match args.seed {
        Some(seed) => simulator.start_with_rng(StdRng::seed_from_u64(seed))?,
        None => simulator.start()?,
    };

    match args.output {
        Output::Table if args.ticks.is_none() => {
            TerminalDisplay::new()
                .run(simulator.subscribe(), Arc::clone(&running))
                .await?;
        }
        output => {
            let mut remaining = args.ticks;
            while running.load(Ordering::Relaxed) && remaining != Some(0) {
                tokio::select! {
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = wait_for_stop(&running) => break,
                }
                let vehicles = updates.borrow_and_update().clone();
                print_snapshot(output, &vehicles)?;
                remaining = remaining.map(|n| n - 1);
            }
        }
    }

    simulator.stop();
    if let Err(e) = handle.await {
        bail!("simulation task failed: {}", e);
    }
    Ok(())
}

async fn wait_for_stop(running: &AtomicBool) {
    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
}

fn print_snapshot(output: Output, vehicles: &[Vehicle]) -> anyhow::Result<()> {
    match output {
        Output::Json => println!("{}", serde_json::to_string(vehicles)?),
        Output::Table => TerminalDisplay::new().render(&mut std::io::stdout(), vehicles)?,
        Output::Nmea => {
            for sentences in vehicles.iter().filter_map(|v| v.sentences.as_ref()) {
                println!("{}", sentences.gga);
                println!("{}", sentences.zda);
                println!("{}", sentences.gsv);
            }
        }
    }
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;
use tradesim_core::{
    step_turn, ConsoleObserver, JsonLinesObserver, ObserverRegistry, SimConfig, SimMetrics,
};

mod loader;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (topology, nations, trade power, merchants)
    #[arg(long)]
    scenario: PathBuf,

    /// Simulation config; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of turns to run
    #[arg(short, long, default_value_t = 10)]
    turns: u32,

    /// Only print these nations (repeatable)
    #[arg(long = "nation")]
    nations: Vec<String>,

    /// Write every turn report as a JSON line to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    log::info!("Starting tradesim...");

    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let (mut state, mut pending_inputs) = loader::load_scenario(&args.scenario)?;

    let mut registry = ObserverRegistry::new();
    let watched: Vec<&str> = args.nations.iter().map(String::as_str).collect();
    registry.register(Box::new(
        ConsoleObserver::stdout(&watched).with_color(std::io::stdout().is_terminal()),
    ));
    if let Some(path) = &args.report {
        registry.register(Box::new(JsonLinesObserver::create(path)?));
    }

    let mut metrics = SimMetrics::default();
    for _ in 0..args.turns {
        let (next, report) = step_turn(&state, &pending_inputs, &config, Some(&mut metrics))?;
        pending_inputs.clear();

        let observer_start = Instant::now();
        registry.notify(&report);
        metrics.observer_time += observer_start.elapsed();

        state = next;
    }
    registry.shutdown();

    log::info!(
        "Simulation finished after {} turns: {:.3} ms/turn (trade {:.3} ms, ledger {:.3} ms, observers {:.3} ms total)",
        state.turn,
        metrics.turn_avg_ms(),
        metrics.trade_time.as_secs_f64() * 1000.0,
        metrics.ledger_time.as_secs_f64() * 1000.0,
        metrics.observer_time.as_secs_f64() * 1000.0
    );

    Ok(())
}

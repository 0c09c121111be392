//! arena: runs a simulated swarm in the lab arena.
//!
//! Robots come from a scenario file or are scattered at random.  By default
//! every robot runs on its own thread at the configured tick period; with
//! `--lockstep` all robots are stepped on one thread, which is reproducible
//! for a fixed seed.  Ctrl-C stops the swarm and every robot receives its
//! final stop command.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fl_agent::{NoopObserver, RunSummary, StopSignal};
use fl_comms::InMemoryBus;
use fl_core::FlockConfig;
use fl_output::{CsvWriter, OutputObserver};
use fl_sim::{BoxedObserver, LockstepSim, Scenario, SimWorld, SwarmRunner};

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Simulated flocking swarm in a rectangular arena")]
struct Cli {
    /// Flocking parameters (JSON).  Defaults to the lab reference set.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Robot placements and world noise (JSON).  Overrides --robots.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of robots to scatter when no scenario is given.
    #[arg(long, short, default_value = "5")]
    robots: usize,

    /// Scatter seed.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Tick limit per robot, overriding MAX_TICKS / MAX_STOP_TIME.
    #[arg(long, short)]
    ticks: Option<u64>,

    /// Write agent_ticks.csv and run_summaries.csv here.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Step all robots on one thread instead of one thread per robot.
    #[arg(long)]
    lockstep: bool,

    /// Step budget in lockstep mode when no tick limit is configured.
    #[arg(long, default_value = "1000")]
    steps: u64,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 1. Configuration.
    let mut config = match &cli.config {
        Some(path) => FlockConfig::load_json(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FlockConfig::reference(),
    };
    if let Some(ticks) = cli.ticks {
        config.max_ticks = Some(ticks);
    }
    config.validate()?;

    // 2. Scenario and world.
    let scenario = match &cli.scenario {
        Some(path) => Scenario::load_json(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::scatter(cli.robots, config.arena(), cli.seed)?,
    };
    if scenario.robots.is_empty() {
        bail!("scenario has no robots");
    }
    let world = scenario.world(&config);
    let bus = InMemoryBus::new();
    info!(
        robots = scenario.robots.len(),
        arena_width = config.arena_width,
        arena_length = config.arena_length,
        tick_ms = config.tick_period_ms,
        lockstep = cli.lockstep,
        "starting swarm"
    );

    // 3. Output.
    let output = match &cli.output {
        Some(dir) => Some(OutputObserver::new(
            CsvWriter::new(dir).with_context(|| format!("creating output in {}", dir.display()))?,
        )),
        None => None,
    };
    let observer = || -> BoxedObserver {
        match &output {
            Some(obs) => Box::new(obs.clone()),
            None => Box::new(NoopObserver),
        }
    };

    // 4. Run.
    let t0 = Instant::now();
    let summaries = if cli.lockstep {
        run_lockstep(&cli, &config, &scenario, &world, &bus, observer())?
    } else {
        run_threaded(&config, &scenario, &world, &bus, &observer)?
    };
    let elapsed = t0.elapsed();

    if let Some(obs) = &output {
        let (rows, runs) = obs.counts();
        obs.finish().context("writing output")?;
        info!(tick_rows = rows, summary_rows = runs, "output written");
    }

    // 5. Report.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!();
    println!("{:<8} {:<8} {:<10} {:>9} {:>9} {:>9}", "Agent", "Ticks", "Reason", "x", "y", "heading");
    println!("{}", "-".repeat(58));
    for s in &summaries {
        let p = s.final_state.position;
        println!(
            "{:<8} {:<8} {:<10} {:>9.3} {:>9.3} {:>9.3}",
            s.agent.0,
            s.ticks,
            s.reason.as_str(),
            p.x,
            p.y,
            s.final_state.heading,
        );
    }
    if summaries.iter().any(|s| s.reason.is_fault()) {
        bail!("one or more robots stopped on a fault");
    }
    Ok(())
}

fn run_threaded(
    config:   &FlockConfig,
    scenario: &Scenario,
    world:    &SimWorld,
    bus:      &InMemoryBus,
    observer: &dyn Fn() -> BoxedObserver,
) -> Result<Vec<RunSummary>> {
    let specs = scenario
        .build_specs(world, bus)?
        .into_iter()
        .map(|spec| spec.observer(observer()))
        .collect();

    let runner = SwarmRunner::spawn(config, specs)?;
    let stop = runner.stop_signal();
    ctrlc::set_handler(move || stop.request()).context("installing Ctrl-C handler")?;

    let mut summaries = Vec::new();
    for (id, result) in runner.join_all() {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(e) => warn!(agent = %id, error = %e, "no summary"),
        }
    }
    Ok(summaries)
}

fn run_lockstep(
    cli:          &Cli,
    config:       &FlockConfig,
    scenario:     &Scenario,
    world:        &SimWorld,
    bus:          &InMemoryBus,
    mut observer: BoxedObserver,
) -> Result<Vec<RunSummary>> {
    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.request()).context("installing Ctrl-C handler")?;

    let max_steps = config.tick_limit().unwrap_or(cli.steps);
    let mut sim = LockstepSim::new(scenario.build_agents(config, world, bus, &stop)?);
    sim.start(&mut observer);
    while sim.steps() < max_steps && sim.running() > 0 && !stop.is_requested() {
        sim.step(&mut observer);
    }
    Ok(sim.finish(&mut observer))
}

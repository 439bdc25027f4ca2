use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use congestion_sim::simulation::{DelayFunction, GridScenario, RoadClosureParams, SimError};

#[derive(Parser)]
#[command(name = "congestion_sim")]
#[command(about = "Headless congestion-aware traffic simulation on a grid")]
struct Cli {
    /// Width and height of the road grid
    #[arg(long, default_value = "5")]
    grid: u32,

    /// Number of vehicles to release
    #[arg(long, default_value = "20")]
    vehicles: u32,

    /// Hops within which routing uses live congestion data
    #[arg(long, default_value = "2")]
    lookahead: u32,

    /// Hops between two replans (defaults to the lookahead)
    #[arg(long)]
    recompute: Option<u32>,

    /// Congestion delay function: linear or quadratic
    #[arg(long, default_value = "linear")]
    delay_function: DelayFunction,

    /// Vehicles a segment holds before congestion sets in
    #[arg(long, default_value = "1")]
    capacity: u32,

    /// Random road closures as probability:duration, e.g. 0.01:5
    #[arg(long)]
    closures: Option<RoadClosureParams>,

    /// Seed for the road closure agent
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Cycles between two vehicle releases
    #[arg(long, default_value = "1")]
    stagger: u64,

    /// Give up after this many cycles
    #[arg(long, default_value = "10000")]
    max_cycles: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let scenario = GridScenario {
        size: cli.grid,
        vehicles: cli.vehicles,
        lookahead: cli.lookahead,
        recompute: cli.recompute,
        delay_function: cli.delay_function,
        capacity: cli.capacity,
        closures: cli.closures,
        seed: cli.seed,
        stagger: cli.stagger,
    };
    info!("Running congestion simulation in headless mode...");
    info!("{:?}", scenario);

    let mut simulator = scenario.build().context("Invalid scenario")?;

    match simulator.run_for(cli.max_cycles) {
        Ok(cycles) => info!("Finished after {} cycles", cycles),
        Err(SimError::CycleBudgetExhausted(budget)) => {
            info!("Stopped after the cycle budget of {} cycles", budget)
        }
    }

    info!("=== SIMULATION COMPLETE ===");
    simulator.stats().log_summary();
    Ok(())
}

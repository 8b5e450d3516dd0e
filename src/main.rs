use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;

use orbit_common::SimulationConfig;
use orbit_engine::bench::run_benchmark;
use orbit_engine::OrbitRun;

/// Command-line arguments for the orbit engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the config.toml file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Number of rayon worker threads (overrides engine.num_threads)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Evolve the configured particles frame by frame (default)
    Run,
    /// Time repeated evolve calls on fresh random particle sets
    Bench,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Orbit Engine...");

    // --- Load Configuration ---
    let config = SimulationConfig::load(&args.config)?;
    debug!("Configuration: {:#?}", config);

    // --- Configure Rayon Thread Pool (Optional) ---
    if let Some(threads) = args.threads.or(config.engine.num_threads) {
        if threads == 0 {
            anyhow::bail!("--threads must be greater than 0.");
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    info!("Using {} Rayon threads.", rayon::current_num_threads());

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            let mut run = OrbitRun::new(config)?;
            info!("Initialized {} particles.", run.particles().len());
            debug!("Integrator Parameters: {:#?}", run.params());
            run.run()?;

            if let Some(last) = run.get_recorded_snapshots().last() {
                info!(
                    "Final state at t={:.5}: mean radius {:.6}, max radius {:.6}, {} non-finite particle(s).",
                    last.time, last.mean_radius, last.max_radius, last.non_finite_count
                );
            }
        }
        Command::Bench => {
            let params = config.get_sim_params();
            let report = run_benchmark(&config.benchmark, &params)?;
            let rounds: Vec<String> = report
                .rounds
                .iter()
                .map(|d| format!("{:.4}", d.as_secs_f64()))
                .collect();
            info!(
                "{} particles, dt={}, {} runs per round: rounds [{}] s",
                report.num_particles,
                report.dt,
                report.number,
                rounds.join(", ")
            );
            info!(
                "Best round {:.4} s ({:.3} ms per run), mean {:.4} s.",
                report.best().as_secs_f64(),
                report.best_per_run().as_secs_f64() * 1000.0,
                report.mean().as_secs_f64()
            );
        }
    }

    info!("Done.");
    Ok(())
}

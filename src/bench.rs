use crate::init::random_particles;
use crate::simulation::ParticleSimulator;
use anyhow::Result;
use log::{debug, info};
use orbit_common::{BenchmarkConfig, SimParams};
use rand::prelude::*;
use std::time::{Duration, Instant};

// Benchmark particles fill the square [-1, 1)^2 with ang_vel in [-1, 1).
const BENCH_POSITION_RANGE: f64 = 1.0;
const BENCH_ANG_VEL_MIN: f64 = -1.0;
const BENCH_ANG_VEL_MAX: f64 = 1.0;

/// Wall-clock timings of a benchmark: one entry per round, each covering
/// `number` runs.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub num_particles: u32,
    pub dt: f64,
    pub number: u32,
    pub rounds: Vec<Duration>,
}

impl BenchReport {
    /// Fastest round; the least noisy estimate.
    pub fn best(&self) -> Duration {
        self.rounds.iter().copied().min().unwrap_or_default()
    }

    pub fn mean(&self) -> Duration {
        if self.rounds.is_empty() {
            return Duration::ZERO;
        }
        self.rounds.iter().sum::<Duration>() / self.rounds.len() as u32
    }

    /// Best round divided by the runs it contains.
    pub fn best_per_run(&self) -> Duration {
        self.best() / self.number.max(1)
    }
}

/// Times `repeat` rounds of `number` runs. Each run builds a fresh random
/// particle set and evolves it once by `dt`; construction is part of the
/// measured time.
pub fn run_benchmark(bench: &BenchmarkConfig, params: &SimParams) -> Result<BenchReport> {
    let mut rng = StdRng::seed_from_u64(bench.seed);
    info!(
        "Benchmark: {} rounds x {} runs, {} particles, dt={} ({:?} schedule).",
        bench.repeat, bench.number, bench.num_particles, bench.dt, params.schedule
    );

    let mut rounds = Vec::with_capacity(bench.repeat as usize);
    for round in 0..bench.repeat {
        let start = Instant::now();
        for _ in 0..bench.number {
            let mut particles = random_particles(
                bench.num_particles as usize,
                BENCH_POSITION_RANGE,
                BENCH_ANG_VEL_MIN,
                BENCH_ANG_VEL_MAX,
                &mut rng,
            )?;
            ParticleSimulator::with_params(&mut particles, params.clone())?.evolve(bench.dt)?;
        }
        let elapsed = start.elapsed();
        debug!("Round {}: {:.3} s", round + 1, elapsed.as_secs_f64());
        rounds.push(elapsed);
    }

    Ok(BenchReport {
        num_particles: bench.num_particles,
        dt: bench.dt,
        number: bench.number,
        rounds,
    })
}

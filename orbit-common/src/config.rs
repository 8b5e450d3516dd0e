use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::{DegeneratePolicy, Schedule, SimParams, DEFAULT_PARALLEL_MIN_LEN, DEFAULT_TIMESTEP};
use std::path::Path;

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Fixed Euler sub-step inside every evolve call.
    #[serde(default = "default_timestep")]
    pub timestep: f64,
    /// Simulated time advanced by one evolve call (one frame of the driver).
    pub frame_dt: f64,
    pub num_frames: u32,
    #[serde(default = "default_record_interval_frames")]
    pub record_interval_frames: u32,
}

/// Where the initial particle collection comes from.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleSource {
    Random,
    Literal,
    Csv,
}

/// One particle written out literally in the config file.
#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct ParticleSpec {
    pub x: f64,
    pub y: f64,
    pub ang_vel: f64,
}

// Initial conditions for the simulation, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    #[serde(default = "default_source")]
    pub source: ParticleSource,
    // Random source
    #[serde(default)]
    pub num_particles: u32,
    #[serde(default)]
    pub seed: u64,
    /// Positions are drawn from [-position_range, position_range] on both axes.
    #[serde(default = "default_position_range")]
    pub position_range: f64,
    #[serde(default = "default_ang_vel_min")]
    pub ang_vel_min: f64,
    #[serde(default = "default_ang_vel_max")]
    pub ang_vel_max: f64,
    // Csv source
    #[serde(default)]
    pub csv_path: Option<String>,
    // Literal source
    #[serde(default)]
    pub particles: Vec<ParticleSpec>,
}

// Integrator execution settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub schedule: Schedule,
    /// Size of the global rayon pool; rayon's own default when unset.
    #[serde(default)]
    pub num_threads: Option<usize>,
    #[serde(default = "default_parallel_min_len")]
    pub parallel_min_len: usize,
    #[serde(default)]
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            schedule: Schedule::Serial,
            num_threads: None,
            parallel_min_len: DEFAULT_PARALLEL_MIN_LEN,
            degenerate_policy: DegeneratePolicy::Fail,
        }
    }
}

// Configuration for in-memory snapshot recording
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub positions_in_snapshot: bool,
}

/// Timing harness settings: `repeat` rounds of `number` runs, each run
/// building `num_particles` random particles and evolving them once by `dt`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BenchmarkConfig {
    #[serde(default = "default_bench_num_particles")]
    pub num_particles: u32,
    #[serde(default = "default_bench_dt")]
    pub dt: f64,
    #[serde(default = "default_bench_number")]
    pub number: u32,
    #[serde(default = "default_bench_repeat")]
    pub repeat: u32,
    #[serde(default)]
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_particles: default_bench_num_particles(),
            dt: default_bench_dt(),
            number: default_bench_number(),
            repeat: default_bench_repeat(),
            seed: 0,
        }
    }
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub timing: TimingConfig,
    pub initial_conditions: InitialConditions,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        if !timing.timestep.is_finite() || timing.timestep <= 0.0 {
            anyhow::bail!("timestep must be finite and positive.");
        }
        if !timing.frame_dt.is_finite() || timing.frame_dt < 0.0 {
            anyhow::bail!("frame_dt must be finite and non-negative.");
        }
        if timing.record_interval_frames == 0 {
            anyhow::bail!("record_interval_frames must be greater than 0.");
        }

        let ic = &self.initial_conditions;
        match ic.source {
            ParticleSource::Random => {
                if ic.num_particles == 0 {
                    anyhow::bail!("num_particles must be greater than 0 for the random source.");
                }
                if !ic.position_range.is_finite() || ic.position_range <= 0.0 {
                    anyhow::bail!("position_range must be finite and positive.");
                }
                if !ic.ang_vel_min.is_finite() || !ic.ang_vel_max.is_finite() || ic.ang_vel_min >= ic.ang_vel_max {
                    anyhow::bail!(
                        "ang_vel range [{}, {}) is empty or not finite.",
                        ic.ang_vel_min, ic.ang_vel_max
                    );
                }
            }
            ParticleSource::Literal => {
                if ic.particles.is_empty() {
                    anyhow::bail!("the literal source needs at least one [[initial_conditions.particles]] entry.");
                }
            }
            ParticleSource::Csv => {
                if ic.csv_path.as_deref().map_or(true, str::is_empty) {
                    anyhow::bail!("csv_path is required for the csv source.");
                }
            }
        }

        if self.engine.parallel_min_len == 0 {
            anyhow::bail!("parallel_min_len must be greater than 0.");
        }
        if self.engine.num_threads == Some(0) {
            anyhow::bail!("num_threads must be greater than 0 when set.");
        }

        let bench = &self.benchmark;
        if bench.number == 0 || bench.repeat == 0 {
            anyhow::bail!("benchmark number and repeat must be greater than 0.");
        }
        if bench.num_particles == 0 {
            anyhow::bail!("benchmark num_particles must be greater than 0.");
        }
        if !bench.dt.is_finite() || bench.dt < 0.0 {
            anyhow::bail!("benchmark dt must be finite and non-negative.");
        }

        Ok(())
    }

    /// Converts the configuration into the parameters handed to the integrator.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            timestep: self.timing.timestep,
            schedule: self.engine.schedule,
            parallel_min_len: self.engine.parallel_min_len,
            degenerate_policy: self.engine.degenerate_policy,
        }
    }
}

fn default_timestep() -> f64 {
    DEFAULT_TIMESTEP
}

fn default_record_interval_frames() -> u32 {
    1
}

fn default_source() -> ParticleSource {
    ParticleSource::Random
}

fn default_position_range() -> f64 {
    1.0
}

fn default_ang_vel_min() -> f64 {
    -1.0
}

fn default_ang_vel_max() -> f64 {
    1.0
}

fn default_parallel_min_len() -> usize {
    DEFAULT_PARALLEL_MIN_LEN
}

fn default_bench_num_particles() -> u32 {
    100
}

fn default_bench_dt() -> f64 {
    0.1
}

fn default_bench_number() -> u32 {
    10
}

fn default_bench_repeat() -> u32 {
    3
}

pub mod config;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    BenchmarkConfig, EngineConfig, InitialConditions, OutputConfig, ParticleSource, ParticleSpec,
    SimulationConfig, TimingConfig,
};
pub use sim_params::{
    DegeneratePolicy, Schedule, SimParams, DEFAULT_PARALLEL_MIN_LEN, DEFAULT_TIMESTEP,
};
pub use snapshot::Snapshot;
pub use vecmath::{Vec2, vec_to_angle};

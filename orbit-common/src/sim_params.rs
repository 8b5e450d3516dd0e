use serde::{Deserialize, Serialize};

/// Fixed internal sub-step used when nothing else is configured.
pub const DEFAULT_TIMESTEP: f64 = 1e-5;

/// Below this many particles the parallel schedule runs serially instead.
pub const DEFAULT_PARALLEL_MIN_LEN: usize = 1024;

/// How the per-particle loop inside each sub-step is executed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Sub-steps outer, particles inner, on the calling thread.
    #[default]
    Serial,
    /// One rayon fork/join over static chunks of the particle slice per sub-step.
    Parallel,
}

/// What `evolve` does with a particle sitting exactly on the origin,
/// where the tangential direction is undefined.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Reject the whole call before any particle is moved.
    #[default]
    Fail,
    /// Leave the offending particle where it is; everyone else advances.
    Skip,
    /// No guard: the division by zero poisons the particle with NaN/inf.
    Propagate,
}

/// Runtime parameters for the integrator, derived from the configuration.
#[derive(Debug, Clone)]
pub struct SimParams {
    /// Fixed Euler sub-step in simulated time units.
    pub timestep: f64,
    pub schedule: Schedule,
    /// Smallest chunk handed to a single rayon task. Slices no longer than
    /// this run serially even under the parallel schedule.
    pub parallel_min_len: usize,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for SimParams {
    fn default() -> Self {
        SimParams {
            timestep: DEFAULT_TIMESTEP,
            schedule: Schedule::Serial,
            parallel_min_len: DEFAULT_PARALLEL_MIN_LEN,
            degenerate_policy: DegeneratePolicy::Fail,
        }
    }
}

impl SimParams {
    pub fn with_timestep(mut self, timestep: f64) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_parallel_min_len(mut self, parallel_min_len: usize) -> Self {
        self.parallel_min_len = parallel_min_len;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }
}

/// A snapshot of the particle collection at a specific simulated time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Simulated time at which the snapshot was taken.
    pub time: f64,
    /// Number of evolve calls (frames) completed so far.
    pub frame: u32,
    pub total_particle_count: u32,
    /// Mean distance from the origin over all finite particles.
    pub mean_radius: f64,
    /// Largest distance from the origin over all finite particles.
    pub max_radius: f64,
    /// Mean signed rotation (radians) accumulated since the run started.
    /// Positive is counter-clockwise.
    pub mean_rotation: f64,
    /// Particles whose position is no longer finite.
    pub non_finite_count: u32,
    /// Per-particle `(x, y)`, only when `output.positions_in_snapshot` is set.
    pub positions: Option<Vec<(f64, f64)>>,
}

use thiserror::Error;

/// Crate-wide result type alias for the integrator.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported synchronously by [`ParticleSimulator`](crate::simulation::ParticleSimulator).
///
/// Every variant is raised before the offending `evolve` call moves any particle.
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected caller input: a negative or non-finite `dt`, or a bad sub-step size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A particle cannot be advanced: its tangential direction is undefined
    /// (the origin, or a non-finite position) or its `ang_vel` is not finite.
    #[error("degenerate state: particle {index} at ({x:e}, {y:e}) with ang_vel {ang_vel:e} cannot be advanced")]
    DegenerateState { index: usize, x: f64, y: f64, ang_vel: f64 },
}

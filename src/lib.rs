//! Explicit-Euler integrator for particles orbiting the origin, plus the
//! loading path, frame driver and timing harness built around it.

pub mod bench;
pub mod driver;
pub mod error;
pub mod init;
pub mod particle;
pub mod simulation;

pub use driver::OrbitRun;
pub use error::{Error, Result};
pub use particle::Particle;
pub use simulation::{evolve, ParticleSimulator};

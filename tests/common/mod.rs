//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use orbit_engine::Particle;

/// Tolerance used by the reference scenarios.
pub const TOL: f64 = 1e-5;

pub fn fequal(a: f64, b: f64) -> bool {
    (a - b).abs() < TOL
}

/// The three-particle reference set: counter-clockwise, clockwise and fast.
pub fn reference_particles() -> Vec<Particle> {
    vec![
        Particle::new(0.3, 0.5, 1.0),
        Particle::new(0.0, -0.5, -1.0),
        Particle::new(-0.1, -0.4, 3.0),
    ]
}

/// Expected positions of `reference_particles()` after `evolve(0.1)`.
pub const REFERENCE_AFTER_0_1: [(f64, f64); 3] = [
    (0.2102698450356825, 0.5438635787296997),
    (-0.0993347660567358, -0.4900342888538049),
    (0.1913585038252641, -0.3652272210744360),
];

pub fn bit_equal(a: &Particle, b: &Particle) -> bool {
    a.x.to_bits() == b.x.to_bits()
        && a.y.to_bits() == b.y.to_bits()
        && a.ang_vel.to_bits() == b.ang_vel.to_bits()
}

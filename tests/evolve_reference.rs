mod common;

use common::{fequal, reference_particles, REFERENCE_AFTER_0_1};
use orbit_common::SimParams;
use orbit_engine::{evolve, ParticleSimulator};

#[test]
fn evolve_matches_reference_positions() -> orbit_engine::Result<()> {
    let mut particles = reference_particles();
    let mut sim = ParticleSimulator::new(&mut particles);
    sim.evolve(0.1)?;

    for (p, &(x, y)) in particles.iter().zip(REFERENCE_AFTER_0_1.iter()) {
        assert!(fequal(p.x, x), "x: got {}, expected {}", p.x, x);
        assert!(fequal(p.y, y), "y: got {}, expected {}", p.y, y);
    }
    Ok(())
}

#[test]
fn longer_interval_moves_past_reference_positions() -> orbit_engine::Result<()> {
    let mut particles = reference_particles();
    ParticleSimulator::new(&mut particles).evolve(0.2)?;

    for (p, &(x, y)) in particles.iter().zip(REFERENCE_AFTER_0_1.iter()) {
        assert!(!fequal(p.x, x), "x unexpectedly matched after evolve(0.2): {}", p.x);
        assert!(!fequal(p.y, y), "y unexpectedly matched after evolve(0.2): {}", p.y);
    }
    Ok(())
}

#[test]
fn zero_dt_changes_nothing() -> orbit_engine::Result<()> {
    let original = reference_particles();
    let mut particles = original.clone();
    ParticleSimulator::new(&mut particles).evolve(0.0)?;

    for (p, q) in particles.iter().zip(&original) {
        assert!(common::bit_equal(p, q));
    }
    Ok(())
}

#[test]
fn free_function_writes_through_to_caller_storage() -> orbit_engine::Result<()> {
    let mut particles = reference_particles();
    evolve(&mut particles, 0.1)?;
    // ang_vel is read, never written
    assert_eq!(particles[0].ang_vel, 1.0);
    assert_eq!(particles[1].ang_vel, -1.0);
    assert_eq!(particles[2].ang_vel, 3.0);
    assert!(fequal(particles[2].x, REFERENCE_AFTER_0_1[2].0));
    Ok(())
}

#[test]
fn split_calls_agree_with_single_call() -> orbit_engine::Result<()> {
    // A power-of-two sub-step keeps every step count exact.
    let params = SimParams::default().with_timestep(1.0 / 1024.0);
    let mut whole = reference_particles();
    let mut halves = reference_particles();
    ParticleSimulator::with_params(&mut whole, params.clone())?.evolve(0.25)?;
    {
        let mut sim = ParticleSimulator::with_params(&mut halves, params)?;
        sim.evolve(0.125)?;
        sim.evolve(0.125)?;
    }
    for (p, q) in whole.iter().zip(&halves) {
        assert!(common::bit_equal(p, q));
    }
    Ok(())
}

#[test]
fn negative_dt_is_rejected_without_moving_anything() {
    let original = reference_particles();
    let mut particles = original.clone();
    let err = ParticleSimulator::new(&mut particles).evolve(-0.1).unwrap_err();
    assert!(matches!(err, orbit_engine::Error::InvalidArgument(_)));
    for (p, q) in particles.iter().zip(&original) {
        assert!(common::bit_equal(p, q));
    }
}

#[test]
fn non_finite_dt_is_rejected() {
    let mut particles = reference_particles();
    let mut sim = ParticleSimulator::new(&mut particles);
    assert!(matches!(sim.evolve(f64::NAN), Err(orbit_engine::Error::InvalidArgument(_))));
    assert!(matches!(sim.evolve(f64::INFINITY), Err(orbit_engine::Error::InvalidArgument(_))));
}

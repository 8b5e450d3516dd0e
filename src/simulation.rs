use crate::error::{Error, Result};
use crate::particle::Particle;
use log::{debug, trace, warn};
use orbit_common::{DegeneratePolicy, Schedule, SimParams};
use rayon::prelude::*;

/// Advances a caller-owned collection of particles along their circular paths.
///
/// The simulator only borrows the particles: every `evolve` writes straight into
/// the caller's storage, and the slice's length and order never change.
pub struct ParticleSimulator<'a> {
    particles: &'a mut [Particle],
    params: SimParams,
}

impl<'a> ParticleSimulator<'a> {
    /// Wraps `particles` with the default parameters (`timestep = 1e-5`,
    /// serial schedule, failing on degenerate particles).
    pub fn new(particles: &'a mut [Particle]) -> Self {
        Self { particles, params: SimParams::default() }
    }

    /// Wraps `particles` with explicit parameters.
    pub fn with_params(particles: &'a mut [Particle], params: SimParams) -> Result<Self> {
        if !params.timestep.is_finite() || params.timestep <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "timestep must be finite and > 0, got {}",
                params.timestep
            )));
        }
        if params.parallel_min_len == 0 {
            return Err(Error::InvalidArgument("parallel_min_len must be > 0".into()));
        }
        Ok(Self { particles, params })
    }

    /// Advances every particle by `dt` of simulated time using
    /// `trunc(dt / timestep)` explicit Euler sub-steps.
    ///
    /// The fraction of a sub-step left over is dropped, not carried into the
    /// next call. `ang_vel` is never modified.
    ///
    /// # Errors
    /// * [`Error::InvalidArgument`] if `dt` is negative or not finite.
    /// * [`Error::DegenerateState`] under [`DegeneratePolicy::Fail`] if a particle
    ///   sits on the origin, holds a non-finite position or has a non-finite
    ///   `ang_vel`. Nothing is moved in either case.
    pub fn evolve(&mut self, dt: f64) -> Result<()> {
        let nsteps = self.substeps_for(dt)?;
        if nsteps == 0 {
            trace!("evolve({}) is shorter than one sub-step; nothing to do", dt);
            return Ok(());
        }

        let policy = self.params.degenerate_policy;
        if policy == DegeneratePolicy::Fail {
            // Euler steps never shrink the radius, so a particle that passes here
            // cannot reach the origin during this call.
            if let Some(index) = first_degenerate(self.particles) {
                let p = self.particles[index];
                return Err(Error::DegenerateState { index, x: p.x, y: p.y, ang_vel: p.ang_vel });
            }
        }
        let guard = policy == DegeneratePolicy::Skip;
        let timestep = self.params.timestep;

        debug!(
            "Evolving {} particles by dt={} ({} sub-steps of {}, {:?})",
            self.particles.len(),
            dt,
            nsteps,
            timestep,
            self.params.schedule
        );

        let skipped = match self.params.schedule {
            Schedule::Parallel if self.particles.len() > self.params.parallel_min_len => {
                let chunk_len = self
                    .params
                    .parallel_min_len
                    .max(self.particles.len().div_ceil(rayon::current_num_threads()));
                run_parallel(self.particles, nsteps, timestep, guard, chunk_len)
            }
            _ => run_serial(self.particles, nsteps, timestep, guard),
        };

        if skipped > 0 {
            warn!(
                "Skipped {} particle sub-steps that could not advance (origin, non-finite position or ang_vel).",
                skipped
            );
        }
        Ok(())
    }

    /// Number of sub-steps `evolve(dt)` would run.
    pub fn substeps_for(&self, dt: f64) -> Result<u64> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "dt must be finite and >= 0, got {}",
                dt
            )));
        }
        // `as` truncates toward zero (and saturates for absurdly large ratios).
        Ok((dt / self.params.timestep) as u64)
    }

    /// Read access to the borrowed particles.
    pub fn particles(&self) -> &[Particle] {
        self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn timestep(&self) -> f64 {
        self.params.timestep
    }
}

/// Advances `particles` by `dt` with the default parameters.
pub fn evolve(particles: &mut [Particle], dt: f64) -> Result<()> {
    ParticleSimulator::new(particles).evolve(dt)
}

#[inline(always)]
fn norm_of(p: &Particle) -> f64 {
    (p.x * p.x + p.y * p.y).sqrt()
}

#[inline(always)]
fn has_direction(norm: f64) -> bool {
    norm > 0.0 && norm.is_finite()
}

/// A particle can only move if it has a tangent and a finite speed along it.
#[inline(always)]
fn can_advance(p: &Particle, norm: f64) -> bool {
    has_direction(norm) && p.ang_vel.is_finite()
}

fn first_degenerate(particles: &[Particle]) -> Option<usize> {
    particles.iter().position(|p| !can_advance(p, norm_of(p)))
}

/// One explicit Euler sub-step for a single particle.
///
/// Returns `false` if `guard` is set and the particle was left untouched
/// because its tangential direction or its speed is undefined.
#[inline(always)]
fn advance(p: &mut Particle, timestep: f64, guard: bool) -> bool {
    let norm = norm_of(p);
    if guard && !can_advance(p, norm) {
        return false;
    }
    // Unit tangent for counter-clockwise motion
    let v_x = -p.y / norm;
    let v_y = p.x / norm;
    let d_x = timestep * p.ang_vel * v_x;
    let d_y = timestep * p.ang_vel * v_y;
    p.x += d_x;
    p.y += d_y;
    true
}

fn run_serial(particles: &mut [Particle], nsteps: u64, timestep: f64, guard: bool) -> u64 {
    let mut skipped = 0u64;
    for _ in 0..nsteps {
        for p in particles.iter_mut() {
            if !advance(p, timestep, guard) {
                skipped += 1;
            }
        }
    }
    skipped
}

/// Each sub-step is a fork/join over static chunks; the join is the barrier
/// that keeps sub-step k+1 from starting before every particle finished k.
fn run_parallel(
    particles: &mut [Particle],
    nsteps: u64,
    timestep: f64,
    guard: bool,
    chunk_len: usize,
) -> u64 {
    let mut skipped = 0u64;
    for _ in 0..nsteps {
        skipped += particles
            .par_chunks_mut(chunk_len)
            .map(|chunk| {
                chunk
                    .iter_mut()
                    .map(|p| u64::from(!advance(p, timestep, guard)))
                    .sum::<u64>()
            })
            .sum::<u64>();
    }
    skipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_substep_matches_tangent_formula() {
        let mut p = Particle::new(0.3, 0.5, 2.0);
        let ts = 0.01;
        assert!(advance(&mut p, ts, false));
        let norm = (0.3f64 * 0.3 + 0.5 * 0.5).sqrt();
        assert!((p.x - (0.3 - ts * 2.0 * 0.5 / norm)).abs() < 1e-15);
        assert!((p.y - (0.5 + ts * 2.0 * 0.3 / norm)).abs() < 1e-15);
        assert_eq!(p.ang_vel, 2.0);
    }

    #[test]
    fn guarded_advance_leaves_origin_alone() {
        let mut p = Particle::new(0.0, 0.0, 1.0);
        assert!(!advance(&mut p, 1e-5, true));
        assert_eq!((p.x, p.y), (0.0, 0.0));

        let mut q = Particle::new(0.5, 0.0, f64::INFINITY);
        assert!(!advance(&mut q, 1e-5, true));
        assert_eq!((q.x, q.y), (0.5, 0.0));
    }

    #[test]
    fn substeps_truncate_toward_zero() {
        let mut particles = vec![Particle::new(1.0, 0.0, 1.0)];
        let params = SimParams::default().with_timestep(0.1);
        let sim = ParticleSimulator::with_params(&mut particles, params).unwrap();
        assert_eq!(sim.substeps_for(0.0).unwrap(), 0);
        assert_eq!(sim.substeps_for(0.05).unwrap(), 0);
        assert_eq!(sim.substeps_for(0.25).unwrap(), 2);
        assert!(sim.substeps_for(-0.1).is_err());
        assert!(sim.substeps_for(f64::NAN).is_err());
        assert!(sim.substeps_for(f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_bad_timestep() {
        let mut particles = vec![Particle::new(1.0, 0.0, 1.0)];
        for ts in [0.0, -1e-5, f64::NAN] {
            let params = SimParams::default().with_timestep(ts);
            assert!(matches!(
                ParticleSimulator::with_params(&mut particles, params),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn serial_and_parallel_count_the_same_skips() {
        let mut a = vec![Particle::new(0.0, 0.0, 1.0), Particle::new(0.5, 0.0, 1.0)];
        let mut b = a.clone();
        assert_eq!(run_serial(&mut a, 3, 1e-3, true), 3);
        assert_eq!(run_parallel(&mut b, 3, 1e-3, true, 1), 3);
        assert_eq!(a[1].x.to_bits(), b[1].x.to_bits());
        assert_eq!(a[1].y.to_bits(), b[1].y.to_bits());
    }
}

use crate::init::place_initial_particles;
use crate::particle::Particle;
use crate::simulation::ParticleSimulator;
use anyhow::Result;
use log::{debug, error, info, trace, warn};
use orbit_common::{SimParams, SimulationConfig, Snapshot, Vec2};
use std::time::Instant;

/// Frame-by-frame driver: owns the particle storage and lends it to a
/// [`ParticleSimulator`] for one `evolve(frame_dt)` per frame, the way an
/// animation loop would, recording in-memory snapshots along the way.
pub struct OrbitRun {
    config: SimulationConfig,
    params: SimParams,
    particles: Vec<Particle>,
    /// Simulated time actually covered by one frame (whole sub-steps only).
    effective_frame_dt: f64,
    current_frame: u32,
    /// Positions seen at the end of the previous frame, for rotation tracking.
    previous_positions: Vec<Vec2>,
    /// Signed rotation per particle since the start of the run.
    accumulated_rotation: Vec<f64>,
    recorded_snapshots: Vec<Snapshot>,
}

impl OrbitRun {
    /// Places the initial particles described by `config` and prepares the run.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let particles = place_initial_particles(&config)?;
        Self::with_particles(config, particles)
    }

    /// Prepares a run over an already-built particle collection.
    pub fn with_particles(config: SimulationConfig, mut particles: Vec<Particle>) -> Result<Self> {
        config.validate()?;
        let params = config.get_sim_params();
        let substeps = ParticleSimulator::with_params(&mut particles, params.clone())?
            .substeps_for(config.timing.frame_dt)?;
        let effective_frame_dt = substeps as f64 * params.timestep;
        if substeps == 0 {
            warn!(
                "frame_dt ({}) is shorter than one sub-step ({}); particles will not move.",
                config.timing.frame_dt, params.timestep
            );
        }

        let previous_positions = particles.iter().map(Particle::position).collect();
        let accumulated_rotation = vec![0.0; particles.len()];
        Ok(Self {
            config,
            params,
            particles,
            effective_frame_dt,
            current_frame: 0,
            previous_positions,
            accumulated_rotation,
            recorded_snapshots: Vec::new(),
        })
    }

    /// Advances the particles by one frame (`frame_dt` of simulated time).
    pub fn step(&mut self) -> Result<()> {
        let frame_dt = self.config.timing.frame_dt;
        ParticleSimulator::with_params(&mut self.particles, self.params.clone())?.evolve(frame_dt)?;
        self.track_rotation();
        self.current_frame += 1;
        Ok(())
    }

    /// Runs every configured frame, recording a snapshot at t=0, every
    /// `record_interval_frames` frames, and after the last frame.
    pub fn run(&mut self) -> Result<()> {
        let total_frames = self.config.timing.num_frames;
        let record_interval = self.config.timing.record_interval_frames.max(1);
        info!(
            "Running {} frames of dt={} ({} sim time per frame), recording every {} frames.",
            total_frames, self.config.timing.frame_dt, self.effective_frame_dt, record_interval
        );

        self.record_snapshot();
        let start_time = Instant::now();
        for frame in 0..total_frames {
            let frame_start = Instant::now();
            if let Err(e) = self.step() {
                error!("Error during simulation step {}: {:#}", frame + 1, e);
                return Err(e);
            }
            let frame_duration = frame_start.elapsed();

            let is_record_frame = (frame + 1) % record_interval == 0;
            let is_last_frame = frame + 1 == total_frames;
            if is_record_frame || is_last_frame {
                let snapshot = self.record_snapshot();
                info!(
                    "Frame [{}/{}] (t={:.5}) | mean r: {:.6} | rotation: {:+.5} rad | Frame Time: {:6.2} ms",
                    frame + 1,
                    total_frames,
                    snapshot.time,
                    snapshot.mean_radius,
                    snapshot.mean_rotation,
                    frame_duration.as_secs_f64() * 1000.0
                );
            } else {
                trace!(
                    "Frame [{}/{}] completed in {:.2} ms",
                    frame + 1,
                    total_frames,
                    frame_duration.as_secs_f64() * 1000.0
                );
            }
        }

        info!("Run finished in {:.3} seconds.", start_time.elapsed().as_secs_f64());
        Ok(())
    }

    /// Summarizes the current particle state and stores it as a snapshot.
    pub fn record_snapshot(&mut self) -> &Snapshot {
        let mut finite_count = 0u32;
        let mut radius_sum = 0.0;
        let mut max_radius: f64 = 0.0;
        let mut rotation_sum = 0.0;
        for (p, rotation) in self.particles.iter().zip(&self.accumulated_rotation) {
            if !p.is_finite() {
                continue;
            }
            let r = p.radius();
            finite_count += 1;
            radius_sum += r;
            max_radius = max_radius.max(r);
            rotation_sum += rotation;
        }
        let total = self.particles.len() as u32;
        let (mean_radius, mean_rotation) = if finite_count > 0 {
            (radius_sum / finite_count as f64, rotation_sum / finite_count as f64)
        } else {
            (0.0, 0.0)
        };

        let positions = if self.config.output.positions_in_snapshot {
            Some(self.get_results())
        } else {
            None
        };

        let snapshot = Snapshot {
            time: self.current_time(),
            frame: self.current_frame,
            total_particle_count: total,
            mean_radius,
            max_radius,
            mean_rotation,
            non_finite_count: total - finite_count,
            positions,
        };
        debug!("Recorded snapshot at frame {} (t={}).", snapshot.frame, snapshot.time);
        self.recorded_snapshots.push(snapshot);
        &self.recorded_snapshots[self.recorded_snapshots.len() - 1]
    }

    // Assumes less than half a turn per frame; larger jumps alias.
    fn track_rotation(&mut self) {
        for ((p, prev), rotation) in self
            .particles
            .iter()
            .zip(self.previous_positions.iter_mut())
            .zip(self.accumulated_rotation.iter_mut())
        {
            let current = p.position();
            if p.is_finite() && prev.x.is_finite() && prev.y.is_finite() {
                *rotation += prev.signed_angle_to(current);
            }
            *prev = current;
        }
    }

    /// Current `(x, y)` of every particle, in order.
    pub fn get_results(&self) -> Vec<(f64, f64)> {
        self.particles.iter().map(|p| (p.x, p.y)).collect()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Simulated time covered so far.
    pub fn current_time(&self) -> f64 {
        self.current_frame as f64 * self.effective_frame_dt
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn accumulated_rotation(&self) -> &[f64] {
        &self.accumulated_rotation
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn get_recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }
}

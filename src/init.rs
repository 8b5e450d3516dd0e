use crate::particle::Particle;
use anyhow::{Context, Result};
use log::{info, warn};
use orbit_common::{ParticleSource, SimulationConfig};
use rand::distr::Uniform;
use rand::prelude::*;
use std::fs::File;
use std::io::Read;

/// Builds the initial particle collection described by `config.initial_conditions`.
pub fn place_initial_particles(config: &SimulationConfig) -> Result<Vec<Particle>> {
    let ic = &config.initial_conditions;
    let particles = match ic.source {
        ParticleSource::Random => {
            let mut rng = StdRng::seed_from_u64(ic.seed);
            random_particles(
                ic.num_particles as usize,
                ic.position_range,
                ic.ang_vel_min,
                ic.ang_vel_max,
                &mut rng,
            )?
        }
        ParticleSource::Literal => ic.particles.iter().copied().map(Particle::from).collect(),
        ParticleSource::Csv => {
            let path = ic
                .csv_path
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("csv_path is required for the csv source"))?;
            let file = File::open(path)
                .with_context(|| format!("Failed to open particle file '{}'", path))?;
            load_particles_csv(file)
                .with_context(|| format!("Failed to load particles from '{}'", path))?
        }
    };

    let at_origin = particles.iter().filter(|p| p.x == 0.0 && p.y == 0.0).count();
    if at_origin > 0 {
        warn!(
            "{} particle(s) start exactly at the origin; handled per degenerate_policy ({:?}).",
            at_origin, config.engine.degenerate_policy
        );
    }
    info!("Placed {} particles from {:?} source.", particles.len(), ic.source);
    Ok(particles)
}

/// Uniformly random particles: both coordinates in `[-position_range, position_range)`,
/// angular velocity in `[ang_vel_min, ang_vel_max)`.
pub fn random_particles<R: Rng>(
    count: usize,
    position_range: f64,
    ang_vel_min: f64,
    ang_vel_max: f64,
    rng: &mut R,
) -> Result<Vec<Particle>> {
    let pos_dist = Uniform::new(-position_range, position_range)?;
    let ang_vel_dist = Uniform::new(ang_vel_min, ang_vel_max)?;
    let particles = (0..count)
        .map(|_| {
            let x = rng.sample(&pos_dist);
            let y = rng.sample(&pos_dist);
            let ang_vel = rng.sample(&ang_vel_dist);
            Particle::new(x, y, ang_vel)
        })
        .collect();
    Ok(particles)
}

/// Reads particles from CSV with an `x,y,ang_vel` header row.
pub fn load_particles_csv<R: Read>(reader: R) -> Result<Vec<Particle>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut particles = Vec::new();
    for (row, record) in rdr.deserialize::<Particle>().enumerate() {
        let p = record.with_context(|| format!("Failed to parse particle on data row {}", row + 1))?;
        if !p.is_finite() || !p.ang_vel.is_finite() {
            anyhow::bail!("Particle on data row {} has non-finite fields.", row + 1);
        }
        particles.push(p);
    }
    if particles.is_empty() {
        anyhow::bail!("Particle file contains no rows.");
    }
    Ok(particles)
}

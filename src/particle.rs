use orbit_common::{ParticleSpec, Vec2, vec_to_angle};
use serde::Deserialize;

/// A point on a circular path around the origin.
///
/// Plain value container: the integrator reads and writes the fields directly.
/// No equality is derived; compare field-by-field with a tolerance.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Signed angular velocity; positive rotates counter-clockwise.
    pub ang_vel: f64,
}

impl Particle {
    #[inline(always)]
    pub fn new(x: f64, y: f64, ang_vel: f64) -> Self {
        Self { x, y, ang_vel }
    }

    #[inline(always)]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Distance from the origin.
    #[inline(always)]
    pub fn radius(&self) -> f64 {
        self.position().length()
    }

    /// Polar angle of the position in `(-pi, pi]`.
    #[inline(always)]
    pub fn angle(&self) -> f64 {
        vec_to_angle(self.position())
    }

    #[inline(always)]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<ParticleSpec> for Particle {
    fn from(spec: ParticleSpec) -> Self {
        Particle::new(spec.x, spec.y, spec.ang_vel)
    }
}

use serde::{Serialize, Deserialize};

// Basic 2D vector in double precision (the integrator works in f64 throughout)
#[derive(Copy, Clone, Default, Debug, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[inline(always)]
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
    #[inline(always)]
    pub fn length_squared(self) -> f64 { self.x * self.x + self.y * self.y }
    #[inline(always)]
    pub fn length(self) -> f64 { self.length_squared().sqrt() }
    #[inline(always)]
    pub fn dot(self, other: Self) -> f64 { self.x * other.x + self.y * other.y }
    /// z-component of the 3D cross product of `self` and `other`.
    #[inline(always)]
    pub fn cross(self, other: Self) -> f64 { self.x * other.y - self.y * other.x }

    /// Signed angle in radians from `self` to `other`, in `(-pi, pi]`.
    /// Positive means counter-clockwise.
    #[inline(always)]
    pub fn signed_angle_to(self, other: Self) -> f64 {
        self.cross(other).atan2(self.dot(other))
    }
}

#[inline(always)]
pub fn vec_to_angle(v: Vec2) -> f64 { v.y.atan2(v.x) }

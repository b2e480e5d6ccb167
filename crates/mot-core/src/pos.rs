//! World-space vector and position types.
//!
//! Coordinates are single-precision, matching the width the client protocol
//! uses for object positions.  A world unit is roughly one yard; transports
//! span at most ~100 units, so f32 gives sub-millimetre precision over the
//! whole passenger frame.

use std::ops::{Add, Mul, Sub};

/// A point or direction in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Manhattan distance to `other` — the cheap metric used to decide
    /// whether a carrier has moved far enough to refresh passenger frames.
    #[inline]
    pub fn manhattan(self, other: Vec3) -> f32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ── Position ──────────────────────────────────────────────────────────────────

/// A position plus facing, the full placement of an object on a map.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Yaw in radians, normalised to `[0, 2π)`.
    pub o: f32,
}

impl Position {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, o: f32) -> Self {
        Self { x, y, z, o: normalize_orientation(o) }
    }

    #[inline]
    pub fn from_vec3(v: Vec3, o: f32) -> Self {
        Self::new(v.x, v.y, v.z, o)
    }

    #[inline]
    pub fn vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2} | {:.3} rad)", self.x, self.y, self.z, self.o)
    }
}

// ── Orientation ───────────────────────────────────────────────────────────────

/// Wrap an angle in radians into `[0, 2π)`.
#[inline]
pub fn normalize_orientation(o: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let o = o % tau;
    if o < 0.0 {
        o + tau
    } else {
        o
    }
}

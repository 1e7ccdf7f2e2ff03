//! 3D vector used by every simulation layer
//!
//! The simulation runs on a flat forest floor: enemies rotate around the Y
//! axis only, and terrain obstacles are vertical cylinders. The planar helpers
//! here ignore the Y component.

use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// 3D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane
    #[inline]
    pub const fn ground(x: f32, z: f32) -> Self {
        Self::new(x, 0.0, z)
    }

    /// Unit forward vector for a yaw rotation.
    ///
    /// Yaw 0 faces +Z, positive yaw turns toward +X.
    #[inline]
    pub fn from_yaw(yaw: f32) -> Self {
        Self::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Yaw that makes [`Vec3::from_yaw`] point along this vector's planar part
    #[inline]
    pub fn yaw(self) -> f32 {
        self.x.atan2(self.z)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Distance on the XZ plane
    #[inline]
    pub fn planar_distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Copy with Y zeroed
    #[inline]
    pub fn flatten(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    #[inline]
    pub fn normalize_or_zero(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 1e-10 && len_sq.is_finite() {
            self / len_sq.sqrt()
        } else {
            Self::ZERO
        }
    }

    /// Normalize, or return `fallback` when the vector is degenerate
    /// (zero length, NaN or infinite).
    #[inline]
    pub fn normalize_or(self, fallback: Self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > 1e-10 && len_sq.is_finite() {
            self / len_sq.sqrt()
        } else {
            fallback
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    #[inline]
    fn from(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl MulAssign<f32> for Vec3 {
    #[inline]
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

/// Angle between two directions in radians, in `[0, PI]`.
///
/// Returns 0 when either vector is degenerate.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let mag_a = a.length();
    let mag_b = b.length();

    if mag_a <= f32::EPSILON || mag_b <= f32::EPSILON || !mag_a.is_finite() || !mag_b.is_finite() {
        return 0.0;
    }

    let cos_angle = (a.dot(b) / (mag_a * mag_b)).clamp(-1.0, 1.0);
    cos_angle.acos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_yaw_forward() {
        let f = Vec3::from_yaw(0.0);
        assert_abs_diff_eq!(f.z, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(f.x, 0.0, epsilon = 1e-6);

        let right = Vec3::from_yaw(FRAC_PI_2);
        assert_abs_diff_eq!(right.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Vec3::new(1.0, 0.0, 0.0).yaw(), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(Vec3::ZERO.normalize_or_zero(), Vec3::ZERO);
        assert_eq!(Vec3::ZERO.normalize_or(Vec3::Z), Vec3::Z);
        assert_eq!(Vec3::new(f32::NAN, 0.0, 0.0).normalize_or(Vec3::Z), Vec3::Z);

        let n = Vec3::new(3.0, 0.0, 4.0).normalize_or(Vec3::Z);
        assert_abs_diff_eq!(n.length(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_planar_distance_ignores_height() {
        let a = Vec3::new(0.0, 10.0, 0.0);
        let b = Vec3::new(3.0, -5.0, 4.0);
        assert_abs_diff_eq!(a.planar_distance(b), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_between() {
        assert_abs_diff_eq!(angle_between(Vec3::Z, Vec3::X), FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(angle_between(Vec3::Z, -Vec3::Z), PI, epsilon = 1e-6);
        assert_eq!(angle_between(Vec3::ZERO, Vec3::X), 0.0);
    }
}

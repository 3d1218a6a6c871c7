//! Mathematical types shared across the simulation.
//!
//! These are the canonical representations stored in component memory,
//! so they stay `#[repr(C)]` and `Pod`.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, velocity, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Vector with all components set to `v`
    #[must_use]
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    #[must_use]
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero if degenerate
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Clamps the magnitude to `max`, preserving direction
    #[must_use]
    pub fn clamp_length(self, max: f32) -> Self {
        let len = self.length();
        if len > max && len > f32::EPSILON {
            self * (max / len)
        } else {
            self
        }
    }

    /// Component-wise multiplication
    #[must_use]
    pub fn mul_component(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Component-wise clamp into `[min, max]`
    #[must_use]
    pub fn clamp_component(self, min: f32, max: f32) -> Self {
        Self::new(
            self.x.clamp(min, max),
            self.y.clamp(min, max),
            self.z.clamp(min, max),
        )
    }

    /// Linear interpolation, `t` in `[0, 1]`
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// 2D Vector - raw stick samples, filter state
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// 6-axis command vector: three rotational and three translational
/// channels, each normalized to `[-1, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec6 {
    /// Rotation about X
    pub pitch: f32,
    /// Rotation about Y
    pub yaw: f32,
    /// Rotation about Z
    pub roll: f32,
    /// Lateral translation
    pub strafe_x: f32,
    /// Vertical translation
    pub strafe_y: f32,
    /// Forward/backward translation
    pub throttle: f32,
}

impl Vec6 {
    /// Creates a new Vec6
    #[must_use]
    pub const fn new(
        pitch: f32,
        yaw: f32,
        roll: f32,
        strafe_x: f32,
        strafe_y: f32,
        throttle: f32,
    ) -> Self {
        Self { pitch, yaw, roll, strafe_x, strafe_y, throttle }
    }

    /// All channels zero
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    /// Converts to array in field order
    #[must_use]
    pub const fn to_array(self) -> [f32; 6] {
        [self.pitch, self.yaw, self.roll, self.strafe_x, self.strafe_y, self.throttle]
    }

    /// Creates from array in field order
    #[must_use]
    pub const fn from_array(arr: [f32; 6]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        let a = self.to_array();
        let b = other.to_array();
        let mut acc = 0.0;
        for i in 0..6 {
            acc += a[i] * b[i];
        }
        acc
    }

    /// Euclidean length over all six channels
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// The rotational channels as a Vec3 (pitch, yaw, roll)
    #[must_use]
    pub const fn angular(self) -> Vec3 {
        Vec3::new(self.pitch, self.yaw, self.roll)
    }

    /// The translational channels as a Vec3 (strafe_x, strafe_y, throttle)
    #[must_use]
    pub const fn linear(self) -> Vec3 {
        Vec3::new(self.strafe_x, self.strafe_y, self.throttle)
    }
}

impl std::ops::Add for Vec6 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.pitch + rhs.pitch,
            self.yaw + rhs.yaw,
            self.roll + rhs.roll,
            self.strafe_x + rhs.strafe_x,
            self.strafe_y + rhs.strafe_y,
            self.throttle + rhs.throttle,
        )
    }
}

impl std::ops::Sub for Vec6 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.pitch - rhs.pitch,
            self.yaw - rhs.yaw,
            self.roll - rhs.roll,
            self.strafe_x - rhs.strafe_x,
            self.strafe_y - rhs.strafe_y,
            self.throttle - rhs.throttle,
        )
    }
}

impl std::ops::Mul<f32> for Vec6 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(
            self.pitch * rhs,
            self.yaw * rhs,
            self.roll * rhs,
            self.strafe_x * rhs,
            self.strafe_y * rhs,
            self.throttle * rhs,
        )
    }
}

/// Quaternion for rotations
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Rotation of `angle` radians about a unit `axis`
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half = angle * 0.5;
        let s = half.sin();
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// Length of the quaternion as a 4-vector
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Unit quaternion in the same direction, identity if degenerate
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate. Equals the inverse for unit quaternions.
    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Hamilton product `self * rhs`
    #[must_use]
    pub fn multiply(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }

    /// Rotates a vector by this quaternion (assumed unit length)
    #[must_use]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        // v' = v + 2 * q_vec x (q_vec x v + w * v)
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Body-frame forward axis (+Z convention)
    #[must_use]
    pub fn forward(self) -> Vec3 {
        self.rotate(Vec3::Z)
    }

    /// Body-frame right axis (+X convention)
    #[must_use]
    pub fn right(self) -> Vec3 {
        self.rotate(Vec3::X)
    }

    /// Body-frame up axis (+Y convention)
    #[must_use]
    pub fn up(self) -> Vec3 {
        self.rotate(Vec3::Y)
    }

    /// Advances the orientation by angular velocity `omega` (rad/s,
    /// body frame) over `dt` seconds using the quaternion derivative
    /// `q̇ = ½ q ⊗ (0, ω)`, then renormalizes.
    #[must_use]
    pub fn integrate(self, omega: Vec3, dt: f32) -> Self {
        let half = omega * (dt * 0.5);
        let delta = Self::new(half.x, half.y, half.z, 0.0);
        let dq = self.multiply(delta);
        Self::new(
            self.x + dq.x,
            self.y + dq.y,
            self.z + dq.z,
            self.w + dq.w,
        )
        .normalized()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// 2x2 matrix stored row-major: `[m00, m01, m10, m11]`.
///
/// Used by the adaptive Kalman filter; deliberately tiny.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat2 {
    /// Elements `[m00, m01, m10, m11]`
    pub data: [f32; 4],
}

impl Mat2 {
    /// Creates from elements
    #[must_use]
    pub const fn new(m00: f32, m01: f32, m10: f32, m11: f32) -> Self {
        Self { data: [m00, m01, m10, m11] }
    }

    /// Identity matrix
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    /// Scalar multiple of the identity
    #[must_use]
    pub const fn diagonal(v: f32) -> Self {
        Self::new(v, 0.0, 0.0, v)
    }

    /// Matrix sum
    #[must_use]
    pub fn add(self, rhs: Self) -> Self {
        Self::new(
            self.data[0] + rhs.data[0],
            self.data[1] + rhs.data[1],
            self.data[2] + rhs.data[2],
            self.data[3] + rhs.data[3],
        )
    }

    /// Matrix product `self * rhs`
    #[must_use]
    pub fn mul(self, rhs: Self) -> Self {
        let a = self.data;
        let b = rhs.data;
        Self::new(
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        )
    }

    /// Scales every element
    #[must_use]
    pub fn scale(self, s: f32) -> Self {
        Self::new(
            self.data[0] * s,
            self.data[1] * s,
            self.data[2] * s,
            self.data[3] * s,
        )
    }

    /// Sum of the diagonal
    #[must_use]
    pub const fn trace(self) -> f32 {
        self.data[0] + self.data[3]
    }

    /// Inverse, or `None` when the determinant is (near) zero
    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        let [a, b, c, d] = self.data;
        let det = a * d - b * c;
        if det.abs() < 1e-10 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Self::new(d * inv, -b * inv, -c * inv, a * inv))
    }

    /// Matrix-vector product
    #[must_use]
    pub fn mul_vec(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.data[0] * v.x + self.data[1] * v.y,
            self.data[2] * v.x + self.data[3] * v.y,
        )
    }
}

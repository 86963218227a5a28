//! Small vector type and the scalar helpers used by tessellation.
//!
//! All positions are in device pixels with the origin at the top-left and the
//! y axis pointing down.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::color::PremultipliedColor;

/// A two-component `f32` vector, used for positions, sizes and texture
/// coordinates.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Vector2f {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component (grows downwards).
    pub y: f32,
}

impl Vector2f {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a vector with both components set to `value`.
    #[must_use]
    pub const fn splat(value: f32) -> Self {
        Self { x: value, y: value }
    }

    /// Round both components to the nearest integer, halfway cases away
    /// from zero.
    #[must_use]
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    /// Two-dimensional cross product (the z component of the 3D cross
    /// product). Negative for triangles wound the way the engine emits them.
    #[must_use]
    pub fn cross(self, other: Self) -> f32 {
        self.x.mul_add(other.y, -(self.y * other.x))
    }

    /// Unit vector pointing along `angle` (radians, measured from +x towards
    /// +y).
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }
}

impl From<[f32; 2]> for Vector2f {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Vector2f> for [f32; 2] {
    fn from(v: Vector2f) -> Self {
        [v.x, v.y]
    }
}

impl Add for Vector2f {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2f {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2f {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2f {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vector2f {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vector2f {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise product.
impl Mul for Vector2f {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

/// Linear interpolation between `v0` (at `t = 0`) and `v1` (at `t = 1`).
#[must_use]
pub fn lerp(t: f32, v0: f32, v1: f32) -> f32 {
    v0.mul_add(1.0 - t, v1 * t)
}

/// Round to the nearest integer, halfway cases away from zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_to_integer(value: f32) -> i32 {
    if value > 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// Interpolate two premultiplied colors channel by channel, rounding each
/// channel to the nearest integer.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rounded_lerp(t: f32, c0: PremultipliedColor, c1: PremultipliedColor) -> PremultipliedColor {
    let channel = |a: u8, b: u8| -> u8 {
        round_to_integer(lerp(t, f32::from(a), f32::from(b))).clamp(0, 255) as u8
    };
    PremultipliedColor {
        r: channel(c0.r, c1.r),
        g: channel(c0.g, c1.g),
        b: channel(c0.b, c1.b),
        a: channel(c0.a, c1.a),
    }
}

/// Snap a rectangle to whole pixels.
///
/// The top-left corner and the bottom-right corner are rounded independently,
/// so the snapped size can differ from the rounded size by one pixel.
/// Returns the snapped `(position, size)`.
#[must_use]
pub fn snap_to_pixel_grid(position: Vector2f, size: Vector2f) -> (Vector2f, Vector2f) {
    let bottom_right = position + size;
    let position = position.round();
    (position, bottom_right.round() - position)
}

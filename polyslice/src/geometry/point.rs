use std::{
    fmt::{self, Display},
    ops::{Add, Neg, Sub},
};

use nalgebra::Vector2;

/// Integer point on the lattice of a [`crate::context::Context`].
///
/// Coordinates are always whole lattice units, so equality and hashing are
/// exact. The derived ordering (horizontal, then vertical) is the order the
/// sweep visits points in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub h: i64,
    pub v: i64,
}

impl Point {
    pub const fn new(h: i64, v: i64) -> Self {
        Self { h, v }
    }

    /// Rounds float lattice coordinates to the nearest point.
    pub fn round(h: f64, v: f64) -> Self {
        Self {
            h: h.round() as i64,
            v: v.round() as i64,
        }
    }

    pub fn from_vector(vec: Vector2<f64>) -> Self {
        Self::round(vec.x, vec.y)
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.h as f64, self.v as f64)
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::round(self.h as f64 * factor, self.v as f64 * factor)
    }

    /// Rotates about the lattice origin by `angle` radians.
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let (h, v) = (self.h as f64, self.v as f64);
        Self::round(h * cos - v * sin, h * sin + v * cos)
    }

    pub fn cross(self, other: Self) -> i128 {
        self.h as i128 * other.v as i128 - self.v as i128 * other.h as i128
    }

    pub fn dot(self, other: Self) -> i128 {
        self.h as i128 * other.h as i128 + self.v as i128 * other.v as i128
    }

    pub fn length_squared(self) -> i128 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        (self.length_squared() as f64).sqrt()
    }

    pub fn distance_squared(self, other: Self) -> i128 {
        (other - self).length_squared()
    }
}

/// Twice the signed area of the triangle `a b c`. Positive when `c` lies to
/// the left of the directed line `a -> b`.
pub fn orient(a: Point, b: Point, c: Point) -> i128 {
    (b - a).cross(c - a)
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.h + rhs.h, self.v + rhs.v)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.h - rhs.h, self.v - rhs.v)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.h, -self.v)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.h, self.v)
    }
}

//! 2D Vector and Rectangle
//!
//! Value types for positions, velocities and screen-space boxes.
//! Screen convention: +X right, +Y down.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

/// 2D vector with `f64` components.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vector2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    /// Squared length (avoids sqrt - prefer this for comparisons).
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length.
    /// Returns ZERO if length is zero.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        self.sub(other).length()
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Linear interpolation: `self + (other - self) * t`.
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self.add(other.sub(self).scale(t))
    }

    /// Rescale so the length does not exceed `max_length`.
    pub fn clamp_length(self, max_length: f64) -> Self {
        let len = self.length();
        if len > max_length && len > 0.0 {
            self.scale(max_length.max(0.0) / len)
        } else {
            self
        }
    }

    /// True if both components are exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vector2 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Vector2::add(self, other)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Vector2::sub(self, other)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Debug for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector2({:.3}, {:.3})", self.x, self.y)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rectangle {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `size` centered on `center`.
    pub fn from_center(center: Vector2, size: Vector2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point containment, inclusive on all four edges.
    #[inline]
    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Open-interval overlap: rectangles that only touch do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_vec2_arithmetic() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(1.0, -2.0);

        assert_eq!(a + b, Vector2::new(4.0, 2.0));
        assert_eq!(a - b, Vector2::new(2.0, 6.0));
        assert_eq!(a * 2.0, Vector2::new(6.0, 8.0));
        assert_eq!(-b, Vector2::new(-1.0, 2.0));
        assert_eq!(a.dot(b), -5.0);
    }

    #[test]
    fn test_vec2_length_and_distance() {
        let v = Vector2::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < EPS);
        assert!((Vector2::ZERO.distance(v) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_vec2_normalize() {
        let n = Vector2::new(10.0, 0.0).normalize();
        assert!((n.x - 1.0).abs() < EPS);
        assert_eq!(n.y, 0.0);

        let d = Vector2::new(1.0, 1.0).normalize();
        assert!((d.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_vec2_normalize_zero() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    }

    #[test]
    fn test_vec2_lerp() {
        let a = Vector2::new(0.0, 0.0);
        let b = Vector2::new(10.0, -20.0);
        assert_eq!(a.lerp(b, 0.5), Vector2::new(5.0, -10.0));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_vec2_clamp_length() {
        let v = Vector2::new(300.0, 400.0).clamp_length(250.0);
        assert!((v.length() - 250.0).abs() < EPS);

        let short = Vector2::new(1.0, 1.0);
        assert_eq!(short.clamp_length(250.0), short);
    }

    #[test]
    fn test_rect_contains_inclusive_edges() {
        let r = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vector2::new(0.0, 0.0)));
        assert!(r.contains(Vector2::new(10.0, 10.0)));
        assert!(r.contains(Vector2::new(5.0, 10.0)));
        assert!(!r.contains(Vector2::new(10.01, 5.0)));
        assert!(!r.contains(Vector2::new(5.0, -0.01)));
    }

    #[test]
    fn test_rect_intersects_open_interval() {
        let a = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rectangle::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Rectangle::new(9.0, 9.0, 10.0, 10.0);
        let apart = Rectangle::new(20.0, 20.0, 5.0, 5.0);

        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_rect_center() {
        let r = Rectangle::from_center(Vector2::new(100.0, 50.0), Vector2::new(32.0, 32.0));
        assert_eq!(r.x, 84.0);
        assert_eq!(r.y, 34.0);
        assert_eq!(r.center(), Vector2::new(100.0, 50.0));
    }
}

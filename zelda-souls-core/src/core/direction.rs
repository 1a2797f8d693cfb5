//! Eight-way facing direction.

use std::fmt;
use serde::{Deserialize, Serialize};

use super::vec2::Vector2;

/// `1 / sqrt(2)`: component of a normalized diagonal.
const DIAGONAL: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Eight compass directions plus `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// No direction
    #[default]
    None = 0,
    /// Up (-Y)
    Up = 1,
    /// Down (+Y)
    Down = 2,
    /// Left (-X)
    Left = 3,
    /// Right (+X)
    Right = 4,
    /// Up and left
    UpLeft = 5,
    /// Up and right
    UpRight = 6,
    /// Down and left
    DownLeft = 7,
    /// Down and right
    DownRight = 8,
}

impl Direction {
    /// All directions, `None` first.
    pub const ALL: [Direction; 9] = [
        Direction::None,
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Unit vector for this direction (zero for `None`).
    /// Diagonals are exactly normalized.
    pub fn to_vector(self) -> Vector2 {
        match self {
            Direction::None => Vector2::ZERO,
            Direction::Up => Vector2::new(0.0, -1.0),
            Direction::Down => Vector2::new(0.0, 1.0),
            Direction::Left => Vector2::new(-1.0, 0.0),
            Direction::Right => Vector2::new(1.0, 0.0),
            Direction::UpLeft => Vector2::new(-DIAGONAL, -DIAGONAL),
            Direction::UpRight => Vector2::new(DIAGONAL, -DIAGONAL),
            Direction::DownLeft => Vector2::new(-DIAGONAL, DIAGONAL),
            Direction::DownRight => Vector2::new(DIAGONAL, DIAGONAL),
        }
    }

    /// Classify a vector by the sign pattern of its components.
    pub fn from_vector(v: Vector2) -> Self {
        let sx = sign(v.x);
        let sy = sign(v.y);
        match (sx, sy) {
            (0, 0) => Direction::None,
            (0, -1) => Direction::Up,
            (0, 1) => Direction::Down,
            (-1, 0) => Direction::Left,
            (1, 0) => Direction::Right,
            (-1, -1) => Direction::UpLeft,
            (1, -1) => Direction::UpRight,
            (-1, 1) => Direction::DownLeft,
            _ => Direction::DownRight,
        }
    }

    /// Lowercase name (`"up-left"`, `"none"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Direction::None => "none",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::UpLeft => "up-left",
            Direction::UpRight => "up-right",
            Direction::DownLeft => "down-left",
            Direction::DownRight => "down-right",
        }
    }
}

#[inline]
fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_convention() {
        assert_eq!(Direction::Up.to_vector(), Vector2::new(0.0, -1.0));
        assert_eq!(Direction::Down.to_vector(), Vector2::new(0.0, 1.0));
        assert_eq!(Direction::None.to_vector(), Vector2::ZERO);
    }

    #[test]
    fn test_diagonals_are_unit_length() {
        for dir in Direction::ALL.iter().skip(1) {
            let len = dir.to_vector().length();
            assert!((len - 1.0).abs() < 1e-12, "{} has length {}", dir, len);
        }
    }

    #[test]
    fn test_from_vector_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_vector(dir.to_vector()), dir);
        }
        assert_eq!(Direction::from_vector(Vector2::new(0.3, -7.0)), Direction::UpRight);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Direction::DownLeft.to_string(), "down-left");
        assert_eq!(Direction::None.to_string(), "none");
    }
}

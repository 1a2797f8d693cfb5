//! Movement Integrator
//!
//! Acceleration-based velocity with friction, max-speed clamp, position
//! integration and clamping to the playable area.
//!
//! Step order within [`MovementState::integrate`]:
//! 1. Accelerate toward `intent * speed`, or apply friction when idle
//! 2. Clamp to `max_speed`
//! 3. Update direction / facing
//! 4. Integrate position
//! 5. Clamp position to bounds (zeroing velocity on a clamped axis)

use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;
use crate::core::vec2::Vector2;

/// Acceleration is this many times the cruising speed (per second).
pub const ACCELERATION_FACTOR: f64 = 4.0;

/// Friction is this many times the cruising speed (per second).
pub const FRICTION_FACTOR: f64 = 6.0;

/// Kinematic state of a moving character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Current velocity (px/s)
    pub velocity: Vector2,
    /// Cruising speed (px/s)
    pub speed: f64,
    /// Hard velocity cap (px/s)
    pub max_speed: f64,
    /// Acceleration (px/s²)
    pub acceleration: f64,
    /// Friction deceleration (px/s²)
    pub friction: f64,
    /// True while movement input is held
    pub is_moving: bool,
    /// Direction of the current input (`None` while idle)
    pub direction: Direction,
    /// Last non-idle direction
    pub facing_direction: Direction,
}

impl MovementState {
    /// Create a resting state. Acceleration and friction derive from `speed`.
    pub fn new(speed: f64, max_speed: f64) -> Self {
        let speed = speed.max(0.0);
        Self {
            velocity: Vector2::ZERO,
            speed,
            max_speed: max_speed.max(0.0),
            acceleration: speed * ACCELERATION_FACTOR,
            friction: speed * FRICTION_FACTOR,
            is_moving: false,
            direction: Direction::None,
            facing_direction: Direction::Down,
        }
    }

    /// Advance one step.
    ///
    /// `intent` must satisfy `|intent| <= 1`. Returns the new position.
    pub fn integrate(
        &mut self,
        position: Vector2,
        intent: Vector2,
        dt: f64,
        bounds: Option<&MovementBounds>,
        half_size: Vector2,
    ) -> Vector2 {
        let dt = dt.max(0.0);

        // 1. Accelerate or brake
        if intent.is_zero() {
            self.is_moving = false;
            self.apply_friction(dt);
        } else {
            self.is_moving = true;
            self.accelerate(intent, dt);
        }

        // 2. Max speed
        self.velocity = self.velocity.clamp_length(self.max_speed);

        // 3. Direction
        if self.is_moving {
            self.direction = Direction::from_vector(intent);
            self.facing_direction = self.direction;
        } else {
            self.direction = Direction::None;
        }

        // 4. Integrate
        let mut position = position + self.velocity * dt;

        // 5. Bounds
        if let Some(bounds) = bounds {
            position = bounds.clamp(position, half_size, &mut self.velocity);
        }

        position
    }

    /// Blend velocity toward the target.
    ///
    /// The blend factor `acceleration * dt / speed` is the fraction of the
    /// cruising speed gained per step, clamped to `[0, 1]` so velocity never
    /// overshoots the target.
    fn accelerate(&mut self, intent: Vector2, dt: f64) {
        if self.speed <= 0.0 {
            self.velocity = Vector2::ZERO;
            return;
        }
        let target = intent * self.speed;
        let k = (self.acceleration * dt / self.speed).clamp(0.0, 1.0);
        self.velocity = self.velocity.lerp(target, k);
    }

    /// Shrink speed by `friction * dt`, snapping to exactly zero.
    fn apply_friction(&mut self, dt: f64) {
        let current = self.velocity.length();
        let decrement = self.friction * dt;
        if current <= decrement {
            self.velocity = Vector2::ZERO;
            return;
        }
        self.velocity = self.velocity * ((current - decrement) / current);
    }

    /// Speed in px/s.
    pub fn current_speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Stop immediately.
    pub fn stop(&mut self) {
        self.velocity = Vector2::ZERO;
        self.is_moving = false;
        self.direction = Direction::None;
    }
}

/// Playable area for position clamping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementBounds {
    /// Area width (px)
    pub width: f64,
    /// Area height (px)
    pub height: f64,
    /// Inset from each edge (px)
    pub margin: f64,
}

impl MovementBounds {
    /// Clamp `position` so a box of `half_size` stays inside the area.
    ///
    /// Any axis that gets clamped has its velocity component zeroed.
    pub fn clamp(&self, position: Vector2, half_size: Vector2, velocity: &mut Vector2) -> Vector2 {
        let (x, clamped_x) = clamp_axis(position.x, self.margin + half_size.x, self.width - self.margin - half_size.x);
        let (y, clamped_y) = clamp_axis(position.y, self.margin + half_size.y, self.height - self.margin - half_size.y);
        if clamped_x {
            velocity.x = 0.0;
        }
        if clamped_y {
            velocity.y = 0.0;
        }
        Vector2::new(x, y)
    }
}

/// Clamp into `[lo, hi]`. A degenerate range pins to its midpoint.
fn clamp_axis(value: f64, lo: f64, hi: f64) -> (f64, bool) {
    if lo > hi {
        let mid = (lo + hi) / 2.0;
        return (mid, value != mid);
    }
    if value < lo {
        (lo, true)
    } else if value > hi {
        (hi, true)
    } else {
        (value, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f64 = 0.1;

    fn reference_state() -> MovementState {
        MovementState::new(200.0, 250.0)
    }

    #[test]
    fn test_derived_rates() {
        let m = reference_state();
        assert_eq!(m.acceleration, 800.0);
        assert_eq!(m.friction, 1200.0);
        assert_eq!(m.facing_direction, Direction::Down);
    }

    #[test]
    fn test_first_step_reaches_80() {
        let mut m = reference_state();
        let pos = m.integrate(Vector2::ZERO, Vector2::new(1.0, 0.0), DT, None, Vector2::ZERO);
        assert!((m.velocity.x - 80.0).abs() < 1e-9);
        assert_eq!(m.velocity.y, 0.0);
        assert!((pos.x - 8.0).abs() < 1e-9);
        assert_eq!(m.facing_direction, Direction::Right);
    }

    #[test]
    fn test_approaches_cruise_speed_without_exceeding_max() {
        let mut m = reference_state();
        let mut previous = 0.0;
        for _ in 0..60 {
            m.integrate(Vector2::ZERO, Vector2::new(1.0, 0.0), DT, None, Vector2::ZERO);
            assert!(m.velocity.x >= previous);
            assert!(m.velocity.x <= 250.0);
            previous = m.velocity.x;
        }
        assert!((m.velocity.x - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_friction_stops_exactly() {
        let mut m = reference_state();
        m.velocity = Vector2::new(200.0, 0.0);
        let mut steps = 0;
        while !m.velocity.is_zero() {
            m.integrate(Vector2::ZERO, Vector2::ZERO, DT, None, Vector2::ZERO);
            assert!(m.velocity.x >= 0.0, "friction overshot: {:?}", m.velocity);
            steps += 1;
            assert!(steps < 10);
        }
        assert_eq!(steps, 2);
        assert!(!m.is_moving);
        assert_eq!(m.direction, Direction::None);
        assert_eq!(m.facing_direction, Direction::Down);
    }

    #[test]
    fn test_friction_with_zero_dt_keeps_velocity() {
        let mut m = reference_state();
        m.velocity = Vector2::new(50.0, 0.0);
        m.integrate(Vector2::ZERO, Vector2::ZERO, 0.0, None, Vector2::ZERO);
        assert_eq!(m.velocity, Vector2::new(50.0, 0.0));
    }

    #[test]
    fn test_zero_speed_is_stationary() {
        let mut m = MovementState::new(0.0, 0.0);
        let pos = m.integrate(Vector2::new(5.0, 5.0), Vector2::new(0.0, 1.0), DT, None, Vector2::ZERO);
        assert_eq!(pos, Vector2::new(5.0, 5.0));
        assert_eq!(m.velocity, Vector2::ZERO);
    }

    #[test]
    fn test_bounds_clamp_zeroes_axis_velocity() {
        let bounds = MovementBounds { width: 800.0, height: 600.0, margin: 16.0 };
        let half = Vector2::new(16.0, 16.0);
        let mut m = reference_state();
        m.velocity = Vector2::new(-200.0, 100.0);

        let pos = m.integrate(Vector2::new(33.0, 300.0), Vector2::new(-1.0, 0.0), DT, Some(&bounds), half);
        assert_eq!(pos.x, 32.0);
        assert_eq!(m.velocity.x, 0.0);
        assert!(m.velocity.y != 0.0);
    }

    #[test]
    fn test_degenerate_bounds_pin_to_center() {
        let bounds = MovementBounds { width: 20.0, height: 20.0, margin: 16.0 };
        let mut velocity = Vector2::new(10.0, 10.0);
        let pos = bounds.clamp(Vector2::new(3.0, 3.0), Vector2::new(16.0, 16.0), &mut velocity);
        assert_eq!(pos, Vector2::new(10.0, 10.0));
        assert_eq!(velocity, Vector2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_velocity_never_exceeds_max(
            steps in prop::collection::vec((-1i8..=1, -1i8..=1, 0.0f64..0.5), 1..80),
        ) {
            let mut m = reference_state();
            let mut pos = Vector2::ZERO;
            for (ix, iy, dt) in steps {
                let intent = Vector2::new(ix as f64, iy as f64).normalize();
                pos = m.integrate(pos, intent, dt, None, Vector2::ZERO);
                prop_assert!(m.velocity.length() <= m.max_speed + 1e-9);
            }
        }

        #[test]
        fn prop_friction_terminates(vx in -250.0f64..250.0, vy in -250.0f64..250.0, dt in 0.001f64..0.5) {
            let mut m = reference_state();
            m.velocity = Vector2::new(vx, vy).clamp_length(250.0);
            let bound = (250.0 / (m.friction * dt)).ceil() as usize + 1;
            let mut steps = 0;
            while !m.velocity.is_zero() {
                let before = m.velocity;
                m.integrate(Vector2::ZERO, Vector2::ZERO, dt, None, Vector2::ZERO);
                // Never reverses direction.
                prop_assert!(m.velocity.dot(before) >= 0.0);
                steps += 1;
                prop_assert!(steps <= bound);
            }
        }

        #[test]
        fn prop_diagonal_matches_axial_steady_speed(dx in prop::bool::ANY, dy in prop::bool::ANY) {
            let diag = Vector2::new(if dx { 1.0 } else { -1.0 }, if dy { 1.0 } else { -1.0 }).normalize();
            let mut a = reference_state();
            let mut b = reference_state();
            for _ in 0..200 {
                a.integrate(Vector2::ZERO, diag, 1.0 / 60.0, None, Vector2::ZERO);
                b.integrate(Vector2::ZERO, Vector2::new(1.0, 0.0), 1.0 / 60.0, None, Vector2::ZERO);
            }
            prop_assert!((a.current_speed() - b.current_speed()).abs() < 1e-6);
        }
    }
}

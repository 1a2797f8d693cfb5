//! Camera Controller
//!
//! Smoothed target following, optional hard bounds, screen shake and the
//! world <-> screen transform.
//!
//! ## Update order
//!
//! 1. Follow: pull `target_position` toward the followed entity
//! 2. Smooth: spring `position` toward `target_position`
//! 3. Shake: advance the decaying shake offset
//! 4. Bounds: clamp `position` (and reset the target if clamped)
//!
//! Shake never moves `position`; it only offsets the transform, so the
//! bounds invariant holds while shaking.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::vec2::{Rectangle, Vector2};

/// Default shake frequency (Hz).
pub const DEFAULT_SHAKE_FREQUENCY: f64 = 30.0;

/// Spring velocity damping rate (per second).
const SPRING_DAMPING: f64 = 5.0;

/// Anything the camera can follow.
pub trait Positioned {
    /// World position.
    fn position(&self) -> Vector2;

    /// World velocity, when the entity has one (used for look-ahead).
    fn velocity(&self) -> Option<Vector2> {
        None
    }
}

impl Positioned for Vector2 {
    fn position(&self) -> Vector2 {
        *self
    }
}

/// How the camera tracks its target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowSettings {
    /// `>= 1` snaps the target; below 1 eases at `speed * dt` per frame
    pub speed: f64,
    /// Added to the followed position
    pub offset: Vector2,
    /// Seconds of target velocity to lead by
    pub look_ahead: f64,
}

impl Default for FollowSettings {
    fn default() -> Self {
        Self {
            speed: 5.0,
            offset: Vector2::ZERO,
            look_ahead: 0.0,
        }
    }
}

/// Decaying screen shake.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraShake {
    /// Peak offset (px)
    pub intensity: f64,
    /// Total duration
    pub duration: Duration,
    /// Oscillation frequency (Hz)
    pub frequency: f64,
    elapsed: Duration,
    offset: Vector2,
}

impl CameraShake {
    fn new(intensity: f64, duration: Duration, frequency: f64) -> Self {
        Self {
            intensity,
            duration,
            frequency,
            elapsed: Duration::ZERO,
            offset: Vector2::ZERO,
        }
    }

    /// Advance by `dt`. Returns `false` once the shake has finished.
    fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.offset = Vector2::ZERO;
            return false;
        }

        let progress = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let intensity = self.intensity * (1.0 - progress);
        let t = self.elapsed.as_secs_f64() * self.frequency;

        self.offset = Vector2::new(
            intensity * (t * 2.3).sin() * (t * 1.7).cos(),
            intensity * (t * 2.1).cos() * (t * 1.9).sin(),
        );
        true
    }

    /// Current offset.
    pub fn offset(&self) -> Vector2 {
        self.offset
    }
}

/// 2D camera. `position` is the world point at the center of the view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// View center (world)
    pub position: Vector2,
    target_position: Vector2,
    velocity: Vector2,
    /// Viewport width (screen px)
    pub width: f64,
    /// Viewport height (screen px)
    pub height: f64,
    zoom: f64,
    /// Lower zoom limit
    pub min_zoom: f64,
    /// Upper zoom limit
    pub max_zoom: f64,
    smoothing: f64,
    /// Follow behavior
    pub follow: FollowSettings,
    following: bool,
    bounds: Option<Rectangle>,
    shake: Option<CameraShake>,
}

impl Camera {
    /// New camera centered on `position`.
    pub fn new(position: Vector2, width: f64, height: f64) -> Self {
        Self {
            position,
            target_position: position,
            velocity: Vector2::ZERO,
            width,
            height,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 5.0,
            smoothing: 0.1,
            follow: FollowSettings::default(),
            following: false,
            bounds: None,
            shake: None,
        }
    }

    // =========================================================================
    // Per-frame update
    // =========================================================================

    /// Advance one frame. `target` is the followed entity, if any.
    pub fn update(&mut self, dt: Duration, target: Option<&dyn Positioned>) {
        let secs = dt.as_secs_f64();

        if self.following {
            if let Some(target) = target {
                self.update_follow(secs, target);
            }
        }
        self.update_smoothing(secs);
        self.update_shake(dt);
        self.apply_bounds();
    }

    fn update_follow(&mut self, dt: f64, target: &dyn Positioned) {
        let mut desired = target.position() + self.follow.offset;
        if self.follow.look_ahead > 0.0 {
            if let Some(velocity) = target.velocity() {
                desired = desired + velocity * self.follow.look_ahead;
            }
        }

        if self.follow.speed >= 1.0 {
            self.target_position = desired;
        } else {
            let t = (self.follow.speed * dt).min(1.0);
            self.target_position = self.target_position.lerp(desired, t);
        }
    }

    fn update_smoothing(&mut self, dt: f64) {
        if self.smoothing <= 0.0 {
            self.position = self.target_position;
            self.velocity = Vector2::ZERO;
            return;
        }

        let force = (self.target_position - self.position) * (1.0 / self.smoothing);
        self.velocity = self.velocity + force * dt;
        let damping = (1.0 - SPRING_DAMPING * dt).max(0.0);
        self.velocity = self.velocity * damping;
        self.position = self.position + self.velocity * dt;
    }

    fn update_shake(&mut self, dt: Duration) {
        if let Some(shake) = self.shake.as_mut() {
            if !shake.advance(dt) {
                self.shake = None;
            }
        }
    }

    fn apply_bounds(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };

        let half_w = self.width / self.zoom / 2.0;
        let half_h = self.height / self.zoom / 2.0;

        let old = self.position;
        self.position.x = clamp_or_center(self.position.x, bounds.x, bounds.width, half_w);
        self.position.y = clamp_or_center(self.position.y, bounds.y, bounds.height, half_h);

        if self.position.x != old.x {
            self.velocity.x = 0.0;
        }
        if self.position.y != old.y {
            self.velocity.y = 0.0;
        }
        if self.position != old {
            self.target_position = self.position;
        }
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Camera center including shake.
    fn effective_position(&self) -> Vector2 {
        self.position + self.shake_offset()
    }

    /// World point to screen pixels.
    pub fn world_to_screen(&self, world: Vector2) -> Vector2 {
        let cam = self.effective_position();
        Vector2::new(
            (world.x - cam.x + self.width / (2.0 * self.zoom)) * self.zoom,
            (world.y - cam.y + self.height / (2.0 * self.zoom)) * self.zoom,
        )
    }

    /// Screen pixels to world point. Exact inverse of [`Camera::world_to_screen`].
    pub fn screen_to_world(&self, screen: Vector2) -> Vector2 {
        let cam = self.effective_position();
        Vector2::new(
            screen.x / self.zoom + cam.x - self.width / (2.0 * self.zoom),
            screen.y / self.zoom + cam.y - self.height / (2.0 * self.zoom),
        )
    }

    /// World rectangle to screen rectangle.
    pub fn world_rect_to_screen(&self, rect: Rectangle) -> Rectangle {
        let top_left = self.world_to_screen(Vector2::new(rect.x, rect.y));
        Rectangle::new(top_left.x, top_left.y, rect.width * self.zoom, rect.height * self.zoom)
    }

    /// World-space rectangle currently in view (shake excluded).
    pub fn view_bounds(&self) -> Rectangle {
        let w = self.width / self.zoom;
        let h = self.height / self.zoom;
        Rectangle::new(self.position.x - w / 2.0, self.position.y - h / 2.0, w, h)
    }

    /// Does `rect` overlap the view?
    pub fn is_visible(&self, rect: &Rectangle) -> bool {
        rect.intersects(&self.view_bounds())
    }

    /// Is `point` inside the view?
    pub fn is_point_visible(&self, point: Vector2) -> bool {
        self.view_bounds().contains(point)
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Jump to `position` (no smoothing).
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
        self.target_position = position;
        self.velocity = Vector2::ZERO;
    }

    /// Set the point the camera eases toward.
    pub fn set_target(&mut self, target: Vector2) {
        self.target_position = target;
    }

    /// Point the camera eases toward.
    pub fn target_position(&self) -> Vector2 {
        self.target_position
    }

    /// Set zoom, clamped to `[min_zoom, max_zoom]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        // max/min rather than clamp: an inverted or NaN range must not panic.
        self.zoom = zoom.max(self.min_zoom).min(self.max_zoom);
    }

    /// Current zoom.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Spring time constant. `0` snaps; negative values clamp to `0`.
    pub fn set_smoothing(&mut self, smoothing: f64) {
        self.smoothing = smoothing.max(0.0);
    }

    /// Spring time constant.
    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    /// Restrict the view center and clamp immediately.
    pub fn set_bounds(&mut self, bounds: Rectangle) {
        self.bounds = Some(bounds);
        self.apply_bounds();
    }

    /// Remove the bounds.
    pub fn clear_bounds(&mut self) {
        self.bounds = None;
    }

    /// Current bounds.
    pub fn bounds(&self) -> Option<Rectangle> {
        self.bounds
    }

    /// Start following with the given settings.
    pub fn start_following(&mut self, follow: FollowSettings) {
        self.follow = follow;
        self.following = true;
    }

    /// Stop following; the camera settles where it is heading.
    pub fn stop_following(&mut self) {
        self.following = false;
    }

    /// Is follow mode on?
    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Shake at the default frequency.
    pub fn start_shake(&mut self, intensity: f64, duration: Duration) {
        self.start_shake_with_frequency(intensity, duration, DEFAULT_SHAKE_FREQUENCY);
    }

    /// Shake at `frequency` Hz. Replaces any running shake.
    pub fn start_shake_with_frequency(&mut self, intensity: f64, duration: Duration, frequency: f64) {
        if duration.is_zero() {
            self.shake = None;
            return;
        }
        self.shake = Some(CameraShake::new(intensity, duration, frequency));
    }

    /// End the shake now.
    pub fn stop_shake(&mut self) {
        self.shake = None;
    }

    /// Is a shake running?
    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    /// Current shake offset (zero when not shaking).
    pub fn shake_offset(&self) -> Vector2 {
        self.shake.map(|s| s.offset()).unwrap_or(Vector2::ZERO)
    }

    /// Pull the camera back to within `max_distance` of `target`.
    ///
    /// Moves `position` itself and parks the spring there, so the camera
    /// does not drift back out on the next update.
    pub fn constrain_to(&mut self, target: Vector2, max_distance: f64) {
        let diff = self.position - target;
        if diff.length() > max_distance {
            self.position = target + diff.normalize() * max_distance;
            self.target_position = self.position;
            self.velocity = Vector2::ZERO;
            self.apply_bounds();
        }
    }

    /// Back to the origin: zoom 1, no shake, not following.
    pub fn reset(&mut self) {
        self.position = Vector2::ZERO;
        self.target_position = Vector2::ZERO;
        self.velocity = Vector2::ZERO;
        self.zoom = 1.0;
        self.shake = None;
        self.following = false;
    }

    /// Resize the viewport.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.apply_bounds();
    }
}

/// Clamp `value` into `[start + half, start + extent - half]`, or center
/// on the extent when the view is wider than it.
fn clamp_or_center(value: f64, start: f64, extent: f64, half: f64) -> f64 {
    let lo = start + half;
    let hi = start + extent - half;
    if lo > hi {
        start + extent / 2.0
    } else {
        value.max(lo).min(hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME: Duration = Duration::from_micros(16_667);

    struct Mover {
        pos: Vector2,
        vel: Vector2,
    }

    impl Positioned for Mover {
        fn position(&self) -> Vector2 {
            self.pos
        }
        fn velocity(&self) -> Option<Vector2> {
            Some(self.vel)
        }
    }

    #[test]
    fn test_snap_follow_sets_target() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.start_following(FollowSettings { speed: 3.0, offset: Vector2::new(0.0, -20.0), look_ahead: 0.0 });
        let target = Vector2::new(100.0, 100.0);
        cam.update(FRAME, Some(&target));
        assert_eq!(cam.target_position(), Vector2::new(100.0, 80.0));
    }

    #[test]
    fn test_eased_follow() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.start_following(FollowSettings { speed: 0.5, ..FollowSettings::default() });
        let target = Vector2::new(100.0, 0.0);
        cam.update(Duration::from_millis(100), Some(&target));
        assert!((cam.target_position().x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_look_ahead_leads_velocity() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.start_following(FollowSettings { speed: 1.0, offset: Vector2::ZERO, look_ahead: 0.5 });
        let mover = Mover { pos: Vector2::new(10.0, 10.0), vel: Vector2::new(100.0, 0.0) };
        cam.update(FRAME, Some(&mover));
        assert_eq!(cam.target_position(), Vector2::new(60.0, 10.0));
    }

    #[test]
    fn test_spring_converges() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.set_target(Vector2::new(200.0, -50.0));
        for _ in 0..600 {
            cam.update(FRAME, None);
        }
        assert!(cam.position.distance(Vector2::new(200.0, -50.0)) < 0.5);
    }

    #[test]
    fn test_zero_smoothing_snaps() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.set_smoothing(-1.0);
        assert_eq!(cam.smoothing(), 0.0);
        cam.set_target(Vector2::new(30.0, 40.0));
        cam.update(FRAME, None);
        assert_eq!(cam.position, Vector2::new(30.0, 40.0));
    }

    #[test]
    fn test_world_screen_inverse() {
        let mut cam = Camera::new(Vector2::new(400.0, 300.0), 800.0, 600.0);
        assert_eq!(cam.world_to_screen(Vector2::new(400.0, 300.0)), Vector2::new(400.0, 300.0));

        cam.set_zoom(2.0);
        cam.set_position(Vector2::new(123.0, -45.0));
        let world = Vector2::new(17.5, 99.0);
        let back = cam.screen_to_world(cam.world_to_screen(world));
        assert!(back.distance(world) < 1e-9);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.set_zoom(100.0);
        assert_eq!(cam.zoom(), 5.0);
        cam.set_zoom(0.0);
        assert_eq!(cam.zoom(), 0.1);
    }

    #[test]
    fn test_bounds_clamp_resets_target() {
        let mut cam = Camera::new(Vector2::new(400.0, 300.0), 800.0, 600.0);
        cam.set_bounds(Rectangle::new(0.0, 0.0, 2000.0, 1000.0));
        cam.set_target(Vector2::new(-500.0, 300.0));
        cam.update(Duration::from_millis(500), None);
        assert_eq!(cam.position.x, 400.0);
        assert_eq!(cam.target_position(), cam.position);
    }

    #[test]
    fn test_small_bounds_center_camera() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.set_bounds(Rectangle::new(0.0, 0.0, 400.0, 300.0));
        assert_eq!(cam.position, Vector2::new(200.0, 150.0));
    }

    #[test]
    fn test_shake_decays_and_stops() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.start_shake(10.0, Duration::from_millis(100));
        assert!(cam.is_shaking());

        cam.update(Duration::from_millis(30), None);
        let offset = cam.shake_offset();
        assert!(offset.x.abs() <= 10.0 && offset.y.abs() <= 10.0);

        for _ in 0..5 {
            cam.update(Duration::from_millis(30), None);
        }
        assert!(!cam.is_shaking());
        assert_eq!(cam.shake_offset(), Vector2::ZERO);
    }

    #[test]
    fn test_shake_offsets_transform_only() {
        let mut cam = Camera::new(Vector2::new(400.0, 300.0), 800.0, 600.0);
        cam.start_shake(8.0, Duration::from_secs(1));
        cam.update(Duration::from_millis(50), None);
        assert_eq!(cam.position, Vector2::new(400.0, 300.0));
        let screen = cam.world_to_screen(Vector2::new(400.0, 300.0));
        let expected = Vector2::new(400.0, 300.0) - cam.shake_offset();
        assert!(screen.distance(expected) < 1e-9);
    }

    #[test]
    fn test_set_zoom_inverted_range_does_not_panic() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.min_zoom = 2.0;
        cam.max_zoom = 1.0;
        cam.set_zoom(1.5);
        assert_eq!(cam.zoom(), 1.0);

        cam.min_zoom = f64::NAN;
        cam.max_zoom = 4.0;
        cam.set_zoom(2.0);
        assert_eq!(cam.zoom(), 2.0);

        cam.min_zoom = 0.1;
        cam.set_zoom(f64::NAN);
        assert_eq!(cam.zoom(), 0.1);
    }

    #[test]
    fn test_visibility() {
        let cam = Camera::new(Vector2::new(400.0, 300.0), 800.0, 600.0);
        assert!(cam.is_visible(&Rectangle::new(790.0, 290.0, 20.0, 20.0)));
        assert!(!cam.is_visible(&Rectangle::new(800.0, 0.0, 20.0, 20.0)));
        assert!(cam.is_point_visible(Vector2::new(800.0, 600.0)));
        assert!(!cam.is_point_visible(Vector2::new(801.0, 600.0)));
    }

    #[test]
    fn test_constrain_and_reset() {
        let mut cam = Camera::new(Vector2::ZERO, 800.0, 600.0);
        cam.position = Vector2::new(100.0, 0.0);
        cam.set_target(Vector2::new(300.0, 0.0));
        cam.constrain_to(Vector2::ZERO, 40.0);
        assert!((cam.position.x - 40.0).abs() < 1e-9);
        assert_eq!(cam.target_position(), cam.position);

        // Settles where it was put instead of easing back to the old target.
        cam.update(Duration::from_millis(100), None);
        assert!((cam.position.x - 40.0).abs() < 1e-9);

        // Already close enough: untouched.
        cam.set_target(Vector2::new(10.0, 0.0));
        cam.constrain_to(Vector2::ZERO, 100.0);
        assert!((cam.position.x - 40.0).abs() < 1e-9);
        assert_eq!(cam.target_position(), Vector2::new(10.0, 0.0));

        cam.start_following(FollowSettings::default());
        cam.set_zoom(3.0);
        cam.start_shake(5.0, Duration::from_secs(1));
        cam.reset();
        assert_eq!(cam.zoom(), 1.0);
        assert!(!cam.is_shaking());
        assert!(!cam.is_following());
        assert_eq!(cam.position, Vector2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_bounds_hold_while_shaking(
            targets in prop::collection::vec((-3000.0f64..3000.0, -3000.0f64..3000.0), 1..60),
            zoom in 0.5f64..3.0,
        ) {
            let bounds = Rectangle::new(0.0, 0.0, 1600.0, 1200.0);
            let mut cam = Camera::new(Vector2::new(800.0, 600.0), 800.0, 600.0);
            cam.set_zoom(zoom);
            cam.set_bounds(bounds);
            cam.start_following(FollowSettings { speed: 1.0, ..FollowSettings::default() });
            cam.start_shake(25.0, Duration::from_secs(2));

            for (x, y) in targets {
                let target = Vector2::new(x, y);
                cam.update(FRAME, Some(&target));
                prop_assert!(bounds.contains(cam.position));
                let view = cam.view_bounds();
                if view.width <= bounds.width {
                    prop_assert!(view.x >= bounds.x - 1e-9 && view.right() <= bounds.right() + 1e-9);
                }
                if view.height <= bounds.height {
                    prop_assert!(view.y >= bounds.y - 1e-9 && view.bottom() <= bounds.bottom() + 1e-9);
                }
            }
        }
    }
}

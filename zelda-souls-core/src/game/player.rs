//! Player State
//!
//! [`PlayerActionState`] holds health, stamina and the invulnerability /
//! stun timers. [`PlayerEntity`] is the single playable character: a
//! position, a [`MovementState`] and an action state, plus the stamina-gated
//! attack / roll / interact actions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::direction::Direction;
use crate::core::vec2::{Rectangle, Vector2};
use crate::game::camera::Positioned;
use crate::game::movement::{MovementBounds, MovementState};

// =============================================================================
// TUNING
// =============================================================================

/// Per-character numbers. Defaults match the normal difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    /// Cruising speed (px/s)
    pub speed: f64,
    /// Velocity cap (px/s)
    pub max_speed: f64,
    /// Square body size (px)
    pub size: f64,
    /// Stamina spent per attack
    pub attack_stamina_cost: f64,
    /// Stamina spent per roll
    pub roll_stamina_cost: f64,
    /// Roll burst speed (px/s)
    pub roll_speed: f64,
    /// Invulnerability granted by a roll
    pub roll_invulnerability: Duration,
    /// Invulnerability after taking a hit
    pub hit_invulnerability: Duration,
    /// Stamina regenerated per second
    pub stamina_regen_per_second: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 200.0,
            max_speed: 250.0,
            size: 32.0,
            attack_stamina_cost: 15.0,
            roll_stamina_cost: 25.0,
            roll_speed: 400.0,
            roll_invulnerability: Duration::from_millis(300),
            hit_invulnerability: Duration::from_secs(1),
            stamina_regen_per_second: 25.0,
        }
    }
}

// =============================================================================
// ACTION STATE
// =============================================================================

/// Health, stamina and combat timers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerActionState {
    /// Current health
    pub health: i32,
    /// Maximum health
    pub max_health: i32,
    /// Current stamina
    pub stamina: f64,
    /// Maximum stamina
    pub max_stamina: f64,
    /// Stamina regenerated per second
    pub stamina_regen_per_second: f64,
    /// Flat damage reduction
    pub defense: i32,
    /// Base attack power
    pub attack_power: i32,
    /// Remaining invulnerability
    pub invulnerability_remaining: Duration,
    /// Invulnerability applied by each hit
    pub hit_invulnerability: Duration,
    /// Remaining stun
    pub stun_remaining: Duration,
    /// Stunned flag, cleared when the stun timer runs out
    pub stunned: bool,
    /// Time alive
    pub play_time: Duration,
}

impl Default for PlayerActionState {
    fn default() -> Self {
        Self {
            health: 100,
            max_health: 100,
            stamina: 100.0,
            max_stamina: 100.0,
            stamina_regen_per_second: 25.0,
            defense: 5,
            attack_power: 10,
            invulnerability_remaining: Duration::ZERO,
            hit_invulnerability: Duration::from_secs(1),
            stun_remaining: Duration::ZERO,
            stunned: false,
            play_time: Duration::ZERO,
        }
    }
}

impl PlayerActionState {
    /// Full health and stamina with the given tuning.
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            stamina_regen_per_second: tuning.stamina_regen_per_second,
            hit_invulnerability: tuning.hit_invulnerability,
            ..Self::default()
        }
    }

    /// Apply a hit. Returns `false` (no effect) while invulnerable.
    ///
    /// Damage is `max(1, amount - defense)`; health floors at 0.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        let actual = amount.saturating_sub(self.defense).max(1);
        self.health = self.health.saturating_sub(actual).max(0);
        self.invulnerability_remaining = self.hit_invulnerability;
        true
    }

    /// Restore health, capped at max.
    pub fn heal(&mut self, amount: i32) {
        self.health = self.health.saturating_add(amount.max(0)).min(self.max_health);
    }

    /// Spend stamina if enough is available.
    pub fn use_stamina(&mut self, cost: f64) -> bool {
        if self.stamina >= cost {
            self.stamina -= cost;
            true
        } else {
            false
        }
    }

    /// Stun for `duration` (extends a shorter running stun).
    pub fn stun(&mut self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        self.stunned = true;
        self.stun_remaining = self.stun_remaining.max(duration);
    }

    /// Grant at least `duration` of invulnerability.
    pub fn grant_invulnerability(&mut self, duration: Duration) {
        self.invulnerability_remaining = self.invulnerability_remaining.max(duration);
    }

    /// Tick timers and regenerate stamina.
    pub fn update(&mut self, dt: Duration) {
        self.invulnerability_remaining = self.invulnerability_remaining.saturating_sub(dt);

        if self.stunned {
            self.stun_remaining = self.stun_remaining.saturating_sub(dt);
            if self.stun_remaining.is_zero() {
                self.stunned = false;
            }
        }

        if self.stamina < self.max_stamina {
            self.stamina = (self.stamina + self.stamina_regen_per_second * dt.as_secs_f64())
                .min(self.max_stamina);
        }

        self.play_time += dt;
    }

    /// `health > 0`
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Any invulnerability left?
    pub fn is_invulnerable(&self) -> bool {
        !self.invulnerability_remaining.is_zero()
    }

    /// Health as a fraction of max.
    pub fn health_fraction(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    /// Stamina as a fraction of max.
    pub fn stamina_fraction(&self) -> f64 {
        if self.max_stamina <= 0.0 {
            return 0.0;
        }
        self.stamina / self.max_stamina
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// Just-pressed player actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Melee attack
    Attack,
    /// Dodge roll
    Roll,
    /// Interact with something nearby
    Interact,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Attack => f.write_str("attack"),
            PlayerAction::Roll => f.write_str("roll"),
            PlayerAction::Interact => f.write_str("interact"),
        }
    }
}

/// Why an action did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Not enough stamina
    InsufficientStamina,
    /// Player is stunned
    Stunned,
    /// Player is dead
    Dead,
    /// Nothing to interact with
    NothingNearby,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::InsufficientStamina => f.write_str("insufficient stamina"),
            RejectReason::Stunned => f.write_str("stunned"),
            RejectReason::Dead => f.write_str("dead"),
            RejectReason::NothingNearby => f.write_str("nothing nearby"),
        }
    }
}

// =============================================================================
// ENTITY
// =============================================================================

/// The playable character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntity {
    /// Center position (world px)
    pub position: Vector2,
    /// Body size (px)
    pub size: Vector2,
    /// Kinematics
    pub movement: MovementState,
    /// Health / stamina / timers
    pub stats: PlayerActionState,
    /// Tuning this entity was built with
    pub tuning: PlayerTuning,
}

impl PlayerEntity {
    /// Spawn at `position` with full stats.
    pub fn spawn(position: Vector2, tuning: PlayerTuning) -> Self {
        Self {
            position,
            size: Vector2::new(tuning.size, tuning.size),
            movement: MovementState::new(tuning.speed, tuning.max_speed),
            stats: PlayerActionState::new(&tuning),
            tuning,
        }
    }

    /// Half the body size.
    pub fn half_size(&self) -> Vector2 {
        self.size * 0.5
    }

    /// Body rectangle (world px).
    pub fn bounds(&self) -> Rectangle {
        Rectangle::from_center(self.position, self.size)
    }

    /// Integrate movement for one frame.
    pub fn update_movement(&mut self, intent: Vector2, dt: f64, bounds: Option<&MovementBounds>) {
        let half = self.half_size();
        self.position = self.movement.integrate(self.position, intent, dt, bounds, half);
    }

    fn check_can_act(&self) -> Result<(), RejectReason> {
        if !self.stats.is_alive() {
            return Err(RejectReason::Dead);
        }
        if self.stats.stunned {
            return Err(RejectReason::Stunned);
        }
        Ok(())
    }

    /// Spend attack stamina.
    pub fn try_attack(&mut self) -> Result<(), RejectReason> {
        self.check_can_act()?;
        if !self.stats.use_stamina(self.tuning.attack_stamina_cost) {
            debug!(stamina = self.stats.stamina, "attack refused: not enough stamina");
            return Err(RejectReason::InsufficientStamina);
        }
        Ok(())
    }

    /// Spend roll stamina, burst along the facing direction and become
    /// briefly invulnerable. Returns the roll velocity.
    pub fn try_roll(&mut self) -> Result<Vector2, RejectReason> {
        self.check_can_act()?;
        if !self.stats.use_stamina(self.tuning.roll_stamina_cost) {
            debug!(stamina = self.stats.stamina, "roll refused: not enough stamina");
            return Err(RejectReason::InsufficientStamina);
        }

        let facing = match self.movement.facing_direction {
            Direction::None => Direction::Down,
            dir => dir,
        };
        self.movement.velocity = facing.to_vector() * self.tuning.roll_speed;
        self.stats.grant_invulnerability(self.tuning.roll_invulnerability);
        Ok(self.movement.velocity)
    }

    /// Nothing is interactable yet, so this always reports `NothingNearby`.
    pub fn try_interact(&mut self) -> Result<(), RejectReason> {
        self.check_can_act()?;
        Err(RejectReason::NothingNearby)
    }
}

impl Positioned for PlayerEntity {
    fn position(&self) -> Vector2 {
        self.position
    }

    fn velocity(&self) -> Option<Vector2> {
        Some(self.movement.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerEntity {
        PlayerEntity::spawn(Vector2::new(400.0, 300.0), PlayerTuning::default())
    }

    #[test]
    fn test_damage_then_invulnerable() {
        let mut stats = PlayerActionState::default();
        assert!(stats.take_damage(30));
        assert_eq!(stats.health, 75);

        stats.update(Duration::from_millis(500));
        assert!(!stats.take_damage(30));
        assert_eq!(stats.health, 75);

        stats.update(Duration::from_millis(500));
        assert!(stats.take_damage(30));
        assert_eq!(stats.health, 50);
    }

    #[test]
    fn test_minimum_damage_and_floor() {
        let mut stats = PlayerActionState::default();
        stats.take_damage(2);
        assert_eq!(stats.health, 99);

        stats.invulnerability_remaining = Duration::ZERO;
        stats.take_damage(10_000);
        assert_eq!(stats.health, 0);
        assert!(!stats.is_alive());
    }

    #[test]
    fn test_stamina_gating() {
        let mut stats = PlayerActionState::default();
        stats.stamina = 10.0;
        assert!(!stats.use_stamina(15.0));
        assert_eq!(stats.stamina, 10.0);
        assert!(stats.use_stamina(10.0));
        assert_eq!(stats.stamina, 0.0);
    }

    #[test]
    fn test_regen_caps_at_max() {
        let mut stats = PlayerActionState::default();
        stats.stamina = 90.0;
        stats.update(Duration::from_secs(1));
        assert_eq!(stats.stamina, 100.0);
    }

    #[test]
    fn test_stun_clears() {
        let mut stats = PlayerActionState::default();
        stats.stun(Duration::from_millis(200));
        assert!(stats.stunned);
        stats.update(Duration::from_millis(100));
        assert!(stats.stunned);
        stats.update(Duration::from_millis(150));
        assert!(!stats.stunned);
        assert_eq!(stats.stun_remaining, Duration::ZERO);
    }

    #[test]
    fn test_heal_capped() {
        let mut stats = PlayerActionState::default();
        stats.health = 40;
        stats.heal(200);
        assert_eq!(stats.health, 100);
    }

    #[test]
    fn test_roll_facing_right() {
        let mut p = player();
        p.movement.facing_direction = Direction::Right;
        let velocity = p.try_roll().unwrap();
        assert_eq!(velocity, Vector2::new(400.0, 0.0));
        assert_eq!(p.movement.velocity, Vector2::new(400.0, 0.0));
        assert_eq!(p.stats.stamina, 75.0);
        assert_eq!(p.stats.invulnerability_remaining, Duration::from_millis(300));
    }

    #[test]
    fn test_attack_costs_stamina() {
        let mut p = player();
        assert!(p.try_attack().is_ok());
        assert_eq!(p.stats.stamina, 85.0);

        p.stats.stamina = 5.0;
        assert_eq!(p.try_attack(), Err(RejectReason::InsufficientStamina));
        assert_eq!(p.stats.stamina, 5.0);
    }

    #[test]
    fn test_actions_refused_when_stunned_or_dead() {
        let mut p = player();
        p.stats.stun(Duration::from_secs(1));
        assert_eq!(p.try_roll(), Err(RejectReason::Stunned));
        assert_eq!(p.stats.stamina, 100.0);

        let mut p = player();
        p.stats.health = 0;
        assert_eq!(p.try_attack(), Err(RejectReason::Dead));
    }

    #[test]
    fn test_interact_finds_nothing() {
        let mut p = player();
        assert_eq!(p.try_interact(), Err(RejectReason::NothingNearby));
        assert_eq!(p.stats.stamina, 100.0);
    }
}

//! Common ECS components shared by the scanner and the demo scene.

use glam::Vec3;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }
}

/// Health component for damageable entities.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Tag component for the player entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

/// Classification shared by every creature in the scene. Tamed creatures are
/// friendly regardless of what their AI is doing.
#[derive(Debug, Clone, Copy)]
pub struct Creature {
    pub tamed: bool,
    pub move_speed: f32,
}

/// AI state for creatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AIState {
    #[default]
    Idle,
    Chasing,
    Attacking,
}

/// Component storing AI behavior state. `target` holds the entity the
/// creature is currently pursuing, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct AIComponent {
    pub state: AIState,
    pub target: Option<hecs::Entity>,
    /// Distance at which a target is acquired.
    pub aggro_range: f32,
    /// Distance beyond which an acquired target is dropped.
    pub forget_range: f32,
    /// Distance at which the creature stops and attacks.
    pub attack_range: f32,
}

impl AIComponent {
    pub fn new(aggro_range: f32, forget_range: f32, attack_range: f32) -> Self {
        Self {
            state: AIState::Idle,
            target: None,
            aggro_range,
            forget_range,
            attack_range,
        }
    }
}

//! Kinematic body component.
//!
//! The [`RigidBody`] component stores the velocity of an entity. Systems that
//! integrate motion (the player controller and item physics) read and write
//! it every tick.
//!
//! The `frozen` flag disables physics for the body, useful when an entity's
//! position is controlled externally (e.g., an item held by the player).

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Kinematic body storing velocity.
///
/// # Fields
/// - `velocity` - Current velocity in world units per second
/// - `frozen` - When true, physics systems skip this entity
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new();
/// rb.velocity = Vec3::new(0.0, -1.0, 0.0);
///
/// // Item picked up: physics no longer applies
/// rb.freeze();
/// ```
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vec3,
    /// When true, physics systems skip all calculations for this entity.
    /// Position can still be modified externally (e.g., by the pickup system).
    pub frozen: bool,
}

impl RigidBody {
    /// Create a RigidBody with zero velocity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RigidBody moving with the given velocity.
    pub fn with_velocity(velocity: Vec3) -> Self {
        Self {
            velocity,
            frozen: false,
        }
    }

    /// Magnitude of the velocity.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Unit direction of travel, or `None` when the body is at rest.
    pub fn direction(&self) -> Option<Vec3> {
        self.velocity.try_normalize()
    }

    /// Stop all motion.
    pub fn halt(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    /// Freeze the rigid body, preventing physics systems from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.velocity = Vec3::ZERO;
    }

    /// Unfreeze the rigid body, allowing physics systems to update it.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Set speed while maintaining the current direction of velocity.
    ///
    /// If the current velocity is zero, this is a no-op since there's no
    /// direction to maintain.
    pub fn set_speed(&mut self, new_speed: f32) {
        match self.direction() {
            Some(dir) => self.velocity = dir * new_speed,
            None => log::warn!("RigidBody::set_speed called with zero velocity - operation ignored"),
        }
    }
}

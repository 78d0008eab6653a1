//! Predictive collision resolution.
//!
//! The player controller asks a [`CollisionPolicy`] what to do at two points
//! of every step: before velocity is integrated into position, and after
//! gravity and friction were applied. Both hooks get a [`PlayerMotion`], which
//! can test the current volume and the predictive ("future") volume against
//! any obstacle box.
//!
//! Dynamic items don't steer, they settle: [`settle_item`] lets them fall
//! freely while the way ahead is clear and creeps them to contact otherwise.
//! [`item_physics_system`] runs it for every loose item.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::debug;

use crate::components::boxcollider::{Aabb, BoxCollider, PREDICTION_EPSILON, Solid};
use crate::components::item::{Item, Stored};
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform3D;
use crate::resources::gameconfig::GameConfig;
use crate::resources::worldtime::WorldTime;

/// Distance an item moves per creep step.
pub const CREEP_STEP: f32 = 1e-4;
/// Hard cap on creep steps in a single tick.
pub const MAX_CREEP_STEPS: usize = 20_000;

/// Mutable view of the player being stepped.
pub struct PlayerMotion<'a> {
    pub player: &'a mut Player,
    pub transform: &'a mut Transform3D,
    pub body: &'a mut RigidBody,
    pub collider: &'a BoxCollider,
    pub dt: f32,
}

impl PlayerMotion<'_> {
    pub fn current_aabb(&self) -> Aabb {
        self.collider.aabb(self.transform.position)
    }

    /// Volume the player would occupy after this tick at the current velocity.
    pub fn future_aabb(&self) -> Aabb {
        self.collider
            .predicted_aabb(self.transform.position, self.body.velocity, self.dt)
    }

    pub fn check_collision(&self, obstacle: &Aabb) -> bool {
        self.current_aabb().intersects(obstacle)
    }

    pub fn check_collision_future(&self, obstacle: &Aabb) -> bool {
        self.future_aabb().intersects(obstacle)
    }

    /// Stop vertical motion and allow jumping again.
    pub fn land(&mut self) {
        self.body.velocity.y = 0.0;
        self.player.can_jump = true;
    }

    /// Stop all motion and allow jumping again.
    pub fn halt(&mut self) {
        self.body.halt();
        self.player.can_jump = true;
    }
}

/// Scene-supplied reactions to predicted contacts.
pub trait CollisionPolicy {
    /// Runs after input and clamping, before position integration.
    fn before_integrate(&self, _motion: &mut PlayerMotion) {}
    /// Runs after gravity and friction.
    fn after_integrate(&self, _motion: &mut PlayerMotion) {}
}

/// No collisions at all.
impl CollisionPolicy for () {}

/// Static obstacles of the scene split by how the player reacts to them.
#[derive(Debug, Clone, Default)]
pub struct SceneColliders {
    pub ground: Vec<Aabb>,
    pub blocking: Vec<Aabb>,
}

impl SceneColliders {
    pub fn from_solids<'a>(solids: impl IntoIterator<Item = (&'a Transform3D, &'a BoxCollider, &'a Solid)>) -> Self {
        let mut colliders = Self::default();
        for (transform, collider, solid) in solids {
            let aabb = collider.aabb(transform.position);
            match solid {
                Solid::Ground => colliders.ground.push(aabb),
                Solid::Blocking => colliders.blocking.push(aabb),
            }
        }
        colliders
    }

    pub fn all(&self) -> impl Iterator<Item = &Aabb> {
        self.ground.iter().chain(self.blocking.iter())
    }
}

impl CollisionPolicy for SceneColliders {
    fn before_integrate(&self, motion: &mut PlayerMotion) {
        if self.blocking.iter().any(|b| motion.check_collision_future(b)) {
            motion.halt();
        }
    }

    fn after_integrate(&self, motion: &mut PlayerMotion) {
        if self.ground.iter().any(|g| motion.check_collision_future(g)) {
            motion.land();
        }
    }
}

/// What [`settle_item`] did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStep {
    /// Way ahead is clear; gravity applied and position integrated.
    Falling,
    /// Contact predicted but the item wasn't moving.
    Resting,
    /// Crept `steps` times until the current volume touched an obstacle.
    Contact { steps: usize },
    /// Step limit reached without contact; left at the last clear sample.
    Capped { steps: usize },
}

/// Advance a loose item by one tick.
///
/// Velocity is zeroed whenever a contact is predicted, whatever the outcome.
pub fn settle_item(
    transform: &mut Transform3D,
    body: &mut RigidBody,
    collider: &BoxCollider,
    obstacles: &[Aabb],
    gravity: f32,
    dt: f32,
) -> ItemStep {
    let future = collider.predicted_aabb(transform.position, body.velocity, dt);
    if !obstacles.iter().any(|o| future.intersects(o)) {
        body.velocity.y -= gravity * dt;
        transform.position += body.velocity * dt;
        return ItemStep::Falling;
    }

    let Some(direction) = body.direction() else {
        body.halt();
        return ItemStep::Resting;
    };
    let collides = |position: Vec3| {
        let current = collider.aabb(position);
        obstacles.iter().any(|o| current.intersects(o))
    };

    let travel = body.speed() * dt + PREDICTION_EPSILON;
    let bound = ((travel / CREEP_STEP).ceil() as usize + 1).min(MAX_CREEP_STEPS);
    body.halt();

    let mut steps = 0;
    while !collides(transform.position) {
        if steps == bound {
            debug!("item creep capped after {} steps", steps);
            return ItemStep::Capped { steps };
        }
        transform.position += direction * CREEP_STEP;
        steps += 1;
    }
    ItemStep::Contact { steps }
}

/// Run [`settle_item`] for every loose, unfrozen item.
pub fn item_physics_system(
    time: Res<WorldTime>,
    config: Res<GameConfig>,
    solids: Query<(&Transform3D, &BoxCollider), (With<Solid>, Without<Item>)>,
    mut items: Query<
        (&mut Transform3D, &mut RigidBody, &BoxCollider),
        (With<Item>, Without<Stored>, Without<Solid>),
    >,
) {
    let obstacles: Vec<Aabb> = solids
        .iter()
        .map(|(transform, collider)| collider.aabb(transform.position))
        .collect();
    for (mut transform, mut body, collider) in items.iter_mut() {
        if body.frozen {
            continue;
        }
        settle_item(
            &mut transform,
            &mut body,
            collider,
            &obstacles,
            config.gravity,
            time.delta,
        );
    }
}

//! Mouse look.
//!
//! Yaw always follows horizontal mouse motion around the world up axis.
//! Pitch is applied around the view's own right axis only when the result
//! keeps the view's up vector within [`PITCH_LIMIT`] of world up, which stops
//! the camera from flipping over when looking straight up or down.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec2, Vec3};

use crate::components::player::Player;
use crate::components::transform::Transform3D;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

/// Minimum dot product between the view up vector and world up.
pub const PITCH_LIMIT: f32 = 0.5;

/// Look speed in radians per unit of mouse motion per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookSettings {
    pub sensitivity_x: f32,
    pub sensitivity_y: f32,
}

impl LookSettings {
    pub fn from_degrees(sensitivity_x: f32, sensitivity_y: f32) -> Self {
        Self {
            sensitivity_x: sensitivity_x.to_radians(),
            sensitivity_y: sensitivity_y.to_radians(),
        }
    }
}

/// Orientation after applying one tick of mouse motion to `rotation`.
pub fn apply_look(rotation: Quat, mouse_rel: Vec2, settings: LookSettings, dt: f32) -> Quat {
    let right = rotation * Vec3::X;
    let pitch = Quat::from_axis_angle(right, -mouse_rel.y * settings.sensitivity_y * dt);
    let candidate = pitch * rotation;
    let pitched = if (candidate * Vec3::Y).dot(Vec3::Y) > PITCH_LIMIT {
        candidate
    } else {
        rotation
    };

    let yaw = Quat::from_rotation_y(-mouse_rel.x * settings.sensitivity_x * dt);
    (yaw * pitched).normalize()
}

/// Turn every player whose rotation is not locked.
pub fn player_look_system(
    time: Res<WorldTime>,
    input: Res<InputState>,
    config: Res<GameConfig>,
    mut players: Query<(&Player, &mut Transform3D)>,
) {
    let settings = config.look_settings();
    for (player, mut transform) in players.iter_mut() {
        if player.lock_rotation {
            continue;
        }
        transform.rotation = apply_look(transform.rotation, input.mouse.rel, settings, time.delta);
    }
}

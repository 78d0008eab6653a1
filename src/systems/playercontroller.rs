//! First-person kinematic controller.
//!
//! [`step_player`] integrates one tick of player motion: WASD acceleration
//! along the floor-corrected forward and right axes, jumping, velocity
//! clamping, position integration, then gravity and friction. A
//! [`CollisionPolicy`] gets to veto motion before integration and to land
//! the player afterwards.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use crate::components::boxcollider::{BoxCollider, Solid};
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform3D;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::{CollisionPolicy, PlayerMotion, SceneColliders};

/// Forward direction flattened onto the ground plane.
///
/// The view forward is pitched back to the horizon around the view's right
/// axis, so walking speed doesn't depend on how far up or down the player
/// looks.
pub fn floor_forward(transform: &Transform3D) -> Vec3 {
    let forward = transform.forward();
    let pitch = std::f32::consts::FRAC_PI_2 - forward.dot(Vec3::Y).clamp(-1.0, 1.0).acos();
    let corrected = Quat::from_axis_angle(transform.right(), -pitch) * forward;
    Vec3::new(corrected.x, 0.0, corrected.z)
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Move `value` toward zero by `amount`, snapping to zero when it would
/// cross.
fn decay(value: f32, amount: f32) -> f32 {
    if value.abs() - amount < 0.0 {
        0.0
    } else {
        value - amount * value.signum()
    }
}

/// Advance the player by `motion.dt` seconds.
pub fn step_player(
    motion: &mut PlayerMotion,
    input: &InputState,
    gravity: f32,
    policy: &impl CollisionPolicy,
) {
    let dt = motion.dt;
    let forward = floor_forward(motion.transform) * motion.player.speed;
    let right = horizontal(motion.transform.right()) * motion.player.speed;

    let mut velocity = motion.body.velocity;
    if input.forward.active {
        velocity += horizontal(forward);
    }
    if input.back.active {
        velocity -= horizontal(forward);
    }
    if input.right.active {
        velocity += right;
    }
    if input.left.active {
        velocity -= right;
    }
    if input.jump.just_pressed && motion.player.can_jump {
        velocity.y += motion.player.max_jump_speed;
        motion.player.can_jump = false;
    }

    let max_speed = motion.player.max_speed;
    let max_jump_speed = motion.player.max_jump_speed;
    velocity.x = velocity.x.clamp(-max_speed, max_speed);
    velocity.z = velocity.z.clamp(-max_speed, max_speed);
    velocity.y = velocity.y.clamp(-max_jump_speed, max_jump_speed);
    motion.body.velocity = velocity;

    policy.before_integrate(motion);

    motion.transform.position += motion.body.velocity * dt;

    if motion.body.speed() > 0.0 {
        let v = &mut motion.body.velocity;
        v.y = (v.y - gravity * dt).clamp(-max_jump_speed, max_jump_speed);
        v.x = decay(v.x, motion.player.friction);
        v.z = decay(v.z, motion.player.friction);
    }

    policy.after_integrate(motion);
}

/// Step every player against the scene's solids.
pub fn player_movement_system(
    time: Res<WorldTime>,
    input: Res<InputState>,
    config: Res<GameConfig>,
    solids: Query<(&Transform3D, &BoxCollider, &Solid), Without<Player>>,
    mut players: Query<(&mut Player, &mut Transform3D, &mut RigidBody, &BoxCollider)>,
) {
    let scene = SceneColliders::from_solids(solids.iter());
    for (mut player, mut transform, mut body, collider) in players.iter_mut() {
        let mut motion = PlayerMotion {
            player: &mut *player,
            transform: &mut *transform,
            body: &mut *body,
            collider,
            dt: time.delta,
        };
        step_player(&mut motion, &input, config.gravity, &scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::boxcollider::Aabb;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    struct Rig {
        player: Player,
        transform: Transform3D,
        body: RigidBody,
        collider: BoxCollider,
    }

    impl Rig {
        fn new(position: Vec3) -> Self {
            Self {
                player: Player::default(),
                transform: Transform3D::from_position(position),
                body: RigidBody::new(),
                collider: BoxCollider::from_bounds(Vec3::splat(-1.0), Vec3::ONE, Vec3::new(1.0, 3.0, 1.0)),
            }
        }

        fn step(&mut self, input: &InputState, dt: f32, policy: &impl CollisionPolicy) {
            let mut motion = PlayerMotion {
                player: &mut self.player,
                transform: &mut self.transform,
                body: &mut self.body,
                collider: &self.collider,
                dt,
            };
            step_player(&mut motion, input, 60.7, policy);
        }
    }

    #[test]
    fn test_floor_forward_ignores_pitch() {
        let pitched = Quat::from_axis_angle(Vec3::X, 0.6);
        let t = Transform3D::default().with_rotation(pitched);
        assert!(t.forward().y > 0.5);
        let f = floor_forward(&t);
        assert!(approx_eq(f.y, 0.0));
        assert!(approx_eq(f.length(), 1.0));
        assert!(approx_eq(f.z, -1.0));
    }

    #[test]
    fn test_forward_key_accelerates_then_friction() {
        let mut rig = Rig::new(Vec3::ZERO);
        let mut input = InputState::default();
        input.forward.active = true;
        rig.step(&input, 0.1, &());
        // +7 along -Z, integrated, then friction 5 and gravity
        assert!(approx_eq(rig.transform.position.z, -0.7));
        assert!(approx_eq(rig.body.velocity.z, -2.0));
        assert!(approx_eq(rig.body.velocity.y, -6.07));
    }

    #[test]
    fn test_diagonal_keys_combine_and_clamp() {
        let mut rig = Rig::new(Vec3::ZERO);
        rig.player.speed = 50.0;
        let mut input = InputState::default();
        input.forward.active = true;
        input.right.active = true;
        rig.step(&input, 0.0, &());
        // clamped per axis before friction
        assert!(approx_eq(rig.body.velocity.x, 5.0));
        assert!(approx_eq(rig.body.velocity.z, -5.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut rig = Rig::new(Vec3::ZERO);
        let mut input = InputState::default();
        input.left.active = true;
        input.right.active = true;
        rig.step(&input, 0.1, &());
        assert_eq!(rig.transform.position, Vec3::ZERO);
        assert_eq!(rig.body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_jump_requires_can_jump() {
        let mut rig = Rig::new(Vec3::ZERO);
        rig.player.can_jump = false;
        let mut input = InputState::default();
        input.jump.just_pressed = true;
        rig.step(&input, 0.0, &());
        assert_eq!(rig.body.velocity.y, 0.0);

        rig.player.can_jump = true;
        rig.step(&input, 0.0, &());
        assert!(approx_eq(rig.body.velocity.y, 20.0));
        assert!(!rig.player.can_jump);
    }

    #[test]
    fn test_fresh_player_can_jump_from_rest() {
        let mut rig = Rig::new(Vec3::ZERO);
        let mut input = InputState::default();
        input.jump.just_pressed = true;
        rig.step(&input, 1.0 / 120.0, &());
        assert!(rig.body.velocity.y > 0.0);
        assert!(rig.transform.position.y > 0.0);
        assert!(!rig.player.can_jump);
    }

    #[test]
    fn test_resting_player_has_no_gravity() {
        let mut rig = Rig::new(Vec3::ZERO);
        rig.step(&InputState::default(), 0.1, &());
        assert_eq!(rig.body.velocity, Vec3::ZERO);
        assert_eq!(rig.transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_falls_until_ground_then_lands() {
        // feet at y = 7, floor top at y = 0
        let mut rig = Rig::new(Vec3::new(0.0, 10.0, 0.0));
        rig.player.can_jump = false;
        rig.body.velocity.y = -0.1;
        let scene = SceneColliders {
            ground: vec![Aabb::from_center(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0))],
            blocking: Vec::new(),
        };
        let input = InputState::default();

        let mut previous = rig.body.velocity.y;
        let mut landed = false;
        for _ in 0..200 {
            rig.step(&input, 1.0 / 60.0, &scene);
            if rig.player.can_jump {
                landed = true;
                break;
            }
            assert!(rig.body.velocity.y < previous || rig.body.velocity.y == -20.0);
            previous = rig.body.velocity.y;
        }
        assert!(landed);
        assert_eq!(rig.body.velocity.y, 0.0);
        let feet = rig.collider.aabb(rig.transform.position).min.y;
        assert!(feet > -0.5 && feet < 1.0);

        // stays put afterwards
        let resting = rig.transform.position;
        rig.step(&input, 1.0 / 60.0, &scene);
        assert_eq!(rig.transform.position, resting);
    }

    #[test]
    fn test_blocking_obstacle_halts_everything() {
        let mut rig = Rig::new(Vec3::ZERO);
        rig.player.can_jump = false;
        rig.body.velocity = Vec3::new(0.0, 3.0, -5.0);
        let scene = SceneColliders {
            ground: Vec::new(),
            blocking: vec![Aabb::from_center(Vec3::new(0.0, 0.0, -2.5), Vec3::ONE)],
        };
        rig.step(&InputState::default(), 0.2, &scene);
        assert_eq!(rig.body.velocity, Vec3::ZERO);
        assert_eq!(rig.transform.position, Vec3::ZERO);
        assert!(rig.player.can_jump);
    }
}

//! Engine tick integration tests for movement, item physics, pickup and
//! inventory, run through the full gameplay schedule.

use bevy_ecs::prelude::*;
use glam::Vec3;

use lanternvale::components::boxcollider::{BoxCollider, Solid};
use lanternvale::components::item::{Item, Stored};
use lanternvale::components::player::Player;
use lanternvale::components::rigidbody::RigidBody;
use lanternvale::components::transform::Transform3D;
use lanternvale::game::{self, PLAYER_SCALE};
use lanternvale::resources::display::{DisplaySurface, SurfaceKey};
use lanternvale::resources::gameconfig::GameConfig;
use lanternvale::resources::input::{KeyboardKey, RawInput};
use lanternvale::resources::worldtime::WorldTime;
use lanternvale::systems::pickup::HOLD_DISTANCE;

const EPSILON: f32 = 1e-4;
const DT: f32 = 1.0 / 120.0;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> (World, Schedule) {
    let mut world = World::new();
    game::insert_resources(&mut world, GameConfig::new());
    (world, game::update_schedule())
}

fn run(world: &mut World, schedule: &mut Schedule, ticks: usize) {
    for _ in 0..ticks {
        game::step(world, schedule, DT);
    }
}

/// Press `key` for exactly one tick.
fn tap(world: &mut World, schedule: &mut Schedule, key: KeyboardKey) {
    world.resource_mut::<RawInput>().press(key);
    game::step(world, schedule, DT);
    world.resource_mut::<RawInput>().release(key);
}

fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((
            Player::default(),
            Transform3D::from_position(position),
            RigidBody::new(),
            BoxCollider::from_bounds(Vec3::splat(-1.0), Vec3::ONE, PLAYER_SCALE),
        ))
        .id()
}

fn spawn_lantern(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((
            Item::new("Lantern", "Burns {hours} hours.").unwrap().with_value("hours", 3),
            Transform3D::from_position(position),
            RigidBody::new(),
            BoxCollider::new(Vec3::splat(0.25)),
        ))
        .id()
}

#[test]
fn test_world_time_advances_per_step() {
    let (mut world, mut schedule) = make_world();
    run(&mut world, &mut schedule, 3);
    let time = world.resource::<WorldTime>();
    assert_eq!(time.frame_count, 3);
    assert!(approx_eq(time.delta, DT));
    assert!(approx_eq(time.elapsed, 3.0 * DT));
}

#[test]
fn test_player_walks_falls_and_lands_on_intro_floor() {
    let (mut world, mut schedule) = make_world();
    let root = game::intro_dialogue(&mut world);
    let scene = game::spawn_intro(&mut world, root).unwrap();

    world.resource_mut::<RawInput>().press(KeyboardKey::W);
    run(&mut world, &mut schedule, 40);
    world.resource_mut::<RawInput>().release(KeyboardKey::W);
    run(&mut world, &mut schedule, 240);

    let transform = *world.get::<Transform3D>(scene.player).unwrap();
    let body = *world.get::<RigidBody>(scene.player).unwrap();
    let collider = *world.get::<BoxCollider>(scene.player).unwrap();
    let player = world.get::<Player>(scene.player).unwrap();

    // walked toward the cube along +Z
    assert!(transform.position.z > 1.0);
    assert!(transform.position.z < 8.0);
    assert!(player.can_jump);
    assert_eq!(body.velocity, Vec3::ZERO);
    // floor top is at y = -4
    let feet = collider.aabb(transform.position).min.y;
    assert!(feet > -4.0 && feet < -3.8, "feet at {}", feet);

    // jump lifts the player off the floor
    tap(&mut world, &mut schedule, KeyboardKey::Space);
    let after = world.get::<Transform3D>(scene.player).unwrap().position;
    assert!(after.y > transform.position.y);
    assert!(!world.get::<Player>(scene.player).unwrap().can_jump);
}

#[test]
fn test_fresh_intro_player_jumps_on_first_space() {
    let (mut world, mut schedule) = make_world();
    let root = game::intro_dialogue(&mut world);
    let scene = game::spawn_intro(&mut world, root).unwrap();
    assert!(world.get::<Player>(scene.player).unwrap().can_jump);

    tap(&mut world, &mut schedule, KeyboardKey::Space);
    let position = world.get::<Transform3D>(scene.player).unwrap().position;
    assert!(position.y > 0.0, "still at y = {}", position.y);
    assert!(world.get::<RigidBody>(scene.player).unwrap().velocity.y > 0.0);
    assert!(!world.get::<Player>(scene.player).unwrap().can_jump);
}

#[test]
fn test_blocking_cube_stops_the_player() {
    let (mut world, mut schedule) = make_world();
    world.spawn((
        Transform3D::from_position(Vec3::new(0.0, -4.5, 0.0)),
        BoxCollider::new(Vec3::new(50.0, 0.5, 50.0)),
        Solid::Ground,
    ));
    world.spawn((
        Transform3D::from_position(Vec3::new(0.0, 0.0, -4.0)),
        BoxCollider::new(Vec3::ONE),
        Solid::Blocking,
    ));
    let player = spawn_player(&mut world, Vec3::ZERO);

    world.resource_mut::<RawInput>().press(KeyboardKey::W);
    run(&mut world, &mut schedule, 120);

    let z = world.get::<Transform3D>(player).unwrap().position.z;
    // player front face at z - 1, cube back face at -3
    assert!(z >= -2.0 - EPSILON, "walked into the cube: z = {}", z);
    assert!(z < -1.0);
}

#[test]
fn test_loose_item_falls_and_settles_on_ground() {
    let (mut world, mut schedule) = make_world();
    world.spawn((
        Transform3D::from_position(Vec3::new(0.0, -0.5, 0.0)),
        BoxCollider::new(Vec3::new(20.0, 0.5, 20.0)),
        Solid::Ground,
    ));
    let lantern = spawn_lantern(&mut world, Vec3::new(0.0, 3.0, 0.0));

    run(&mut world, &mut schedule, 240);

    let transform = *world.get::<Transform3D>(lantern).unwrap();
    let body = *world.get::<RigidBody>(lantern).unwrap();
    let bottom = transform.position.y - 0.25;
    assert_eq!(body.velocity, Vec3::ZERO);
    assert!(bottom <= 0.0 && bottom > -0.01, "bottom at {}", bottom);

    run(&mut world, &mut schedule, 10);
    assert_eq!(world.get::<Transform3D>(lantern).unwrap().position, transform.position);
}

#[test]
fn test_pickup_shows_tooltip_holds_and_drops() {
    let (mut world, mut schedule) = make_world();
    let player = spawn_player(&mut world, Vec3::ZERO);
    let lantern = spawn_lantern(&mut world, Vec3::new(0.0, 0.0, -2.5));

    game::step(&mut world, &mut schedule, DT);
    assert_eq!(
        world
            .resource::<DisplaySurface>()
            .text(SurfaceKey::Tooltip)
            .map(|label| label.content.clone()),
        Some("Lantern: Burns 3 hours.".to_string())
    );

    tap(&mut world, &mut schedule, KeyboardKey::E);
    assert_eq!(world.get::<Player>(player).unwrap().held.get(), Some(lantern));
    let held = world.get::<Transform3D>(lantern).unwrap().position;
    assert!(approx_eq(held.z, -HOLD_DISTANCE));
    assert!(world.get::<RigidBody>(lantern).unwrap().frozen);

    // carried along when the player moves
    world.get_mut::<Transform3D>(player).unwrap().position = Vec3::new(5.0, 0.0, 0.0);
    game::step(&mut world, &mut schedule, DT);
    let held = world.get::<Transform3D>(lantern).unwrap().position;
    assert!(approx_eq(held.x, 5.0));
    assert!(approx_eq(held.z, -HOLD_DISTANCE));

    // dropping during the cooldown is ignored
    tap(&mut world, &mut schedule, KeyboardKey::E);
    assert_eq!(world.get::<Player>(player).unwrap().held.get(), Some(lantern));

    run(&mut world, &mut schedule, 60);
    tap(&mut world, &mut schedule, KeyboardKey::E);
    assert_eq!(world.get::<Player>(player).unwrap().held.get(), None);
    assert!(!world.get::<RigidBody>(lantern).unwrap().frozen);
}

#[test]
fn test_stash_moves_held_item_into_inventory() {
    let (mut world, mut schedule) = make_world();
    let player = spawn_player(&mut world, Vec3::ZERO);
    let lantern = spawn_lantern(&mut world, Vec3::new(0.0, 0.0, -2.5));

    tap(&mut world, &mut schedule, KeyboardKey::E);
    assert_eq!(world.get::<Player>(player).unwrap().held.get(), Some(lantern));

    // still cooling down: nothing stored
    tap(&mut world, &mut schedule, KeyboardKey::Q);
    assert!(world.get::<Stored>(lantern).is_none());

    run(&mut world, &mut schedule, 60);
    tap(&mut world, &mut schedule, KeyboardKey::Q);

    let player_ref = world.get::<Player>(player).unwrap();
    assert_eq!(player_ref.held.get(), None);
    assert!(player_ref.inventory.contains(lantern));
    assert_eq!(player_ref.inventory.get(0), Some(lantern));
    assert!(world.get::<Stored>(lantern).is_some());

    // stored items no longer fall or follow the player
    let parked = world.get::<Transform3D>(lantern).unwrap().position;
    run(&mut world, &mut schedule, 30);
    assert_eq!(world.get::<Transform3D>(lantern).unwrap().position, parked);
    assert!(
        world
            .resource::<DisplaySurface>()
            .text(SurfaceKey::Tooltip)
            .is_none()
    );
}

#[test]
fn test_retrieve_puts_stored_item_back_in_hands() {
    let (mut world, mut schedule) = make_world();
    let player = spawn_player(&mut world, Vec3::ZERO);
    let lantern = spawn_lantern(&mut world, Vec3::new(0.0, 0.0, -2.5));

    tap(&mut world, &mut schedule, KeyboardKey::E);
    run(&mut world, &mut schedule, 60);
    tap(&mut world, &mut schedule, KeyboardKey::Q);
    assert!(world.get::<Stored>(lantern).is_some());

    // cooling down after the stash
    tap(&mut world, &mut schedule, KeyboardKey::R);
    assert!(world.get::<Stored>(lantern).is_some());

    run(&mut world, &mut schedule, 60);
    tap(&mut world, &mut schedule, KeyboardKey::R);
    let player_ref = world.get::<Player>(player).unwrap();
    assert_eq!(player_ref.held.get(), Some(lantern));
    assert!(player_ref.inventory.is_empty());
    assert!(world.get::<Stored>(lantern).is_none());

    world.get_mut::<Transform3D>(player).unwrap().position = Vec3::new(-3.0, 0.0, 0.0);
    game::step(&mut world, &mut schedule, DT);
    let held = world.get::<Transform3D>(lantern).unwrap().position;
    assert!(approx_eq(held.x, -3.0));
    assert!(approx_eq(held.z, -HOLD_DISTANCE));

    run(&mut world, &mut schedule, 60);
    tap(&mut world, &mut schedule, KeyboardKey::E);
    assert_eq!(world.get::<Player>(player).unwrap().held.get(), None);
    assert!(!world.get::<RigidBody>(lantern).unwrap().frozen);
}

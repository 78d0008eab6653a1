//! Scene setup and the per-tick schedule.
//!
//! The intro scene is a floor, a cube that talks when clicked, and a couple
//! of items to pick up. [`update_schedule`] chains the gameplay systems in
//! the order they must run; [`step`] advances the clock and runs it once.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use log::info;

use crate::components::boxcollider::{BoxCollider, Solid};
use crate::components::dialogue::{DialogueId, DialogueNode};
use crate::components::item::Item;
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::speaker::Speaker;
use crate::components::transform::Transform3D;
use crate::dialoguescript::{DEFAULT_TEXT_POSITION, DialogueScript, LoadedScript, ScriptError};
use crate::resources::dialoguestore::DialogueStore;
use crate::resources::display::DisplaySurface;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::{CursorState, InputState, RawInput};
use crate::resources::worldsignals::WorldSignals;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::item_physics_system;
use crate::systems::dialogue::dialogue_system;
use crate::systems::input::{quit_on_escape_system, update_input_state};
use crate::systems::inventory::inventory_system;
use crate::systems::look::player_look_system;
use crate::systems::pickup::item_pickup_system;
use crate::systems::playercontroller::player_movement_system;
use crate::systems::time::update_world_time;
use crate::template::TemplateError;

pub const CUBE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 10.0);
pub const FLOOR_POSITION: Vec3 = Vec3::new(0.0, -5.0, 10.0);
pub const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(100.0, 1.0, 100.0);
/// Player collider: a unit box stretched to three units of half height.
pub const PLAYER_SCALE: Vec3 = Vec3::new(1.0, 3.0, 1.0);

/// Entities of the intro scene.
#[derive(Debug, Clone, Copy)]
pub struct IntroScene {
    pub player: Entity,
    pub cube: Entity,
    pub floor: Entity,
    pub lantern: Entity,
    pub key: Entity,
}

/// Insert every resource the gameplay systems read.
pub fn insert_resources(world: &mut World, config: GameConfig) {
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(RawInput::default());
    world.insert_resource(CursorState::default());
    world.insert_resource(DisplaySurface::default());
    world.insert_resource(DialogueStore::new());
    world.insert_resource(WorldSignals::default());
    world.insert_resource(config);
}

/// Install a dialogue script using the configured typing speed.
pub fn load_dialogue(world: &mut World, script: &DialogueScript) -> Result<LoadedScript, ScriptError> {
    let typing_speed = world.resource::<GameConfig>().typing_speed;
    let mut store = world.resource_mut::<DialogueStore>();
    let loaded = script.install(&mut store, typing_speed)?;
    info!("loaded {} dialogue nodes", loaded.nodes.len());
    Ok(loaded)
}

/// Built-in three line conversation, used when no script is available.
pub fn intro_dialogue(world: &mut World) -> DialogueId {
    let typing_speed = world.resource::<GameConfig>().typing_speed;
    let mut store = world.resource_mut::<DialogueStore>();
    let line = |text: &str| DialogueNode::new(text, DEFAULT_TEXT_POSITION).with_typing_speed(typing_speed);

    let bye = store.insert(line("Bye then."));
    let cant_respond = store.insert(line("Ah, thats right you cant respond yet!").with_next(bye));
    store.insert(line("Hello how are you?").with_next(cant_respond))
}

/// Spawn the floor, the talking cube, the items and the player.
pub fn spawn_intro(world: &mut World, dialogue: DialogueId) -> Result<IntroScene, TemplateError> {
    let config = world.resource::<GameConfig>().clone();

    let floor = world
        .spawn((
            Transform3D::from_position(FLOOR_POSITION),
            BoxCollider::new(FLOOR_HALF_EXTENTS),
            Solid::Ground,
        ))
        .id();

    let cube = world
        .spawn((
            Transform3D::from_position(CUBE_POSITION),
            BoxCollider::new(Vec3::ONE),
            Solid::Blocking,
            Speaker::new(dialogue),
        ))
        .id();

    let lantern_item = Item::new("Lantern", "An old lantern, {fuel}% full of oil.")?.with_value("fuel", 80);
    let lantern = world
        .spawn((
            lantern_item,
            Transform3D::from_position(Vec3::new(0.0, -1.0, 5.0)),
            RigidBody::new(),
            BoxCollider::new(Vec3::splat(0.25)),
        ))
        .id();

    let key_item = Item::new("Rusty key", "Opens {door}. Probably.")?.with_value("door", "the shed");
    let key = world
        .spawn((
            key_item,
            Transform3D::from_position(Vec3::new(3.0, 2.0, 6.0)),
            RigidBody::new(),
            BoxCollider::new(Vec3::new(0.2, 0.05, 0.1)),
        ))
        .id();

    // facing the cube, along +Z
    let player = world
        .spawn((
            config.player(),
            Transform3D::default().with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
            RigidBody::new(),
            BoxCollider::from_bounds(Vec3::splat(-1.0), Vec3::ONE, PLAYER_SCALE),
        ))
        .id();

    info!("intro scene spawned");
    Ok(IntroScene {
        player,
        cube,
        floor,
        lantern,
        key,
    })
}

/// Hand the mouse to the player: lock the cursor and enable mouse look.
pub fn start(world: &mut World, player: Entity) {
    world.resource_scope(|world, mut cursor: Mut<CursorState>| {
        if let Some(mut player) = world.get_mut::<Player>(player) {
            player.start(&mut cursor);
        }
    });
}

/// Gameplay systems in tick order.
pub fn update_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            update_input_state,
            quit_on_escape_system,
            player_movement_system,
            player_look_system,
            item_physics_system,
            item_pickup_system,
            inventory_system,
            dialogue_system,
        )
            .chain(),
    );
    schedule
}

/// Advance the clock by `dt` and run one tick.
pub fn step(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}

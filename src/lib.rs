//! Lanternvale library.
//!
//! A first-person exploration core: a kinematic player controller with
//! predictive box collision, item pickup and inventory, and a typewriter
//! dialogue engine with branching options. Everything runs on a `bevy_ecs`
//! world; see [`game`] for scene setup and the per-tick schedule.

pub mod autopilot;
pub mod components;
pub mod dialoguescript;
pub mod game;
pub mod resources;
pub mod systems;
pub mod template;

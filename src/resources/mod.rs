//! ECS resources made available to systems.
//!
//! Overview
//! - `dialoguestore` – dialogue node arena, active pointer and state machine
//! - `display` – text labels and 2D sprites handed to the renderer
//! - `gameconfig` – settings loaded from `config.ini`
//! - `input` – per-tick key and mouse state, raw device state, cursor lock
//! - `worldsignals` – global flags set by dialogue hooks and the game loop
//! - `worldtime` – simulation time and delta
pub mod dialoguestore;
pub mod display;
pub mod gameconfig;
pub mod input;
pub mod worldsignals;
pub mod worldtime;

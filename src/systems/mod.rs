//! Engine systems.
//!
//! This module groups all ECS systems that advance input, player motion,
//! item physics, pickup, inventory and dialogue. [`crate::game::update_schedule`]
//! chains them in the order they must run each tick.

pub mod collision;
pub mod dialogue;
pub mod input;
pub mod inventory;
pub mod look;
pub mod pickup;
pub mod playercontroller;
pub mod time;

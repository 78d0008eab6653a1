//! ECS components for entities.
//!
//! Components hold the per-entity data of the scene: placement, motion,
//! collision volumes, the player controller state, pickable items and the
//! speakers the player can talk to. Dialogue nodes are not entities; they
//! live in the [`DialogueStore`](crate::resources::dialoguestore::DialogueStore)
//! arena but their types are defined here alongside the typewriter.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned boxes, rays and the predictive collider
//! - [`dialogue`] – dialogue graph nodes, option choices and hook actions
//! - [`inventory`] – fixed-size slot storage
//! - [`item`] – pickable items with templated descriptions
//! - [`player`] – first-person controller state and the held-item slot
//! - [`rigidbody`] – velocity and the frozen flag
//! - [`speaker`] – entities that start a dialogue when clicked
//! - [`transform`] – 3D position and orientation
//! - [`typewriter`] – timed character-by-character text reveal

pub mod boxcollider;
pub mod dialogue;
pub mod inventory;
pub mod item;
pub mod player;
pub mod rigidbody;
pub mod speaker;
pub mod transform;
pub mod typewriter;

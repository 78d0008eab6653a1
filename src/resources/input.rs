//! Per-frame input resources.
//!
//! The host writes the hardware state it polled into [`RawInput`]; the
//! [`update_input_state`](crate::systems::input::update_input_state) system
//! turns it into the edge-aware [`InputState`] read by gameplay systems.
//! Defaults use WASD for movement, Space to jump, E to pick up or drop, Q
//! to stash the held item and R to take the first stored item back out.
//!
//! [`CursorState`] mirrors whether the window currently captures the mouse
//! for first-person look.
use bevy_ecs::prelude::*;
use glam::Vec2;
use rustc_hash::FxHashSet;

/// Keys the game binds actions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardKey {
    Null,
    W,
    A,
    S,
    D,
    E,
    Q,
    R,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently active/pressed this frame.
    pub active: bool,
    /// Whether the key was just pressed this frame.
    pub just_pressed: bool,
    /// Whether the key was just released this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::Null)
    }
}

impl BoolState {
    pub fn bound(key_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding,
        }
    }

    /// Record this frame's down state, deriving press/release edges from the
    /// previous frame.
    pub fn update(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// Mouse state for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    /// Relative motion since the previous frame.
    pub rel: Vec2,
    /// Absolute pointer position in screen pixels.
    pub position: Vec2,
    pub left: BoolState,
}

/// Resource capturing the per-frame input relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub forward: BoolState,
    pub back: BoolState,
    pub left: BoolState,
    pub right: BoolState,
    pub jump: BoolState,
    pub interact: BoolState,
    pub stash: BoolState,
    pub retrieve: BoolState,
    pub escape: BoolState,
    pub mouse: MouseState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            forward: BoolState::bound(KeyboardKey::W),
            back: BoolState::bound(KeyboardKey::S),
            left: BoolState::bound(KeyboardKey::A),
            right: BoolState::bound(KeyboardKey::D),
            jump: BoolState::bound(KeyboardKey::Space),
            interact: BoolState::bound(KeyboardKey::E),
            stash: BoolState::bound(KeyboardKey::Q),
            retrieve: BoolState::bound(KeyboardKey::R),
            escape: BoolState::bound(KeyboardKey::Escape),
            mouse: MouseState::default(),
        }
    }
}

impl InputState {
    pub fn keys_mut(&mut self) -> [&mut BoolState; 9] {
        [
            &mut self.forward,
            &mut self.back,
            &mut self.left,
            &mut self.right,
            &mut self.jump,
            &mut self.interact,
            &mut self.stash,
            &mut self.retrieve,
            &mut self.escape,
        ]
    }
}

/// Hardware snapshot written by the host before each tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct RawInput {
    pub keys_down: FxHashSet<KeyboardKey>,
    pub mouse_rel: Vec2,
    pub mouse_position: Vec2,
    pub mouse_left_down: bool,
}

impl RawInput {
    pub fn press(&mut self, key: KeyboardKey) {
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: KeyboardKey) {
        self.keys_down.remove(&key);
    }

    pub fn is_down(&self, key: KeyboardKey) -> bool {
        self.keys_down.contains(&key)
    }
}

/// Whether the mouse is captured for first-person look.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    pub locked: bool,
}

impl CursorState {
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}

//! Input system.
//!
//! [`update_input_state`] reads the host's [`RawInput`] snapshot each tick and
//! writes the results into [`InputState`], deriving press and release edges.
use bevy_ecs::prelude::*;
use log::info;

use crate::resources::input::{InputState, RawInput};
use crate::resources::worldsignals::WorldSignals;

/// World flag that ends the game loop.
pub const QUIT_FLAG: &str = "quit_game";

/// Copy the raw snapshot into `InputState`.
pub fn update_input_state(mut input: ResMut<InputState>, raw: Res<RawInput>) {
    for key in input.keys_mut() {
        key.update(raw.is_down(key.key_binding));
    }
    input.mouse.rel = raw.mouse_rel;
    input.mouse.position = raw.mouse_position;
    input.mouse.left.update(raw.mouse_left_down);
}

/// Raise [`QUIT_FLAG`] when escape is pressed.
pub fn quit_on_escape_system(input: Res<InputState>, mut signals: ResMut<WorldSignals>) {
    if input.escape.just_pressed && !signals.has_flag(QUIT_FLAG) {
        info!("escape pressed, quitting");
        signals.set_flag(QUIT_FLAG);
    }
}

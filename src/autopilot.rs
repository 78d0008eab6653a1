//! Scripted input for the headless runner.
//!
//! An [`Autopilot`] plays back a list of timed [`Step`]s by writing into
//! [`RawInput`] before the input system reads it, the way a window backend
//! would. Held keys stay down for the whole step; clicks and key presses
//! happen on the step's first tick only so they register as one edge.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::resources::dialoguestore::DialogueStore;
use crate::resources::input::{KeyboardKey, RawInput};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Wait,
    /// Keep a key down.
    Hold(KeyboardKey),
    /// Press and release a key.
    Press(KeyboardKey),
    /// Move the mouse by this much every tick.
    Look(Vec2),
    /// Left click wherever the pointer is.
    Click,
    /// Move the pointer onto the first clickable option and click it.
    ChooseOption,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub action: Action,
    pub ticks: u32,
}

impl Step {
    pub fn new(action: Action, ticks: u32) -> Self {
        Self { action, ticks }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Autopilot {
    steps: Vec<Step>,
    current: usize,
    tick_in_step: u32,
}

impl Autopilot {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            current: 0,
            tick_in_step: 0,
        }
    }

    /// Walk up to the cube, talk through its dialogue, pick up the lantern
    /// and stash it, then quit. Timed for 120 ticks per second.
    pub fn walk_and_talk() -> Self {
        use Action::*;
        Self::new(vec![
            Step::new(Wait, 30),
            Step::new(Hold(KeyboardKey::W), 30),
            Step::new(Wait, 60),
            Step::new(Click, 240),
            Step::new(Click, 480),
            Step::new(Click, 420),
            Step::new(ChooseOption, 480),
            Step::new(Click, 60),
            Step::new(Look(Vec2::new(0.0, 10.0)), 12),
            Step::new(Press(KeyboardKey::E), 90),
            Step::new(Press(KeyboardKey::Q), 30),
            Step::new(Press(KeyboardKey::Escape), 2),
        ])
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.steps.len()
    }

    pub fn current(&self) -> Option<Step> {
        self.steps.get(self.current).copied()
    }

    /// Write one tick of input into `raw`.
    pub fn drive(&mut self, raw: &mut RawInput, store: &DialogueStore) {
        let position = raw.mouse_position;
        *raw = RawInput {
            mouse_position: position,
            ..RawInput::default()
        };

        let Some(step) = self.current() else {
            return;
        };
        let first_tick = self.tick_in_step == 0;
        if first_tick {
            debug!("autopilot: {:?} for {} ticks", step.action, step.ticks);
        }
        match step.action {
            Action::Wait => {}
            Action::Hold(key) => raw.press(key),
            Action::Press(key) => {
                if first_tick {
                    raw.press(key);
                }
            }
            Action::Look(rel) => raw.mouse_rel = rel,
            Action::Click => raw.mouse_left_down = first_tick,
            Action::ChooseOption => {
                if first_tick && let Some(target) = first_option(store) {
                    raw.mouse_position = target;
                }
                raw.mouse_left_down = first_tick;
            }
        }

        self.tick_in_step += 1;
        if self.tick_in_step >= step.ticks {
            self.current += 1;
            self.tick_in_step = 0;
        }
    }
}

/// Center of the first option of the active node that can be clicked.
fn first_option(store: &DialogueStore) -> Option<Vec2> {
    let node = store.get(store.active()?)?;
    node.options
        .iter()
        .filter_map(|id| store.get(*id))
        .find(|option| option.is_running() && option.finished_typing())
        .and_then(|option| option.choice)
        .map(|choice| choice.region.position)
}

pub fn autopilot_system(mut pilot: ResMut<Autopilot>, mut raw: ResMut<RawInput>, store: Res<DialogueStore>) {
    pilot.drive(&mut raw, &store);
}

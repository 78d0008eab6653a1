//! Dialogue arena and state machine.
//!
//! [`DialogueStore`] owns every [`DialogueNode`] of the loaded scene and the
//! single "active" pointer. Nodes move through
//! `Idle -> Running(typing) -> Running(finished typing) -> Idle` driven by
//! [`start`](DialogueStore::start), [`update`](DialogueStore::update) and
//! [`end`](DialogueStore::end). Options begin typing on the tick their parent
//! finishes; an option that has finished typing can be clicked, which runs
//! its `on_chosen` hooks and re-locks the cursor.
//!
//! Everything a node does to the outside world goes through a
//! [`DialogueHost`]: text and sprite attachment, cursor lock and world flags.
//! Hooks run synchronously, before the call that fired them returns.

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::{debug, info, warn};
use thiserror::Error;

use crate::components::dialogue::{DialogueAction, DialogueId, DialogueNode};
use crate::components::typewriter::reveal_prefix;
use crate::resources::display::{DisplaySurface, Sprite2D, SurfaceKey, TextLabel};
use crate::resources::input::CursorState;
use crate::resources::worldsignals::WorldSignals;

/// Nesting limit for hooks that start nodes whose hooks start nodes.
pub const MAX_HOOK_DEPTH: usize = 16;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DialogueError {
    #[error("no dialogue node with id {0:?}")]
    UnknownNode(DialogueId),
}

/// Side effects a dialogue can have outside the store.
pub trait DialogueHost {
    fn attach_text(&mut self, key: SurfaceKey, label: TextLabel);
    fn set_text(&mut self, key: SurfaceKey, content: &str);
    fn detach_text(&mut self, key: SurfaceKey);
    fn attach_sprite(&mut self, key: SurfaceKey, sprite: Sprite2D);
    fn detach_sprite(&mut self, key: SurfaceKey);
    fn set_cursor_locked(&mut self, locked: bool);
    fn set_flag(&mut self, flag: &str, value: bool);
}

/// [`DialogueHost`] backed by the world's resources.
pub struct DialogueContext<'a> {
    pub surface: &'a mut DisplaySurface,
    pub cursor: &'a mut CursorState,
    pub signals: &'a mut WorldSignals,
}

impl DialogueHost for DialogueContext<'_> {
    fn attach_text(&mut self, key: SurfaceKey, label: TextLabel) {
        self.surface.attach_text(key, label);
    }

    fn set_text(&mut self, key: SurfaceKey, content: &str) {
        self.surface.set_text(key, content);
    }

    fn detach_text(&mut self, key: SurfaceKey) {
        self.surface.detach_text(key);
    }

    fn attach_sprite(&mut self, key: SurfaceKey, sprite: Sprite2D) {
        self.surface.attach_sprite(key, sprite);
    }

    fn detach_sprite(&mut self, key: SurfaceKey) {
        self.surface.detach_sprite(key);
    }

    fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor.set_locked(locked);
    }

    fn set_flag(&mut self, flag: &str, value: bool) {
        if value {
            self.signals.set_flag(flag);
        } else {
            self.signals.clear_flag(flag);
        }
    }
}

/// Pointer state used for option hit-tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub position: Vec2,
    /// True on the tick the button went down.
    pub pressed: bool,
}

/// What a player interaction did to the active dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// The active node was idle and has been started.
    Started,
    /// The active node ended and its successor started.
    Advanced(DialogueId),
    /// The terminal node ended; nothing is active anymore.
    Ended,
    /// The node has options; only clicking one of them moves on.
    AwaitingChoice,
    /// Nothing active, or the text is still typing.
    Ignored,
}

#[derive(Resource, Debug, Default)]
pub struct DialogueStore {
    nodes: Vec<DialogueNode>,
    active: Option<DialogueId>,
    hook_depth: usize,
}

impl DialogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: DialogueNode) -> DialogueId {
        self.nodes.push(node);
        DialogueId(self.nodes.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: DialogueId) -> Option<&DialogueNode> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: DialogueId) -> Option<&mut DialogueNode> {
        self.nodes.get_mut(id.0)
    }

    fn node(&self, id: DialogueId) -> Result<&DialogueNode, DialogueError> {
        self.get(id).ok_or(DialogueError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: DialogueId) -> Result<&mut DialogueNode, DialogueError> {
        self.get_mut(id).ok_or(DialogueError::UnknownNode(id))
    }

    pub fn is_running(&self, id: DialogueId) -> bool {
        self.get(id).is_some_and(DialogueNode::is_running)
    }

    pub fn set_next(&mut self, id: DialogueId, next: DialogueId) -> Result<(), DialogueError> {
        self.node(next)?;
        self.node_mut(id)?.next = Some(next);
        Ok(())
    }

    pub fn add_option(&mut self, parent: DialogueId, option: DialogueId) -> Result<(), DialogueError> {
        self.node(option)?;
        self.node_mut(parent)?.options.push(option);
        Ok(())
    }

    pub fn active(&self) -> Option<DialogueId> {
        self.active
    }

    pub fn set_active(&mut self, id: Option<DialogueId>) {
        self.active = id;
    }

    /// Begin typing `id` from an empty reveal.
    ///
    /// `on_start` runs before anything is attached; if it moves the
    /// conversation elsewhere, `id` shows nothing.
    pub fn start(&mut self, id: DialogueId, host: &mut dyn DialogueHost) -> Result<(), DialogueError> {
        let node = self.node_mut(id)?;
        node.typewriter.start();
        let actions = node.hooks.on_start.clone();
        self.run_actions(&actions, host);

        let node = self.node(id)?;
        if !node.is_running() {
            debug!("dialogue {:?} left during on_start", id);
            return Ok(());
        }
        let mut label = node.label.clone();
        label.content.clear();
        host.attach_text(SurfaceKey::DialogueText(id), label);
        if let Some(choice) = node.choice {
            host.attach_sprite(SurfaceKey::OptionBackground(id), choice.region);
        }
        debug!("dialogue {:?} started", id);
        Ok(())
    }

    /// Advance `id` by `dt` seconds. Idle nodes are left alone.
    ///
    /// Returns the option the pointer press chose, if any. A press can choose
    /// at most one option.
    pub fn update(
        &mut self,
        id: DialogueId,
        dt: f32,
        pointer: Pointer,
        host: &mut dyn DialogueHost,
    ) -> Result<Option<DialogueId>, DialogueError> {
        let node = self.node_mut(id)?;
        let len = node.len();
        let Some(reveal) = node.typewriter.advance(dt, len) else {
            return Ok(None);
        };
        let shown = reveal_prefix(&node.text, reveal.visible).to_string();
        let is_option = node.is_option();
        host.set_text(SurfaceKey::DialogueText(id), &shown);

        if reveal.just_finished {
            if is_option {
                host.set_cursor_locked(false);
            }
            let node = self.node(id)?;
            let actions = node.hooks.on_finished_typing.clone();
            let options = node.options.clone();
            self.run_actions(&actions, host);
            if !self.is_running(id) {
                return Ok(None);
            }
            for option in options {
                self.start(option, host)?;
            }
        }

        let node = self.node(id)?;
        if !node.is_running() || !node.finished_typing() {
            return Ok(None);
        }
        let options = node.options.clone();
        if let Some(choice) = node.choice
            && pointer.pressed
            && choice.region.contains_point(pointer.position)
        {
            self.choose(id, host)?;
            return Ok(Some(id));
        }
        for option in options {
            if !self.is_running(id) {
                break;
            }
            if let Some(chosen) = self.update(option, dt, pointer, host)? {
                return Ok(Some(chosen));
            }
        }
        Ok(None)
    }

    /// Stop `id`, detach its text and end any of its options still showing.
    ///
    /// Returns `Ok(false)` without side effects when the node is idle.
    pub fn end(&mut self, id: DialogueId, host: &mut dyn DialogueHost) -> Result<bool, DialogueError> {
        let node = self.node_mut(id)?;
        if !node.typewriter.is_active() {
            return Ok(false);
        }
        node.typewriter.stop();
        let is_option = node.is_option();
        let actions = node.hooks.on_end.clone();
        let options = node.options.clone();

        self.run_actions(&actions, host);
        host.detach_text(SurfaceKey::DialogueText(id));
        if is_option {
            host.detach_sprite(SurfaceKey::OptionBackground(id));
            host.set_cursor_locked(true);
        }
        for option in options {
            if self.get(option).is_some_and(|o| o.typewriter.is_active()) {
                self.end(option, host)?;
            }
        }
        debug!("dialogue {:?} ended", id);
        Ok(true)
    }

    /// Select an option: run its `on_chosen` hooks, then take the cursor back
    /// for mouse look.
    pub fn choose(&mut self, id: DialogueId, host: &mut dyn DialogueHost) -> Result<(), DialogueError> {
        let node = self.node(id)?;
        info!("dialogue option chosen: {:?}", node.text);
        let actions = node.hooks.on_chosen.clone();
        self.run_actions(&actions, host);
        host.set_cursor_locked(true);
        Ok(())
    }

    /// Apply the player's "talk" input to the active node.
    pub fn interact(&mut self, host: &mut dyn DialogueHost) -> Result<Interaction, DialogueError> {
        let Some(id) = self.active else {
            return Ok(Interaction::Ignored);
        };
        let node = self.node(id)?;
        let active = node.typewriter.is_active();
        let finished = node.finished_typing();
        let next = node.next;
        let has_options = !node.options.is_empty();

        if !active {
            self.start(id, host)?;
            return Ok(Interaction::Started);
        }
        if !finished {
            return Ok(Interaction::Ignored);
        }
        if let Some(next) = next {
            self.end(id, host)?;
            self.active = Some(next);
            self.start(next, host)?;
            return Ok(Interaction::Advanced(next));
        }
        if has_options {
            return Ok(Interaction::AwaitingChoice);
        }
        self.end(id, host)?;
        self.active = None;
        Ok(Interaction::Ended)
    }

    /// [`update`](Self::update) the active node.
    pub fn update_active(
        &mut self,
        dt: f32,
        pointer: Pointer,
        host: &mut dyn DialogueHost,
    ) -> Result<Option<DialogueId>, DialogueError> {
        match self.active {
            Some(id) => self.update(id, dt, pointer, host),
            None => Ok(None),
        }
    }

    /// End the active node, keeping it as the active one so the next
    /// interaction restarts it.
    pub fn end_active(&mut self, host: &mut dyn DialogueHost) -> Result<bool, DialogueError> {
        match self.active {
            Some(id) => self.end(id, host),
            None => Ok(false),
        }
    }

    fn run_actions(&mut self, actions: &[DialogueAction], host: &mut dyn DialogueHost) {
        if actions.is_empty() {
            return;
        }
        if self.hook_depth >= MAX_HOOK_DEPTH {
            warn!(
                "dialogue hooks nested deeper than {}, skipping {:?}",
                MAX_HOOK_DEPTH, actions
            );
            return;
        }
        self.hook_depth += 1;
        for action in actions {
            if let Err(e) = self.apply_action(action, host) {
                warn!("dialogue hook {:?} failed: {}", action, e);
            }
        }
        self.hook_depth -= 1;
    }

    fn apply_action(&mut self, action: &DialogueAction, host: &mut dyn DialogueHost) -> Result<(), DialogueError> {
        match action {
            DialogueAction::Goto(target) => {
                self.node(*target)?;
                if let Some(active) = self.active {
                    self.end(active, host)?;
                }
                self.active = Some(*target);
                self.start(*target, host)?;
            }
            DialogueAction::End => {
                if let Some(active) = self.active.take() {
                    self.end(active, host)?;
                }
            }
            DialogueAction::LockCursor(locked) => host.set_cursor_locked(*locked),
            DialogueAction::SetFlag(flag) => host.set_flag(flag, true),
            DialogueAction::ClearFlag(flag) => host.set_flag(flag, false),
        }
        Ok(())
    }
}

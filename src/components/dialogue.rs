//! Dialogue graph nodes.
//!
//! Dialogue lines and selectable options share one node type,
//! [`DialogueNode`]. A node with a [`Choice`] is an option: it can be
//! clicked once its own text has finished typing. Nodes live in the
//! [`DialogueStore`](crate::resources::dialoguestore::DialogueStore) arena and
//! reference each other by [`DialogueId`].
//!
//! Lifecycle hooks are plain data ([`DialogueAction`] lists) executed by the
//! store, so authoring code never captures scene state in closures.

use glam::{Vec2, Vec4};
use smallvec::SmallVec;

use crate::components::typewriter::Typewriter;
use crate::resources::display::{Sprite2D, TextLabel};

/// Offset pulled back from the option background center, in pixels.
pub const CHOICE_PADDING: f32 = 30.0;
/// Default size of an option's clickable background.
pub const DEFAULT_CHOICE_SIZE: Vec2 = Vec2::new(100.0, 100.0);

/// Stable handle into the dialogue arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogueId(pub usize);

/// Effect run when a lifecycle hook fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueAction {
    /// End the active dialogue and start this node in its place.
    Goto(DialogueId),
    /// End the active dialogue.
    End,
    /// Lock (`true`) or release (`false`) the mouse cursor.
    LockCursor(bool),
    SetFlag(String),
    ClearFlag(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueHooks {
    pub on_start: Vec<DialogueAction>,
    pub on_finished_typing: Vec<DialogueAction>,
    /// Options only.
    pub on_chosen: Vec<DialogueAction>,
    pub on_end: Vec<DialogueAction>,
}

/// Selectable capability of an option node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    /// Clickable background, in screen space.
    pub region: Sprite2D,
}

impl Choice {
    /// Background of `size` laid out for a label at `text_position`.
    pub fn new(text_position: Vec2, size: Vec2) -> Self {
        let center = text_position + size / 2.0 - Vec2::splat(CHOICE_PADDING);
        Self {
            region: Sprite2D::new(center, size.x, size.y),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DialogueNode {
    /// Full text; the label shows the revealed prefix.
    pub text: String,
    pub label: TextLabel,
    pub typewriter: Typewriter,
    /// Linear successor, started when the player advances.
    pub next: Option<DialogueId>,
    /// Options started once this node finishes typing.
    pub options: SmallVec<[DialogueId; 4]>,
    pub hooks: DialogueHooks,
    pub choice: Option<Choice>,
}

impl DialogueNode {
    pub fn new(text: impl Into<String>, position: Vec2) -> Self {
        Self {
            text: text.into(),
            label: TextLabel::new("", position),
            typewriter: Typewriter::default(),
            next: None,
            options: SmallVec::new(),
            hooks: DialogueHooks::default(),
            choice: None,
        }
    }

    /// Option node with a clickable background of `size`.
    pub fn option(text: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        let mut node = Self::new(text, position);
        node.choice = Some(Choice::new(position, size));
        node
    }

    pub fn with_typing_speed(mut self, typing_speed: f32) -> Self {
        self.typewriter.typing_speed = typing_speed;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.label.color = color;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.label.scale = scale;
        self
    }

    pub fn with_next(mut self, next: DialogueId) -> Self {
        self.next = Some(next);
        self
    }

    pub fn on_start(mut self, action: DialogueAction) -> Self {
        self.hooks.on_start.push(action);
        self
    }

    pub fn on_finished_typing(mut self, action: DialogueAction) -> Self {
        self.hooks.on_finished_typing.push(action);
        self
    }

    pub fn on_chosen(mut self, action: DialogueAction) -> Self {
        self.hooks.on_chosen.push(action);
        self
    }

    pub fn on_end(mut self, action: DialogueAction) -> Self {
        self.hooks.on_end.push(action);
        self
    }

    pub fn is_option(&self) -> bool {
        self.choice.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.typewriter.is_running()
    }

    pub fn finished_typing(&self) -> bool {
        self.typewriter.finished_typing()
    }

    /// Length of the text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_region_layout() {
        let choice = Choice::new(Vec2::new(200.0, 400.0), Vec2::new(100.0, 100.0));
        assert_eq!(choice.region.position, Vec2::new(220.0, 420.0));
        assert!(choice.region.contains_point(Vec2::new(220.0, 420.0)));
        assert!(!choice.region.contains_point(Vec2::new(150.0, 420.0)));
    }

    #[test]
    fn test_node_builders() {
        let node = DialogueNode::option("Yes", Vec2::ZERO, DEFAULT_CHOICE_SIZE)
            .with_typing_speed(20.0)
            .on_chosen(DialogueAction::Goto(DialogueId(3)));
        assert!(node.is_option());
        assert_eq!(node.typewriter.typing_speed, 20.0);
        assert_eq!(node.hooks.on_chosen, vec![DialogueAction::Goto(DialogueId(3))]);
        assert!(!node.is_running());
        assert_eq!(node.len(), 3);
    }
}

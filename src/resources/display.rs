//! Screen-space display surface.
//!
//! The renderer is external; gameplay code describes what should be on
//! screen by attaching [`TextLabel`]s and [`Sprite2D`]s to the
//! [`DisplaySurface`] resource under a [`SurfaceKey`]. Attaching and
//! detaching are idempotent, so tearing down an element twice never
//! disturbs anything else.

use bevy_ecs::prelude::Resource;
use glam::{Vec2, Vec4};
use rustc_hash::FxHashMap;

use crate::components::dialogue::DialogueId;

/// Identifies one element on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKey {
    DialogueText(DialogueId),
    OptionBackground(DialogueId),
    Tooltip,
}

#[derive(Clone, Debug, PartialEq)]
/// Text label drawn in screen space.
pub struct TextLabel {
    /// The text content to render.
    pub content: String,
    /// Top-left corner in pixels.
    pub position: Vec2,
    /// RGBA in `0.0..=1.0`.
    pub color: Vec4,
    pub scale: Vec2,
}

impl TextLabel {
    pub fn new(content: impl Into<String>, position: Vec2) -> Self {
        Self {
            content: content.into(),
            position,
            color: Vec4::ONE,
            scale: Vec2::ONE,
        }
    }

    /// Updates the text content.
    pub fn set_content(&mut self, new_content: impl Into<String>) {
        self.content = new_content.into();
    }
}

/// Axis-aligned 2D sprite, positioned by its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite2D {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Sprite2D {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
        }
    }

    /// Strict inside test; points on the border don't count.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let half = Vec2::new(self.width, self.height) / 2.0;
        let min = self.position - half;
        let max = self.position + half;
        point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DisplaySurface {
    texts: FxHashMap<SurfaceKey, TextLabel>,
    sprites: FxHashMap<SurfaceKey, Sprite2D>,
}

impl DisplaySurface {
    /// Attach a label. Returns false if the key was already attached, in
    /// which case the existing label is replaced.
    pub fn attach_text(&mut self, key: SurfaceKey, label: TextLabel) -> bool {
        self.texts.insert(key, label).is_none()
    }

    /// Change the content of an attached label. Returns false when nothing
    /// is attached under `key`.
    pub fn set_text(&mut self, key: SurfaceKey, content: &str) -> bool {
        match self.texts.get_mut(&key) {
            Some(label) => {
                label.set_content(content);
                true
            }
            None => false,
        }
    }

    pub fn detach_text(&mut self, key: SurfaceKey) -> Option<TextLabel> {
        self.texts.remove(&key)
    }

    pub fn attach_sprite(&mut self, key: SurfaceKey, sprite: Sprite2D) -> bool {
        self.sprites.insert(key, sprite).is_none()
    }

    pub fn detach_sprite(&mut self, key: SurfaceKey) -> Option<Sprite2D> {
        self.sprites.remove(&key)
    }

    pub fn text(&self, key: SurfaceKey) -> Option<&TextLabel> {
        self.texts.get(&key)
    }

    pub fn sprite(&self, key: SurfaceKey) -> Option<&Sprite2D> {
        self.sprites.get(&key)
    }

    pub fn texts(&self) -> impl Iterator<Item = (&SurfaceKey, &TextLabel)> {
        self.texts.iter()
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.sprites.is_empty()
    }
}

use bevy_ecs::prelude::Component;

use crate::components::dialogue::DialogueId;

/// Default distance past which an active conversation is dropped.
pub const DEFAULT_SPEAKER_RANGE: f32 = 10.0;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
/// Entity the player can talk to by clicking on it.
pub struct Speaker {
    /// Node started when the conversation begins.
    pub dialogue: DialogueId,
    /// Conversation ends once the player is farther away than this.
    pub range: f32,
}

impl Speaker {
    pub fn new(dialogue: DialogueId) -> Self {
        Self {
            dialogue,
            range: DEFAULT_SPEAKER_RANGE,
        }
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }
}

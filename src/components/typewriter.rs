//! Time-driven character reveal.
//!
//! A [`Typewriter`] accumulates `typing_speed * dt` into a progress counter
//! and reports how many characters of a text should be visible. The reveal
//! length is a pure function of the accumulated time, so restarting and
//! replaying the same `dt` sequence reveals text identically.

/// Tolerance subtracted from the progress before rounding up, so f32
/// accumulation error (e.g. `0.9999999` vs `1.0000001`) doesn't reveal a
/// character one tick early.
const REVEAL_EPSILON: f32 = 1e-4;

/// Default characters per second.
pub const DEFAULT_TYPING_SPEED: f32 = 10.0;

/// Outcome of advancing a running typewriter by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    /// Number of characters to display.
    pub visible: usize,
    /// True only on the tick the full text first became visible.
    pub just_finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typewriter {
    /// Characters per second.
    pub typing_speed: f32,
    progress: f32,
    running: bool,
    finished_typing: bool,
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_SPEED)
    }
}

impl Typewriter {
    pub fn new(typing_speed: f32) -> Self {
        Self {
            typing_speed,
            progress: 0.0,
            running: false,
            finished_typing: false,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn finished_typing(&self) -> bool {
        self.finished_typing
    }

    /// True while running or still showing finished text.
    pub fn is_active(&self) -> bool {
        self.running || self.finished_typing
    }

    /// Rewind to an empty reveal and begin typing.
    pub fn start(&mut self) {
        self.progress = 0.0;
        self.running = true;
        self.finished_typing = false;
    }

    /// Advance by `dt` seconds for a text of `len` characters.
    ///
    /// Returns `None` when the typewriter is not running.
    pub fn advance(&mut self, dt: f32, len: usize) -> Option<Reveal> {
        if !self.running {
            return None;
        }
        self.progress += self.typing_speed * dt;
        let rounded = (self.progress - REVEAL_EPSILON).ceil().max(0.0) as usize;
        let visible = rounded.min(len);

        let mut just_finished = false;
        if visible == len && !self.finished_typing {
            self.finished_typing = true;
            just_finished = true;
        }
        Some(Reveal {
            visible,
            just_finished,
        })
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.finished_typing = false;
    }
}

/// First `count` characters of `text`, respecting UTF-8 boundaries.
pub fn reveal_prefix(text: &str, count: usize) -> &str {
    match text.char_indices().nth(count) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

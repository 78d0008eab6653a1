//! Global signal storage resource.
//!
//! The [`WorldSignals`] resource holds world-wide flags set by dialogue hooks
//! and gameplay systems, e.g. `"met_cube"` or `"lantern_stashed"`. A key
//! being present means "true".

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default, Resource)]
pub struct WorldSignals {
    /// Presence-only boolean flags; a key being present means "true".
    pub flags: FxHashSet<String>,
}

impl WorldSignals {
    /// Mark a flag as present/true.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }
    /// Remove a flag (make it false/absent).
    pub fn clear_flag(&mut self, key: &str) {
        self.flags.remove(key);
    }
    /// Check whether a flag is present/true.
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
    /// Read-only view of all flags.
    pub fn get_flags(&self) -> &FxHashSet<String> {
        &self.flags
    }
}

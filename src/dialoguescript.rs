//! JSON dialogue graphs.
//!
//! A script names its nodes with strings and links them by name:
//!
//! ```json
//! {
//!   "root": "greeting",
//!   "position": [30, 30],
//!   "nodes": [
//!     { "id": "greeting", "text": "Hello how are you?", "next": "question" },
//!     { "id": "question", "text": "Do you like lanterns?",
//!       "options": [
//!         { "text": "Yes", "position": [30, 120], "goto": "glad" },
//!         { "text": "No", "position": [180, 120], "on_chosen": ["end"] }
//!       ] },
//!     { "id": "glad", "text": "Me too.", "on_end": [{ "set_flag": "likes_lanterns" }] }
//!   ]
//! }
//! ```
//!
//! [`DialogueScript::install`] checks every reference before touching the
//! store, so a broken script never leaves half a graph behind.

use std::path::Path;
use std::str::FromStr;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::dialogue::{DEFAULT_CHOICE_SIZE, DialogueAction, DialogueId, DialogueNode};
use crate::resources::dialoguestore::DialogueStore;

/// Where node text goes when neither the node nor the script says otherwise.
pub const DEFAULT_TEXT_POSITION: Vec2 = Vec2::new(30.0, 30.0);

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read dialogue script: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dialogue script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate dialogue node '{0}'")]
    DuplicateNode(String),
    #[error("root node '{0}' is not defined")]
    UnknownRoot(String),
    #[error("node '{from}' refers to unknown node '{to}'")]
    UnknownNode { from: String, to: String },
}

/// Hook action as written in a script.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionData {
    Goto(String),
    End,
    LockCursor(bool),
    SetFlag(String),
    ClearFlag(String),
}

impl ActionData {
    fn target(&self) -> Option<&str> {
        match self {
            ActionData::Goto(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OptionData {
    pub text: String,
    #[serde(default)]
    pub position: Option<[f32; 2]>,
    #[serde(default)]
    pub size: Option<[f32; 2]>,
    #[serde(default)]
    pub typing_speed: Option<f32>,
    /// Shorthand for a `goto` in `on_chosen`.
    #[serde(default)]
    pub goto: Option<String>,
    #[serde(default)]
    pub on_chosen: Vec<ActionData>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub position: Option<[f32; 2]>,
    #[serde(default)]
    pub typing_speed: Option<f32>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionData>,
    #[serde(default)]
    pub on_start: Vec<ActionData>,
    #[serde(default)]
    pub on_finished_typing: Vec<ActionData>,
    #[serde(default)]
    pub on_end: Vec<ActionData>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DialogueScript {
    pub root: String,
    /// Default text position for nodes that don't set one.
    #[serde(default)]
    pub position: Option<[f32; 2]>,
    #[serde(default)]
    pub typing_speed: Option<f32>,
    pub nodes: Vec<NodeData>,
}

/// Ids handed out by [`DialogueScript::install`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedScript {
    pub root: DialogueId,
    pub nodes: FxHashMap<String, DialogueId>,
}

impl LoadedScript {
    pub fn id(&self, name: &str) -> Option<DialogueId> {
        self.nodes.get(name).copied()
    }
}

fn vec2(value: Option<[f32; 2]>) -> Option<Vec2> {
    value.map(Vec2::from_array)
}

impl FromStr for DialogueScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl DialogueScript {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Check that node names are unique and every reference resolves.
    pub fn validate(&self) -> Result<(), ScriptError> {
        let mut names = FxHashSet::default();
        for node in &self.nodes {
            if !names.insert(node.id.as_str()) {
                return Err(ScriptError::DuplicateNode(node.id.clone()));
            }
        }
        if !names.contains(self.root.as_str()) {
            return Err(ScriptError::UnknownRoot(self.root.clone()));
        }

        let check = |from: &str, to: &str| {
            if names.contains(to) {
                Ok(())
            } else {
                Err(ScriptError::UnknownNode {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
        };
        for node in &self.nodes {
            if let Some(next) = &node.next {
                check(&node.id, next)?;
            }
            let hooks = node
                .on_start
                .iter()
                .chain(&node.on_finished_typing)
                .chain(&node.on_end);
            for option in &node.options {
                if let Some(goto) = &option.goto {
                    check(&node.id, goto)?;
                }
                for action in &option.on_chosen {
                    if let Some(target) = action.target() {
                        check(&node.id, target)?;
                    }
                }
            }
            for action in hooks {
                if let Some(target) = action.target() {
                    check(&node.id, target)?;
                }
            }
        }
        Ok(())
    }

    /// Add every node of the script to `store`.
    ///
    /// `typing_speed` is used for nodes and options that set none, unless
    /// the script has its own default.
    pub fn install(&self, store: &mut DialogueStore, typing_speed: f32) -> Result<LoadedScript, ScriptError> {
        self.validate()?;

        let default_speed = self.typing_speed.unwrap_or(typing_speed);
        let default_position = vec2(self.position).unwrap_or(DEFAULT_TEXT_POSITION);

        let mut ids = FxHashMap::default();
        for node in &self.nodes {
            let position = vec2(node.position).unwrap_or(default_position);
            let speed = node.typing_speed.unwrap_or(default_speed);
            let id = store.insert(DialogueNode::new(node.text.clone(), position).with_typing_speed(speed));
            ids.insert(node.id.clone(), id);
        }

        // validate() guarantees every name below resolves
        let resolve = |action: &ActionData| -> Option<DialogueAction> {
            Some(match action {
                ActionData::Goto(name) => DialogueAction::Goto(*ids.get(name)?),
                ActionData::End => DialogueAction::End,
                ActionData::LockCursor(locked) => DialogueAction::LockCursor(*locked),
                ActionData::SetFlag(flag) => DialogueAction::SetFlag(flag.clone()),
                ActionData::ClearFlag(flag) => DialogueAction::ClearFlag(flag.clone()),
            })
        };
        let resolve_all = |actions: &[ActionData]| -> Vec<DialogueAction> { actions.iter().filter_map(&resolve).collect() };

        for data in &self.nodes {
            let Some(&id) = ids.get(&data.id) else {
                continue;
            };
            let mut options = Vec::with_capacity(data.options.len());
            for option in &data.options {
                let position = vec2(option.position).unwrap_or(default_position);
                let size = vec2(option.size).unwrap_or(DEFAULT_CHOICE_SIZE);
                let speed = option.typing_speed.unwrap_or(default_speed);
                let mut node = DialogueNode::option(option.text.clone(), position, size).with_typing_speed(speed);
                node.hooks.on_chosen = resolve_all(&option.on_chosen);
                if let Some(goto) = option.goto.as_ref().and_then(|name| ids.get(name)) {
                    node.hooks.on_chosen.push(DialogueAction::Goto(*goto));
                }
                options.push(store.insert(node));
            }

            let next = data.next.as_ref().and_then(|name| ids.get(name)).copied();
            let on_start = resolve_all(&data.on_start);
            let on_finished_typing = resolve_all(&data.on_finished_typing);
            let on_end = resolve_all(&data.on_end);
            if let Some(node) = store.get_mut(id) {
                node.next = next;
                node.options.extend(options);
                node.hooks.on_start = on_start;
                node.hooks.on_finished_typing = on_finished_typing;
                node.hooks.on_end = on_end;
            }
        }

        let root = ids
            .get(&self.root)
            .copied()
            .ok_or_else(|| ScriptError::UnknownRoot(self.root.clone()))?;
        Ok(LoadedScript { root, nodes: ids })
    }
}

//! Pickable item components.
//!
//! An [`Item`] carries a display name and a parsed description template
//! rendered against its own substitution map, so descriptions can change at
//! runtime ("{uses} uses left"). Items stored in an inventory are tagged
//! [`Stored`] and ignored by physics and pickup.

use bevy_ecs::prelude::Component;

use crate::template::{SubstitutionValue, Substitutions, Template, TemplateError};

/// Default growth applied to the collider to build the pickup trigger.
pub const DEFAULT_TRIGGER_SCALE: f32 = 1.5;

#[derive(Component, Debug, Clone)]
pub struct Item {
    pub name: String,
    description: Template,
    pub values: Substitutions,
    /// Pickup trigger size relative to the collider.
    pub trigger_scale: f32,
}

impl Item {
    /// Create an item, parsing its description template.
    pub fn new(name: impl Into<String>, description: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            name: name.into(),
            description: Template::parse(description)?,
            values: Substitutions::default(),
            trigger_scale: DEFAULT_TRIGGER_SCALE,
        })
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<SubstitutionValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_trigger_scale(mut self, scale: f32) -> Self {
        self.trigger_scale = scale;
        self
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<SubstitutionValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Render the description with the current values.
    pub fn description(&self) -> Result<String, TemplateError> {
        self.description.render(&self.values)
    }

    /// Tooltip line shown while aiming at the item.
    pub fn tooltip(&self) -> Result<String, TemplateError> {
        Ok(format!("{}: {}", self.name, self.description()?))
    }
}

/// Marker for items currently kept in an inventory.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Stored;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_uses_item_values() {
        let item = Item::new("Lantern", "Oil: {oil}%")
            .unwrap()
            .with_value("oil", 80i64);
        assert_eq!(item.description().unwrap(), "Oil: 80%");
        assert_eq!(item.tooltip().unwrap(), "Lantern: Oil: 80%");
    }

    #[test]
    fn test_description_follows_value_changes() {
        let mut item = Item::new("Key", "{uses} uses left").unwrap().with_value("uses", 2i64);
        item.set_value("uses", 1i64);
        assert_eq!(item.description().unwrap(), "1 uses left");
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let item = Item::new("Key", "{uses} uses left").unwrap();
        assert!(item.description().is_err());
        assert!(item.tooltip().is_err());
    }

    #[test]
    fn test_bad_template_rejected_at_creation() {
        assert!(Item::new("Broken", "oops {").is_err());
    }
}

//! Stashing the held item and taking it back out.
//!
//! On the stash key the held item goes into the first free inventory slot
//! and is tagged [`Stored`], which hides it from physics and pickup. A full
//! inventory leaves everything as it was. The retrieve key empties the first
//! occupied slot into the player's hands; from there the pickup system
//! carries it and a drop puts it back under physics.

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::inventory::InventoryError;
use crate::components::item::{Item, Stored};
use crate::components::player::Player;
use crate::resources::input::InputState;

/// Move the held item of `player` into its inventory.
///
/// Returns the slot used. While the held-item cooldown runs nothing happens
/// and `Ok(None)` is returned.
pub fn stash_held(player: &mut Player) -> Result<Option<usize>, InventoryError> {
    let Some(item) = player.held.get() else {
        return Ok(None);
    };
    if !player.held.can_change() {
        return Ok(None);
    }
    let slot = player.inventory.store(item)?;
    player.held.set(None);
    Ok(Some(slot))
}

/// Move the first stored item into the player's empty hands.
///
/// Returns the slot it came from and the item. Nothing happens while
/// something is held, the cooldown runs or the inventory is empty.
pub fn retrieve_first(player: &mut Player) -> Option<(usize, Entity)> {
    if player.held.get().is_some() || !player.held.can_change() {
        return None;
    }
    let (slot, _) = player.inventory.iter().next()?;
    let item = player.inventory.drop_slot(slot).ok().flatten()?;
    player.held.set(Some(item));
    Some((slot, item))
}

pub fn inventory_system(
    input: Res<InputState>,
    mut commands: Commands,
    mut players: Query<&mut Player>,
    items: Query<&Item>,
) {
    if !input.stash.just_pressed && !input.retrieve.just_pressed {
        return;
    }
    let name_of = |entity: Entity| {
        items
            .get(entity)
            .map(|item| item.name.clone())
            .unwrap_or_default()
    };
    for mut player in players.iter_mut() {
        if input.stash.just_pressed
            && let Some(entity) = player.held.get()
        {
            match stash_held(&mut player) {
                Ok(Some(slot)) => {
                    commands.entity(entity).insert(Stored);
                    info!("stored '{}' in slot {}", name_of(entity), slot);
                }
                Ok(None) => {}
                Err(e) => warn!("cannot stash '{}': {}", name_of(entity), e),
            }
        } else if input.retrieve.just_pressed
            && let Some((slot, entity)) = retrieve_first(&mut player)
        {
            commands.entity(entity).remove::<Stored>();
            info!("took '{}' out of slot {}", name_of(entity), slot);
        }
    }
}

//! Conversations with speakers.
//!
//! Each tick [`dialogue_system`]:
//! 1. advances the active dialogue (typewriter, options, option clicks),
//! 2. ends it when the player walks out of the speaker's range,
//! 3. on a mouse press whose center ray hits a speaker, makes that speaker's
//!    conversation active and applies the interaction, unless the press
//!    already chose an option,
//! 4. mirrors the cursor lock onto the player's rotation lock, so mouse look
//!    stops while the pointer is free to click options.

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::boxcollider::BoxCollider;
use crate::components::player::Player;
use crate::components::speaker::Speaker;
use crate::components::transform::Transform3D;
use crate::resources::dialoguestore::{DialogueContext, DialogueStore, Interaction, Pointer};
use crate::resources::display::DisplaySurface;
use crate::resources::input::{CursorState, InputState};
use crate::resources::worldsignals::WorldSignals;
use crate::resources::worldtime::WorldTime;

/// Speaker whose box the center ray hits first.
pub fn speaker_under_crosshair<'a>(
    eye: &Transform3D,
    speakers: impl IntoIterator<Item = (Entity, &'a Transform3D, &'a BoxCollider)>,
) -> Option<Entity> {
    speakers
        .into_iter()
        .filter_map(|(entity, transform, collider)| {
            let hit = Player::center_ray_collision(eye, &collider.aabb(transform.position));
            hit.hit.then_some((entity, hit.distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

#[allow(clippy::too_many_arguments)]
pub fn dialogue_system(
    time: Res<WorldTime>,
    input: Res<InputState>,
    mut store: ResMut<DialogueStore>,
    mut surface: ResMut<DisplaySurface>,
    mut cursor: ResMut<CursorState>,
    mut signals: ResMut<WorldSignals>,
    mut players: Query<(&mut Player, &Transform3D)>,
    speakers: Query<(Entity, &Speaker, &Transform3D, &BoxCollider), Without<Player>>,
    mut talking_to: Local<Option<Entity>>,
) {
    let Ok((mut player, eye)) = players.single_mut() else {
        return;
    };
    let pointer = Pointer {
        position: input.mouse.position,
        pressed: input.mouse.left.just_pressed,
    };

    {
        let mut host = DialogueContext {
            surface: &mut *surface,
            cursor: &mut *cursor,
            signals: &mut *signals,
        };

        let chosen = match store.update_active(time.delta, pointer, &mut host) {
            Ok(chosen) => chosen,
            Err(e) => {
                warn!("dialogue update failed: {}", e);
                None
            }
        };

        if store.active().is_none() {
            *talking_to = None;
        }
        if let Some(entity) = *talking_to
            && let Ok((_, speaker, transform, _)) = speakers.get(entity)
            && eye.distance(transform) > speaker.range
        {
            match store.end_active(&mut host) {
                Ok(true) => info!("conversation interrupted: walked away"),
                Ok(false) => {}
                Err(e) => warn!("dialogue end failed: {}", e),
            }
        }

        if pointer.pressed && chosen.is_none() {
            let hit = speaker_under_crosshair(
                eye,
                speakers
                    .iter()
                    .map(|(entity, _, transform, collider)| (entity, transform, collider)),
            );
            if let Some(entity) = hit
                && let Ok((_, speaker, _, _)) = speakers.get(entity)
            {
                if *talking_to != Some(entity) || store.active().is_none() {
                    if let Err(e) = store.end_active(&mut host) {
                        warn!("dialogue end failed: {}", e);
                    }
                    store.set_active(Some(speaker.dialogue));
                    *talking_to = Some(entity);
                }
                match store.interact(&mut host) {
                    Ok(Interaction::Ended) => {
                        *talking_to = None;
                        info!("conversation finished");
                    }
                    Ok(result) => info!("dialogue interaction: {:?}", result),
                    Err(e) => warn!("dialogue interaction failed: {}", e),
                }
            }
        }
    }

    player.rotation_lock(!cursor.locked);
}

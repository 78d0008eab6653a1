//! Item pickup.
//!
//! Every tick the player's center ray is cast against the pickup trigger of
//! each nearby loose item. The closest hit within reach becomes the aim
//! target and its description is shown as a tooltip. Pressing interact drops
//! the held item or, with empty hands, holds the target. Both are debounced
//! by the held-item cooldown. A held item is frozen and carried in front of
//! the player.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{info, warn};

use crate::components::boxcollider::BoxCollider;
use crate::components::item::{Item, Stored};
use crate::components::player::Player;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform3D;
use crate::resources::display::{DisplaySurface, SurfaceKey, TextLabel};
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;

/// Items farther than this from the player are not ray-tested.
pub const PICKUP_PROXIMITY: f32 = 10.0;
/// Maximum ray distance to a pickup trigger.
pub const PICKUP_REACH: f32 = 4.0;
/// How far in front of the eye a held item floats.
pub const HOLD_DISTANCE: f32 = 2.0;
pub const TOOLTIP_POSITION: Vec2 = Vec2::new(30.0, 650.0);

/// Closest item under the crosshair, with the hit distance.
pub fn aim_target<'a>(
    eye: &Transform3D,
    items: impl IntoIterator<Item = (Entity, &'a Item, &'a Transform3D, &'a BoxCollider)>,
) -> Option<(Entity, f32)> {
    let mut target: Option<(Entity, f32)> = None;
    for (entity, item, transform, collider) in items {
        if eye.distance(transform) > PICKUP_PROXIMITY {
            continue;
        }
        let trigger = collider.aabb(transform.position).scaled(item.trigger_scale);
        let hit = Player::center_ray_collision(eye, &trigger);
        if !hit.hit || hit.distance > PICKUP_REACH {
            continue;
        }
        if target.is_none_or(|(_, best)| hit.distance < best) {
            target = Some((entity, hit.distance));
        }
    }
    target
}

fn show_tooltip(surface: &mut DisplaySurface, item: Option<&Item>) {
    let Some(item) = item else {
        surface.detach_text(SurfaceKey::Tooltip);
        return;
    };
    match item.tooltip() {
        Ok(text) => {
            if !surface.set_text(SurfaceKey::Tooltip, &text) {
                surface.attach_text(SurfaceKey::Tooltip, TextLabel::new(text, TOOLTIP_POSITION));
            }
        }
        Err(e) => {
            warn!("cannot describe item '{}': {}", item.name, e);
            surface.detach_text(SurfaceKey::Tooltip);
        }
    }
}

pub fn item_pickup_system(
    time: Res<WorldTime>,
    input: Res<InputState>,
    mut surface: ResMut<DisplaySurface>,
    mut players: Query<(&mut Player, &Transform3D), Without<Item>>,
    mut items: Query<
        (Entity, &Item, &mut Transform3D, &mut RigidBody, &BoxCollider),
        (Without<Player>, Without<Stored>),
    >,
) {
    for (mut player, eye) in players.iter_mut() {
        player.held.tick(time.delta);
        let held = player.held.get();

        let target = aim_target(
            eye,
            items
                .iter()
                .filter(|(entity, ..)| Some(*entity) != held)
                .map(|(entity, item, transform, _, collider)| (entity, item, transform, collider)),
        );
        let target_item = target.and_then(|(entity, _)| items.get(entity).ok().map(|(_, item, ..)| item));
        show_tooltip(&mut surface, target_item);

        if input.interact.just_pressed {
            match (held, target) {
                (Some(entity), _) => {
                    if player.held.set(None) {
                        if let Ok((_, item, _, mut body, _)) = items.get_mut(entity) {
                            body.unfreeze();
                            info!("dropped '{}'", item.name);
                        }
                    }
                }
                (None, Some((entity, _))) => {
                    if player.held.set(Some(entity)) {
                        if let Ok((_, item, ..)) = items.get(entity) {
                            info!("picked up '{}'", item.name);
                        }
                    }
                }
                (None, None) => {}
            }
        }

        if let Some(entity) = player.held.get()
            && let Ok((_, _, mut transform, mut body, _)) = items.get_mut(entity)
        {
            transform.position = eye.position + eye.forward() * HOLD_DISTANCE;
            body.freeze();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn lantern() -> Item {
        Item::new("Lantern", "An old lantern.").unwrap()
    }

    #[test]
    fn test_aim_target_picks_nearest_in_reach() {
        let mut world = World::new();
        let near = world.spawn_empty().id();
        let far = world.spawn_empty().id();
        let item = lantern();
        let collider = BoxCollider::new(Vec3::splat(0.5));
        let eye = Transform3D::default();
        let near_t = Transform3D::from_position(Vec3::new(0.0, 0.0, -2.0));
        let far_t = Transform3D::from_position(Vec3::new(0.0, 0.0, -3.5));

        let target = aim_target(
            &eye,
            [(far, &item, &far_t, &collider), (near, &item, &near_t, &collider)],
        );
        let (entity, distance) = target.unwrap();
        assert_eq!(entity, near);
        // trigger is the collider scaled by 1.5: front face at z = -1.25
        assert!((distance - 1.25).abs() < 1e-4);
    }

    #[test]
    fn test_aim_target_ignores_out_of_reach_and_off_axis() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let item = lantern();
        let collider = BoxCollider::new(Vec3::splat(0.5));
        let eye = Transform3D::default();
        let too_far = Transform3D::from_position(Vec3::new(0.0, 0.0, -8.0));
        let beside = Transform3D::from_position(Vec3::new(3.0, 0.0, -2.0));
        assert!(aim_target(&eye, [(e, &item, &too_far, &collider)]).is_none());
        assert!(aim_target(&eye, [(e, &item, &beside, &collider)]).is_none());
    }

    #[test]
    fn test_tooltip_error_shows_nothing() {
        let mut surface = DisplaySurface::default();
        let broken = Item::new("Key", "{uses} uses left").unwrap();
        show_tooltip(&mut surface, Some(&broken));
        assert!(surface.text(SurfaceKey::Tooltip).is_none());

        show_tooltip(&mut surface, Some(&lantern()));
        assert_eq!(
            surface.text(SurfaceKey::Tooltip).unwrap().content,
            "Lantern: An old lantern."
        );
        show_tooltip(&mut surface, None);
        assert!(surface.is_empty());
    }
}

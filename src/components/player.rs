//! First-person player component.
//!
//! The [`Player`] carries the movement tuning read from configuration, the
//! jump and look gates, the currently held item and the inventory. Motion is
//! integrated by [`crate::systems::playercontroller`]; orientation by
//! [`crate::systems::look`].

use bevy_ecs::prelude::{Component, Entity};

use crate::components::boxcollider::{Aabb, Ray, RayHit};
use crate::components::inventory::Inventory;
use crate::components::transform::Transform3D;
use crate::resources::input::CursorState;

pub const DEFAULT_SPEED: f32 = 7.0;
pub const DEFAULT_MAX_SPEED: f32 = 10.0;
pub const DEFAULT_MAX_JUMP_SPEED: f32 = 20.0;
pub const DEFAULT_FRICTION: f32 = 5.0;
pub const DEFAULT_INVENTORY_SIZE: usize = 5;
pub const DEFAULT_PICKUP_COOLDOWN: f32 = 0.5;

/// Optional held value whose changes are debounced by a cooldown.
///
/// After an accepted change `can_change` stays false until `cooldown`
/// seconds of ticked time have elapsed. Changes requested in that window are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldItem<T> {
    item: Option<T>,
    can_change: bool,
    timer: f32,
    pub cooldown: f32,
}

impl<T: Copy> HeldItem<T> {
    pub fn new(cooldown: f32) -> Self {
        Self {
            item: None,
            can_change: true,
            timer: 0.0,
            cooldown,
        }
    }

    pub fn get(&self) -> Option<T> {
        self.item
    }

    pub fn is_holding(&self) -> bool {
        self.item.is_some()
    }

    pub fn can_change(&self) -> bool {
        self.can_change
    }

    /// Replace the held value. Returns `false` (and changes nothing) while
    /// the cooldown is running.
    pub fn set(&mut self, item: Option<T>) -> bool {
        if !self.can_change {
            return false;
        }
        self.item = item;
        self.can_change = false;
        self.timer = 0.0;
        true
    }

    /// Advance the cooldown timer.
    pub fn tick(&mut self, dt: f32) {
        if self.can_change {
            return;
        }
        self.timer += dt;
        if self.timer >= self.cooldown {
            self.can_change = true;
            self.timer = 0.0;
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    /// Acceleration added per tick for each held direction key.
    pub speed: f32,
    /// Horizontal velocity clamp per axis.
    pub max_speed: f32,
    /// Jump impulse and vertical velocity clamp.
    pub max_jump_speed: f32,
    /// Horizontal decay per tick.
    pub friction: f32,
    pub can_jump: bool,
    /// When true the look controller leaves the orientation untouched.
    pub lock_rotation: bool,
    pub held: HeldItem<Entity>,
    pub inventory: Inventory<Entity>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            max_speed: DEFAULT_MAX_SPEED,
            max_jump_speed: DEFAULT_MAX_JUMP_SPEED,
            friction: DEFAULT_FRICTION,
            can_jump: true,
            lock_rotation: false,
            held: HeldItem::new(DEFAULT_PICKUP_COOLDOWN),
            inventory: Inventory::new(DEFAULT_INVENTORY_SIZE),
        }
    }
}

impl Player {
    pub fn new(speed: f32, max_speed: f32, max_jump_speed: f32, friction: f32) -> Self {
        Self {
            speed,
            max_speed,
            max_jump_speed,
            friction,
            ..Self::default()
        }
    }

    pub fn with_inventory_size(mut self, size: usize) -> Self {
        self.inventory = Inventory::new(size);
        self
    }

    pub fn with_pickup_cooldown(mut self, cooldown: f32) -> Self {
        self.held = HeldItem::new(cooldown);
        self
    }

    /// Take control of the pointer: lock the cursor and enable mouse look.
    pub fn start(&mut self, cursor: &mut CursorState) {
        cursor.lock();
        self.lock_rotation = false;
    }

    pub fn rotation_lock(&mut self, locked: bool) {
        self.lock_rotation = locked;
    }

    /// Ray from the eye through the center of the view.
    pub fn center_ray(transform: &Transform3D) -> Ray {
        Ray::new(transform.position, transform.forward())
    }

    pub fn center_ray_collision(transform: &Transform3D, target: &Aabb) -> RayHit {
        target.ray_cast(&Self::center_ray(transform))
    }
}

//! Axis-aligned box colliders, rays and static solids.
//!
//! A [`BoxCollider`] describes a box in the entity's local space (half
//! extents plus an offset from the entity position). Placing it at a
//! position yields a world-space [`Aabb`]. The predictive ("future") volume
//! used by the collision resolver is the same collider placed at the
//! position the body would reach next tick, so current and future volumes
//! always share bounds and differ only by offset.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Downward nudge applied to predictive volumes so a body resting exactly on
/// a surface still registers the contact.
pub const PREDICTION_EPSILON: f32 = 0.01;

/// World-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build a box from two corners, normalizing them to proper min/max.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::from_corners(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Same center, half extents multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::from_center(self.center(), self.half_extents() * factor)
    }

    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Overlap test. Boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test of a ray against the box.
    ///
    /// A ray starting inside the box hits at distance zero.
    pub fn ray_cast(&self, ray: &Ray) -> RayHit {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let origin = ray.origin[axis];
            let dir = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return RayHit::MISS;
                }
                continue;
            }
            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return RayHit::MISS;
            }
        }
        RayHit {
            hit: true,
            distance: t_min,
            point: ray.at(t_min),
        }
    }
}

/// Half-line used for aiming and pickup detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction, or zero for a degenerate ray.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub hit: bool,
    pub distance: f32,
    pub point: Vec3,
}

impl RayHit {
    pub const MISS: RayHit = RayHit {
        hit: false,
        distance: f32::INFINITY,
        point: Vec3::ZERO,
    };
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    pub half_extents: Vec3,
    pub offset: Vec3,
}

impl BoxCollider {
    /// Create a BoxCollider with the given half extents.
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            offset: Vec3::ZERO,
        }
    }

    /// Collider spanning the local bounds `min..max`, scaled per axis.
    pub fn from_bounds(min: Vec3, max: Vec3, scale: Vec3) -> Self {
        let local = Aabb::from_corners(min * scale, max * scale);
        Self {
            half_extents: local.half_extents(),
            offset: local.center(),
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// World-space volume for an entity at `position`.
    pub fn aabb(&self, position: Vec3) -> Aabb {
        Aabb::from_center(position + self.offset, self.half_extents)
    }

    /// Predictive volume: where the collider will be after `dt` seconds at
    /// `velocity`, nudged down by [`PREDICTION_EPSILON`].
    pub fn predicted_aabb(&self, position: Vec3, velocity: Vec3, dt: f32) -> Aabb {
        let offset = velocity * dt - Vec3::new(0.0, PREDICTION_EPSILON, 0.0);
        self.aabb(position + offset)
    }
}

/// Static obstacle marker, telling the player controller how to react to it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solid {
    /// Floors: landing zeroes vertical velocity.
    Ground,
    /// Walls and props: contact halts all movement.
    Blocking,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_from_corners_normalizes() {
        let b = Aabb::from_corners(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(b.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center(Vec3::new(1.5, 0.0, 0.0), Vec3::ONE);
        let touching = Aabb::from_center(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let a = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        assert!(a.contains_point(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!a.contains_point(Vec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn test_scaled_keeps_center() {
        let a = Aabb::from_center(Vec3::new(2.0, 0.0, 0.0), Vec3::ONE).scaled(1.5);
        assert_eq!(a.center(), Vec3::new(2.0, 0.0, 0.0));
        assert!(approx_eq(a.half_extents().x, 1.5));
    }

    #[test]
    fn test_ray_cast_hits_front_face() {
        let target = Aabb::from_center(Vec3::new(0.0, 0.0, -10.0), Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = target.ray_cast(&ray);
        assert!(hit.hit);
        assert!(approx_eq(hit.distance, 9.0));
        assert!(approx_eq(hit.point.z, -9.0));
    }

    #[test]
    fn test_ray_cast_misses_behind_and_beside() {
        let target = Aabb::from_center(Vec3::new(0.0, 0.0, 10.0), Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(!target.ray_cast(&ray).hit);

        let beside = Aabb::from_center(Vec3::new(5.0, 0.0, -10.0), Vec3::ONE);
        assert!(!beside.ray_cast(&ray).hit);
    }

    #[test]
    fn test_ray_cast_from_inside() {
        let target = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        let hit = target.ray_cast(&Ray::new(Vec3::ZERO, Vec3::X));
        assert!(hit.hit);
        assert!(approx_eq(hit.distance, 0.0));
    }

    #[test]
    fn test_degenerate_ray_has_zero_direction() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::ZERO);
        let outside = Aabb::from_center(Vec3::new(5.0, 5.0, 5.0), Vec3::ONE);
        assert!(!outside.ray_cast(&ray).hit);
    }

    #[test]
    fn test_from_bounds_applies_scale() {
        let c = BoxCollider::from_bounds(Vec3::splat(-1.0), Vec3::ONE, Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(c.half_extents, Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(c.offset, Vec3::ZERO);
    }

    #[test]
    fn test_predicted_aabb_shares_bounds() {
        let c = BoxCollider::new(Vec3::ONE);
        let now = c.aabb(Vec3::ZERO);
        let next = c.predicted_aabb(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.1);
        assert!((now.half_extents() - next.half_extents()).length() < EPSILON);
        assert!(approx_eq(next.center().x, 1.0));
        assert!(approx_eq(next.center().y, -PREDICTION_EPSILON));
    }
}

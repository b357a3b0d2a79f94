use crate::utils::math::Vec3MathUtils;
use crate::vehicle::Vehicle;
use glam::Vec2;
use glam::Vec3;

pub mod config;
pub mod obstacle;
pub mod powerup;
pub mod spawner;

pub use config::WorldConfig;

const COINCIDENT_DISTANCE: f32 = 0.001;

/// Static or animated world object. Sizes are `(width, height, length)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub initial_position: Vec3,
    pub rotation: f32,
    pub initial_rotation: f32,
    pub size: Vec3,
    pub active: bool,
}

/// Ground plane bounding circle of a box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

/// `normal` points from the first circle towards the second one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub overlap: f32,
    pub normal: Vec2,
}

pub trait ObjectManager {
    fn update(&mut self, delta: f32);
    /// Returns true when the vehicle was affected.
    fn handle_collisions(&mut self, vehicle: &mut Vehicle) -> bool;
    fn reset(&mut self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Body {
    pub fn new(position: Vec3, size: Vec3) -> Self {
        Self { position, initial_position: position, rotation: 0.0, initial_rotation: 0.0, size, active: true }
    }

    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.rotation = self.initial_rotation;
        self.active = true;
    }

    pub fn circle(&self) -> Circle {
        Circle::from_box(self.position, self.size)
    }
}

impl Circle {
    /// The radius covers the box corners, so the circle stays valid whatever the box rotation is.
    pub fn from_box(position: Vec3, size: Vec3) -> Self {
        let half_extent = Vec2::new(size.x, size.z) / 2.0;
        Self { center: position.ground(), radius: half_extent.length() }
    }

    pub fn contact(&self, other: &Circle) -> Option<Contact> {
        let offset = other.center - self.center;
        let distance = offset.length();
        let radius_sum = self.radius + other.radius;

        if distance <= COINCIDENT_DISTANCE {
            return Some(Contact { overlap: radius_sum, normal: Vec2::X });
        }

        if distance < radius_sum {
            return Some(Contact { overlap: radius_sum - distance, normal: offset / distance });
        }

        None
    }

    pub fn intersects(&self, other: &Circle) -> bool {
        self.contact(other).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_covers_box_corners() {
        let circle = Circle::from_box(Vec3::ZERO, Vec3::new(6.0, 1.0, 8.0));
        assert_eq!(circle.radius, 5.0);
    }

    #[test]
    fn separated_circles_do_not_touch() {
        let a = Circle { center: Vec2::ZERO, radius: 1.0 };
        let b = Circle { center: Vec2::new(2.5, 0.0), radius: 1.0 };

        assert_eq!(a.contact(&b), None);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn overlap_is_measured_along_the_normal() {
        let a = Circle { center: Vec2::ZERO, radius: 1.0 };
        let b = Circle { center: Vec2::new(0.0, 1.5), radius: 1.0 };
        let contact = a.contact(&b).unwrap();

        assert!((contact.overlap - 0.5).abs() < 1e-6);
        assert!((contact.normal - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn coincident_centres_push_along_x() {
        let a = Circle { center: Vec2::new(3.0, 3.0), radius: 1.0 };
        let b = Circle { center: Vec2::new(3.0, 3.0005), radius: 0.5 };

        assert_eq!(a.contact(&b), Some(Contact { overlap: 1.5, normal: Vec2::X }));
    }

    #[test]
    fn body_reset_restores_spawn_state() {
        let mut body = Body::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE);
        body.position = Vec3::ZERO;
        body.rotation = 1.0;
        body.active = false;

        body.reset();
        assert_eq!(body, Body::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ONE));
    }
}

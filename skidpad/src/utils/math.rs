use glam::Vec2;
use glam::Vec3;
use std::f32::consts;

pub trait F32MathUtils {
    fn normalize_angle(&self) -> f32;
    fn wrap_angle(&self) -> f32;
    fn lerp_towards(&self, target: f32, factor: f32) -> f32;
}

pub trait Vec3MathUtils {
    fn ground(&self) -> Vec2;
    fn lerp_towards(&self, target: Vec3, factor: f32) -> Vec3;
}

impl F32MathUtils for f32 {
    /// Maps the angle into `(-π, π]`.
    fn normalize_angle(&self) -> f32 {
        let angle = self.wrap_angle();

        if angle > consts::PI {
            angle - consts::TAU
        } else {
            angle
        }
    }

    /// Maps the angle into `[0, 2π)`.
    fn wrap_angle(&self) -> f32 {
        if !self.is_finite() {
            return 0.0;
        }

        let mut angle = self % consts::TAU;
        if angle < 0.0 {
            angle += consts::TAU;
        }

        // Small negative inputs round up to exactly TAU
        if angle >= consts::TAU {
            0.0
        } else {
            angle
        }
    }

    fn lerp_towards(&self, target: f32, factor: f32) -> f32 {
        self + (target - self) * factor
    }
}

impl Vec3MathUtils for Vec3 {
    fn ground(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    fn lerp_towards(&self, target: Vec3, factor: f32) -> Vec3 {
        *self + (target - *self) * factor
    }
}

/// Direction on the ground plane for a heading, 0 rad facing +Z.
pub fn heading_to_direction(heading: f32) -> Vec2 {
    Vec2::new(heading.sin(), heading.cos())
}

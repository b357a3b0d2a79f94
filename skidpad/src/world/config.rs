use crate::utils::json;
use anyhow::bail;
use anyhow::Result;
use glam::Vec3;

pub const MAX_OBJECT_COUNT: usize = 10_000;
pub const MAX_ATTEMPTS_PER_OBJECT: usize = 1_000;
pub const MAX_WALL_SEGMENTS_PER_SIDE: f32 = 10_000.0;

/// Layout of the arena and everything spawned in it.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    pub play_area_size: f32,
    pub spawn_point: Vec3,

    pub powerup_count: usize,
    pub powerup_margin: f32,
    pub powerup_height: f32,
    pub powerup_size: f32,
    pub powerup_spin_speed: f32,

    pub tree_count: usize,
    pub tree_height: f32,
    pub tree_size: Vec3,
    pub tree_wall_margin: f32,
    pub tree_center_clearance: f32,
    pub tree_spacing: f32,
    pub tree_attempts_per_tree: usize,

    pub wall_segment_length: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,
    pub wall_elevation: f32,
}

impl WorldConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        let data = json::parse_object(content)?;
        let default = Self::default();

        let config = Self {
            play_area_size: json::read_f32_or(&data, "play_area_size", default.play_area_size)?,
            spawn_point: json::read_position_or(&data, "spawn_point", default.spawn_point)?,

            powerup_count: json::read_usize_or(&data, "powerup_count", default.powerup_count)?,
            powerup_margin: json::read_f32_or(&data, "powerup_margin", default.powerup_margin)?,
            powerup_height: json::read_f32_or(&data, "powerup_height", default.powerup_height)?,
            powerup_size: json::read_f32_or(&data, "powerup_size", default.powerup_size)?,
            powerup_spin_speed: json::read_f32_or(&data, "powerup_spin_speed", default.powerup_spin_speed)?,

            tree_count: json::read_usize_or(&data, "tree_count", default.tree_count)?,
            tree_height: json::read_f32_or(&data, "tree_height", default.tree_height)?,
            tree_size: json::read_position_or(&data, "tree_size", default.tree_size)?,
            tree_wall_margin: json::read_f32_or(&data, "tree_wall_margin", default.tree_wall_margin)?,
            tree_center_clearance: json::read_f32_or(&data, "tree_center_clearance", default.tree_center_clearance)?,
            tree_spacing: json::read_f32_or(&data, "tree_spacing", default.tree_spacing)?,
            tree_attempts_per_tree: json::read_usize_or(&data, "tree_attempts_per_tree", default.tree_attempts_per_tree)?,

            wall_segment_length: json::read_f32_or(&data, "wall_segment_length", default.wall_segment_length)?,
            wall_thickness: json::read_f32_or(&data, "wall_thickness", default.wall_thickness)?,
            wall_height: json::read_f32_or(&data, "wall_height", default.wall_height)?,
            wall_elevation: json::read_f32_or(&data, "wall_elevation", default.wall_elevation)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.play_area_size.is_finite() || self.play_area_size <= 0.0 {
            bail!("Invalid play area size {}", self.play_area_size);
        }

        if self.wall_segment_length <= 0.0 || self.wall_thickness <= 0.0 {
            bail!("Invalid wall segment {}x{}", self.wall_segment_length, self.wall_thickness);
        }

        if self.play_area_size / self.wall_segment_length > MAX_WALL_SEGMENTS_PER_SIDE {
            bail!("Too many wall segments, {} / {} exceeds {}", self.play_area_size, self.wall_segment_length, MAX_WALL_SEGMENTS_PER_SIDE);
        }

        if self.tree_count > MAX_OBJECT_COUNT || self.powerup_count > MAX_OBJECT_COUNT {
            bail!("Too many objects ({} trees, {} power-ups), the limit is {}", self.tree_count, self.powerup_count, MAX_OBJECT_COUNT);
        }

        if self.tree_attempts_per_tree > MAX_ATTEMPTS_PER_OBJECT {
            bail!("Invalid tree placement budget {}, the limit is {}", self.tree_attempts_per_tree, MAX_ATTEMPTS_PER_OBJECT);
        }

        if self.powerup_size <= 0.0 || self.tree_size.min_element() <= 0.0 {
            bail!("Object sizes must be positive");
        }

        Ok(())
    }

    pub fn half_size(&self) -> f32 {
        self.play_area_size / 2.0
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            play_area_size: 200.0,
            spawn_point: Vec3::ZERO,

            powerup_count: 20,
            powerup_margin: 10.0,
            powerup_height: 0.4,
            powerup_size: 0.8,
            powerup_spin_speed: 2.0,

            tree_count: 30,
            tree_height: 0.0,
            tree_size: Vec3::new(1.0, 6.0, 1.0),
            tree_wall_margin: 15.0,
            tree_center_clearance: 10.0,
            tree_spacing: 8.0,
            tree_attempts_per_tree: 20,

            wall_segment_length: 5.0,
            wall_thickness: 2.0,
            wall_height: 5.0,
            wall_elevation: 2.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json(r#"{ "tree_count": 5, "spawn_point": [1, 0, 2] }"#).unwrap();

        assert_eq!(config.tree_count, 5);
        assert_eq!(config.spawn_point, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(config.play_area_size, 200.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(WorldConfig::from_json(r#"{ "play_area_size": 0 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "tree_count": -3 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "wall_segment_length": -5 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "tree_count": 1e19 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "powerup_count": 20000 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "tree_attempts_per_tree": 1e12 }"#).is_err());
        assert!(WorldConfig::from_json(r#"{ "wall_segment_length": 1e-6 }"#).is_err());
    }
}

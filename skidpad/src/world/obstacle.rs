use super::spawner::PositionSpawner;
use super::Body;
use super::Circle;
use super::ObjectManager;
use super::WorldConfig;
use crate::vehicle::Vehicle;
use crate::vehicle::VehicleState;
use fastrand::Rng;
use glam::Vec2;
use glam::Vec3;
use log::debug;
use log::info;
use log::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallOrientation {
    /// Runs along the X axis (north and south sides).
    Horizontal,
    /// Runs along the Z axis (west and east sides).
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Wall(WallOrientation),
    Tree,
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub body: Body,
    pub kind: ObstacleKind,
}

pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
}

impl Obstacle {
    pub fn wall(position: Vec3, orientation: WallOrientation, config: &WorldConfig) -> Self {
        let size = match orientation {
            WallOrientation::Horizontal => Vec3::new(config.wall_segment_length, config.wall_height, config.wall_thickness),
            WallOrientation::Vertical => Vec3::new(config.wall_thickness, config.wall_height, config.wall_segment_length),
        };

        Self { body: Body::new(position, size), kind: ObstacleKind::Wall(orientation) }
    }

    pub fn tree(position: Vec3, config: &WorldConfig) -> Self {
        Self { body: Body::new(position, config.tree_size), kind: ObstacleKind::Tree }
    }
}

impl ObstacleManager {
    pub fn new(config: &WorldConfig, rng: &mut Rng) -> Self {
        let mut obstacles = generate_walls(config);
        let walls = obstacles.len();

        obstacles.extend(generate_trees(config, rng));
        info!("Generated {} wall segments and {} trees", walls, obstacles.len() - walls);

        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn count(&self, kind: fn(&ObstacleKind) -> bool) -> usize {
        self.obstacles.iter().filter(|p| kind(&p.kind)).count()
    }
}

impl ObjectManager for ObstacleManager {
    fn update(&mut self, _delta: f32) {}

    /// Resolves only the first overlapping obstacle. The car is pushed back out of it and stopped.
    fn handle_collisions(&mut self, vehicle: &mut Vehicle) -> bool {
        let circle = Circle::from_box(vehicle.position(), vehicle.size());

        for obstacle in &self.obstacles {
            let contact = match circle.contact(&obstacle.body.circle()) {
                Some(contact) => contact,
                None => continue,
            };

            let push = contact.normal * contact.overlap;
            let position = vehicle.position();

            vehicle.set_position(Vec3::new(position.x - push.x, position.y, position.z - push.y));
            vehicle.set_velocity(0.0);

            debug!("Vehicle hit {:?} at {:?}, overlap {:.3}", obstacle.kind, obstacle.body.position, contact.overlap);
            return true;
        }

        false
    }

    fn reset(&mut self) {}

    fn len(&self) -> usize {
        self.obstacles.len()
    }
}

fn generate_walls(config: &WorldConfig) -> Vec<Obstacle> {
    let half_size = config.half_size();
    let segment = config.wall_segment_length;
    let segments = (config.play_area_size / segment) as usize;
    let y = config.wall_elevation;

    let mut walls = Vec::with_capacity(segments * 4);
    for index in 0..segments {
        let offset = -half_size + index as f32 * segment + segment / 2.0;

        walls.push(Obstacle::wall(Vec3::new(offset, y, -half_size), WallOrientation::Horizontal, config));
        walls.push(Obstacle::wall(Vec3::new(offset, y, half_size), WallOrientation::Horizontal, config));
        walls.push(Obstacle::wall(Vec3::new(-half_size, y, offset), WallOrientation::Vertical, config));
        walls.push(Obstacle::wall(Vec3::new(half_size, y, offset), WallOrientation::Vertical, config));
    }

    walls
}

fn generate_trees(config: &WorldConfig, rng: &mut Rng) -> Vec<Obstacle> {
    let mut spawner = PositionSpawner::new(rng, config.play_area_size, config.tree_wall_margin);
    let max_attempts = config.tree_count.saturating_mul(config.tree_attempts_per_tree);

    let positions = spawner.scatter(config.tree_count, max_attempts, |position, accepted| {
        position.length() >= config.tree_center_clearance && accepted.iter().all(|other| other.distance(position) >= config.tree_spacing)
    });

    if positions.len() < config.tree_count {
        warn!("Placed only {} of {} trees after {} attempts", positions.len(), config.tree_count, max_attempts);
    }

    positions.into_iter().map(|position: Vec2| Obstacle::tree(Vec3::new(position.x, config.tree_height, position.y), config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::VehicleTuning;
    use std::sync::Arc;

    fn manager(config: &WorldConfig) -> ObstacleManager {
        ObstacleManager::new(config, &mut Rng::with_seed(1))
    }

    #[test]
    fn perimeter_is_closed() {
        let config = WorldConfig { tree_count: 0, ..Default::default() };
        let manager = manager(&config);

        assert_eq!(manager.len(), 160);
        assert_eq!(manager.count(|kind| *kind == ObstacleKind::Wall(WallOrientation::Horizontal)), 80);

        let first = &manager.obstacles()[0];
        assert_eq!(first.body.position, Vec3::new(-97.5, 2.5, -100.0));
        assert_eq!(first.body.size, Vec3::new(5.0, 5.0, 2.0));

        let west = &manager.obstacles()[2];
        assert_eq!(west.body.size, Vec3::new(2.0, 5.0, 5.0));
    }

    #[test]
    fn trees_keep_their_distance() {
        let config = WorldConfig::default();
        let manager = manager(&config);
        let trees = manager.obstacles().iter().filter(|p| p.kind == ObstacleKind::Tree).collect::<Vec<_>>();

        assert!(!trees.is_empty());
        for (index, tree) in trees.iter().enumerate() {
            let position = Vec2::new(tree.body.position.x, tree.body.position.z);

            assert!(position.length() >= config.tree_center_clearance);
            assert!(position.x.abs() <= 85.0 && position.y.abs() <= 85.0);
            assert_eq!(tree.body.position.y, 0.0);

            for other in trees.iter().skip(index + 1) {
                assert!(position.distance(Vec2::new(other.body.position.x, other.body.position.z)) >= config.tree_spacing);
            }
        }
    }

    #[test]
    fn attempt_budget_saturates() {
        let config = WorldConfig { tree_count: 4, tree_attempts_per_tree: usize::MAX, ..Default::default() };
        let manager = manager(&config);

        assert_eq!(manager.count(|kind| *kind == ObstacleKind::Tree), 4);
    }

    #[test]
    fn collision_pushes_vehicle_out_and_stops_it() {
        let config = WorldConfig { tree_count: 0, ..Default::default() };
        let mut manager = manager(&config);
        let mut vehicle = Vehicle::new(Vec3::new(0.0, 0.0, 97.5), Arc::new(VehicleTuning::default()));
        vehicle.set_velocity(20.0);

        assert!(manager.handle_collisions(&mut vehicle));
        assert_eq!(vehicle.velocity(), 0.0);
        assert!(vehicle.position().z < 97.5);
        assert_eq!(vehicle.position().y, 0.0);
    }

    #[test]
    fn open_ground_is_left_alone() {
        let config = WorldConfig { tree_count: 0, ..Default::default() };
        let mut manager = manager(&config);
        let mut vehicle = Vehicle::new(Vec3::ZERO, Arc::new(VehicleTuning::default()));
        vehicle.set_velocity(10.0);

        assert!(!manager.handle_collisions(&mut vehicle));
        assert_eq!(vehicle.velocity(), 10.0);
    }
}

use super::spawner::PositionSpawner;
use super::Body;
use super::Circle;
use super::ObjectManager;
use super::WorldConfig;
use crate::utils::math::F32MathUtils;
use crate::vehicle::Vehicle;
use crate::vehicle::VehicleState;
use fastrand::Rng;
use glam::Vec3;
use log::debug;
use log::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerupKind {
    Nitrous,
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub body: Body,
    pub kind: PowerupKind,
    pub spin_speed: f32,
}

pub struct PowerupManager {
    powerups: Vec<Powerup>,
}

impl Powerup {
    pub fn new(position: Vec3, kind: PowerupKind, config: &WorldConfig) -> Self {
        Self { body: Body::new(position, Vec3::splat(config.powerup_size)), kind, spin_speed: config.powerup_spin_speed }
    }

    /// Collected power-ups stop spinning until they respawn.
    pub fn update(&mut self, delta: f32) {
        if self.body.active {
            self.body.rotation = (self.body.rotation + self.spin_speed * delta).wrap_angle();
        }
    }
}

impl PowerupManager {
    pub fn new(config: &WorldConfig, rng: &mut Rng) -> Self {
        let mut spawner = PositionSpawner::new(rng, config.play_area_size, config.powerup_margin);
        let powerups = (0..config.powerup_count)
            .map(|_| spawner.next_position())
            .map(|p| Powerup::new(Vec3::new(p.x, config.powerup_height, p.y), PowerupKind::Nitrous, config))
            .collect::<Vec<Powerup>>();

        info!("Generated {} power-ups", powerups.len());
        Self { powerups }
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    pub fn active_count(&self) -> usize {
        self.powerups.iter().filter(|p| p.body.active).count()
    }
}

impl ObjectManager for PowerupManager {
    fn update(&mut self, delta: f32) {
        for powerup in &mut self.powerups {
            powerup.update(delta);
        }
    }

    /// A car can carry a single charge, so nothing is collected while one is stored or burning.
    fn handle_collisions(&mut self, vehicle: &mut Vehicle) -> bool {
        let circle = Circle::from_box(vehicle.position(), vehicle.size());
        let mut collected = false;

        for powerup in &mut self.powerups {
            if !powerup.body.active || vehicle.has_nitrous() || vehicle.is_nitrous_active() {
                continue;
            }

            if circle.intersects(&powerup.body.circle()) {
                match powerup.kind {
                    PowerupKind::Nitrous => vehicle.pickup_nitrous(),
                }

                powerup.body.active = false;
                collected = true;
                debug!("Collected {:?} at {:?}", powerup.kind, powerup.body.position);
            }
        }

        collected
    }

    fn reset(&mut self) {
        for powerup in &mut self.powerups {
            powerup.body.active = true;
        }
    }

    fn len(&self) -> usize {
        self.powerups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::Controllable;
    use crate::vehicle::VehicleTuning;
    use std::sync::Arc;

    fn setup() -> (PowerupManager, Vehicle) {
        let config = WorldConfig { powerup_count: 3, ..Default::default() };
        let manager = PowerupManager::new(&config, &mut Rng::with_seed(5));
        let position = manager.powerups()[0].body.position;
        let vehicle = Vehicle::new(Vec3::new(position.x, 0.0, position.z), Arc::new(VehicleTuning::default()));

        (manager, vehicle)
    }

    #[test]
    fn spawns_within_margin_at_fixed_height() {
        let config = WorldConfig::default();
        let manager = PowerupManager::new(&config, &mut Rng::with_seed(11));

        assert_eq!(manager.len(), 20);
        assert_eq!(manager.active_count(), 20);
        for powerup in manager.powerups() {
            assert_eq!(powerup.body.position.y, 0.4);
            assert!(powerup.body.position.x.abs() <= 90.0 && powerup.body.position.z.abs() <= 90.0);
            assert_eq!(powerup.body.size, Vec3::splat(0.8));
        }
    }

    #[test]
    fn spin_only_while_active() {
        let (mut manager, _) = setup();
        manager.update(0.5);
        assert!((manager.powerups()[0].body.rotation - 1.0).abs() < 1e-6);

        manager.powerups[0].body.active = false;
        manager.update(0.5);
        assert!((manager.powerups()[0].body.rotation - 1.0).abs() < 1e-6);

        for _ in 0..100 {
            manager.update(0.1);
        }
        assert!(manager.powerups()[1].body.rotation < std::f32::consts::TAU);
    }

    #[test]
    fn pickup_needs_empty_tank() {
        let (mut manager, mut vehicle) = setup();

        vehicle.pickup_nitrous();
        assert!(!manager.handle_collisions(&mut vehicle));
        assert_eq!(manager.active_count(), 3);

        vehicle.activate_nitrous();
        assert!(!manager.handle_collisions(&mut vehicle));
        assert_eq!(manager.active_count(), 3);
    }

    #[test]
    fn pickup_collects_one_charge() {
        let (mut manager, mut vehicle) = setup();

        assert!(manager.handle_collisions(&mut vehicle));
        assert!(vehicle.has_nitrous());
        assert!(!manager.powerups()[0].body.active);
        assert_eq!(manager.active_count(), 2);

        manager.reset();
        assert_eq!(manager.active_count(), 3);
    }
}

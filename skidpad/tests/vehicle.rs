use skidpad::fastrand::Rng;
use skidpad::glam::Vec3;
use skidpad::vehicle::Controllable;
use skidpad::vehicle::Vehicle;
use skidpad::vehicle::VehicleState;
use skidpad::vehicle::VehicleTuning;
use std::f32::consts::PI;
use std::f32::consts::TAU;
use std::sync::Arc;

fn vehicle_at(position: Vec3) -> Vehicle {
    Vehicle::new(position, Arc::new(VehicleTuning::default()))
}

/// Drives the car with a random but reproducible sequence of intents and calls `check` after every update.
fn random_drive(seed: u64, steps: usize, mut check: impl FnMut(&Vehicle)) -> Vehicle {
    let mut rng = Rng::with_seed(seed);
    let mut vehicle = vehicle_at(Vec3::ZERO);

    for _ in 0..steps {
        match rng.u8(0..10) {
            0..=3 => vehicle.accelerate_forward(rng.f32() * 2.0),
            4 | 5 => vehicle.accelerate_backward(),
            6 => vehicle.start_drift(),
            7 => vehicle.stop_drift(),
            8 => vehicle.pickup_nitrous(),
            _ => vehicle.activate_nitrous(),
        }

        vehicle.turn(rng.f32() * 4.0 - 2.0);
        vehicle.update(rng.f32() * 0.1 + 0.001);
        check(&vehicle);
    }

    vehicle
}

#[test]
fn rotation_stays_in_range() {
    for seed in 0..8 {
        random_drive(seed, 2000, |vehicle| {
            assert!((0.0..TAU).contains(&vehicle.rotation()), "rotation {} out of range", vehicle.rotation());
        });
    }
}

#[test]
fn velocity_stays_within_limits() {
    for seed in 0..8 {
        random_drive(seed, 2000, |vehicle| {
            let tuning = vehicle.tuning();
            assert!(vehicle.velocity() <= vehicle.current_max_speed() + 1e-4, "velocity {} above limit", vehicle.velocity());
            assert!(vehicle.velocity() >= -tuning.max_reverse_speed - 1e-4, "velocity {} below limit", vehicle.velocity());
        });
    }
}

#[test]
fn drift_angle_is_bounded() {
    for seed in 0..8 {
        random_drive(seed, 2000, |vehicle| {
            assert!(vehicle.drift_angle().abs() <= PI / 3.0 + 1e-6, "drift angle {}", vehicle.drift_angle());
        });
    }
}

#[test]
fn nitrous_is_never_held_while_active() {
    for seed in 0..8 {
        random_drive(seed, 2000, |vehicle| {
            assert!(!(vehicle.is_nitrous_active() && vehicle.has_nitrous()));
            assert!(vehicle.nitrous_time_remaining() >= 0.0);
        });
    }
}

#[test]
fn reset_is_idempotent() {
    let mut vehicle = random_drive(11, 500, |_| {});

    let first = vehicle.reset();
    let position = vehicle.position();
    let rotation = vehicle.rotation();
    let gear = vehicle.current_gear();
    let rpm = vehicle.rpm();

    let second = vehicle.reset();
    assert_eq!(first, second);
    assert_eq!(vehicle.position(), position);
    assert_eq!(vehicle.rotation(), rotation);
    assert_eq!(vehicle.current_gear(), gear);
    assert_eq!(vehicle.rpm(), rpm);
}

#[test]
fn reset_returns_to_spawn() {
    let spawn = Vec3::new(12.5, 0.3, -40.0);
    let mut vehicle = vehicle_at(spawn);

    for _ in 0..120 {
        vehicle.accelerate_forward(1.0);
        vehicle.turn(0.05);
        vehicle.update(1.0 / 60.0);
    }
    assert_ne!(vehicle.position(), spawn);

    let event = vehicle.reset();
    assert_eq!(vehicle.position(), spawn);
    assert_eq!(vehicle.velocity(), 0.0);
    assert_eq!(event.position, spawn);
    assert_eq!(vehicle.current_gear(), 1);
    assert!(!vehicle.is_drifting());
}

#[test]
fn coasting_never_gains_speed() {
    let mut rng = Rng::with_seed(5);

    for _ in 0..500 {
        let mut vehicle = vehicle_at(Vec3::ZERO);
        vehicle.set_velocity(rng.f32() * 160.0 - 80.0);
        if rng.bool() {
            vehicle.start_drift();
        }

        let before = vehicle.velocity().abs();
        vehicle.update(rng.f32() * 0.5 + 0.0001);
        assert!(vehicle.velocity().abs() <= before, "{} grew to {}", before, vehicle.velocity().abs());
    }
}

#[test]
fn short_acceleration_gets_the_car_moving() {
    let mut vehicle = vehicle_at(Vec3::ZERO);
    vehicle.accelerate_forward(1.0);
    for _ in 0..5 {
        vehicle.update(0.1);
    }

    assert!(vehicle.velocity() > 1.0);
}

#[test]
fn set_velocity_is_clamped() {
    let mut vehicle = vehicle_at(Vec3::ZERO);
    vehicle.set_velocity(1000.0);

    assert!(vehicle.velocity() <= vehicle.tuning().max_speed * 1.5);
}

#[test]
fn fresh_vehicle_idles_in_first_gear() {
    let vehicle = vehicle_at(Vec3::ZERO);

    assert_eq!(vehicle.current_gear(), 1);
    assert!((vehicle.rpm() - 1000.0).abs() < 1e-3);
}

#[test]
fn turning_requires_speed() {
    let mut vehicle = vehicle_at(Vec3::ZERO);
    let rotation = vehicle.rotation();
    vehicle.turn(1.0);

    assert!((vehicle.rotation() - rotation).abs() < 1e-6);
}

#[test]
fn nitrous_lifecycle() {
    let mut vehicle = vehicle_at(Vec3::ZERO);

    vehicle.pickup_nitrous();
    assert!(vehicle.has_nitrous());

    vehicle.activate_nitrous();
    assert!(!vehicle.has_nitrous());
    assert!(vehicle.is_nitrous_active());
    assert!(vehicle.nitrous_time_remaining() > 0.0);

    let steps = (vehicle.nitrous_duration() / 0.1) as usize + 2;
    for _ in 0..steps {
        vehicle.update(0.1);
    }
    assert!(!vehicle.is_nitrous_active());
    assert_eq!(vehicle.nitrous_time_remaining(), 0.0);
}

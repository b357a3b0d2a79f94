use crate::vehicle::VehicleState;

#[cfg(feature = "audio")]
pub mod context;

const ENGINE_IDLE_VOLUME: f32 = 0.3;
const ENGINE_MAX_VOLUME: f32 = 0.8;
const ENGINE_PITCH_MIN: f32 = 0.8;
const ENGINE_PITCH_MAX: f32 = 2.0;
const NITROUS_PITCH_MULTIPLIER: f32 = 1.2;
const NITROUS_VOLUME_BOOST: f32 = 0.3;
const MAX_VOLUME: f32 = 1.0;

const DRIFT_MIN_SPEED: f32 = 5.0;
const DRIFT_MIN_VOLUME: f32 = 0.3;
const DRIFT_MAX_VOLUME: f32 = 0.6;
const DRIFT_REFERENCE_SPEED: f32 = 20.0;

/// Target levels for the looping engine and tyre sounds. `drift_volume` is `None` while the screech should be silent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EngineMix {
    pub engine_pitch: f32,
    pub engine_volume: f32,
    pub drift_volume: Option<f32>,
}

/// Maps the vehicle state to sound levels, independent of any audio backend.
#[derive(Copy, Clone, Debug, Default)]
pub struct EngineSound;

impl EngineSound {
    pub fn evaluate(&self, vehicle: &impl VehicleState) -> EngineMix {
        let rpm_range = (vehicle.max_rpm() - vehicle.idle_rpm()).max(f32::EPSILON);
        let rpm_ratio = ((vehicle.rpm() - vehicle.idle_rpm()) / rpm_range).clamp(0.0, 1.0);
        let boosting = vehicle.is_nitrous_active();

        let mut engine_pitch = ENGINE_PITCH_MIN + rpm_ratio * (ENGINE_PITCH_MAX - ENGINE_PITCH_MIN);
        if boosting {
            engine_pitch *= NITROUS_PITCH_MULTIPLIER;
        }

        let gear_factor = match vehicle.current_gear() {
            1 => 0.6,
            2 => 0.75,
            3 => 0.9,
            _ => 1.0,
        };

        let mut engine_volume = (ENGINE_IDLE_VOLUME + rpm_ratio * (ENGINE_MAX_VOLUME - ENGINE_IDLE_VOLUME)) * gear_factor;
        if boosting {
            engine_volume += NITROUS_VOLUME_BOOST;
        }

        let speed = vehicle.velocity().abs();
        let drift_volume = if vehicle.is_drifting() && speed > DRIFT_MIN_SPEED {
            let volume = DRIFT_MIN_VOLUME + (speed / DRIFT_REFERENCE_SPEED) * (DRIFT_MAX_VOLUME - DRIFT_MIN_VOLUME);
            Some(volume.min(DRIFT_MAX_VOLUME))
        } else {
            None
        };

        EngineMix { engine_pitch, engine_volume: engine_volume.min(MAX_VOLUME), drift_volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::Controllable;
    use crate::vehicle::Vehicle;
    use crate::vehicle::VehicleTuning;
    use glam::Vec3;
    use std::sync::Arc;

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-5, "expected {}, got {}", expected, actual);
    }

    fn vehicle() -> Vehicle {
        Vehicle::new(Vec3::ZERO, Arc::new(VehicleTuning::default()))
    }

    #[test]
    fn idle_engine_is_quiet_and_low() {
        let mix = EngineSound.evaluate(&vehicle());

        assert_close(mix.engine_pitch, 0.8);
        assert_close(mix.engine_volume, 0.3 * 0.6);
        assert_eq!(mix.drift_volume, None);
    }

    #[test]
    fn pitch_follows_the_tuned_rev_range() {
        let mut tuning = VehicleTuning::default();
        tuning.gearbox.max_rpm = 9000.0;
        let mut vehicle = Vehicle::new(Vec3::ZERO, Arc::new(tuning));
        vehicle.set_velocity(11.0);
        vehicle.update(0.001);

        let ratio = (vehicle.rpm() - 1000.0) / 8000.0;
        let mix = EngineSound.evaluate(&vehicle);
        assert!(vehicle.rpm() > 8000.0);
        assert_close(mix.engine_pitch, 0.8 + ratio * 1.2);
        assert!(mix.engine_pitch < 2.0);
    }

    #[test]
    fn boost_raises_pitch_and_volume() {
        let mut vehicle = vehicle();
        vehicle.pickup_nitrous();
        vehicle.activate_nitrous();

        let mix = EngineSound.evaluate(&vehicle);
        assert_close(mix.engine_pitch, 0.8 * 1.2);
        assert_close(mix.engine_volume, 0.3 * 0.6 + 0.3);
    }

    #[test]
    fn volume_never_exceeds_unity() {
        let mut vehicle = vehicle();
        vehicle.pickup_nitrous();
        vehicle.activate_nitrous();
        vehicle.set_velocity(47.0);
        for _ in 0..5 {
            vehicle.update(0.001);
        }

        let mix = EngineSound.evaluate(&vehicle);
        assert_eq!(vehicle.current_gear(), 4);
        assert!(mix.engine_volume <= 1.0);
    }

    #[test]
    fn screech_needs_speed() {
        let mut vehicle = vehicle();
        vehicle.start_drift();

        vehicle.set_velocity(4.0);
        assert_eq!(EngineSound.evaluate(&vehicle).drift_volume, None);

        vehicle.set_velocity(10.0);
        assert_close(EngineSound.evaluate(&vehicle).drift_volume.unwrap(), 0.45);

        vehicle.set_velocity(-40.0);
        assert_close(EngineSound.evaluate(&vehicle).drift_volume.unwrap(), 0.6);
    }
}

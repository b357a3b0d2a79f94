use super::gearbox::Gearbox;
use crate::utils::json;
use anyhow::bail;
use anyhow::Result;
use glam::Vec3;
use std::f32::consts;

/// `-ln(0.01)`, rounded the way the shipped friction curve was tuned.
const FRICTION_LOG_RANGE: f32 = 4.6;
const FRICTION_MIN_SPEED_RATIO: f32 = 0.01;

/// Immutable handling table shared by every vehicle built from it. Speeds are in m/s,
/// accelerations in m/s², angles in radians and friction values are per-update multipliers.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleTuning {
    pub max_speed: f32,
    pub max_reverse_speed: f32,
    pub turn_speed: f32,
    pub forward_acceleration: f32,
    pub backward_acceleration: f32,
    pub nitrous_acceleration: f32,
    pub nitrous_max_speed: f32,
    pub nitrous_duration: f32,

    pub friction_coefficient: f32,
    pub min_friction_coefficient: f32,
    pub drift_friction_coefficient: f32,
    pub min_speed_threshold: f32,

    /// Speeds at which the turn rate curve reaches `turn_rate_values`, the last one starts the high speed falloff.
    pub turn_rate_speeds: [f32; 4],
    pub turn_rate_values: [f32; 4],
    pub turn_rate_high_speed_falloff: f32,
    pub turn_rate_high_speed_min: f32,

    pub drift_angle_multiplier: f32,
    pub drift_exit_retention: f32,
    pub drift_decay_rate: f32,
    pub max_drift_angle: f32,

    pub steering_decay: f32,
    pub steering_deadzone: f32,
    pub overspeed_factor: f32,
    pub acceleration_multiplier_range: (f32, f32),

    pub dimensions: Vec3,
    pub initial_rotation: f32,
    pub gearbox: Gearbox,
}

impl VehicleTuning {
    /// Every key is optional, missing ones keep the shipped value.
    pub fn from_json(content: &str) -> Result<Self> {
        let data = json::parse_object(content)?;
        let default = Self::default();
        let (min_multiplier, max_multiplier) = default.acceleration_multiplier_range;

        let gearbox = match json::read_object_nullable(&data, "gearbox")? {
            Some(gearbox) => Gearbox::from_json(gearbox)?,
            None => default.gearbox.clone(),
        };

        let tuning = Self {
            max_speed: json::read_f32_or(&data, "max_speed", default.max_speed)?,
            max_reverse_speed: json::read_f32_or(&data, "max_reverse_speed", default.max_reverse_speed)?,
            turn_speed: json::read_f32_or(&data, "turn_speed", default.turn_speed)?,
            forward_acceleration: json::read_f32_or(&data, "forward_acceleration", default.forward_acceleration)?,
            backward_acceleration: json::read_f32_or(&data, "backward_acceleration", default.backward_acceleration)?,
            nitrous_acceleration: json::read_f32_or(&data, "nitrous_acceleration", default.nitrous_acceleration)?,
            nitrous_max_speed: json::read_f32_or(&data, "nitrous_max_speed", default.nitrous_max_speed)?,
            nitrous_duration: json::read_f32_or(&data, "nitrous_duration", default.nitrous_duration)?,

            friction_coefficient: json::read_f32_or(&data, "friction_coefficient", default.friction_coefficient)?,
            min_friction_coefficient: json::read_f32_or(&data, "min_friction_coefficient", default.min_friction_coefficient)?,
            drift_friction_coefficient: json::read_f32_or(&data, "drift_friction_coefficient", default.drift_friction_coefficient)?,
            min_speed_threshold: json::read_f32_or(&data, "min_speed_threshold", default.min_speed_threshold)?,

            turn_rate_speeds: json::read_f32_array_or(&data, "turn_rate_speeds", default.turn_rate_speeds)?,
            turn_rate_values: json::read_f32_array_or(&data, "turn_rate_values", default.turn_rate_values)?,
            turn_rate_high_speed_falloff: json::read_f32_or(&data, "turn_rate_high_speed_falloff", default.turn_rate_high_speed_falloff)?,
            turn_rate_high_speed_min: json::read_f32_or(&data, "turn_rate_high_speed_min", default.turn_rate_high_speed_min)?,

            drift_angle_multiplier: json::read_f32_or(&data, "drift_angle_multiplier", default.drift_angle_multiplier)?,
            drift_exit_retention: json::read_f32_or(&data, "drift_exit_retention", default.drift_exit_retention)?,
            drift_decay_rate: json::read_f32_or(&data, "drift_decay_rate", default.drift_decay_rate)?,
            max_drift_angle: json::read_f32_or(&data, "max_drift_angle", default.max_drift_angle)?,

            steering_decay: json::read_f32_or(&data, "steering_decay", default.steering_decay)?,
            steering_deadzone: json::read_f32_or(&data, "steering_deadzone", default.steering_deadzone)?,
            overspeed_factor: json::read_f32_or(&data, "overspeed_factor", default.overspeed_factor)?,
            acceleration_multiplier_range: (
                json::read_f32_or(&data, "min_acceleration_multiplier", min_multiplier)?,
                json::read_f32_or(&data, "max_acceleration_multiplier", max_multiplier)?,
            ),

            dimensions: json::read_position_or(&data, "dimensions", default.dimensions)?,
            initial_rotation: json::read_f32_or(&data, "initial_rotation", default.initial_rotation)?,
            gearbox,
        };

        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        let maxima = [
            ("max_speed", self.max_speed),
            ("max_reverse_speed", self.max_reverse_speed),
            ("nitrous_max_speed", self.nitrous_max_speed),
            ("nitrous_duration", self.nitrous_duration),
            ("turn_speed", self.turn_speed),
            ("max_drift_angle", self.max_drift_angle),
            ("overspeed_factor", self.overspeed_factor),
        ];

        for (name, value) in maxima {
            if !value.is_finite() || value <= 0.0 {
                bail!("Invalid {} ({}), expected a positive value", name, value);
            }
        }

        if self.dimensions.min_element() <= 0.0 {
            bail!("Invalid vehicle dimensions {:?}", self.dimensions);
        }

        if !(0.0 < self.min_friction_coefficient && self.min_friction_coefficient <= self.friction_coefficient && self.friction_coefficient <= 1.0) {
            bail!("Invalid friction range ({}, {})", self.min_friction_coefficient, self.friction_coefficient);
        }

        if !(0.0 < self.drift_friction_coefficient && self.drift_friction_coefficient <= 1.0) {
            bail!("Invalid drift friction {}, expected a value in (0, 1]", self.drift_friction_coefficient);
        }

        let ratios = [
            ("drift_decay_rate", self.drift_decay_rate),
            ("drift_exit_retention", self.drift_exit_retention),
            ("steering_decay", self.steering_decay),
        ];

        for (name, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                bail!("Invalid {} ({}), expected a value in [0, 1]", name, value);
            }
        }

        if self.turn_rate_values.windows(2).any(|pair| pair[0] > pair[1]) || !(0.0..=1.0).contains(&self.turn_rate_values[0]) || self.turn_rate_values[3] > 1.0 {
            bail!("Turn rate values must be ascending within [0, 1]");
        }

        if !(0.0..=self.turn_rate_values[3]).contains(&self.turn_rate_high_speed_min) || !(0.0..).contains(&self.turn_rate_high_speed_falloff) {
            bail!("Invalid high speed turn falloff ({}, min {})", self.turn_rate_high_speed_falloff, self.turn_rate_high_speed_min);
        }

        if self.turn_rate_speeds.windows(2).any(|pair| pair[0] >= pair[1]) {
            bail!("Turn rate speeds must be strictly ascending");
        }

        if self.max_speed <= self.turn_rate_speeds[3] {
            bail!("Maximum speed {} must exceed the high speed turn breakpoint {}", self.max_speed, self.turn_rate_speeds[3]);
        }

        let (min_multiplier, max_multiplier) = self.acceleration_multiplier_range;
        if min_multiplier <= 0.0 || max_multiplier < min_multiplier {
            bail!("Invalid acceleration multiplier range ({}, {})", min_multiplier, max_multiplier);
        }

        self.gearbox.validate()
    }

    /// Fraction of `turn_speed` applied at the given speed. Piecewise linear up to the last
    /// breakpoint, then falls off towards `turn_rate_high_speed_min` as the car nears top speed.
    pub fn turn_rate(&self, speed: f32) -> f32 {
        let speed = speed.abs();
        let speeds = &self.turn_rate_speeds;
        let values = &self.turn_rate_values;

        if speed < speeds[0] {
            return 0.0;
        }

        for index in 0..speeds.len() - 1 {
            if speed < speeds[index + 1] {
                let ratio = (speed - speeds[index]) / (speeds[index + 1] - speeds[index]);
                return values[index] + ratio * (values[index + 1] - values[index]);
            }
        }

        let top = values[values.len() - 1];
        let ratio = (speed - speeds[3]) / (self.max_speed - speeds[3]).max(f32::EPSILON);

        (top - ratio * self.turn_rate_high_speed_falloff).clamp(self.turn_rate_high_speed_min, top)
    }

    /// Per-update speed multiplier while gripping. Slow cars lose relatively more speed.
    pub fn friction(&self, speed: f32) -> f32 {
        let ratio = (speed.abs() / self.max_speed).clamp(FRICTION_MIN_SPEED_RATIO, 1.0);
        let range = self.friction_coefficient - self.min_friction_coefficient;
        let friction = self.min_friction_coefficient + ((ratio.ln() + FRICTION_LOG_RANGE) / FRICTION_LOG_RANGE) * range;

        friction.clamp(self.min_friction_coefficient, self.friction_coefficient)
    }
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 55.56,
            max_reverse_speed: 13.9,
            turn_speed: 1.5,
            forward_acceleration: 8.0,
            backward_acceleration: -4.0,
            nitrous_acceleration: 14.0,
            nitrous_max_speed: 69.44,
            nitrous_duration: 5.0,

            friction_coefficient: 0.9985,
            min_friction_coefficient: 0.994,
            drift_friction_coefficient: 0.992,
            min_speed_threshold: 0.1,

            turn_rate_speeds: [0.1, 0.3, 3.0, 15.0],
            turn_rate_values: [0.05, 0.15, 0.5, 1.0],
            turn_rate_high_speed_falloff: 0.4,
            turn_rate_high_speed_min: 0.6,

            drift_angle_multiplier: 1.2,
            drift_exit_retention: 0.5,
            drift_decay_rate: 0.95,
            max_drift_angle: consts::FRAC_PI_3,

            steering_decay: 0.85,
            steering_deadzone: 0.01,
            overspeed_factor: 1.5,
            acceleration_multiplier_range: (0.1, 5.0),

            dimensions: Vec3::new(1.0, 0.5, 2.0),
            initial_rotation: consts::PI,
            gearbox: Gearbox::default(),
        }
    }
}

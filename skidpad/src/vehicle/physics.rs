use super::gearbox::FIRST_GEAR;
use super::Controllable;
use super::ResetEvent;
use super::VehicleState;
use super::VehicleTuning;
use crate::utils::math::heading_to_direction;
use crate::utils::math::F32MathUtils;
use glam::Vec3;
use std::sync::Arc;

/// Kinematic arcade car. Intents are stored and applied by the next [`Vehicle::update`].
#[derive(Clone, Debug)]
pub struct Vehicle {
    tuning: Arc<VehicleTuning>,

    position: Vec3,
    initial_position: Vec3,
    rotation: f32,
    initial_rotation: f32,

    velocity: f32,
    acceleration: f32,
    steering_input: f32,

    drifting: bool,
    drift_angle: f32,

    has_nitrous: bool,
    nitrous_active: bool,
    nitrous_time_remaining: f32,

    gear: u8,
    rpm: f32,

    scale: f32,
    size: Vec3,
    acceleration_multiplier: f32,
}

impl Vehicle {
    pub fn new(position: Vec3, tuning: Arc<VehicleTuning>) -> Self {
        let rotation = tuning.initial_rotation.wrap_angle();

        Self {
            position,
            initial_position: position,
            rotation,
            initial_rotation: rotation,

            velocity: 0.0,
            acceleration: 0.0,
            steering_input: 0.0,

            drifting: false,
            drift_angle: 0.0,

            has_nitrous: false,
            nitrous_active: false,
            nitrous_time_remaining: 0.0,

            gear: FIRST_GEAR,
            rpm: tuning.gearbox.idle_rpm,

            scale: 1.0,
            size: tuning.dimensions,
            acceleration_multiplier: 1.0,

            tuning,
        }
    }

    pub fn tuning(&self) -> &VehicleTuning {
        &self.tuning
    }

    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    pub fn acceleration_multiplier(&self) -> f32 {
        self.acceleration_multiplier
    }

    /// Top speed right now, raised while the boost is running.
    pub fn current_max_speed(&self) -> f32 {
        if self.nitrous_active {
            self.tuning.nitrous_max_speed
        } else {
            self.tuning.max_speed
        }
    }

    pub fn turn_rate(&self) -> f32 {
        self.tuning.turn_rate(self.velocity)
    }

    pub fn update(&mut self, delta: f32) {
        self.update_nitrous(delta);
        self.gear = self.tuning.gearbox.shift(self.gear, self.velocity);
        self.update_velocity(delta);
        self.rpm = self.tuning.gearbox.rpm(self.gear, self.velocity, self.rpm);

        if self.drifting {
            self.drift_angle *= self.tuning.drift_decay_rate;
        }

        self.update_position(delta);
        self.decay_transients();
    }

    /// Stores a charge for later. Ignored while a boost is running, a charge can't be held and burnt at once.
    pub fn pickup_nitrous(&mut self) {
        if !self.nitrous_active {
            self.has_nitrous = true;
        }
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        let limit = self.tuning.max_speed * self.tuning.overspeed_factor;
        self.velocity = if velocity.is_nan() { 0.0 } else { velocity.clamp(-limit, limit) };
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        self.size = self.tuning.dimensions * self.scale;
    }

    pub fn set_acceleration_multiplier(&mut self, multiplier: f32) {
        let (min, max) = self.tuning.acceleration_multiplier_range;
        self.acceleration_multiplier = if multiplier.is_nan() { 1.0f32.clamp(min, max) } else { multiplier.clamp(min, max) };
    }

    /// Puts the car back on its spawn point. Scale and the acceleration multiplier are user settings and survive.
    pub fn reset(&mut self) -> ResetEvent {
        self.position = self.initial_position;
        self.rotation = self.initial_rotation;

        self.velocity = 0.0;
        self.acceleration = 0.0;
        self.steering_input = 0.0;
        self.drifting = false;
        self.drift_angle = 0.0;
        self.has_nitrous = false;
        self.nitrous_active = false;
        self.nitrous_time_remaining = 0.0;
        self.gear = FIRST_GEAR;
        self.rpm = self.tuning.gearbox.idle_rpm;

        ResetEvent { position: self.position, rotation: self.rotation }
    }

    fn update_nitrous(&mut self, delta: f32) {
        if !self.nitrous_active {
            return;
        }

        self.nitrous_time_remaining -= delta;
        if self.nitrous_time_remaining <= 0.0 {
            self.nitrous_active = false;
            self.nitrous_time_remaining = 0.0;
        }
    }

    fn update_velocity(&mut self, delta: f32) {
        self.velocity += self.acceleration * delta;

        let friction = if self.drifting { self.tuning.drift_friction_coefficient } else { self.tuning.friction(self.velocity) };
        self.velocity *= friction;
        self.velocity = self.velocity.clamp(-self.tuning.max_reverse_speed, self.current_max_speed());
    }

    fn update_position(&mut self, delta: f32) {
        let heading = if self.drifting { self.rotation - self.drift_angle } else { self.rotation };
        let offset = heading_to_direction(heading) * self.velocity * delta;

        self.position.x += offset.x;
        self.position.z += offset.y;
    }

    fn decay_transients(&mut self) {
        self.acceleration = 0.0;

        self.steering_input *= self.tuning.steering_decay;
        if self.steering_input.abs() < self.tuning.steering_deadzone {
            self.steering_input = 0.0;
        }
    }
}

impl Controllable for Vehicle {
    fn accelerate_forward(&mut self, multiplier: f32) {
        let base = if self.nitrous_active { self.tuning.nitrous_acceleration } else { self.tuning.forward_acceleration };
        let gear_multiplier = self.tuning.gearbox.acceleration_multiplier(self.gear);

        self.acceleration = base * gear_multiplier * multiplier * self.acceleration_multiplier;
    }

    fn accelerate_backward(&mut self) {
        self.acceleration = self.tuning.backward_acceleration;
    }

    fn turn(&mut self, amount: f32) {
        if !amount.is_finite() {
            return;
        }

        self.steering_input = amount.clamp(-1.0, 1.0);

        let direction = if self.velocity >= 0.0 { 1.0 } else { -1.0 };
        let steer = amount * self.tuning.turn_speed * self.turn_rate() * direction;
        self.rotation = (self.rotation + steer).wrap_angle();

        if self.drifting {
            let max_angle = self.tuning.max_drift_angle;
            self.drift_angle = (self.drift_angle + steer * self.tuning.drift_angle_multiplier).clamp(-max_angle, max_angle);
        }
    }

    fn start_drift(&mut self) {
        self.drifting = true;
    }

    fn stop_drift(&mut self) {
        self.drifting = false;
        self.drift_angle *= self.tuning.drift_exit_retention;
    }

    fn activate_nitrous(&mut self) {
        if self.has_nitrous && !self.nitrous_active {
            self.nitrous_active = true;
            self.nitrous_time_remaining = self.tuning.nitrous_duration;
            self.has_nitrous = false;
        }
    }
}

impl VehicleState for Vehicle {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn velocity(&self) -> f32 {
        self.velocity
    }

    fn steering_input(&self) -> f32 {
        self.steering_input
    }

    fn is_drifting(&self) -> bool {
        self.drifting
    }

    fn drift_angle(&self) -> f32 {
        self.drift_angle
    }

    fn has_nitrous(&self) -> bool {
        self.has_nitrous
    }

    fn is_nitrous_active(&self) -> bool {
        self.nitrous_active
    }

    fn nitrous_time_remaining(&self) -> f32 {
        self.nitrous_time_remaining
    }

    fn nitrous_duration(&self) -> f32 {
        self.tuning.nitrous_duration
    }

    fn current_gear(&self) -> u8 {
        self.gear
    }

    fn rpm(&self) -> f32 {
        self.rpm
    }

    fn idle_rpm(&self) -> f32 {
        self.tuning.gearbox.idle_rpm
    }

    fn max_rpm(&self) -> f32 {
        self.tuning.gearbox.max_rpm
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn size(&self) -> Vec3 {
        self.size
    }

    fn max_speed(&self) -> f32 {
        self.tuning.max_speed
    }
}

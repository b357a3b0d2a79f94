use glam::Vec3;

pub mod gearbox;
pub mod physics;
pub mod tuning;

pub use physics::Vehicle;
pub use tuning::VehicleTuning;

/// Read-only view used by the camera, audio and HUD once the frame's update is done.
pub trait VehicleState {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> f32;
    fn velocity(&self) -> f32;
    fn steering_input(&self) -> f32;
    fn is_drifting(&self) -> bool;
    fn drift_angle(&self) -> f32;
    fn has_nitrous(&self) -> bool;
    fn is_nitrous_active(&self) -> bool;
    fn nitrous_time_remaining(&self) -> f32;
    fn nitrous_duration(&self) -> f32;
    fn current_gear(&self) -> u8;
    fn rpm(&self) -> f32;
    fn idle_rpm(&self) -> f32;
    fn max_rpm(&self) -> f32;
    fn scale(&self) -> f32;
    fn size(&self) -> Vec3;
    fn max_speed(&self) -> f32;
}

/// Driver intents. Accelerations only last until the next update, so they have to be issued every frame.
pub trait Controllable {
    fn accelerate_forward(&mut self, multiplier: f32);
    fn accelerate_backward(&mut self);
    fn turn(&mut self, amount: f32);
    fn start_drift(&mut self);
    fn stop_drift(&mut self);
    fn activate_nitrous(&mut self);
}

/// Emitted by [`Vehicle::reset`], the owner decides what else has to be restored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResetEvent {
    pub position: Vec3,
    pub rotation: f32,
}

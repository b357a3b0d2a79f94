use crate::utils::math::F32MathUtils;
use crate::utils::math::Vec3MathUtils;
use crate::vehicle::VehicleState;
use glam::Mat4;
use glam::Vec3;
use std::f32::consts;
use std::str::FromStr;

const FOLLOW_DISTANCE: f32 = 8.0;
const FOLLOW_HEIGHT: f32 = 4.0;
const FOLLOW_LERP: f32 = 0.2;
const FOLLOW_LERP_SPEED_BONUS: f32 = 0.12;
const FOLLOW_LERP_MAX_SPEED: f32 = 30.0;
const LOOK_AT_LERP_MULTIPLIER: f32 = 1.15;
const YAW_LERP: f32 = 0.1;

const INTERIOR_FORWARD_OFFSET: f32 = -0.2;
const INTERIOR_HEIGHT: f32 = 1.05;
const INTERIOR_SIDE_OFFSET: f32 = -0.3;
const INTERIOR_LOOK_DISTANCE: f32 = 10.0;

const DRIFT_ANGLE_THRESHOLD: f32 = 0.2;
const DRIFT_ANGLE_NORMALIZATION: f32 = 1.0;
const DRIFT_SIDE_OFFSET_MAX: f32 = 1.5;
const DRIFT_OFFSET_LERP: f32 = 0.12;

const FOV_MIN: f32 = 75.0;
const FOV_MAX: f32 = 95.0;
const FOV_NITROUS_BOOST: f32 = 10.0;
const FOV_LERP: f32 = 0.08;
const FOV_MAX_SPEED: f32 = 30.0;
const FOV_INTERIOR_FACTOR: f32 = 0.5;
const FOV_INTERIOR_NITROUS_FACTOR: f32 = 0.5;
const FOV_INTERIOR_LERP_MULTIPLIER: f32 = 0.6;
const FOV_NITROUS_LERP_MULTIPLIER: f32 = 0.25;

const MINIMAP_HEIGHT: f32 = 50.0;
const MINIMAP_VIEW_SIZE: f32 = 15.0;
const MINIMAP_SCALE_MULTIPLIER: f32 = 1.5;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Follow,
    Interior,
}

/// Top-down orthographic view centred on the car.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Minimap {
    pub position: Vec3,
    pub half_size: f32,
}

/// Chase and cockpit cameras driven by the vehicle state after each update.
#[derive(Clone, Debug)]
pub struct CameraRig {
    pub mode: CameraMode,
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov: f32,
    pub minimap: Minimap,

    drift_offset: f32,
    yaw_offset: f32,
    target_yaw_offset: f32,
}

impl CameraMode {
    pub fn toggle(self) -> Self {
        match self {
            CameraMode::Follow => CameraMode::Interior,
            CameraMode::Interior => CameraMode::Follow,
        }
    }
}

impl FromStr for CameraMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "follow" => Ok(CameraMode::Follow),
            "interior" => Ok(CameraMode::Interior),
            _ => Err(format!("Unknown camera mode {}", value)),
        }
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraMode::Follow => write!(f, "follow"),
            CameraMode::Interior => write!(f, "interior"),
        }
    }
}

impl Minimap {
    pub fn view_matrix(&self) -> Mat4 {
        let target = Vec3::new(self.position.x, 0.0, self.position.z);
        Mat4::look_at_rh(self.position, target, Vec3::NEG_Z)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(-self.half_size, self.half_size, -self.half_size, self.half_size, NEAR_PLANE, FAR_PLANE)
    }
}

impl CameraRig {
    pub fn new(mode: CameraMode) -> Self {
        Self {
            mode,
            position: Vec3::new(0.0, FOLLOW_HEIGHT, 0.0),
            look_at: Vec3::ZERO,
            fov: FOV_MIN,
            minimap: Minimap { position: Vec3::new(0.0, MINIMAP_HEIGHT, 0.0), half_size: MINIMAP_VIEW_SIZE },

            drift_offset: 0.0,
            yaw_offset: 0.0,
            target_yaw_offset: 0.0,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    /// Called when the vehicle reports a reset, the chase view is always restored.
    pub fn reset(&mut self) {
        self.mode = CameraMode::Follow;
        self.drift_offset = 0.0;
    }

    pub fn adjust_yaw(&mut self, delta: f32) {
        self.target_yaw_offset += delta;
    }

    pub fn drift_offset(&self) -> f32 {
        self.drift_offset
    }

    pub fn update(&mut self, vehicle: &impl VehicleState) {
        self.update_position(vehicle);
        self.update_minimap(vehicle);
        self.update_fov(vehicle);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
    }

    fn update_position(&mut self, vehicle: &impl VehicleState) {
        self.yaw_offset = self.yaw_offset.lerp_towards(self.target_yaw_offset, YAW_LERP);

        let target = vehicle.position();
        let rotation = vehicle.rotation();
        let scale = vehicle.scale();
        let side_angle = rotation + consts::FRAC_PI_2;

        if self.mode == CameraMode::Interior {
            let forward = INTERIOR_FORWARD_OFFSET * scale;
            let side = INTERIOR_SIDE_OFFSET * scale;
            let look_distance = INTERIOR_LOOK_DISTANCE * scale;
            let height = INTERIOR_HEIGHT * scale;
            let look_angle = rotation + self.yaw_offset;

            self.position = target
                + Vec3::new(rotation.sin() * forward + side_angle.sin() * side, height, rotation.cos() * forward + side_angle.cos() * side);
            self.look_at = target + Vec3::new(look_angle.sin() * look_distance, height, look_angle.cos() * look_distance);
            self.drift_offset = 0.0;
            return;
        }

        let drift_angle = vehicle.drift_angle();
        let mut target_drift_offset = 0.0;
        if drift_angle.abs() > DRIFT_ANGLE_THRESHOLD {
            let intensity = (drift_angle.abs() / DRIFT_ANGLE_NORMALIZATION).min(1.0);
            target_drift_offset = intensity * DRIFT_SIDE_OFFSET_MAX * scale * drift_angle.signum();
        }
        self.drift_offset = self.drift_offset.lerp_towards(target_drift_offset, DRIFT_OFFSET_LERP);

        let distance = FOLLOW_DISTANCE * scale;
        let heading = rotation + self.yaw_offset;
        let desired = Vec3::new(
            target.x - heading.sin() * distance + side_angle.sin() * self.drift_offset,
            target.y + FOLLOW_HEIGHT * scale,
            target.z - heading.cos() * distance + side_angle.cos() * self.drift_offset,
        );

        let speed_factor = (vehicle.velocity().abs() / FOLLOW_LERP_MAX_SPEED).min(1.0);
        let lerp = FOLLOW_LERP + speed_factor * FOLLOW_LERP_SPEED_BONUS;

        self.position = self.position.lerp_towards(desired, lerp);
        self.look_at = self.look_at.lerp_towards(target, lerp * LOOK_AT_LERP_MULTIPLIER);
    }

    fn update_minimap(&mut self, vehicle: &impl VehicleState) {
        let ground = vehicle.position().ground();

        self.minimap.position = Vec3::new(ground.x, MINIMAP_HEIGHT, ground.y);
        self.minimap.half_size = MINIMAP_VIEW_SIZE * (1.0 + (vehicle.scale() - 1.0) * MINIMAP_SCALE_MULTIPLIER);
    }

    /// Reversing never narrows the view below its resting angle.
    fn update_fov(&mut self, vehicle: &impl VehicleState) {
        let speed_ratio = (vehicle.velocity().min(FOV_MAX_SPEED) / FOV_MAX_SPEED).max(0.0);
        let boosting = vehicle.is_nitrous_active();
        let range = FOV_MAX - FOV_MIN;

        let (target, mut lerp) = match self.mode {
            CameraMode::Follow => {
                let boost = if boosting { FOV_NITROUS_BOOST } else { 0.0 };
                (FOV_MIN + speed_ratio * range + boost, FOV_LERP)
            }
            CameraMode::Interior => {
                let boost = if boosting { FOV_NITROUS_BOOST * FOV_INTERIOR_NITROUS_FACTOR } else { 0.0 };
                (FOV_MIN + speed_ratio * range * FOV_INTERIOR_FACTOR + boost, FOV_LERP * FOV_INTERIOR_LERP_MULTIPLIER)
            }
        };

        if boosting {
            lerp *= FOV_NITROUS_LERP_MULTIPLIER;
        }

        self.fov = self.fov.lerp_towards(target, lerp);
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(CameraMode::Follow)
    }
}

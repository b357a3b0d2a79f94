use crate::utils::json;
use crate::utils::json::JsonObject;
use anyhow::bail;
use anyhow::Result;

pub const GEAR_COUNT: usize = 5;
pub const REVERSE_GEAR: u8 = 0;
pub const FIRST_GEAR: u8 = 1;

/// Automatic five speed gearbox. Each forward gear `n` owns the speed band
/// `[speeds[n - 1], speeds[n])` and a torque multiplier used when accelerating.
#[derive(Clone, Debug, PartialEq)]
pub struct Gearbox {
    pub speeds: [f32; GEAR_COUNT + 1],
    pub acceleration_multipliers: [f32; GEAR_COUNT],
    pub idle_rpm: f32,
    pub shift_down_rpm: f32,
    pub max_rpm: f32,
    pub idle_speed: f32,
}

impl Gearbox {
    pub fn from_json(data: &JsonObject) -> Result<Self> {
        let default = Self::default();
        let gearbox = Self {
            speeds: json::read_f32_array_or(data, "speeds", default.speeds)?,
            acceleration_multipliers: json::read_f32_array_or(data, "acceleration_multipliers", default.acceleration_multipliers)?,
            idle_rpm: json::read_f32_or(data, "idle_rpm", default.idle_rpm)?,
            shift_down_rpm: json::read_f32_or(data, "shift_down_rpm", default.shift_down_rpm)?,
            max_rpm: json::read_f32_or(data, "max_rpm", default.max_rpm)?,
            idle_speed: json::read_f32_or(data, "idle_speed", default.idle_speed)?,
        };

        gearbox.validate()?;
        Ok(gearbox)
    }

    pub fn validate(&self) -> Result<()> {
        if self.speeds.windows(2).any(|pair| pair[0] >= pair[1]) {
            bail!("Gear speeds must be strictly ascending");
        }

        if self.acceleration_multipliers.iter().any(|multiplier| *multiplier <= 0.0) {
            bail!("Gear acceleration multipliers must be positive");
        }

        if self.idle_rpm <= 0.0 || self.shift_down_rpm < self.idle_rpm || self.max_rpm <= self.shift_down_rpm {
            bail!("Invalid RPM range (idle {}, shift down {}, max {})", self.idle_rpm, self.shift_down_rpm, self.max_rpm);
        }

        Ok(())
    }

    /// Evaluates one step of the shift state machine. Reverse is entered immediately
    /// whenever the car rolls backwards and a crawl always drops back to first gear,
    /// otherwise at most one gear is changed per call.
    pub fn shift(&self, gear: u8, velocity: f32) -> u8 {
        if velocity < 0.0 {
            return REVERSE_GEAR;
        }

        let speed = velocity.abs();
        if speed < self.idle_speed {
            return FIRST_GEAR;
        }

        let gear = gear.clamp(FIRST_GEAR, GEAR_COUNT as u8);
        let index = gear as usize;

        if index < GEAR_COUNT && speed >= self.speeds[index] {
            gear + 1
        } else if gear > FIRST_GEAR && speed < self.speeds[index - 1] {
            gear - 1
        } else {
            gear
        }
    }

    pub fn acceleration_multiplier(&self, gear: u8) -> f32 {
        match gear as usize {
            index @ 1..=GEAR_COUNT => self.acceleration_multipliers[index - 1],
            _ => 1.0,
        }
    }

    pub fn band(&self, gear: u8) -> Option<(f32, f32)> {
        match gear as usize {
            index @ 1..=GEAR_COUNT => Some((self.speeds[index - 1], self.speeds[index])),
            _ => None,
        }
    }

    /// Engine speed for the given gear. Reverse keeps the previous reading,
    /// which is why the caller passes it in.
    pub fn rpm(&self, gear: u8, velocity: f32, previous: f32) -> f32 {
        let speed = velocity.abs();
        if speed < self.idle_speed {
            return self.idle_rpm;
        }

        match self.band(gear) {
            Some((min, max)) => {
                let ratio = ((speed - min) / (max - min).max(f32::EPSILON)).clamp(0.0, 1.0);
                self.shift_down_rpm + ratio * (self.max_rpm - self.shift_down_rpm)
            }
            None => previous,
        }
    }
}

impl Default for Gearbox {
    fn default() -> Self {
        Self {
            speeds: [0.0, 12.0, 22.0, 35.0, 48.0, 70.0],
            acceleration_multipliers: [1.5, 1.2, 1.0, 0.8, 0.6],
            idle_rpm: 1000.0,
            shift_down_rpm: 2500.0,
            max_rpm: 7000.0,
            idle_speed: 0.1,
        }
    }
}

use self::gauge::Gauge;
use self::telemetry::TelemetryWindow;
use self::theme::HudTheme;
use crate::utils::color::Vec4Color;
use crate::vehicle::VehicleState;
use egui::Align2;
use egui::Area;
use egui::Context;
use egui::Sense;
use egui::Shape;
use egui::Stroke;
use egui::Ui;
use std::f32::consts::PI;

pub mod context;
pub mod gauge;
pub mod telemetry;
pub mod theme;

pub const SMOOTHING_ALPHA: f32 = 0.18;
pub const MAX_DISPLAY_SPEED_KMH: f32 = 150.0;
pub const MS_TO_KMH: f32 = 3.6;

const GAUGE_RADIUS: f32 = 90.0;
const NITROUS_RADIUS: f32 = 18.0;
/// Fraction of the engine's top RPM where the dial turns red.
const REDLINE_RATIO: f32 = 6.0 / 7.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NitrousIndicator {
    /// Boost running, with the fraction of its duration still left.
    Boost(f32),
    Ready,
    Empty,
}

/// Raw, unsmoothed values shown by the instrument cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct HudReadout {
    pub speed_kmh: f32,
    pub speed_ratio: f32,
    pub rpm: f32,
    pub rpm_ratio: f32,
    pub gear: String,
    pub nitrous: NitrousIndicator,
}

impl HudReadout {
    pub fn from_vehicle(vehicle: &impl VehicleState) -> Self {
        let speed_kmh = vehicle.velocity().abs() * MS_TO_KMH;
        let rpm = vehicle.rpm();

        let nitrous = if vehicle.is_nitrous_active() {
            let duration = vehicle.nitrous_duration();
            let ratio = if duration > 0.0 { vehicle.nitrous_time_remaining() / duration } else { 0.0 };
            NitrousIndicator::Boost(ratio.clamp(0.0, 1.0))
        } else if vehicle.has_nitrous() {
            NitrousIndicator::Ready
        } else {
            NitrousIndicator::Empty
        };

        Self {
            speed_kmh,
            speed_ratio: (speed_kmh / MAX_DISPLAY_SPEED_KMH).clamp(0.0, 1.0),
            rpm,
            rpm_ratio: (rpm / vehicle.max_rpm().max(f32::EPSILON)).clamp(0.0, 1.0),
            gear: gear_label(vehicle.current_gear()),
            nitrous,
        }
    }
}

impl Default for HudReadout {
    fn default() -> Self {
        Self { speed_kmh: 0.0, speed_ratio: 0.0, rpm: 0.0, rpm_ratio: 0.0, gear: gear_label(1), nitrous: NitrousIndicator::Empty }
    }
}

pub struct Hud {
    pub theme: HudTheme,
    pub telemetry: TelemetryWindow,

    readout: HudReadout,
    speed_needle: f32,
    rpm_needle: f32,
}

impl Hud {
    pub fn new(theme: HudTheme) -> Self {
        Self { theme, telemetry: TelemetryWindow::default(), readout: HudReadout::default(), speed_needle: 0.0, rpm_needle: 0.0 }
    }

    pub fn update(&mut self, delta: f32, vehicle: &impl VehicleState) {
        self.readout = HudReadout::from_vehicle(vehicle);
        self.speed_needle += (self.readout.speed_ratio - self.speed_needle) * SMOOTHING_ALPHA;
        self.rpm_needle += (self.readout.rpm_ratio - self.rpm_needle) * SMOOTHING_ALPHA;

        self.telemetry.push(delta, self.readout.speed_kmh, self.readout.rpm);
    }

    pub fn reset(&mut self) {
        self.readout = HudReadout::default();
        self.speed_needle = 0.0;
        self.rpm_needle = 0.0;
        self.telemetry.clear();
    }

    pub fn toggle_telemetry(&mut self) {
        self.telemetry.visible = !self.telemetry.visible;
    }

    pub fn readout(&self) -> &HudReadout {
        &self.readout
    }

    pub fn speed_needle(&self) -> f32 {
        self.speed_needle
    }

    pub fn rpm_needle(&self) -> f32 {
        self.rpm_needle
    }

    pub fn show(&self, context: &Context) {
        Area::new("Instruments").anchor(Align2::RIGHT_BOTTOM, egui::vec2(-20.0, -20.0)).interactable(false).show(context, |ui| {
            ui.horizontal(|ui| {
                ui.add(Gauge::new(&self.theme, self.rpm_needle).radius(GAUGE_RADIUS).ticks(14).redline(REDLINE_RATIO).badge(&self.readout.gear).value(
                    format!("{:.0}", self.readout.rpm),
                    "rpm",
                ));
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    self.nitrous_indicator(ui);
                    ui.add(Gauge::new(&self.theme, self.speed_needle).radius(GAUGE_RADIUS).ticks(15).value(format!("{:.0}", self.readout.speed_kmh), "km/h"));
                });
            });
        });

        self.telemetry.show(context, &self.theme);
    }

    fn nitrous_indicator(&self, ui: &mut Ui) {
        let (rect, _) = ui.allocate_exact_size(egui::Vec2::splat(NITROUS_RADIUS * 2.0 + 6.0), Sense::hover());
        let painter = ui.painter();
        let center = rect.center();

        painter.circle_filled(center, NITROUS_RADIUS, self.theme.background.to_color32());

        match self.readout.nitrous {
            NitrousIndicator::Boost(ratio) => {
                let segments = 32;
                let points = (0..=segments)
                    .map(|i| {
                        let angle = -PI / 2.0 + 2.0 * PI * ratio * i as f32 / segments as f32;
                        center + egui::vec2(angle.cos(), angle.sin()) * (NITROUS_RADIUS - 4.0)
                    })
                    .collect::<Vec<_>>();
                painter.add(Shape::line(points, Stroke::new(4.0, self.theme.nitrous.to_color32())));
            }
            NitrousIndicator::Ready => {
                painter.circle_filled(center, NITROUS_RADIUS - 5.0, self.theme.nitrous.to_color32());
            }
            NitrousIndicator::Empty => {
                painter.circle_stroke(center, NITROUS_RADIUS - 4.0, Stroke::new(1.5, self.theme.nitrous_empty.to_color32()));
            }
        }
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new(HudTheme::default())
    }
}

pub fn gear_label(gear: u8) -> String {
    match gear {
        0 => "R".to_string(),
        gear => gear.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::context::UiContext;
    use crate::vehicle::Controllable;
    use crate::vehicle::Vehicle;
    use crate::vehicle::VehicleTuning;
    use glam::Vec3;
    use std::sync::Arc;

    fn vehicle() -> Vehicle {
        Vehicle::new(Vec3::ZERO, Arc::new(VehicleTuning::default()))
    }

    #[test]
    fn readout_converts_units() {
        let mut vehicle = vehicle();
        vehicle.set_velocity(-10.0);

        let readout = HudReadout::from_vehicle(&vehicle);
        assert!((readout.speed_kmh - 36.0).abs() < 1e-4);
        assert!((readout.speed_ratio - 0.24).abs() < 1e-4);
        assert_eq!(readout.nitrous, NitrousIndicator::Empty);
    }

    #[test]
    fn rpm_dial_spans_the_tuned_rev_range() {
        let mut tuning = VehicleTuning::default();
        tuning.gearbox.max_rpm = 9000.0;
        let mut vehicle = Vehicle::new(Vec3::ZERO, Arc::new(tuning));
        vehicle.set_velocity(11.0);
        vehicle.update(0.001);

        let readout = HudReadout::from_vehicle(&vehicle);
        assert!(readout.rpm > 8000.0);
        assert!((readout.rpm_ratio - readout.rpm / 9000.0).abs() < 1e-6);
        assert!(readout.rpm_ratio < 1.0);
    }

    #[test]
    fn reverse_gear_is_labelled_r() {
        assert_eq!(gear_label(0), "R");
        assert_eq!(gear_label(3), "3");
    }

    #[test]
    fn nitrous_indicator_follows_lifecycle() {
        let mut vehicle = vehicle();
        vehicle.pickup_nitrous();
        assert_eq!(HudReadout::from_vehicle(&vehicle).nitrous, NitrousIndicator::Ready);

        vehicle.activate_nitrous();
        assert_eq!(HudReadout::from_vehicle(&vehicle).nitrous, NitrousIndicator::Boost(1.0));
    }

    #[test]
    fn needles_approach_target_gradually() {
        let mut vehicle = vehicle();
        vehicle.set_velocity(150.0 / 3.6);
        let mut hud = Hud::default();

        hud.update(0.1, &vehicle);
        assert!((hud.speed_needle() - 0.18).abs() < 1e-4);

        for _ in 0..100 {
            hud.update(0.1, &vehicle);
        }
        assert!((hud.speed_needle() - 1.0).abs() < 1e-3);
        assert_eq!(hud.telemetry.len(), 101);

        hud.reset();
        assert_eq!(hud.speed_needle(), 0.0);
        assert!(hud.telemetry.is_empty());
    }

    #[test]
    fn cluster_renders_headless() {
        let mut ui = UiContext::default();
        let mut hud = Hud::default();
        hud.toggle_telemetry();
        hud.update(0.1, &vehicle());

        let input = ui.get_input();
        let output = ui.run(input, |context| hud.show(context));
        assert!(!output.shapes.is_empty());
    }
}

use super::theme::HudTheme;
use crate::utils::color::Vec4Color;
use egui::Align2;
use egui::FontId;
use egui::Pos2;
use egui::Response;
use egui::Sense;
use egui::Shape;
use egui::Stroke;
use egui::Ui;
use egui::Vec2;
use egui::Widget;
use std::f32::consts::PI;

pub const START_ANGLE: f32 = -2.0 * PI / 3.0;
pub const SWEEP_ANGLE: f32 = 4.0 * PI / 3.0;

const ARC_SEGMENTS: usize = 48;

/// Round dial with a needle, major ticks and an optional red zone at the top of the scale.
pub struct Gauge<'a> {
    theme: &'a HudTheme,
    ratio: f32,
    radius: f32,
    ticks: usize,
    redline: Option<f32>,
    value: String,
    unit: String,
    badge: Option<String>,
}

impl<'a> Gauge<'a> {
    pub fn new(theme: &'a HudTheme, ratio: f32) -> Self {
        Self { theme, ratio, radius: 80.0, ticks: 10, redline: None, value: String::new(), unit: String::new(), badge: None }
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn ticks(mut self, ticks: usize) -> Self {
        self.ticks = ticks.max(1);
        self
    }

    pub fn redline(mut self, from_ratio: f32) -> Self {
        self.redline = Some(from_ratio.clamp(0.0, 1.0));
        self
    }

    pub fn value(mut self, value: impl Into<String>, unit: impl Into<String>) -> Self {
        self.value = value.into();
        self.unit = unit.into();
        self
    }

    /// Small circle in the upper half of the dial, used for the gear indicator.
    pub fn badge(mut self, text: impl Into<String>) -> Self {
        self.badge = Some(text.into());
        self
    }
}

impl<'a> Widget for Gauge<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(Vec2::splat(self.radius * 2.0), Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let center = rect.center();
            let radius = self.radius;

            painter.circle_filled(center, radius, self.theme.background.to_color32());
            painter.add(Shape::line(arc_points(center, radius * 0.92, 0.0, 1.0), Stroke::new(3.0, self.theme.rim.to_color32())));

            if let Some(redline) = self.redline {
                painter.add(Shape::line(arc_points(center, radius * 0.86, redline, 1.0), Stroke::new(5.0, self.theme.redline.to_color32())));
            }

            for tick in 0..=self.ticks {
                let ratio = tick as f32 / self.ticks as f32;
                let major = tick % 2 == 0;
                let inner = if major { 0.74 } else { 0.8 };
                let color = match self.redline {
                    Some(redline) if ratio >= redline => self.theme.redline,
                    _ => self.theme.tick,
                };

                painter.line_segment(
                    [dial_point(center, radius * inner, ratio), dial_point(center, radius * 0.88, ratio)],
                    Stroke::new(if major { 2.0 } else { 1.0 }, color.to_color32()),
                );
            }

            if let Some(badge) = &self.badge {
                let badge_center = center - Vec2::new(0.0, radius * 0.38);
                painter.circle_stroke(badge_center, radius * 0.18, Stroke::new(2.0, self.theme.rim.to_color32()));
                painter.text(badge_center, Align2::CENTER_CENTER, badge, FontId::proportional(radius * 0.22), self.theme.text.to_color32());
            }

            painter.text(center + Vec2::new(0.0, radius * 0.42), Align2::CENTER_CENTER, &self.value, FontId::proportional(radius * 0.26), self.theme.text.to_color32());
            painter.text(center + Vec2::new(0.0, radius * 0.66), Align2::CENTER_CENTER, &self.unit, FontId::proportional(radius * 0.13), self.theme.tick.to_color32());

            painter.line_segment([center, dial_point(center, radius * 0.78, self.ratio)], Stroke::new(3.0, self.theme.needle.to_color32()));
            painter.circle_filled(center, radius * 0.06, self.theme.needle.to_color32());
        }

        response
    }
}

/// Needle angle measured clockwise from twelve o'clock.
pub fn needle_angle(ratio: f32) -> f32 {
    START_ANGLE + ratio.clamp(0.0, 1.0) * SWEEP_ANGLE
}

fn dial_point(center: Pos2, radius: f32, ratio: f32) -> Pos2 {
    let angle = needle_angle(ratio);
    center + Vec2::new(angle.sin(), -angle.cos()) * radius
}

fn arc_points(center: Pos2, radius: f32, from: f32, to: f32) -> Vec<Pos2> {
    (0..=ARC_SEGMENTS).map(|i| dial_point(center, radius, from + (to - from) * i as f32 / ARC_SEGMENTS as f32)).collect()
}

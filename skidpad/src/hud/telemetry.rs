use super::theme::HudTheme;
use crate::utils::color::Vec4Color;
use egui::Context;
use egui::Frame;
use egui::Margin;
use egui::Rounding;
use egui::Stroke;
use egui::Vec2;
use egui::Vec2b;
use egui::Window;
use egui_plot::Line;
use egui_plot::LineStyle;
use egui_plot::Plot;
use egui_plot::PlotPoint;
use egui_plot::PlotPoints;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 300;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TelemetrySample {
    pub time: f32,
    pub speed_kmh: f32,
    pub rpm: f32,
}

pub struct TelemetryWindow {
    pub visible: bool,

    samples: VecDeque<TelemetrySample>,
    capacity: usize,
    time: f32,
}

impl TelemetryWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { visible: false, samples: VecDeque::with_capacity(capacity), capacity, time: 0.0 }
    }

    pub fn push(&mut self, delta: f32, speed_kmh: f32, rpm: f32) {
        self.time += delta;

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(TelemetrySample { time: self.time, speed_kmh, rpm });
    }

    pub fn samples(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.time = 0.0;
    }

    pub fn show(&self, context: &Context, theme: &HudTheme) {
        if !self.visible {
            return;
        }

        let speed = self.samples.iter().map(|p| PlotPoint::new(p.time, p.speed_kmh)).collect::<Vec<PlotPoint>>();
        let rpm = self.samples.iter().map(|p| PlotPoint::new(p.time, p.rpm / 1000.0)).collect::<Vec<PlotPoint>>();

        Window::new("Telemetry")
            .frame(
                Frame::none()
                    .inner_margin(Margin::symmetric(10.0, 10.0))
                    .stroke(Stroke::new(1.0, theme.rim.to_color32()))
                    .fill(theme.background.to_color32())
                    .rounding(Rounding::same(5.0)),
            )
            .resizable(false)
            .collapsible(false)
            .default_width(360.0)
            .show(context, |ui| {
                ui.label("Speed [km/h]");
                telemetry_plot("SpeedPlot", 150.0).show(ui, |plot_ui| {
                    plot_ui.line(Line::new(PlotPoints::Owned(speed)).color(theme.needle.to_color32()).style(LineStyle::Solid));
                });

                ui.add_space(5.0);
                ui.label("RPM [x1000]");
                telemetry_plot("RpmPlot", 7.0).show(ui, |plot_ui| {
                    plot_ui.line(Line::new(PlotPoints::Owned(rpm)).color(theme.nitrous.to_color32()).style(LineStyle::Solid));
                });
            });
    }
}

impl Default for TelemetryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

fn telemetry_plot(id: &str, max_y: f64) -> Plot {
    Plot::new(id)
        .height(90.0)
        .auto_bounds_x()
        .set_margin_fraction(Vec2::new(0.0, 0.1))
        .include_y(0.0)
        .include_y(max_y)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_double_click_reset(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .x_axis_formatter(|_, _, _| "".to_string())
        .show_grid(Vec2b::new(false, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded() {
        let mut telemetry = TelemetryWindow::new(3);
        for i in 0..5 {
            telemetry.push(0.5, i as f32, 1000.0);
        }

        let speeds = telemetry.samples().map(|p| p.speed_kmh).collect::<Vec<f32>>();
        assert_eq!(speeds, vec![2.0, 3.0, 4.0]);
        assert_eq!(telemetry.samples().last().unwrap().time, 2.5);
    }

    #[test]
    fn clear_restarts_the_clock() {
        let mut telemetry = TelemetryWindow::default();
        telemetry.push(1.0, 10.0, 2000.0);
        telemetry.clear();
        telemetry.push(0.25, 0.0, 1000.0);

        assert_eq!(telemetry.len(), 1);
        assert_eq!(telemetry.samples().next().unwrap().time, 0.25);
    }
}

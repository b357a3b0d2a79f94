use colors_transform::Color;
use colors_transform::Rgb;
use egui::Color32;
use glam::Vec4;

pub trait Vec4Color {
    fn new_rgb(r: u8, g: u8, b: u8, a: u8) -> Vec4;
    fn to_rgb(self) -> (u8, u8, u8, u8);
    fn to_color32(self) -> Color32;
}

pub trait RgbToVec4 {
    fn to_vec4(self) -> Vec4;
}

impl Vec4Color for Vec4 {
    fn new_rgb(r: u8, g: u8, b: u8, a: u8) -> Vec4 {
        Vec4::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    fn to_rgb(self) -> (u8, u8, u8, u8) {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.x), channel(self.y), channel(self.z), channel(self.w))
    }

    fn to_color32(self) -> Color32 {
        let (r, g, b, a) = self.to_rgb();
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

impl RgbToVec4 for Rgb {
    fn to_vec4(self) -> Vec4 {
        let (r, g, b) = self.as_tuple();
        Vec4::new(r / 255.0, g / 255.0, b / 255.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_round_trips_through_vec4() {
        let color = Vec4::new_rgb(255, 128, 0, 255);
        assert_eq!(color.to_rgb(), (255, 128, 0, 255));
        assert_eq!(color.to_color32(), Color32::from_rgb(255, 128, 0));
    }
}

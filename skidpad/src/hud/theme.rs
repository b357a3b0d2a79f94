use crate::utils::color::Vec4Color;
use crate::utils::json;
use anyhow::Result;
use glam::Vec4;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HudTheme {
    pub background: Vec4,
    pub rim: Vec4,
    pub tick: Vec4,
    pub needle: Vec4,
    pub text: Vec4,
    pub redline: Vec4,
    pub nitrous: Vec4,
    pub nitrous_empty: Vec4,
}

impl HudTheme {
    /// Reads colours from hex strings like `"#FF8800"`, missing entries keep the default palette.
    pub fn from_json(content: &str) -> Result<Self> {
        let data = json::parse_object(content)?;
        let default = Self::default();

        let mut background = json::read_color_or(&data, "background", default.background)?;
        background.w = default.background.w;

        Ok(Self {
            background,
            rim: json::read_color_or(&data, "rim", default.rim)?,
            tick: json::read_color_or(&data, "tick", default.tick)?,
            needle: json::read_color_or(&data, "needle", default.needle)?,
            text: json::read_color_or(&data, "text", default.text)?,
            redline: json::read_color_or(&data, "redline", default.redline)?,
            nitrous: json::read_color_or(&data, "nitrous", default.nitrous)?,
            nitrous_empty: json::read_color_or(&data, "nitrous_empty", default.nitrous_empty)?,
        })
    }
}

impl Default for HudTheme {
    fn default() -> Self {
        Self {
            background: Vec4::new_rgb(15, 15, 20, 200),
            rim: Vec4::new_rgb(180, 180, 190, 255),
            tick: Vec4::new_rgb(220, 220, 220, 255),
            needle: Vec4::new_rgb(255, 60, 40, 255),
            text: Vec4::new_rgb(255, 255, 255, 255),
            redline: Vec4::new_rgb(230, 30, 30, 255),
            nitrous: Vec4::new_rgb(40, 160, 255, 255),
            nitrous_empty: Vec4::new_rgb(90, 90, 90, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colours_override_defaults() {
        let theme = HudTheme::from_json(r##"{ "needle": "#00FF00", "background": "#000000" }"##).unwrap();

        assert_eq!(theme.needle, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(theme.background.w, HudTheme::default().background.w);
        assert_eq!(theme.rim, HudTheme::default().rim);
    }

    #[test]
    fn invalid_colour_is_rejected() {
        assert!(HudTheme::from_json(r#"{ "text": 12 }"#).is_err());
    }
}

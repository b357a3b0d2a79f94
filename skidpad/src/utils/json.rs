use super::color::RgbToVec4;
use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use colors_transform::Rgb;
use glam::Vec3;
use glam::Vec4;
use std::collections::HashMap;
use tinyjson::InnerAsRef;
use tinyjson::JsonValue;

pub type JsonObject = HashMap<String, JsonValue>;

pub fn parse_object(content: &str) -> Result<JsonObject> {
    let value = content.parse::<JsonValue>().map_err(|err| anyhow!("Failed to parse JSON ({})", err))?;

    match value {
        JsonValue::Object(object) => Ok(object),
        _ => bail!("Root JSON value is not an object"),
    }
}

pub fn read_object_nullable<'a>(data: &'a JsonObject, name: &str) -> Result<Option<&'a JsonObject>> {
    match data.get(name) {
        Some(JsonValue::Object(object)) => Ok(Some(object)),
        Some(JsonValue::Null) | None => Ok(None),
        _ => bail!("Failed to read object {}", name),
    }
}

pub fn read_value_or<T>(data: &JsonObject, name: &str, default: T) -> Result<T>
where
    T: Clone + InnerAsRef,
{
    match data.get(name) {
        Some(JsonValue::Null) | None => Ok(default),
        Some(value) => Ok(value.get::<T>().ok_or_else(|| anyhow!("Failed to parse {}", name))?.clone()),
    }
}

pub fn read_f32_or(data: &JsonObject, name: &str, default: f32) -> Result<f32> {
    Ok(read_value_or::<f64>(data, name, default as f64)? as f32)
}

pub fn read_usize_or(data: &JsonObject, name: &str, default: usize) -> Result<usize> {
    let value = read_value_or::<f64>(data, name, default as f64)?;
    if value < 0.0 || value.fract() != 0.0 {
        bail!("Failed to parse {}, expected a non-negative integer", name);
    }

    Ok(value as usize)
}

pub fn read_f32_array_or<const N: usize>(data: &JsonObject, name: &str, default: [f32; N]) -> Result<[f32; N]> {
    let array = match data.get(name) {
        Some(JsonValue::Array(array)) => array,
        Some(JsonValue::Null) | None => return Ok(default),
        _ => bail!("Failed to read array {}", name),
    };

    if array.len() != N {
        bail!("Failed to read array {}, expected {} items but got {}", name, N, array.len());
    }

    let mut output = [0.0; N];
    for (index, item) in array.iter().enumerate() {
        output[index] = match item {
            JsonValue::Number(value) => *value as f32,
            _ => bail!("Failed to parse item {} of {}", index, name),
        };
    }

    Ok(output)
}

pub fn read_position_or(data: &JsonObject, name: &str, default: Vec3) -> Result<Vec3> {
    let position = read_f32_array_or(data, name, default.to_array())?;
    Ok(Vec3::from_array(position))
}

pub fn read_color_or(data: &JsonObject, name: &str, default: Vec4) -> Result<Vec4> {
    let value = match data.get(name) {
        Some(JsonValue::Null) | None => return Ok(default),
        Some(value) => value,
    };
    let parsed = value.get::<String>().ok_or_else(|| anyhow!("Failed to parse {}", name))?.clone();

    Ok(Rgb::from_hex_str(&parsed).map_err(|_| anyhow!("Failed to parse {} into RGB", name))?.to_vec4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let data = parse_object(r#"{ "present": 2.5 }"#).unwrap();

        assert_eq!(read_f32_or(&data, "present", 1.0).unwrap(), 2.5);
        assert_eq!(read_f32_or(&data, "absent", 1.0).unwrap(), 1.0);
        assert_eq!(read_usize_or(&data, "absent", 7).unwrap(), 7);
    }

    #[test]
    fn wrong_types_are_rejected() {
        let data = parse_object(r#"{ "speed": "fast", "count": 1.5, "gears": [1, 2] }"#).unwrap();

        assert!(read_f32_or(&data, "speed", 1.0).is_err());
        assert!(read_usize_or(&data, "count", 1).is_err());
        assert!(read_f32_array_or(&data, "gears", [0.0; 3]).is_err());
    }

    #[test]
    fn arrays_and_colors_are_parsed() {
        let data = parse_object(r##"{ "spawn": [1, 2, 3], "accent": "#ff0000" }"##).unwrap();

        assert_eq!(read_position_or(&data, "spawn", Vec3::ZERO).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(read_color_or(&data, "accent", Vec4::ZERO).unwrap(), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn non_object_root_is_an_error() {
        assert!(parse_object("[1, 2, 3]").is_err());
        assert!(parse_object("{ broken").is_err());
    }
}

use anyhow::anyhow;
use anyhow::Result;
use log::warn;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

/// User settings kept as `key=value` lines. The file is read lazily on first access and
/// rewritten whenever a value changes.
pub struct SettingsStorage {
    path: PathBuf,
    cache: Option<FxHashMap<String, String>>,
}

impl SettingsStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), cache: None }
    }

    /// Returns `Ok(None)` when the key is missing or its value doesn't parse into `T`.
    pub fn get<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
    {
        let cache = self.load()?;
        Ok(cache.get(key).and_then(|value| value.parse().ok()))
    }

    pub fn get_or<T>(&mut self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
    {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Stores the value unless the key exists and `overwrite` is false, returns the value now held under the key.
    pub fn set<T>(&mut self, key: &str, value: T, overwrite: bool) -> Result<Option<T>>
    where
        T: FromStr + ToString,
    {
        let cache = self.load()?;
        if cache.contains_key(key) && !overwrite {
            return Ok(cache.get(key).and_then(|value| value.parse().ok()));
        }

        cache.insert(key.to_string(), value.to_string());
        let content = serialize(cache);
        fs::write(&self.path, content).map_err(|err| anyhow!("Failed to write settings {} ({})", self.path.display(), err))?;

        Ok(Some(value))
    }

    fn load(&mut self) -> Result<&mut FxHashMap<String, String>> {
        if self.cache.is_none() {
            let settings = match fs::read_to_string(&self.path) {
                Ok(content) => deserialize(&content),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => FxHashMap::default(),
                Err(err) => return Err(anyhow!("Failed to read settings {} ({})", self.path.display(), err)),
            };
            self.cache = Some(settings);
        }

        self.cache.as_mut().ok_or_else(|| anyhow!("Settings cache not initialized"))
    }
}

fn serialize(settings: &FxHashMap<String, String>) -> String {
    let mut keys = settings.keys().collect::<Vec<&String>>();
    keys.sort();

    let mut output = String::new();
    for key in keys {
        output.push_str(&format!("{}={}\n", key, settings[key]));
    }

    output
}

fn deserialize(settings: &str) -> FxHashMap<String, String> {
    let mut output = FxHashMap::default();

    for (index, line) in settings.lines().map(|p| p.trim()).enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((name, value)) => {
                output.insert(name.trim().to_string(), value.trim().to_string());
            }
            None => warn!("Skipping malformed settings line {} ({})", index + 1, line),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skidpad-{}-{}.cfg", name, std::process::id()))
    }

    #[test]
    fn missing_file_behaves_as_empty() {
        let mut storage = SettingsStorage::new(temp_path("missing"));

        assert_eq!(storage.get::<f32>("vehicle_scale").unwrap(), None);
        assert_eq!(storage.get_or("vehicle_scale", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn values_survive_a_reload() {
        let path = temp_path("reload");
        let mut storage = SettingsStorage::new(&path);

        storage.set("audio_enabled", false, true).unwrap();
        storage.set("spawn_seed", 42u64, true).unwrap();
        assert_eq!(storage.set("spawn_seed", 7u64, false).unwrap(), Some(42));

        let mut reloaded = SettingsStorage::new(&path);
        assert_eq!(reloaded.get::<bool>("audio_enabled").unwrap(), Some(false));
        assert_eq!(reloaded.get::<u64>("spawn_seed").unwrap(), Some(42));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let settings = deserialize("# comment\nvehicle_scale = 1.5\nbroken line\n\ncamera_mode=interior");

        assert_eq!(settings.len(), 2);
        assert_eq!(settings["vehicle_scale"], "1.5");
        assert_eq!(settings["camera_mode"], "interior");
    }
}

use autopilot::SESSION_LENGTH;
use skidpad::anyhow::anyhow;
use skidpad::anyhow::Result;
use skidpad::app;
use skidpad::app::ApplicationContext;
use skidpad::game::GameScene;
use skidpad::game::GameSettings;
use skidpad::hud::theme::HudTheme;
use skidpad::log::error;
use skidpad::log::info;
use skidpad::utils::settings::SettingsStorage;
use skidpad::vehicle::VehicleTuning;
use skidpad::world::WorldConfig;
use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

pub mod autopilot;

const SETTINGS_PATH: &str = "./settings.cfg";
const TUNING_PATH: &str = "./tuning.json";
const WORLD_PATH: &str = "./world.json";
const THEME_PATH: &str = "./theme.json";
const FRAME_DELTA: f32 = 1.0 / 60.0;

fn main() {
    app::init_logger();

    if let Err(err) = main_internal() {
        error!("Session failed ({})", err);
    }
}

fn main_internal() -> Result<()> {
    let mut storage = SettingsStorage::new(SETTINGS_PATH);
    let settings = GameSettings::load(&mut storage)?;
    settings.save(&mut storage)?;

    let tuning = match read_optional(TUNING_PATH)? {
        Some(content) => VehicleTuning::from_json(&content)?,
        None => VehicleTuning::default(),
    };
    let world = match read_optional(WORLD_PATH)? {
        Some(content) => WorldConfig::from_json(&content)?,
        None => WorldConfig::default(),
    };
    let theme = match read_optional(THEME_PATH)? {
        Some(content) => HudTheme::from_json(&content)?,
        None => HudTheme::default(),
    };

    let frames = (SESSION_LENGTH / FRAME_DELTA) as u64;
    let scene = GameScene::new(Arc::new(tuning), world, settings).with_theme(theme).with_log_interval(1.0);
    let mut script = autopilot::session();

    let mut app = ApplicationContext::<()>::new().with_scene("GameScene", Box::new(scene))?.with_fixed_delta(FRAME_DELTA).with_max_frames(frames);
    app.run("GameScene", &mut script);

    info!("Autopilot finished, {} scripted events left", script.remaining());
    Ok(())
}

fn read_optional(path: &str) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            info!("Loaded {}", path);
            Ok(Some(content))
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow!("Failed to read {} ({})", path, err)),
    }
}

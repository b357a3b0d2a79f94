use crate::app::ApplicationState;
use crate::audio::EngineMix;
use crate::audio::EngineSound;
use crate::camera::CameraMode;
use crate::camera::CameraRig;
use crate::hud::theme::HudTheme;
use crate::hud::Hud;
use crate::input::InputAction;
use crate::input::InputEvent;
use crate::input::InputHandler;
use crate::scene::FrameCommand;
use crate::scene::Scene;
use crate::utils::settings::SettingsStorage;
use crate::vehicle::ResetEvent;
use crate::vehicle::Vehicle;
use crate::vehicle::VehicleState;
use crate::vehicle::VehicleTuning;
use crate::world::obstacle::ObstacleManager;
use crate::world::powerup::PowerupManager;
use crate::world::ObjectManager;
use crate::world::WorldConfig;
use anyhow::anyhow;
use anyhow::Result;
use egui::FullOutput;
use egui::RawInput;
use fastrand::Rng;
use log::debug;
use log::info;
use std::sync::Arc;

#[cfg(feature = "audio")]
use log::error;

pub const ENGINE_SOUND_PATH: &str = "./assets/audio/engine.ogg";
pub const DRIFT_SOUND_PATH: &str = "./assets/audio/drift.ogg";

/// User preferences persisted between sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    pub audio_enabled: bool,
    pub camera_mode: CameraMode,
    pub vehicle_scale: f32,
    pub acceleration_multiplier: f32,
    pub spawn_seed: u64,
}

impl GameSettings {
    pub fn load(storage: &mut SettingsStorage) -> Result<Self> {
        let default = Self::default();

        Ok(Self {
            audio_enabled: storage.get_or("audio_enabled", default.audio_enabled)?,
            camera_mode: storage.get_or("camera_mode", default.camera_mode)?,
            vehicle_scale: storage.get_or("vehicle_scale", default.vehicle_scale)?,
            acceleration_multiplier: storage.get_or("acceleration_multiplier", default.acceleration_multiplier)?,
            spawn_seed: storage.get_or("spawn_seed", default.spawn_seed)?,
        })
    }

    pub fn save(&self, storage: &mut SettingsStorage) -> Result<()> {
        storage.set("audio_enabled", self.audio_enabled, true)?;
        storage.set("camera_mode", self.camera_mode, true)?;
        storage.set("vehicle_scale", self.vehicle_scale, true)?;
        storage.set("acceleration_multiplier", self.acceleration_multiplier, true)?;
        storage.set("spawn_seed", self.spawn_seed, true)?;

        Ok(())
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self { audio_enabled: true, camera_mode: CameraMode::Follow, vehicle_scale: 1.0, acceleration_multiplier: 1.0, spawn_seed: 42 }
    }
}

/// One driving session: the car, the arena around it and everything that observes the car.
pub struct Game {
    pub vehicle: Vehicle,
    pub obstacles: ObstacleManager,
    pub powerups: PowerupManager,
    pub input: InputHandler,
    pub camera: CameraRig,
    pub hud: Hud,
    pub engine_sound: EngineSound,
    pub mix: EngineMix,

    elapsed: f32,
    collisions: u32,
    pickups: u32,
}

impl Game {
    pub fn new(tuning: Arc<VehicleTuning>, world: &WorldConfig, settings: &GameSettings) -> Result<Self> {
        tuning.validate()?;
        world.validate()?;

        let mut vehicle = Vehicle::new(world.spawn_point, tuning);
        vehicle.set_scale(settings.vehicle_scale);
        vehicle.set_acceleration_multiplier(settings.acceleration_multiplier);

        let mut rng = Rng::with_seed(settings.spawn_seed);
        let obstacles = ObstacleManager::new(world, &mut rng);
        let powerups = PowerupManager::new(world, &mut rng);

        let mut camera = CameraRig::new(settings.camera_mode);
        camera.update(&vehicle);

        let engine_sound = EngineSound;
        let mix = engine_sound.evaluate(&vehicle);

        info!("Game created with {} obstacles and {} power-ups (seed {})", obstacles.len(), powerups.len(), settings.spawn_seed);

        Ok(Self {
            vehicle,
            obstacles,
            powerups,
            input: InputHandler::default(),
            camera,
            hud: Hud::default(),
            engine_sound,
            mix,

            elapsed: 0.0,
            collisions: 0,
            pickups: 0,
        })
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> Option<FrameCommand> {
        match self.input.handle_event(event) {
            InputAction::None => None,
            InputAction::Reset => {
                self.reset();
                None
            }
            InputAction::ToggleCamera => {
                self.camera.toggle_mode();
                info!("Camera mode changed to {}", self.camera.mode);
                None
            }
            InputAction::ToggleTelemetry => {
                self.hud.toggle_telemetry();
                None
            }
            InputAction::Exit => Some(FrameCommand::Exit),
        }
    }

    pub fn update(&mut self, delta: f32) {
        self.elapsed += delta;

        self.input.apply(delta, &mut self.vehicle);
        self.vehicle.update(delta);

        if self.obstacles.handle_collisions(&mut self.vehicle) {
            self.collisions += 1;
        }

        self.powerups.update(delta);
        if self.powerups.handle_collisions(&mut self.vehicle) {
            self.pickups += 1;
            info!("Nitrous picked up, {} power-ups left", self.powerups.active_count());
        }

        self.camera.update(&self.vehicle);
        self.mix = self.engine_sound.evaluate(&self.vehicle);
        self.hud.update(delta, &self.vehicle);
    }

    pub fn reset(&mut self) {
        let event = self.vehicle.reset();
        self.handle_reset(event);
    }

    fn handle_reset(&mut self, event: ResetEvent) {
        self.camera.reset();
        self.powerups.reset();
        self.hud.reset();
        self.camera.update(&self.vehicle);

        info!("Vehicle reset to {:?} facing {:.2} rad", event.position, event.rotation);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    pub fn pickups(&self) -> u32 {
        self.pickups
    }

    pub fn telemetry_line(&self) -> String {
        let readout = self.hud.readout();
        let position = self.vehicle.position();

        format!(
            "t={:.1}s pos=({:.1}, {:.1}) speed={:.1} km/h gear={} rpm={:.0} drift={} nitrous={:?} fov={:.1}",
            self.elapsed,
            position.x,
            position.z,
            readout.speed_kmh,
            readout.gear,
            readout.rpm,
            self.vehicle.is_drifting(),
            readout.nitrous,
            self.camera.fov
        )
    }
}

/// Scene wrapper that builds a fresh [Game] on every activation.
pub struct GameScene {
    tuning: Arc<VehicleTuning>,
    world: WorldConfig,
    settings: GameSettings,
    theme: HudTheme,
    log_interval: Option<f32>,

    game: Option<Game>,
    next_log: f32,
}

impl GameScene {
    pub fn new(tuning: Arc<VehicleTuning>, world: WorldConfig, settings: GameSettings) -> Self {
        Self { tuning, world, settings, theme: HudTheme::default(), log_interval: None, game: None, next_log: 0.0 }
    }

    pub fn with_theme(mut self, theme: HudTheme) -> Self {
        self.theme = theme;
        self
    }

    /// Logs a telemetry line every `interval` seconds of simulated time.
    pub fn with_log_interval(mut self, interval: f32) -> Self {
        self.log_interval = Some(interval).filter(|interval| *interval > 0.0);
        self
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    fn game_mut(&mut self) -> Result<&mut Game> {
        self.game.as_mut().ok_or_else(|| anyhow!("Game scene is not active"))
    }
}

impl Default for GameScene {
    fn default() -> Self {
        Self::new(Arc::new(VehicleTuning::default()), WorldConfig::default(), GameSettings::default())
    }
}

impl<G> Scene<G> for GameScene {
    fn activation(&mut self, state: ApplicationState<G>) -> Result<()> {
        let mut game = Game::new(self.tuning.clone(), &self.world, &self.settings)?;
        game.hud.theme = self.theme;

        self.game = Some(game);
        self.next_log = 0.0;

        #[cfg(feature = "audio")]
        {
            if let Some(audio) = state.audio.as_mut().filter(|_| self.settings.audio_enabled) {
                if let Err(err) = audio.start_engine(ENGINE_SOUND_PATH, DRIFT_SOUND_PATH) {
                    error!("Failed to start engine sound ({})", err);
                }
            }
        }

        #[cfg(not(feature = "audio"))]
        let _ = state;

        Ok(())
    }

    fn deactivation(&mut self, state: ApplicationState<G>) -> Result<()> {
        #[cfg(feature = "audio")]
        {
            if let Some(audio) = state.audio.as_mut() {
                audio.pause();
            }
        }

        #[cfg(not(feature = "audio"))]
        let _ = state;

        Ok(())
    }

    fn input(&mut self, _: ApplicationState<G>, event: InputEvent) -> Result<Option<FrameCommand>> {
        let command = self.game_mut()?.handle_input(&event);
        if let Some(command) = &command {
            debug!("Input {:?} produced {:?}", event, command);
        }

        Ok(command)
    }

    fn frame(&mut self, state: ApplicationState<G>, delta: f32) -> Result<Option<FrameCommand>> {
        let log_interval = self.log_interval;
        let game = self.game_mut()?;
        game.update(delta);

        #[cfg(feature = "audio")]
        {
            if let Some(audio) = state.audio.as_mut() {
                audio.apply(&game.mix);
            }
        }

        #[cfg(not(feature = "audio"))]
        let _ = state;

        if let Some(interval) = log_interval {
            let elapsed = game.elapsed();
            let line = game.telemetry_line();

            if elapsed >= self.next_log {
                info!("{}", line);
                self.next_log = elapsed + interval;
            }
        }

        Ok(None)
    }

    fn ui(&mut self, state: ApplicationState<G>, input: RawInput) -> Result<(FullOutput, Option<FrameCommand>)> {
        let game = self.game_mut()?;
        let output = state.ui.run(input, |context| game.hud.show(context));

        Ok((output, None))
    }

    fn reset(&self) -> Box<dyn Scene<G>> {
        let scene = GameScene::new(self.tuning.clone(), self.world.clone(), self.settings.clone()).with_theme(self.theme);
        Box::new(GameScene { log_interval: self.log_interval, ..scene })
    }
}

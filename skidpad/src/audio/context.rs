use super::EngineMix;
use crate::utils::storage::Storage;
use anyhow::anyhow;
use anyhow::Result;
use kira::manager::backend::cpal::CpalBackend;
use kira::manager::AudioManager;
use kira::manager::AudioManagerSettings;
use kira::sound::static_sound::StaticSoundData;
use kira::sound::static_sound::StaticSoundHandle;
use kira::sound::static_sound::StaticSoundSettings;
use kira::tween::Tween;
use log::info;
use std::path::Path;

const ENGINE_SOUND: &str = "engine";
const DRIFT_SOUND: &str = "drift";
const DRIFT_START_VOLUME: f64 = 0.4;

/// Output device plus the two looping sounds of the car.
pub struct AudioContext {
    pub inner: AudioManager<CpalBackend>,
    pub sounds: Storage<StaticSoundData>,

    engine: Option<StaticSoundHandle>,
    drift: Option<StaticSoundHandle>,
    drift_playing: bool,
}

impl AudioContext {
    pub fn new() -> Result<Self> {
        let inner = AudioManager::<CpalBackend>::new(AudioManagerSettings::default())?;
        Ok(Self { inner, sounds: Storage::default(), engine: None, drift: None, drift_playing: false })
    }

    pub fn load_loop(&mut self, name: &str, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let settings = StaticSoundSettings::new().loop_region(..);
        let data = StaticSoundData::from_file(path, settings).map_err(|err| anyhow!("Failed to load sound {} ({})", path.display(), err))?;

        self.sounds.store_with_name(name, data)?;
        info!("Loaded sound {} from {}", name, path.display());

        Ok(())
    }

    /// Starts the engine loop and keeps the screech loop paused until the first drift. Restarting stops the previous loops.
    pub fn start_engine(&mut self, engine_path: impl AsRef<Path>, drift_path: impl AsRef<Path>) -> Result<()> {
        self.stop();

        if !self.sounds.contains_by_name(ENGINE_SOUND) {
            self.load_loop(ENGINE_SOUND, engine_path)?;
        }
        if !self.sounds.contains_by_name(DRIFT_SOUND) {
            self.load_loop(DRIFT_SOUND, drift_path)?;
        }

        self.engine = Some(self.play(ENGINE_SOUND)?);

        let mut drift = self.play(DRIFT_SOUND)?;
        let _ = drift.set_volume(DRIFT_START_VOLUME, Tween::default());
        let _ = drift.pause(Tween::default());
        self.drift = Some(drift);

        Ok(())
    }

    pub fn apply(&mut self, mix: &EngineMix) {
        if let Some(engine) = &mut self.engine {
            let _ = engine.set_playback_rate(mix.engine_pitch as f64, Tween::default());
            let _ = engine.set_volume(mix.engine_volume as f64, Tween::default());
        }

        if let Some(drift) = &mut self.drift {
            match mix.drift_volume {
                Some(volume) => {
                    if !self.drift_playing {
                        let _ = drift.resume(Tween::default());
                        self.drift_playing = true;
                    }
                    let _ = drift.set_volume(volume as f64, Tween::default());
                }
                None if self.drift_playing => {
                    let _ = drift.pause(Tween::default());
                    self.drift_playing = false;
                }
                None => {}
            }
        }
    }

    pub fn pause(&mut self) {
        for handle in [&mut self.engine, &mut self.drift].into_iter().flatten() {
            let _ = handle.pause(Tween::default());
        }
        self.drift_playing = false;
    }

    pub fn stop(&mut self) {
        for mut handle in [self.engine.take(), self.drift.take()].into_iter().flatten() {
            let _ = handle.stop(Tween::default());
        }
        self.drift_playing = false;
    }

    pub fn resume(&mut self) {
        if let Some(engine) = &mut self.engine {
            let _ = engine.resume(Tween::default());
        }
    }

    fn play(&mut self, name: &str) -> Result<StaticSoundHandle> {
        let data = self.sounds.get_by_name(name)?.clone();
        self.inner.play(data).map_err(|err| anyhow!("Failed to play sound {} ({})", name, err))
    }
}

use crate::error_break;
use crate::error_continue;
use crate::error_return;
use crate::hud::context::UiContext;
use crate::input::EventSource;
use crate::input::InputEvent;
use crate::scene::FrameCommand;
use crate::scene::Scene;
use crate::utils::storage::Storage;
use anyhow::Result;
use instant::Instant;
use log::info;
use log::Level;

#[cfg(feature = "audio")]
use crate::audio::context::AudioContext;

#[cfg(feature = "audio")]
use log::error;

pub const MAX_DELTA: f32 = 0.1;

pub struct ApplicationContext<G>
where
    G: Default + 'static,
{
    pub ui: UiContext,
    pub scenes: Storage<Box<dyn Scene<G>>>,
    pub global: G,

    #[cfg(feature = "audio")]
    pub audio: Option<AudioContext>,

    current_scene: String,
    next_scene: Option<String>,
    reset_pending: bool,
    frame_timestamp: Instant,
    running: bool,
    fixed_delta: Option<f32>,
    max_frames: Option<u64>,
    frames: u64,
    time: f32,
}

pub struct ApplicationState<'a, G> {
    pub ui: &'a mut UiContext,
    pub global: &'a mut G,

    #[cfg(feature = "audio")]
    pub audio: &'a mut Option<AudioContext>,
}

macro_rules! state {
    ($self:ident) => {
        ApplicationState {
            ui: &mut $self.ui,
            global: &mut $self.global,

            #[cfg(feature = "audio")]
            audio: &mut $self.audio,
        }
    };
}

impl<G> ApplicationContext<G>
where
    G: Default + 'static,
{
    pub fn new() -> Self {
        init_logger();
        info!("Skidpad {}", env!("CARGO_PKG_VERSION"));

        #[cfg(feature = "audio")]
        let audio = match AudioContext::new() {
            Ok(audio) => Some(audio),
            Err(err) => {
                error!("Failed to initialize audio, continuing without sound ({})", err);
                None
            }
        };

        Self {
            ui: Default::default(),
            scenes: Default::default(),
            global: Default::default(),

            #[cfg(feature = "audio")]
            audio,

            current_scene: "".to_string(),
            next_scene: None,
            reset_pending: false,
            frame_timestamp: Instant::now(),
            running: true,
            fixed_delta: None,
            max_frames: None,
            frames: 0,
            time: 0.0,
        }
    }

    pub fn with_scene(mut self, name: &str, scene: Box<dyn Scene<G>>) -> Result<Self> {
        self.scenes.store_with_name(name, scene)?;
        Ok(self)
    }

    pub fn with_global(mut self, global: G) -> Self {
        self.global = global;
        self
    }

    /// Stops the loop after the given number of frames.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Replaces the measured frame time with a constant one, headless sessions run as fast as possible.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        self.fixed_delta = Some(delta);
        self
    }

    pub fn switch_scene(&mut self, name: &str) {
        self.next_scene = Some(name.to_string());
    }

    pub fn current_scene(&self) -> &str {
        &self.current_scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn run(&mut self, scene: &str, source: &mut impl EventSource) {
        self.switch_scene(scene);
        self.frame_timestamp = Instant::now();

        while self.running {
            let now = Instant::now();
            let delta = match self.fixed_delta {
                Some(delta) => delta,
                None => (now - self.frame_timestamp).as_secs_f32(),
            };

            self.frame_timestamp = now;
            self.step(delta, source);
        }

        info!("Application stopped after {} frames ({:.2} s)", self.frames, self.time);
    }

    pub fn step(&mut self, delta: f32, source: &mut impl EventSource) {
        if !self.running {
            return;
        }

        let delta = delta.clamp(0.0, MAX_DELTA);
        self.time += delta;
        source.begin_frame(self.time);

        if let Some(next_scene) = self.next_scene.take() {
            if !self.current_scene.is_empty() {
                if let Err(err) = self.scenes.get_by_name_mut(&self.current_scene).and_then(|p| p.deactivation(state!(self))) {
                    self.running = false;
                    error_return!("Failed to deactivate scene {} ({})", self.current_scene, err);
                };
            }

            if self.reset_pending {
                self.reset_pending = false;

                match self.scenes.get_by_name_mut(&next_scene) {
                    Ok(scene) => *scene = scene.reset(),
                    Err(err) => {
                        self.running = false;
                        error_return!("Failed to reset scene {} ({})", next_scene, err);
                    }
                }
            }

            if let Err(err) = self.scenes.get_by_name_mut(&next_scene).and_then(|p| p.activation(state!(self))) {
                self.running = false;
                error_return!("Failed to activate scene {} ({})", next_scene, err);
            };

            info!("Scene {} activated", next_scene);
            self.current_scene = next_scene;
        }

        while let Some(event) = source.poll_event() {
            if let InputEvent::WindowClose = event {
                self.running = false;
                return;
            }

            self.ui.collect_event(&event);

            let scene = match self.scenes.get_by_name_mut(&self.current_scene) {
                Ok(scene) => scene,
                Err(err) => error_break!("Failed to get scene {} ({})", self.current_scene, err),
            };

            match scene.input(state!(self), event) {
                Ok(command) => self.process_frame_command(command),
                Err(err) => error_continue!("Failed to process input event {:?} ({})", event, err),
            }
        }

        self.frames += 1;
        if let Some(max_frames) = self.max_frames {
            if self.frames >= max_frames {
                self.running = false;
            }
        }

        let ui_input = self.ui.get_input();
        match self.scenes.get_by_name_mut(&self.current_scene).and_then(|p| p.ui(state!(self), ui_input)) {
            Ok((_, command)) => self.process_frame_command(command),
            Err(err) => error_return!("Failed to process UI ({})", err),
        }

        match self.scenes.get_by_name_mut(&self.current_scene).and_then(|p| p.frame(state!(self), delta)) {
            Ok(command) => self.process_frame_command(command),
            Err(err) => error_return!("Failed to process frame ({})", err),
        }
    }

    fn process_frame_command(&mut self, command: Option<FrameCommand>) {
        match command {
            Some(FrameCommand::ChangeScene { name }) => self.next_scene = Some(name),
            Some(FrameCommand::ResetScene) => {
                self.next_scene = Some(self.current_scene.clone());
                self.reset_pending = true;
            }
            Some(FrameCommand::Exit) => self.running = false,
            None => {}
        }
    }
}

impl<G> Default for ApplicationContext<G>
where
    G: Default + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the console logger, a logger set earlier (tests, embedding binaries) is kept.
pub fn init_logger() {
    #[cfg(debug_assertions)]
    let level = Level::Info;

    #[cfg(not(debug_assertions))]
    let level = Level::Error;

    let _ = simple_logger::init_with_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::FullOutput;
    use egui::RawInput;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct CountingScene {
        activations: u32,
        frames: u32,
        generation: u32,
        failing: bool,
        commands: VecDeque<FrameCommand>,
    }

    impl Scene<u32> for CountingScene {
        fn activation(&mut self, state: ApplicationState<u32>) -> Result<()> {
            self.activations += 1;
            *state.global += 1;
            Ok(())
        }

        fn deactivation(&mut self, _: ApplicationState<u32>) -> Result<()> {
            Ok(())
        }

        fn input(&mut self, _: ApplicationState<u32>, _: InputEvent) -> Result<Option<FrameCommand>> {
            Ok(None)
        }

        fn frame(&mut self, _: ApplicationState<u32>, _: f32) -> Result<Option<FrameCommand>> {
            self.frames += 1;
            if self.failing {
                anyhow::bail!("Scene {} is broken", self.generation);
            }

            Ok(self.commands.pop_front())
        }

        fn ui(&mut self, state: ApplicationState<u32>, input: RawInput) -> Result<(FullOutput, Option<FrameCommand>)> {
            Ok((state.ui.run(input, |_| {}), None))
        }

        fn reset(&self) -> Box<dyn Scene<u32>> {
            Box::new(CountingScene { generation: self.generation + 1, ..Default::default() })
        }
    }

    fn app(commands: Vec<FrameCommand>) -> ApplicationContext<u32> {
        let scene = CountingScene { commands: commands.into(), ..Default::default() };
        ApplicationContext::<u32>::new().with_scene("Counting", Box::new(scene)).unwrap()
    }

    #[test]
    fn max_frames_stops_the_loop() {
        let mut app = app(Vec::new()).with_max_frames(5).with_fixed_delta(0.05);
        app.run("Counting", &mut VecDeque::new());

        assert_eq!(app.frames(), 5);
        assert!((app.time() - 0.25).abs() < 1e-5);
        assert_eq!(app.global, 1);
    }

    #[test]
    fn delta_is_clamped() {
        let mut app = app(Vec::new());
        app.switch_scene("Counting");
        app.step(3.0, &mut VecDeque::new());

        assert!((app.time() - MAX_DELTA).abs() < 1e-6);
    }

    #[test]
    fn window_close_ends_the_loop() {
        let mut app = app(Vec::new());
        let mut events = VecDeque::from(vec![InputEvent::WindowClose]);
        app.run("Counting", &mut events);

        assert!(!app.is_running());
        assert_eq!(app.frames(), 0);
    }

    #[test]
    fn reset_command_replaces_the_scene() {
        let mut app = app(vec![FrameCommand::ResetScene]);
        app.switch_scene("Counting");
        app.step(0.01, &mut VecDeque::new());
        app.step(0.01, &mut VecDeque::new());

        assert_eq!(app.global, 2);
        assert_eq!(app.current_scene(), "Counting");
    }

    #[test]
    fn exit_command_stops_the_loop() {
        let mut app = app(vec![FrameCommand::Exit]);
        app.run("Counting", &mut VecDeque::new());

        assert_eq!(app.frames(), 1);
    }

    #[test]
    fn failing_frames_still_count_towards_the_limit() {
        let scene = CountingScene { failing: true, ..Default::default() };
        let mut app = ApplicationContext::<u32>::new().with_scene("Broken", Box::new(scene)).unwrap().with_max_frames(3).with_fixed_delta(0.05);
        app.run("Broken", &mut VecDeque::new());

        assert!(!app.is_running());
        assert_eq!(app.frames(), 3);
    }

    #[test]
    fn missing_scene_stops_the_loop() {
        let mut app = app(Vec::new());
        app.run("Missing", &mut VecDeque::new());

        assert!(!app.is_running());
        assert_eq!(app.frames(), 0);
    }
}

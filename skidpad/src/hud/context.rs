use crate::input::InputEvent;
use crate::input::Key;
use crate::input::Modifiers;
use egui::Event;
use egui::FullOutput;
use egui::Pos2;
use egui::RawInput;
use egui::Rect;
use glam::Vec2;
use instant::Instant;

pub const DEFAULT_SCREEN_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

/// Owns the egui context and turns window events into its raw input.
pub struct UiContext {
    pub inner: egui::Context,
    pub screen_size: Vec2,
    pub collected_events: Vec<Event>,
    pub modifiers: Modifiers,

    time: Instant,
}

impl UiContext {
    pub fn new(screen_size: Vec2) -> Self {
        Self { inner: egui::Context::default(), screen_size, collected_events: Vec::new(), modifiers: Modifiers::default(), time: Instant::now() }
    }

    pub fn collect_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::WindowSizeChange { size } => {
                self.screen_size = Vec2::new(size.x as f32, size.y as f32);
            }
            InputEvent::KeyPress { key, repeat, modifiers } => {
                if let Some(egui_key) = map_key(key) {
                    self.collected_events.push(Event::Key { key: egui_key, pressed: true, repeat, modifiers: map_modifiers(modifiers) });
                }
                self.modifiers = modifiers;
            }
            InputEvent::KeyRelease { key, modifiers } => {
                if let Some(egui_key) = map_key(key) {
                    self.collected_events.push(Event::Key { key: egui_key, pressed: false, repeat: false, modifiers: map_modifiers(modifiers) });
                }
                self.modifiers = modifiers;
            }
            InputEvent::WindowClose => {}
        }
    }

    pub fn get_input(&mut self) -> RawInput {
        let input = RawInput {
            screen_rect: Some(Rect::from_two_pos(Pos2::ZERO, Pos2::new(self.screen_size.x, self.screen_size.y))),
            events: std::mem::take(&mut self.collected_events),
            modifiers: map_modifiers(self.modifiers),
            time: Some(self.time.elapsed().as_secs_f64()),
            ..Default::default()
        };

        input
    }

    pub fn run(&mut self, input: RawInput, run_ui: impl FnOnce(&egui::Context)) -> FullOutput {
        self.inner.run(input, run_ui)
    }
}

impl Default for UiContext {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_SIZE)
    }
}

fn map_key(key: Key) -> Option<egui::Key> {
    match key {
        Key::Enter => Some(egui::Key::Enter),
        Key::Escape => Some(egui::Key::Escape),
        Key::Backspace => Some(egui::Key::Backspace),
        Key::Space => Some(egui::Key::Space),
        Key::Tab => Some(egui::Key::Tab),
        Key::Control | Key::Shift | Key::Alt => None,

        Key::ArrowLeft => Some(egui::Key::ArrowLeft),
        Key::ArrowUp => Some(egui::Key::ArrowUp),
        Key::ArrowRight => Some(egui::Key::ArrowRight),
        Key::ArrowDown => Some(egui::Key::ArrowDown),

        Key::F1 => Some(egui::Key::F1),
        Key::F2 => Some(egui::Key::F2),
        Key::F3 => Some(egui::Key::F3),
        Key::F4 => Some(egui::Key::F4),

        Key::KeyA => Some(egui::Key::A),
        Key::KeyB => Some(egui::Key::B),
        Key::KeyC => Some(egui::Key::C),
        Key::KeyD => Some(egui::Key::D),
        Key::KeyE => Some(egui::Key::E),
        Key::KeyF => Some(egui::Key::F),
        Key::KeyG => Some(egui::Key::G),
        Key::KeyH => Some(egui::Key::H),
        Key::KeyI => Some(egui::Key::I),
        Key::KeyJ => Some(egui::Key::J),
        Key::KeyK => Some(egui::Key::K),
        Key::KeyL => Some(egui::Key::L),
        Key::KeyM => Some(egui::Key::M),
        Key::KeyN => Some(egui::Key::N),
        Key::KeyO => Some(egui::Key::O),
        Key::KeyP => Some(egui::Key::P),
        Key::KeyQ => Some(egui::Key::Q),
        Key::KeyR => Some(egui::Key::R),
        Key::KeyS => Some(egui::Key::S),
        Key::KeyT => Some(egui::Key::T),
        Key::KeyU => Some(egui::Key::U),
        Key::KeyV => Some(egui::Key::V),
        Key::KeyW => Some(egui::Key::W),
        Key::KeyX => Some(egui::Key::X),
        Key::KeyY => Some(egui::Key::Y),
        Key::KeyZ => Some(egui::Key::Z),

        Key::Unknown => None,
    }
}

fn map_modifiers(modifiers: Modifiers) -> egui::Modifiers {
    egui::Modifiers { ctrl: modifiers.control, alt: modifiers.alt, shift: modifiers.shift, command: modifiers.control, mac_cmd: false }
}

use glam::IVec2;

pub mod handler;
pub mod script;

pub use handler::InputAction;
pub use handler::InputHandler;
pub use script::EventSource;
pub use script::ScriptedInput;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    WindowSizeChange { size: IVec2 },
    KeyPress { key: Key, repeat: bool, modifiers: Modifiers },
    KeyRelease { key: Key, modifiers: Modifiers },
    WindowClose,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Space,
    Tab,
    Control,
    Shift,
    Alt,

    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,

    F1,
    F2,
    F3,
    F4,

    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    #[default]
    Unknown,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

impl InputEvent {
    pub fn press(key: Key) -> Self {
        Self::KeyPress { key, repeat: false, modifiers: Modifiers::default() }
    }

    pub fn release(key: Key) -> Self {
        Self::KeyRelease { key, modifiers: Modifiers::default() }
    }
}

impl Modifiers {
    pub fn new(control: bool, alt: bool, shift: bool) -> Self {
        Self { control, alt, shift }
    }
}

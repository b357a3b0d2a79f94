use skidpad::input::Key;
use skidpad::input::ScriptedInput;

pub const SESSION_LENGTH: f32 = 20.0;

/// Lap around the arena: launch, a left-right flick into a drift, nitrous, camera swap and a reset with a second run.
pub fn session() -> ScriptedInput {
    ScriptedInput::default()
        .press(0.5, Key::F1)
        .hold(0.0, 8.0, Key::KeyW)
        .hold(2.0, 3.0, Key::KeyA)
        .hold(3.5, 4.5, Key::KeyD)
        .hold(4.0, 6.0, Key::Space)
        .hold(6.5, 6.6, Key::KeyF)
        .press(7.0, Key::KeyC)
        .press(9.0, Key::KeyC)
        .hold(8.5, 10.0, Key::KeyS)
        .press(12.0, Key::KeyR)
        .hold(12.5, 18.0, Key::KeyW)
        .hold(14.0, 16.0, Key::ArrowRight)
        .hold(16.0, 16.1, Key::KeyF)
}

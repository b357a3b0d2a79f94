use super::InputEvent;
use super::Key;
use crate::vehicle::Controllable;
use crate::vehicle::VehicleState;
use log::debug;

/// Requests that can't be served by the vehicle alone and have to go through the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputAction {
    None,
    Reset,
    ToggleCamera,
    ToggleTelemetry,
    Exit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Intent {
    StartDrift,
    StopDrift,
    Nitrous,
}

/// Keyboard driver. Held keys turn into per-frame intents, one-shot keys are queued until the next [`InputHandler::apply`].
#[derive(Debug, Default)]
pub struct InputHandler {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    nitrous_latched: bool,
    pending: Vec<Intent>,
}

impl InputHandler {
    pub fn handle_event(&mut self, event: &InputEvent) -> InputAction {
        match *event {
            InputEvent::KeyPress { key, repeat, .. } => self.press(key, repeat),
            InputEvent::KeyRelease { key, .. } => {
                self.release(key);
                InputAction::None
            }
            InputEvent::WindowClose => InputAction::Exit,
            InputEvent::WindowSizeChange { .. } => InputAction::None,
        }
    }

    /// Issues this frame's intents. Steering is scaled by the frame time, acceleration has to be repeated every frame.
    pub fn apply<V>(&mut self, delta: f32, vehicle: &mut V)
    where
        V: Controllable + VehicleState,
    {
        for intent in self.pending.drain(..) {
            match intent {
                Intent::StartDrift => vehicle.start_drift(),
                Intent::StopDrift => vehicle.stop_drift(),
                Intent::Nitrous => vehicle.activate_nitrous(),
            }
        }

        if self.forward {
            vehicle.accelerate_forward(1.0);
        } else if self.backward {
            vehicle.accelerate_backward();
        }

        let direction = if vehicle.velocity() >= 0.0 { 1.0 } else { -1.0 };
        if self.left {
            vehicle.turn(delta * direction);
        }
        if self.right {
            vehicle.turn(-delta * direction);
        }
    }

    /// Drops held keys, used when the window loses the keyboard or the scene restarts.
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    fn press(&mut self, key: Key, repeat: bool) -> InputAction {
        match key {
            Key::KeyW | Key::ArrowUp => self.forward = true,
            Key::KeyS | Key::ArrowDown => self.backward = true,
            Key::KeyA | Key::ArrowLeft => self.left = true,
            Key::KeyD | Key::ArrowRight => self.right = true,
            Key::Space if !repeat => self.pending.push(Intent::StartDrift),
            Key::KeyF => {
                if !self.nitrous_latched {
                    self.nitrous_latched = true;
                    self.pending.push(Intent::Nitrous);
                }
            }
            Key::KeyC if !repeat => return InputAction::ToggleCamera,
            Key::KeyR if !repeat => return InputAction::Reset,
            Key::F1 if !repeat => return InputAction::ToggleTelemetry,
            Key::Escape => return InputAction::Exit,
            _ => debug!("Ignoring key {:?}", key),
        }

        InputAction::None
    }

    fn release(&mut self, key: Key) {
        match key {
            Key::KeyW | Key::ArrowUp => self.forward = false,
            Key::KeyS | Key::ArrowDown => self.backward = false,
            Key::KeyA | Key::ArrowLeft => self.left = false,
            Key::KeyD | Key::ArrowRight => self.right = false,
            Key::Space => self.pending.push(Intent::StopDrift),
            Key::KeyF => self.nitrous_latched = false,
            _ => {}
        }
    }
}

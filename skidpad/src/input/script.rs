use super::InputEvent;
use super::Key;
use std::collections::VecDeque;

/// Whatever feeds the application loop with input, a window in interactive builds.
pub trait EventSource {
    /// Called once per frame with the time elapsed since the loop started.
    fn begin_frame(&mut self, _time: f32) {}
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Time-stamped list of events, released once the loop clock reaches them.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<(f32, InputEvent)>,
    time: f32,
}

impl ScriptedInput {
    pub fn at(mut self, time: f32, event: InputEvent) -> Self {
        let index = self.events.partition_point(|(at, _)| *at <= time);
        self.events.insert(index, (time, event));
        self
    }

    pub fn press(self, time: f32, key: Key) -> Self {
        self.at(time, InputEvent::press(key))
    }

    pub fn release(self, time: f32, key: Key) -> Self {
        self.at(time, InputEvent::release(key))
    }

    pub fn hold(self, from: f32, to: f32, key: Key) -> Self {
        self.press(from, key).release(to, key)
    }

    pub fn close(self, time: f32) -> Self {
        self.at(time, InputEvent::WindowClose)
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn is_finished(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for ScriptedInput {
    fn begin_frame(&mut self, time: f32) {
        self.time = time;
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        match self.events.front() {
            Some((at, _)) if *at <= self.time => self.events.pop_front().map(|(_, event)| event),
            _ => None,
        }
    }
}

impl EventSource for VecDeque<InputEvent> {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

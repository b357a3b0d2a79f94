use crate::app::ApplicationState;
use crate::input::InputEvent;
use anyhow::Result;
use egui::FullOutput;
use egui::RawInput;

#[derive(Clone, Debug, PartialEq)]
pub enum FrameCommand {
    ChangeScene { name: String },
    ResetScene,
    Exit,
}

pub trait Scene<G> {
    fn activation(&mut self, state: ApplicationState<G>) -> Result<()>;
    fn deactivation(&mut self, state: ApplicationState<G>) -> Result<()>;

    fn input(&mut self, state: ApplicationState<G>, event: InputEvent) -> Result<Option<FrameCommand>>;
    fn frame(&mut self, state: ApplicationState<G>, delta: f32) -> Result<Option<FrameCommand>>;
    fn ui(&mut self, state: ApplicationState<G>, input: RawInput) -> Result<(FullOutput, Option<FrameCommand>)>;

    /// Fresh instance that replaces this scene on [FrameCommand::ResetScene].
    fn reset(&self) -> Box<dyn Scene<G>>;
}

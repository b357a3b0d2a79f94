#![allow(clippy::type_complexity, clippy::too_many_arguments)]

pub mod app;
pub mod audio;
pub mod camera;
pub mod game;
pub mod hud;
pub mod input;
pub mod scene;
pub mod utils;
pub mod vehicle;
pub mod world;

pub use anyhow;
pub use egui;
pub use egui_plot;
pub use fastrand;
pub use glam;
pub use instant;
pub use log;
pub use rustc_hash;

#[cfg(feature = "audio")]
pub use kira;

#[macro_export]
macro_rules! error_return {
    ($($arg:tt)+) => { { log::error!($($arg)+); return; } };
}

#[macro_export]
macro_rules! error_break {
    ($($arg:tt)+) => { { log::error!($($arg)+); break; } };
}

#[macro_export]
macro_rules! error_continue {
    ($($arg:tt)+) => { { log::error!($($arg)+); continue; } };
}

pub mod color;
pub mod json;
pub mod math;
pub mod settings;
pub mod storage;

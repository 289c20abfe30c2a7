//! Manual refinement of a background-removal matte: crop to a selection, or
//! paint parts of the original photo back in and out with a brush.

mod app;
mod async_task;
mod config;
mod display;
mod export;
mod image_utils;
mod mask;
mod session;
mod tool;

pub use app::run_native;
pub use async_task::*;
pub use config::*;
pub use display::*;
pub use export::*;
pub use image_utils::*;
pub use mask::{BrushMode, BrushRadius, BrushSettings, BrushStroke, MaskBuffer, blend};
pub use session::*;
pub use tool::*;

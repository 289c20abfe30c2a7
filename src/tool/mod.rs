mod crop;
mod overlay;
mod rect_selection;
mod retouch;

pub use crop::*;
pub use overlay::*;
pub use rect_selection::*;
pub use retouch::*;

use emath::Pos2;
use image::RgbaImage;

use crate::{DisplayTransform, EditorImages, EncodedImage, ExportError, encode_png};

/// Pointer input in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up,
    /// Pointer left the canvas; ends any drag like `Up`
    Leave,
}

pub trait Tool {
    fn handle_pointer(&mut self, event: PointerEvent, transform: &DisplayTransform);

    /// Full redraw of what the canvas should show for the current state.
    fn render(&self) -> RgbaImage;

    /// The tool's result, or `None` when the current state cannot produce one.
    /// Never modifies the session.
    fn apply(&self) -> Option<RgbaImage>;

    /// Inputs for the next session once this tool's result is committed. The
    /// result becomes the new matte.
    fn edited_images(&self) -> Option<EditorImages>;

    fn commit(&self) -> Result<Option<EncodedImage>, ExportError> {
        self.apply().map(|image| encode_png(&image)).transpose()
    }
}

use std::sync::Arc;

use emath::Pos2;
use image::RgbaImage;
use log::info;

use crate::{
    BrushMode, BrushRadius, BrushSettings, DisplayTransform, EditorImages, MaskBuffer,
    PointerEvent, Tool, mask::blend,
};

/// Opacity of the reference copy of the original drawn over the preview
const REFERENCE_OPACITY: u8 = 128;

/// Ring drawn around the pointer, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushCursor {
    pub center: Pos2,
    pub radius: f32,
    pub color: [u8; 3],
}

/// Brush-based restore/erase over an editable copy of the matte.
#[derive(Debug)]
pub struct RetouchTool {
    images: Arc<EditorImages>,
    mask: MaskBuffer,
    brush: BrushSettings,
    show_original: bool,
    painting: bool,
}

impl RetouchTool {
    pub fn new(images: Arc<EditorImages>, brush: BrushSettings, show_original: bool) -> Self {
        let (width, height) = images.dimensions();
        let mask = MaskBuffer::from_matte(&images.matte, width, height);
        Self {
            images,
            mask,
            brush,
            show_original,
            painting: false,
        }
    }

    pub fn mask(&self) -> &MaskBuffer {
        &self.mask
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn set_brush_mode(&mut self, mode: BrushMode) {
        self.brush.mode = mode;
    }

    /// Clamped to the supported radius range.
    pub fn set_brush_radius(&mut self, radius: u32) {
        self.brush.radius = BrushRadius::new(radius);
    }

    pub fn show_original(&self) -> bool {
        self.show_original
    }

    pub fn set_show_original(&mut self, show: bool) {
        self.show_original = show;
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    /// Paints one dab of the current brush at an image position.
    pub fn stroke_at(&mut self, center: Pos2) {
        self.mask.paint(&self.brush.stroke_at(center));
    }

    /// What the user sees: the masked original, optionally with a faint
    /// copy of the full original on top.
    pub fn display_image(&self) -> RgbaImage {
        let mut canvas = self.export_image();
        if self.show_original {
            blend::composite(&mut canvas, &self.images.original, |dst, src| {
                blend::paint_over(dst, blend::with_opacity(src, REFERENCE_OPACITY))
            });
        }
        canvas
    }

    /// The result without any reference overlay.
    pub fn export_image(&self) -> RgbaImage {
        self.mask.mask_original(&self.images.original)
    }

    pub fn cursor(&self, transform: &DisplayTransform, pointer: Pos2) -> BrushCursor {
        BrushCursor {
            center: pointer,
            radius: transform.to_display_length(self.brush.radius.get() as f32),
            color: self.brush.mode.cursor_color(),
        }
    }
}

impl Tool for RetouchTool {
    fn handle_pointer(&mut self, event: PointerEvent, transform: &DisplayTransform) {
        match event {
            PointerEvent::Down(p) => {
                self.painting = true;
                self.stroke_at(transform.to_image(p));
            }
            PointerEvent::Move(p) if self.painting => self.stroke_at(transform.to_image(p)),
            PointerEvent::Move(_) => {}
            PointerEvent::Up | PointerEvent::Leave => self.painting = false,
        }
    }

    fn render(&self) -> RgbaImage {
        self.display_image()
    }

    fn apply(&self) -> Option<RgbaImage> {
        info!(
            "Applying retouch, {:?} brush r={}",
            self.brush.mode,
            self.brush.radius.get()
        );
        Some(self.export_image())
    }

    fn edited_images(&self) -> Option<EditorImages> {
        Some(EditorImages::new(self.images.original.clone(), self.export_image()))
    }
}

#[cfg(test)]
mod tests {
    use emath::{Rect, Vec2, pos2};
    use image::Rgba;

    use super::*;

    fn images() -> Arc<EditorImages> {
        let original = RgbaImage::from_fn(40, 40, |x, y| Rgba([x as u8 * 5, y as u8 * 5, 90, 255]));
        let matte = RgbaImage::from_fn(40, 40, |x, y| {
            let mut p = *original.get_pixel(x, y);
            if x >= 20 {
                p.0[3] = 0;
            }
            p
        });
        Arc::new(EditorImages::new(original, matte))
    }

    fn identity() -> DisplayTransform {
        DisplayTransform::new(Rect::from_min_size(pos2(0.0, 0.0), Vec2::splat(40.0)), 40, 40)
            .unwrap()
    }

    #[test]
    fn starts_from_the_matte() {
        let images = images();
        let tool = RetouchTool::new(images.clone(), BrushSettings::default(), false);
        assert_eq!(tool.mask().as_image(), &images.matte);
        assert_eq!(tool.display_image().get_pixel(5, 5), images.original.get_pixel(5, 5));
        assert_eq!(tool.display_image().get_pixel(30, 5).0[3], 0);
    }

    #[test]
    fn restore_brings_back_original_pixels() {
        let images = images();
        let mut tool = RetouchTool::new(images.clone(), BrushSettings::default(), false);
        tool.set_brush_radius(5);
        tool.stroke_at(pos2(30.0, 30.0));
        assert_eq!(tool.export_image().get_pixel(30, 30), images.original.get_pixel(30, 30));
    }

    #[test]
    fn erase_wins_over_restore() {
        let mut tool = RetouchTool::new(images(), BrushSettings::default(), true);
        let t = identity();
        tool.handle_pointer(PointerEvent::Down(pos2(20.0, 20.0)), &t);
        tool.handle_pointer(PointerEvent::Up, &t);
        tool.set_brush_mode(BrushMode::Erase);
        tool.handle_pointer(PointerEvent::Down(pos2(20.0, 20.0)), &t);
        tool.handle_pointer(PointerEvent::Up, &t);
        for (x, y) in [(20, 20), (19, 19), (35, 20), (20, 5)] {
            assert_eq!(tool.mask().alpha_at(x, y), Some(0), "({x}, {y})");
        }
    }

    #[test]
    fn moves_paint_only_while_pressed() {
        let images = images();
        let mut tool = RetouchTool::new(images.clone(), BrushSettings::default(), false);
        tool.set_brush_radius(5);
        let t = identity();
        tool.handle_pointer(PointerEvent::Move(pos2(30.0, 30.0)), &t);
        assert_eq!(tool.mask().as_image(), &images.matte);

        tool.handle_pointer(PointerEvent::Down(pos2(30.0, 10.0)), &t);
        tool.handle_pointer(PointerEvent::Move(pos2(30.0, 30.0)), &t);
        tool.handle_pointer(PointerEvent::Leave, &t);
        assert!(!tool.is_painting());
        assert_eq!(tool.mask().alpha_at(30, 30), Some(255));
        tool.handle_pointer(PointerEvent::Move(pos2(30.0, 20.0)), &t);
        assert_eq!(tool.mask().alpha_at(30, 20), Some(0));
    }

    #[test]
    fn reference_overlay_does_not_leak_into_export() {
        let mut shown = RetouchTool::new(images(), BrushSettings::default(), true);
        let mut hidden = RetouchTool::new(images(), BrushSettings::default(), false);
        for tool in [&mut shown, &mut hidden] {
            tool.set_brush_radius(5);
            tool.stroke_at(pos2(25.0, 25.0));
        }
        // Outside the disc the right half is still removed, so only the
        // preview differs there
        assert_eq!(hidden.display_image().get_pixel(35, 5).0[3], 0);
        assert_eq!(shown.display_image().get_pixel(35, 5).0[3], 128);
        assert_eq!(shown.apply(), hidden.apply());
        assert_eq!(shown.apply().unwrap().get_pixel(35, 5).0, [0, 0, 0, 0]);
        assert_eq!(shown.commit().unwrap(), hidden.commit().unwrap());
    }

    #[test]
    fn reference_overlay_shows_removed_area_faintly() {
        let tool = RetouchTool::new(images(), BrushSettings::default(), true);
        assert_eq!(tool.display_image().get_pixel(30, 5).0[3], 128);
        assert_eq!(tool.display_image().get_pixel(5, 5).0[3], 255);
    }

    #[test]
    fn cursor_radius_follows_display_scale() {
        let tool = RetouchTool::new(images(), BrushSettings::default(), false);
        // 40px image shown at 80 points
        let rendered = Rect::from_min_size(pos2(0.0, 0.0), Vec2::splat(80.0));
        let t = DisplayTransform::new(rendered, 40, 40).unwrap();
        let cursor = tool.cursor(&t, pos2(10.0, 10.0));
        assert_eq!(cursor.radius, 60.0);
        assert_eq!(cursor.color, BrushMode::Restore.cursor_color());
    }
}

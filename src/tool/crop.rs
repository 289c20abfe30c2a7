use std::sync::Arc;

use emath::{Pos2, Vec2};
use image::RgbaImage;
use log::{debug, info};

use crate::{DisplayTransform, EditorImages, OverlayStyle, PixelRect, PointerEvent, Selection, Tool};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum CropState {
    #[default]
    Idle,
    Dragging(Selection),
    Committed(Selection),
}

/// Rounded selection figures for the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionInfo {
    pub width: u32,
    pub height: u32,
    pub position: (u32, u32),
}

/// Rectangular selection over the matte, producing a cropped copy.
#[derive(Debug)]
pub struct CropTool {
    images: Arc<EditorImages>,
    style: OverlayStyle,
    state: CropState,
}

impl CropTool {
    pub fn new(images: Arc<EditorImages>, style: OverlayStyle) -> Self {
        Self {
            images,
            style,
            state: CropState::Idle,
        }
    }

    fn bounds(&self) -> Vec2 {
        let (width, height) = self.images.matte.dimensions();
        Vec2::new(width as f32, height as f32)
    }

    fn clamp(&self, point: Pos2) -> Pos2 {
        point.clamp(Pos2::ZERO, self.bounds().to_pos2())
    }

    pub fn selection(&self) -> Option<Selection> {
        match self.state {
            CropState::Idle => None,
            CropState::Dragging(s) | CropState::Committed(s) => Some(s),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, CropState::Dragging(_))
    }

    /// Starts a new drag at an image position, discarding any previous selection.
    pub fn begin_drag(&mut self, point: Pos2) {
        self.state = CropState::Dragging(Selection::start(self.clamp(point)));
    }

    pub fn drag_to(&mut self, point: Pos2) {
        if let CropState::Dragging(selection) = self.state {
            self.state = CropState::Dragging(selection.drag_to(self.clamp(point)));
        }
    }

    pub fn end_drag(&mut self) {
        if let CropState::Dragging(selection) = self.state {
            debug!("Selection frozen at {:?}", selection.rect());
            self.state = CropState::Committed(selection.freeze());
        }
    }

    pub fn select_all(&mut self) {
        self.state = CropState::Committed(Selection::full(self.bounds()));
    }

    pub fn clear(&mut self) {
        self.state = CropState::Idle;
    }

    pub fn info(&self) -> Option<SelectionInfo> {
        self.selection().map(|s| SelectionInfo {
            width: s.width.round() as u32,
            height: s.height.round() as u32,
            position: (s.x.round() as u32, s.y.round() as u32),
        })
    }

    fn valid_pixel_rect(&self) -> Option<PixelRect> {
        let selection = self.selection()?;
        if !(selection.width > 0.0 && selection.height > 0.0) {
            return None;
        }
        Some(selection.pixel_rect()).filter(|r| !r.is_empty())
    }

    /// Whether applying would produce an image.
    pub fn can_apply(&self) -> bool {
        self.valid_pixel_rect().is_some()
    }
}

impl Tool for CropTool {
    fn handle_pointer(&mut self, event: PointerEvent, transform: &DisplayTransform) {
        match event {
            PointerEvent::Down(p) => self.begin_drag(transform.to_image_clamped(p)),
            PointerEvent::Move(p) => self.drag_to(transform.to_image_clamped(p)),
            PointerEvent::Up | PointerEvent::Leave => self.end_drag(),
        }
    }

    fn render(&self) -> RgbaImage {
        let mut canvas = self.images.matte.clone();
        if let Some(selection) = self.selection() {
            self.style.draw(&mut canvas, selection.pixel_rect());
        }
        canvas
    }

    fn apply(&self) -> Option<RgbaImage> {
        let Some(PixelRect {
            x,
            y,
            width,
            height,
        }) = self.valid_pixel_rect()
        else {
            debug!("Crop rejected, no selection with area");
            return None;
        };
        info!("Cropping {width}x{height} at ({x}, {y})");
        Some(image::imageops::crop_imm(&self.images.matte, x, y, width, height).to_image())
    }

    fn edited_images(&self) -> Option<EditorImages> {
        self.valid_pixel_rect().map(|rect| self.images.cropped(rect))
    }
}

#[cfg(test)]
mod tests {
    use emath::{Rect, pos2};
    use image::Rgba;
    use itertools::iproduct;

    use super::*;

    fn tool(width: u32, height: u32) -> CropTool {
        let matte = RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let original = RgbaImage::from_pixel(width, height, Rgba([9, 9, 9, 255]));
        CropTool::new(
            Arc::new(EditorImages::new(original, matte)),
            OverlayStyle::default(),
        )
    }

    fn drag(tool: &mut CropTool, from: Pos2, to: Pos2) {
        tool.begin_drag(from);
        tool.drag_to(to);
        tool.end_drag();
    }

    #[test]
    fn crop_copies_sub_rectangle() {
        let mut tool = tool(100, 100);
        drag(&mut tool, pos2(60.0, 50.0), pos2(10.0, 10.0));
        let cropped = tool.apply().unwrap();
        assert_eq!(cropped.dimensions(), (50, 40));
        for (i, j) in iproduct!(0..50, 0..40) {
            assert_eq!(
                cropped.get_pixel(i, j),
                tool.images.matte.get_pixel(10 + i, 10 + j)
            );
        }
    }

    #[test]
    fn select_all_is_idempotent() {
        let mut tool = tool(30, 20);
        tool.select_all();
        let first = tool.selection();
        tool.select_all();
        assert_eq!(tool.selection(), first);
        let s = first.unwrap();
        assert_eq!((s.x, s.y, s.width, s.height), (0.0, 0.0, 30.0, 20.0));
    }

    #[test]
    fn zero_area_selection_is_rejected() {
        let mut tool = tool(30, 20);
        drag(&mut tool, pos2(5.0, 5.0), pos2(5.0, 15.0));
        let before = tool.selection();
        assert!(!tool.can_apply());
        assert_eq!(tool.apply(), None);
        assert_eq!(tool.selection(), before);

        tool.clear();
        assert!(!tool.can_apply());
        assert_eq!(tool.apply(), None);
    }

    #[test]
    fn new_drag_replaces_selection() {
        let mut tool = tool(30, 20);
        drag(&mut tool, pos2(1.0, 1.0), pos2(10.0, 10.0));
        tool.begin_drag(pos2(20.0, 15.0));
        let s = tool.selection().unwrap();
        assert!(s.is_dragging());
        assert_eq!((s.x, s.y, s.width, s.height), (20.0, 15.0, 0.0, 0.0));
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut tool = tool(30, 20);
        tool.drag_to(pos2(5.0, 5.0));
        assert_eq!(tool.selection(), None);
        drag(&mut tool, pos2(1.0, 1.0), pos2(10.0, 10.0));
        let frozen = tool.selection();
        tool.drag_to(pos2(25.0, 18.0));
        assert_eq!(tool.selection(), frozen);
    }

    #[test]
    fn pointer_events_are_clamped() {
        let mut tool = tool(100, 50);
        // Rendered at double size
        let transform = DisplayTransform::new(
            Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(200.0, 100.0)),
            100,
            50,
        )
        .unwrap();
        tool.handle_pointer(PointerEvent::Down(pos2(20.0, 20.0)), &transform);
        tool.handle_pointer(PointerEvent::Move(pos2(500.0, -300.0)), &transform);
        tool.handle_pointer(PointerEvent::Leave, &transform);
        let s = tool.selection().unwrap();
        assert!(!s.is_dragging());
        assert_eq!((s.x, s.y, s.width, s.height), (10.0, 0.0, 90.0, 10.0));
        assert_eq!(
            tool.info(),
            Some(SelectionInfo {
                width: 90,
                height: 10,
                position: (10, 0)
            })
        );
    }

    #[test]
    fn edited_images_match_the_crop() {
        let mut tool = tool(30, 20);
        assert_eq!(tool.edited_images(), None);
        drag(&mut tool, pos2(4.0, 2.0), pos2(14.0, 12.0));
        let edited = tool.edited_images().unwrap();
        assert_eq!(Some(edited.matte), tool.apply());
        assert_eq!(edited.original.dimensions(), (10, 10));
    }

    #[test]
    fn render_without_selection_is_matte() {
        let tool = tool(10, 10);
        assert_eq!(tool.render(), tool.images.matte);
    }
}

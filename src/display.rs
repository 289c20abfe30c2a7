use emath::{Pos2, Rect, Vec2};

/// Maps between the on-screen rectangle an image is rendered into and the
/// image's pixel buffer. Build it fresh from the current layout for every
/// pointer event; the rendered size changes with the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    rendered: Rect,
    buffer_size: Vec2,
}

impl DisplayTransform {
    /// Returns `None` for a collapsed element or an empty buffer.
    pub fn new(rendered: Rect, buffer_width: u32, buffer_height: u32) -> Option<Self> {
        let size = rendered.size();
        if !(size.x > 0.0 && size.y > 0.0) || buffer_width == 0 || buffer_height == 0 {
            return None;
        }
        Some(Self {
            rendered,
            buffer_size: Vec2::new(buffer_width as f32, buffer_height as f32),
        })
    }

    /// Largest aspect-preserving rectangle centered in `available`.
    pub fn fit(available: Rect, buffer_width: u32, buffer_height: u32) -> Option<Self> {
        let size = Vec2::new(buffer_width as f32, buffer_height as f32);
        let scale = (available.width() / size.x).min(available.height() / size.y);
        Self::new(
            Rect::from_center_size(available.center(), size * scale),
            buffer_width,
            buffer_height,
        )
    }

    pub fn rendered(&self) -> Rect {
        self.rendered
    }

    /// Buffer pixels per display point, per axis.
    pub fn scale(&self) -> Vec2 {
        self.buffer_size / self.rendered.size()
    }

    /// Unclamped image coordinates; may lie outside the buffer.
    pub fn to_image(&self, pointer: Pos2) -> Pos2 {
        ((pointer - self.rendered.min) * self.scale()).to_pos2()
    }

    /// Image coordinates clamped to `[0, width] x [0, height]`.
    pub fn to_image_clamped(&self, pointer: Pos2) -> Pos2 {
        self.to_image(pointer).clamp(Pos2::ZERO, self.buffer_size.to_pos2())
    }

    pub fn to_display(&self, image: Pos2) -> Pos2 {
        self.rendered.min + image.to_vec2() / self.scale()
    }

    /// Converts a horizontal image-space length (e.g. a brush radius) into display points.
    pub fn to_display_length(&self, length: f32) -> f32 {
        length / self.scale().x
    }
}

use image::RgbaImage;
use log::{debug, warn};

pub mod blend;
mod brush;

pub use brush::*;

use blend::{OPAQUE_WHITE, Pixel};

/// Editable copy of the matte. Always has the dimensions of the original image.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBuffer(RgbaImage);

impl MaskBuffer {
    /// Starts from the matte pixels, so the unedited mask reproduces the matte exactly.
    /// A matte of different size is anchored at the origin; uncovered pixels stay transparent.
    pub fn from_matte(matte: &RgbaImage, width: u32, height: u32) -> Self {
        if matte.dimensions() == (width, height) {
            return Self(matte.clone());
        }
        warn!(
            "Matte is {:?}, original is {:?}. Copying the overlapping region only",
            matte.dimensions(),
            (width, height)
        );
        let mut buffer = RgbaImage::new(width, height);
        blend::composite(&mut buffer, matte, |_, src| src);
        Self(buffer)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        self.0.get_pixel_checked(x, y).map(|p| p.0[3])
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    /// Applies a single dab. Parts of the disc outside the buffer are ignored.
    pub fn paint(&mut self, stroke: &BrushStroke) {
        let (width, height) = self.0.dimensions();
        let op: fn(Pixel, Pixel) -> Pixel = match stroke.mode {
            BrushMode::Restore => blend::paint_over,
            BrushMode::Erase => blend::subtract,
        };
        let pixels = blend::pixels_mut(&mut self.0);
        let mut touched = 0usize;
        for (row, columns) in stroke.spans(width, height) {
            let offset = row as usize * width as usize;
            let run = &mut pixels[offset + columns.start as usize..offset + columns.end as usize];
            for pixel in run {
                *pixel = op(*pixel, OPAQUE_WHITE);
            }
            touched += columns.len();
        }
        debug!(
            "{:?} stroke at {:?} r={} touched {touched} pixels",
            stroke.mode, stroke.center, stroke.radius
        );
    }

    /// `original` kept only where the mask is present, on a fresh buffer.
    pub fn mask_original(&self, original: &RgbaImage) -> RgbaImage {
        let mut out = original.clone();
        blend::composite(&mut out, &self.0, blend::keep_where);
        out
    }
}

use image::RgbaImage;
use itertools::iproduct;

use crate::{
    PixelRect,
    mask::blend::{self, Pixel},
};

/// Look of the crop overlay, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Opacity of the black layer over the unselected area
    pub dim_opacity: u8,
    pub border_color: [u8; 3],
    pub border_width: u32,
    pub dash_length: u32,
    pub handle_size: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            dim_opacity: 128,
            border_color: [0x25, 0x63, 0xeb],
            border_width: 2,
            dash_length: 5,
            handle_size: 8,
        }
    }
}

impl OverlayStyle {
    fn border_pixel(&self) -> Pixel {
        let [r, g, b] = self.border_color;
        [r, g, b, 255]
    }

    /// Draws the selection decoration onto `canvas`.
    pub fn draw(&self, canvas: &mut RgbaImage, selection: PixelRect) {
        let (width, height) = canvas.dimensions();
        let (width, height) = (width as i64, height as i64);
        let left = selection.x as i64;
        let top = selection.y as i64;
        let right = left + selection.width as i64;
        let bottom = top + selection.height as i64;

        // Four strips around the selection, partitioning the outside exactly
        let dim = [0, 0, 0, self.dim_opacity];
        for [x0, y0, x1, y1] in [
            [0, 0, width, top],
            [0, bottom, width, height],
            [0, top, left, bottom],
            [right, top, width, bottom],
        ] {
            fill_rect(canvas, [x0, y0, x1, y1], |d| blend::paint_over(d, dim));
        }

        self.draw_dashed_border(canvas, [left, top, right, bottom]);

        let border = self.border_pixel();
        let handle = self.handle_size as i64;
        for (cx, cy) in iproduct!([left, right], [top, bottom]) {
            let x0 = cx - handle / 2;
            let y0 = cy - handle / 2;
            fill_rect(canvas, [x0, y0, x0 + handle, y0 + handle], |_| border);
        }
    }

    fn draw_dashed_border(&self, canvas: &mut RgbaImage, [left, top, right, bottom]: [i64; 4]) {
        let stroke = self.border_width as i64;
        if stroke == 0 {
            return;
        }
        let half = stroke / 2;
        let dash = self.dash_length.max(1) as i64;
        let border = self.border_pixel();
        let on = |offset: i64| (offset / dash) % 2 == 0;

        let x_start = left - half;
        let x_end = right - half + stroke;
        let y_start = top - half;
        let y_end = bottom - half + stroke;

        // Rows or columns covered by the stroke of one edge
        let band = |edge: i64| edge - half..edge - half + stroke;

        for x in (x_start..x_end).filter(|&x| on(x - x_start)) {
            for y in band(top).chain(band(bottom)) {
                put_pixel(canvas, x, y, border);
            }
        }
        for y in (y_start..y_end).filter(|&y| on(y - y_start)) {
            for x in band(left).chain(band(right)) {
                put_pixel(canvas, x, y, border);
            }
        }
    }
}

fn put_pixel(canvas: &mut RgbaImage, x: i64, y: i64, pixel: Pixel) {
    if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y))
        && x < canvas.width()
        && y < canvas.height()
    {
        canvas.put_pixel(x, y, image::Rgba(pixel));
    }
}

/// Applies `op` to every pixel in `[x0, x1) x [y0, y1)`, clipped to the canvas.
fn fill_rect(canvas: &mut RgbaImage, [x0, y0, x1, y1]: [i64; 4], op: impl Fn(Pixel) -> Pixel) {
    let (width, height) = canvas.dimensions();
    let x0 = x0.clamp(0, width as i64) as usize;
    let x1 = x1.clamp(0, width as i64) as usize;
    let y0 = y0.clamp(0, height as i64) as usize;
    let y1 = y1.clamp(0, height as i64) as usize;
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    let pixels = blend::pixels_mut(canvas);
    for y in y0..y1 {
        let row = y * width as usize;
        for pixel in &mut pixels[row + x0..row + x1] {
            *pixel = op(*pixel);
        }
    }
}

//! Pixel combination rules on straight (non-premultiplied) RGBA8.
//!
//! The math runs on premultiplied values and converts back, so a fully
//! transparent result is always `[0, 0, 0, 0]`.

use image::RgbaImage;

pub type Pixel = [u8; 4];

pub const TRANSPARENT: Pixel = [0, 0, 0, 0];
pub const OPAQUE_WHITE: Pixel = [255, 255, 255, 255];

/// `a * b / 255`, rounded to nearest.
#[inline]
pub fn mul_div255(a: u8, b: u8) -> u8 {
    let x = a as u32 * b as u32 + 128;
    ((x + (x >> 8)) >> 8) as u8
}

/// Source-over: `src` is painted on top of `dst`.
pub fn paint_over(dst: Pixel, src: Pixel) -> Pixel {
    let sa = src[3] as u32;
    match sa {
        255 => return src,
        0 => return dst,
        _ => {}
    }
    let da = dst[3] as u32;
    let inv = 255 - sa;
    // Resulting alpha, scaled by 255
    let alpha_255 = sa * 255 + da * inv;
    if alpha_255 == 0 {
        return TRANSPARENT;
    }
    let channel = |i: usize| {
        let premultiplied = src[i] as u32 * sa * 255 + dst[i] as u32 * da * inv;
        ((premultiplied + alpha_255 / 2) / alpha_255) as u8
    };
    [
        channel(0),
        channel(1),
        channel(2),
        ((alpha_255 + 127) / 255) as u8,
    ]
}

/// Destination-out: removes `dst` coverage where `src` is present.
pub fn subtract(dst: Pixel, src: Pixel) -> Pixel {
    with_alpha(dst, mul_div255(dst[3], 255 - src[3]))
}

/// Destination-in: keeps `dst` only where `src` is present.
pub fn keep_where(dst: Pixel, src: Pixel) -> Pixel {
    with_alpha(dst, mul_div255(dst[3], src[3]))
}

/// Scales the alpha of `src` by `opacity` (255 = unchanged).
pub fn with_opacity(src: Pixel, opacity: u8) -> Pixel {
    with_alpha(src, mul_div255(src[3], opacity))
}

fn with_alpha([r, g, b, _]: Pixel, alpha: u8) -> Pixel {
    if alpha == 0 {
        TRANSPARENT
    } else {
        [r, g, b, alpha]
    }
}

pub(crate) fn pixels(image: &RgbaImage) -> &[Pixel] {
    bytemuck::cast_slice(image.as_raw())
}

pub(crate) fn pixels_mut(image: &mut RgbaImage) -> &mut [Pixel] {
    bytemuck::cast_slice_mut(&mut **image)
}

/// Combines `src` into `dst` pixel by pixel, both anchored at the origin.
/// Only the overlapping region is touched.
pub fn composite(dst: &mut RgbaImage, src: &RgbaImage, op: impl Fn(Pixel, Pixel) -> Pixel) {
    let (dst_width, dst_height) = dst.dimensions();
    let (src_width, src_height) = src.dimensions();
    let width = dst_width.min(src_width) as usize;
    let height = dst_height.min(src_height) as usize;
    if width == 0 || height == 0 {
        return;
    }

    let src_rows = pixels(src).chunks_exact(src_width as usize);
    let dst_rows = pixels_mut(dst).chunks_exact_mut(dst_width as usize);
    for (dst_row, src_row) in dst_rows.zip(src_rows).take(height) {
        for (d, s) in dst_row[..width].iter_mut().zip(&src_row[..width]) {
            *d = op(*d, *s);
        }
    }
}

use std::path::PathBuf;

use futures::{FutureExt, future::BoxFuture};
use image::{RgbaImage, imageops};
use log::{info, warn};

use crate::PixelRect;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unable to load image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unable to load image: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to load image: loader stopped before finishing")]
    Cancelled,
}

/// Decodes PNG, JPEG or WebP bytes into straight RGBA8.
pub fn load_image(bytes: &[u8]) -> Result<RgbaImage, LoadError> {
    Ok(image::load_from_memory(bytes)?.into_rgba8())
}

/// The two read-only inputs of an editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorImages {
    /// The photo as taken, fully opaque
    pub original: RgbaImage,
    /// The photo with its background removed
    pub matte: RgbaImage,
}

impl EditorImages {
    pub fn new(original: RgbaImage, matte: RgbaImage) -> Self {
        if original.dimensions() != matte.dimensions() {
            warn!(
                "Original {:?} and matte {:?} differ in size",
                original.dimensions(),
                matte.dimensions()
            );
        }
        Self { original, matte }
    }

    pub fn from_memory(original: &[u8], matte: &[u8]) -> Result<Self, LoadError> {
        Ok(Self::new(load_image(original)?, load_image(matte)?))
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.original.dimensions()
    }

    /// Both images cut to the same rectangle, so they stay aligned.
    pub fn cropped(&self, rect: PixelRect) -> Self {
        let PixelRect {
            x,
            y,
            width,
            height,
        } = rect;
        Self::new(
            imageops::crop_imm(&self.original, x, y, width, height).to_image(),
            imageops::crop_imm(&self.matte, x, y, width, height).to_image(),
        )
    }

    /// Reads and decodes both files on a background thread.
    pub fn load_files(
        original: PathBuf,
        matte: PathBuf,
    ) -> BoxFuture<'static, Result<Self, LoadError>> {
        let (tx, rx) = futures::channel::oneshot::channel();
        std::thread::spawn(move || {
            let result = std::fs::read(&original)
                .map_err(LoadError::from)
                .and_then(|original_bytes| {
                    let matte_bytes = std::fs::read(&matte)?;
                    Self::from_memory(&original_bytes, &matte_bytes)
                });
            if let Ok(images) = &result {
                info!(
                    "Loaded {} and {} ({:?})",
                    original.display(),
                    matte.display(),
                    images.dimensions()
                );
            }
            // Receiver is gone when the session was dropped meanwhile
            let _ = tx.send(result);
        });
        async move { rx.await.unwrap_or_else(|_| Err(LoadError::Cancelled)) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::encode_png;

    #[test]
    fn decodes_png_bytes() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let bytes = encode_png(&image).unwrap();
        assert_eq!(load_image(bytes.as_bytes()).unwrap(), image);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = load_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
        assert!(err.to_string().starts_with("unable to load image"));
    }

    #[test]
    fn cropping_keeps_images_aligned() {
        let images = EditorImages::new(
            RgbaImage::from_fn(10, 8, |x, y| Rgba([x as u8, y as u8, 1, 255])),
            RgbaImage::from_fn(10, 8, |x, y| Rgba([x as u8, y as u8, 2, 100])),
        );
        let cropped = images.cropped(PixelRect {
            x: 2,
            y: 3,
            width: 4,
            height: 5,
        });
        assert_eq!(cropped.dimensions(), (4, 5));
        assert_eq!(cropped.original.get_pixel(0, 0).0, [2, 3, 1, 255]);
        assert_eq!(cropped.matte.get_pixel(3, 4).0, [5, 7, 2, 100]);
    }

    #[test]
    fn missing_file_fails_the_load() {
        let result = futures::executor::block_on(EditorImages::load_files(
            "does/not/exist.png".into(),
            "does/not/exist_either.png".into(),
        ));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}

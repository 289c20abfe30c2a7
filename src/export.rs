use std::{io::Cursor, path::Path};

use image::{ImageFormat, RgbaImage};

use crate::{LoadError, load_image};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unable to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// A finished artifact: standalone PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(Vec<u8>);

impl EncodedImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn decode(&self) -> Result<RgbaImage, LoadError> {
        load_image(&self.0)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.0)
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<EncodedImage, ExportError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(EncodedImage(bytes))
}

/// Download name for a processed image, `photo` -> `no_bg_photo.png`.
pub fn output_file_name(stem: &str) -> String {
    format!("no_bg_{stem}.png")
}

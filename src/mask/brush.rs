use std::ops::Range;

use emath::Pos2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushMode {
    /// Makes the mask opaque under the brush
    #[default]
    Restore,
    /// Makes the mask transparent under the brush
    Erase,
}

impl BrushMode {
    /// Color of the on-screen brush ring
    pub fn cursor_color(self) -> [u8; 3] {
        match self {
            BrushMode::Restore => [0x05, 0x96, 0x69],
            BrushMode::Erase => [0xdc, 0x26, 0x26],
        }
    }
}

/// Brush radius in image pixels, always within `MIN..=MAX`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(from = "u32", into = "u32")]
pub struct BrushRadius(u32);

impl BrushRadius {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 100;

    pub fn new(radius: u32) -> Self {
        Self(radius.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for BrushRadius {
    fn default() -> Self {
        Self(30)
    }
}

impl From<u32> for BrushRadius {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<BrushRadius> for u32 {
    fn from(value: BrushRadius) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct BrushSettings {
    pub radius: BrushRadius,
    pub mode: BrushMode,
}

impl BrushSettings {
    pub fn stroke_at(self, center: Pos2) -> BrushStroke {
        BrushStroke {
            center,
            radius: self.radius.get() as f32,
            mode: self.mode,
        }
    }
}

/// A single dab of the brush in image coordinates. The center may lie
/// outside the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStroke {
    pub center: Pos2,
    pub radius: f32,
    pub mode: BrushMode,
}

impl BrushStroke {
    /// Horizontal pixel runs covered by the disc, clipped to `width` x `height`.
    /// A pixel is covered when its center lies within the radius.
    pub fn spans(
        &self,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (u32, Range<u32>)> + use<> {
        let Pos2 { x: cx, y: cy } = self.center;
        let radius = self.radius;
        let valid = cx.is_finite() && cy.is_finite() && radius > 0.0 && width > 0 && height > 0;

        let (first_row, last_row) = if valid {
            (
                ((cy - radius - 0.5).ceil().max(0.0)) as i64,
                ((cy + radius - 0.5).floor().min(height as f32 - 1.0)) as i64,
            )
        } else {
            (0, -1)
        };

        (first_row..=last_row).filter_map(move |row| {
            let dy = row as f32 + 0.5 - cy;
            let half = (radius * radius - dy * dy).sqrt();
            if half.is_nan() {
                return None;
            }
            let start = (cx - half - 0.5).ceil().max(0.0);
            let end = (cx + half - 0.5).floor().min(width as f32 - 1.0);
            (start <= end).then(|| (row as u32, start as u32..end as u32 + 1))
        })
    }
}

use emath::{Pos2, Rect, Vec2, pos2};

/// Rectangle in image coordinates. While a drag is running `anchor` holds the
/// point where it started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    anchor: Option<Pos2>,
}

/// Selection snapped to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Selection {
    /// Zero-sized selection anchored at `point`.
    pub fn start(point: Pos2) -> Self {
        Self {
            x: point.x,
            y: point.y,
            width: 0.0,
            height: 0.0,
            anchor: Some(point),
        }
    }

    /// Covers `[0, width] x [0, height]`, not dragging.
    pub fn full(size: Vec2) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.x,
            height: size.y,
            anchor: None,
        }
    }

    /// Rectangle spanned by the anchor and `point`, whatever the drag direction.
    /// A frozen selection is returned unchanged.
    pub fn drag_to(self, point: Pos2) -> Self {
        let Some(anchor) = self.anchor else {
            return self;
        };
        Self {
            x: anchor.x.min(point.x),
            y: anchor.y.min(point.y),
            width: (point.x - anchor.x).abs(),
            height: (point.y - anchor.y).abs(),
            anchor: Some(anchor),
        }
    }

    pub fn freeze(self) -> Self {
        Self {
            anchor: None,
            ..self
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(pos2(self.x, self.y), Vec2::new(self.width, self.height))
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.rect().contains(point)
    }

    /// Edges rounded to the nearest pixel boundary.
    pub fn pixel_rect(&self) -> PixelRect {
        let left = self.x.round().max(0.0);
        let top = self.y.round().max(0.0);
        let right = (self.x + self.width).round().max(left);
        let bottom = (self.y + self.height).round().max(top);
        PixelRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::iproduct;

    use super::*;

    #[test]
    fn normalizes_every_drag_direction() {
        let corners = [pos2(10.0, 20.0), pos2(70.0, 5.0)];
        for (&a, &b) in iproduct!(&corners, &corners) {
            for (start, end) in [
                (a, b),
                (pos2(a.x, b.y), pos2(b.x, a.y)),
                (b, a),
                (pos2(b.x, a.y), pos2(a.x, b.y)),
            ] {
                let s = Selection::start(start).drag_to(end);
                assert_eq!(s.x, start.x.min(end.x));
                assert_eq!(s.y, start.y.min(end.y));
                assert!(s.width >= 0.0 && s.height >= 0.0);
                assert!(s.contains(start), "{s:?} misses {start:?}");
                assert!(s.contains(end), "{s:?} misses {end:?}");
            }
        }
    }

    #[test]
    fn drag_keeps_original_anchor() {
        let s = Selection::start(pos2(50.0, 50.0))
            .drag_to(pos2(10.0, 10.0))
            .drag_to(pos2(60.0, 80.0));
        assert_eq!((s.x, s.y, s.width, s.height), (50.0, 50.0, 10.0, 30.0));
    }

    #[test]
    fn frozen_selection_ignores_drag() {
        let s = Selection::start(pos2(1.0, 1.0)).drag_to(pos2(5.0, 5.0)).freeze();
        assert!(!s.is_dragging());
        assert_eq!(s.drag_to(pos2(100.0, 100.0)), s);
    }

    #[test]
    fn pixel_rect_rounds_edges() {
        let s = Selection::start(pos2(10.4, 9.6)).drag_to(pos2(60.6, 49.4));
        assert_eq!(
            s.pixel_rect(),
            PixelRect {
                x: 10,
                y: 10,
                width: 51,
                height: 39
            }
        );
        assert!(Selection::start(pos2(3.0, 3.0)).pixel_rect().is_empty());
    }
}

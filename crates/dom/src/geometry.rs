use serde::Deserialize;

/// An axis-aligned box in CSS pixels.
///
/// Layout boxes are in document coordinates; viewport-relative boxes are
/// derived by subtracting the scroll offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Same box moved by `(dx, dy)`.
    #[inline]
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlapping region, `None` when the boxes are disjoint.
    /// Touching edges produce a zero-sized intersection.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right >= left && bottom >= top).then(|| Self::new(left, top, right - left, bottom - top))
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn disjoint_boxes_have_no_intersection() {
        let upper = Rect::new(0.0, 0.0, 100.0, 100.0);
        let lower = Rect::new(0.0, 200.0, 100.0, 100.0);
        assert_eq!(upper.intersection(&lower), None);
    }

    #[test]
    fn overlap_is_clipped_to_both_boxes() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let card = Rect::new(100.0, 700.0, 200.0, 200.0);
        let overlap = viewport.intersection(&card);
        assert_eq!(overlap, Some(Rect::new(100.0, 700.0, 200.0, 100.0)));
        assert!((overlap.map_or(0.0, |rect| rect.area()) / card.area() - 0.5).abs() < f64::EPSILON);
    }
}

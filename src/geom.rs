use std::ops::AddAssign;

use cgmath::Point2;

/// The extent of a set of values along one axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new() -> Range {
        Range {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

impl Default for Range {
    fn default() -> Self {
        Range::new()
    }
}

impl AddAssign<f64> for Range {
    fn add_assign(&mut self, rhs: f64) {
        self.min = self.min.min(rhs);
        self.max = self.max.max(rhs);
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub top_left: Point2<f64>,
    pub bottom_right: Point2<f64>,
}

impl BoundingBox {
    pub fn new(top_left: Point2<f64>, bottom_right: Point2<f64>) -> BoundingBox {
        debug_assert!(top_left.x <= bottom_right.x && top_left.y <= bottom_right.y);
        BoundingBox {
            top_left,
            bottom_right,
        }
    }

    /// The smallest box containing every point, or `None` for an empty slice.
    pub fn of(points: &[Point2<f64>]) -> Option<BoundingBox> {
        let mut x_range = Range::new();
        let mut y_range = Range::new();
        for p in points {
            x_range += p.x;
            y_range += p.y;
        }

        if x_range.is_empty() || y_range.is_empty() {
            return None;
        }

        Some(BoundingBox::new(
            Point2::new(x_range.min, y_range.min),
            Point2::new(x_range.max, y_range.max),
        ))
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let points = [
            Point2::new(1.0, 5.0),
            Point2::new(-2.0, 3.0),
            Point2::new(4.0, -1.0),
        ];
        let bounds = BoundingBox::of(&points).unwrap();
        assert_eq!(bounds.top_left, Point2::new(-2.0, -1.0));
        assert_eq!(bounds.bottom_right, Point2::new(4.0, 5.0));
        assert_eq!(6.0, bounds.width());
        assert_eq!(6.0, bounds.height());
    }

    #[test]
    fn test_empty() {
        assert_eq!(None, BoundingBox::of(&[]));
        assert!(Range::new().is_empty());

        let mut range = Range::new();
        range += 3.0;
        assert!(!range.is_empty());
        assert_eq!(range.min, range.max);
    }
}

//! Geometry over point paths: the building blocks of gesture normalization and matching.
//!
//! Every function here is pure and returns a fresh path rather than mutating its input.

use cgmath::{EuclideanSpace, MetricSpace, Point2, Vector2};

use crate::error::{Error, Result};
use crate::geom::BoundingBox;

/// Sides shorter than this fraction of the longer side count as zero.
const DEGENERATE_RATIO: f64 = 1e-9;

/// The arithmetic mean of the points. Callers must pass a non-empty path.
pub fn centroid(points: &[Point2<f64>]) -> Point2<f64> {
    debug_assert!(!points.is_empty());
    let sum: Vector2<f64> = points.iter().map(|p| p.to_vec()).sum();
    Point2::from_vec(sum / points.len() as f64)
}

pub fn path_length(points: &[Point2<f64>]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// The angle from the centroid to the first point of the path, in radians.
pub fn indicative_angle(points: &[Point2<f64>]) -> f64 {
    let c = centroid(points);
    let first = points[0];
    (first.y - c.y).atan2(first.x - c.x)
}

/// Rotate the path counter-clockwise by `radians` around its own centroid.
pub fn rotate_by(points: &[Point2<f64>], radians: f64) -> Vec<Point2<f64>> {
    let c = centroid(points);
    let (sin, cos) = radians.sin_cos();
    points
        .iter()
        .map(|p| {
            let dx = p.x - c.x;
            let dy = p.y - c.y;
            Point2::new(dx * cos - dy * sin + c.x, dx * sin + dy * cos + c.y)
        })
        .collect()
}

/// Scale x and y independently so the bounding box becomes a `size` x `size` square.
///
/// Aspect ratio is not preserved. A box with a (near) zero side fails with
/// [`Error::DegenerateShape`], unless `min_side` is given: then any side shorter than
/// `min_side` is scaled as though it were exactly `min_side` long.
pub fn scale_to(
    points: &[Point2<f64>],
    size: f64,
    min_side: Option<f64>,
) -> Result<Vec<Point2<f64>>> {
    let bounds = BoundingBox::of(points).ok_or(Error::InvalidStroke {
        points: 0,
        reason: "no points to scale",
    })?;

    let mut width = bounds.width();
    let mut height = bounds.height();
    let longest = width.max(height);

    match min_side {
        Some(side) => {
            width = width.max(side);
            height = height.max(side);
        }
        None => {
            let threshold = longest * DEGENERATE_RATIO;
            if !(width > threshold && height > threshold) {
                return Err(Error::DegenerateShape { width, height });
            }
        }
    }

    let sx = size / width;
    let sy = size / height;
    Ok(points
        .iter()
        .map(|p| Point2::new(p.x * sx, p.y * sy))
        .collect())
}

/// Translate the path so its centroid lands on `target`.
pub fn translate_to(points: &[Point2<f64>], target: Point2<f64>) -> Vec<Point2<f64>> {
    let offset = target - centroid(points);
    points.iter().map(|p| p + offset).collect()
}

/// Mean distance between points at matching indices.
pub fn path_distance(a: &[Point2<f64>], b: &[Point2<f64>]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            expected: b.len(),
            actual: a.len(),
        });
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    Ok(unchecked_path_distance(a, b))
}

pub(crate) fn unchecked_path_distance(a: &[Point2<f64>], b: &[Point2<f64>]) -> f64 {
    let total: f64 = a.iter().zip(b).map(|(p, q)| p.distance(*q)).sum();
    total / a.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    }

    fn assert_close(a: Point2<f64>, b: Point2<f64>) {
        assert!(a.distance(b) < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_centroid_and_length() {
        let points = square();
        assert_close(centroid(&points), Point2::new(1.0, 1.0));
        assert!((path_length(&points) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_indicative_angle() {
        // first point is down and to the left of the centroid
        let angle = indicative_angle(&square());
        assert!((angle + 3.0 * std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let rotated = rotate_by(&square(), FRAC_PI_2);
        assert_close(rotated[0], Point2::new(2.0, 0.0));
        assert_close(rotated[1], Point2::new(2.0, 2.0));
        assert_close(rotated[2], Point2::new(0.0, 2.0));
        assert_close(centroid(&rotated), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_rotate_preserves_shape() {
        let points = vec![
            Point2::new(3.0, 1.0),
            Point2::new(7.0, 2.0),
            Point2::new(4.0, 9.0),
        ];
        let rotated = rotate_by(&points, 0.7);
        for (i, j) in [(0, 1), (1, 2), (0, 2)].iter().copied() {
            let before = points[i].distance(points[j]);
            let after = rotated[i].distance(rotated[j]);
            assert!((before - after).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scale_to_square() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(4.0, 1.0)];
        let scaled = scale_to(&points, 250.0, None).unwrap();
        let bounds = BoundingBox::of(&scaled).unwrap();
        assert!((bounds.width() - 250.0).abs() < 1e-9);
        assert!((bounds.height() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_degenerate() {
        let line = vec![Point2::new(0.0, 3.0), Point2::new(5.0, 3.0)];
        match scale_to(&line, 250.0, None) {
            Err(Error::DegenerateShape { width, height }) => {
                assert_eq!(width, 5.0);
                assert_eq!(height, 0.0);
            }
            other => panic!("expected degenerate shape, got {:?}", other),
        }

        let scaled = scale_to(&line, 250.0, Some(1.0)).unwrap();
        assert!(scaled.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert!((scaled[1].x - scaled[0].x - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_translate_to() {
        let moved = translate_to(&square(), Point2::new(-5.0, 10.0));
        assert_close(centroid(&moved), Point2::new(-5.0, 10.0));
        assert_close(moved[0], Point2::new(-6.0, 9.0));
    }

    #[test]
    fn test_path_distance() {
        let a = square();
        let b: Vec<_> = a.iter().map(|p| p + Vector2::new(3.0, 4.0)).collect();
        assert!((path_distance(&a, &b).unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(
            path_distance(&a[..3], &b),
            Err(Error::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );
    }
}

use std::fmt;
use std::str::FromStr;

use cgmath::{MetricSpace, Point2, Vector2};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::geom::{BoundingBox, Range};
use crate::math;

/// A single pen-down-to-pen-up path, in the order the points were drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    x_range: Range,
    y_range: Range,
    points: Vec<Point2<f64>>,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke::new()
    }
}

impl fmt::Display for Stroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, point) in self.points.iter().enumerate() {
            let sep = if i + 1 == self.len() { "" } else { "," };
            write!(f, "{} {}{}", point.x, point.y, sep)?;
        }
        Ok(())
    }
}

impl FromStr for Stroke {
    type Err = Error;

    fn from_str(input: &str) -> Result<Stroke> {
        let mut stroke = Stroke::new();

        let input = input.trim();
        if input.is_empty() {
            return Ok(stroke);
        }

        for point in input.split(',') {
            let mut coords = point.split_whitespace().map(|s| {
                s.parse::<f64>()
                    .map_err(|_| Error::Parse(format!("non-float coordinate {:?}", s)))
            });
            match (coords.next(), coords.next(), coords.next()) {
                (Some(x), Some(y), None) => stroke.push(x?, y?),
                _ => {
                    return Err(Error::Parse(format!(
                        "expected `x y`, got {:?}",
                        point.trim()
                    )))
                }
            }
        }

        Ok(stroke)
    }
}

impl Serialize for Stroke {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self)
    }
}

impl<'a> Deserialize<'a> for Stroke {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'a>,
    {
        let result: String = Deserialize::deserialize(deserializer)?;
        result.parse().map_err(de::Error::custom)
    }
}

impl From<Vec<Point2<f64>>> for Stroke {
    fn from(points: Vec<Point2<f64>>) -> Self {
        let mut stroke = Stroke::new();
        for p in points {
            stroke.push(p.x, p.y);
        }
        stroke
    }
}

impl Stroke {
    pub fn new() -> Stroke {
        Stroke {
            x_range: Range::new(),
            y_range: Range::new(),
            points: vec![],
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x_range += x;
        self.y_range += y;
        self.points.push(Point2::new(x, y));
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        if self.is_empty() {
            return None;
        }
        Some(BoundingBox::new(
            Point2::new(self.x_range.min, self.y_range.min),
            Point2::new(self.x_range.max, self.y_range.max),
        ))
    }

    pub fn centroid(&self) -> Option<Point2<f64>> {
        if self.is_empty() {
            None
        } else {
            Some(math::centroid(&self.points))
        }
    }

    pub fn path_length(&self) -> f64 {
        math::path_length(&self.points)
    }

    pub fn translate(self, offset: Vector2<f64>) -> Self {
        self.points.into_iter().map(|p| p + offset).collect::<Vec<_>>().into()
    }

    /// Scale every coordinate by `factor`, relative to the origin.
    pub fn scale(self, factor: f64) -> Self {
        self.points
            .into_iter()
            .map(|p| p * factor)
            .collect::<Vec<_>>()
            .into()
    }

    /// Rotate counter-clockwise around the centroid.
    pub fn rotate(self, degrees: f64) -> Self {
        if self.is_empty() {
            return self;
        }
        math::rotate_by(&self.points, degrees.to_radians()).into()
    }

    pub fn resample(&self, n: usize) -> Result<Vec<Point2<f64>>> {
        resample(&self.points, n)
    }
}

/// Resample a path to exactly `n` points, evenly spaced along its arc length.
///
/// The first and last points of the result are the first and last points of the input.
pub fn resample(points: &[Point2<f64>], n: usize) -> Result<Vec<Point2<f64>>> {
    if n < 2 {
        return Err(Error::InvalidConfig(format!(
            "resample length must be at least 2, got {}",
            n
        )));
    }

    let invalid = |reason| Error::InvalidStroke {
        points: points.len(),
        reason,
    };

    if points.len() < 2 {
        return Err(invalid("need at least two points"));
    }
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(invalid("non-finite coordinate"));
    }

    let lengths: Vec<f64> = points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .collect();
    let total: f64 = lengths.iter().sum();
    if !total.is_finite() {
        return Err(invalid("path length overflows"));
    }
    if !(total > 0.0) {
        return Err(invalid("path has no length"));
    }

    let stride = total / (n - 1) as f64;
    let last_segment = lengths.len() - 1;

    let mut result = Vec::with_capacity(n);
    result.push(points[0]);

    // `walked` is the arc length at the start of `segment`.
    let mut segment = 0;
    let mut walked = 0.0;
    for step in 1..(n - 1) {
        let target = stride * step as f64;
        while segment < last_segment && walked + lengths[segment] < target {
            walked += lengths[segment];
            segment += 1;
        }

        let a = points[segment];
        let b = points[segment + 1];
        let len = lengths[segment];
        let t = if len > 0.0 {
            ((target - walked) / len).max(0.0).min(1.0)
        } else {
            0.0
        };
        result.push(a + (b - a) * t);
    }

    result.push(points[points.len() - 1]);

    debug_assert_eq!(result.len(), n);
    Ok(result)
}

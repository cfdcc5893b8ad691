use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The stroke can't be resampled: too few points, no length, or garbage coordinates.
    #[error("invalid stroke of {points} points: {reason}")]
    InvalidStroke { points: usize, reason: &'static str },

    /// The rotated stroke has (close to) zero area, so it can't be scaled to the reference square.
    #[error("degenerate shape: bounding box is {width}x{height}")]
    DegenerateShape { width: f64, height: f64 },

    #[error("path length mismatch: expected {expected} points, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("could not parse stroke: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

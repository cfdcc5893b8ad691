//! Single-stroke gesture recognition with the $1 recognizer.
//!
//! ```
//! use unistroke::cgmath::Point2;
//! use unistroke::{build_template_set, recognize, Config};
//!
//! let config = Config::default();
//! let v = vec![Point2::new(0.0, 0.0), Point2::new(10.0, 30.0), Point2::new(20.0, 0.0)];
//! let templates = build_template_set(vec![("v", v.clone())], config.clone()).unwrap();
//! let result = recognize(&v, &templates, &config).unwrap();
//! assert_eq!("v", result.label);
//! ```

pub mod classifier;
pub mod dollar;
mod error;
pub mod geom;
pub mod math;
pub mod stroke;

pub use classifier::{Classifier, LazyRecognizer, Recognizer};
pub use dollar::{
    build_template_set, preprocess, recognize, recognize_canonical, recognize_per_label,
    recognize_ranked, CanonicalStroke, Config, RecognitionResult, Template, TemplateSet,
    NO_MATCH,
};
pub use error::{Error, Result};
pub use stroke::{resample, Stroke};

// NB: re-exporting cgmath, since we make no effort to hide it in public signatures.
pub use cgmath;

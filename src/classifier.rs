use cgmath::Point2;
use once_cell::sync::OnceCell;

use crate::dollar::{self, Config, RecognitionResult, TemplateSet};
use crate::error::Result;

/// Anything that can put a label on a single stroke.
///
/// The geometric [`Recognizer`] is one implementation; a model-backed classifier can be
/// plugged in as a closure with the same signature.
pub trait Classifier {
    fn classify(&self, points: &[Point2<f64>]) -> Result<RecognitionResult>;
}

impl<F> Classifier for F
where
    F: Fn(&[Point2<f64>]) -> Result<RecognitionResult>,
{
    fn classify(&self, points: &[Point2<f64>]) -> Result<RecognitionResult> {
        self(points)
    }
}

/// A template set, paired with the config it was built with.
#[derive(Clone, Debug)]
pub struct Recognizer {
    templates: TemplateSet,
}

impl Recognizer {
    pub fn new(templates: TemplateSet) -> Recognizer {
        Recognizer { templates }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn config(&self) -> &Config {
        self.templates.config()
    }

    pub fn recognize(&self, points: &[Point2<f64>]) -> Result<RecognitionResult> {
        dollar::recognize(points, &self.templates, self.config())
    }

    pub fn recognize_ranked(
        &self,
        points: &[Point2<f64>],
        k: usize,
    ) -> Result<Vec<RecognitionResult>> {
        dollar::recognize_ranked(points, &self.templates, self.config(), k)
    }

    pub fn recognize_per_label(&self, points: &[Point2<f64>]) -> Result<Vec<RecognitionResult>> {
        dollar::recognize_per_label(points, &self.templates, self.config())
    }
}

impl Classifier for Recognizer {
    fn classify(&self, points: &[Point2<f64>]) -> Result<RecognitionResult> {
        self.recognize(points)
    }
}

/// Holds raw template strokes and canonicalizes them on first use.
///
/// Safe to share between threads: the first caller builds the set, any others block until
/// it's ready, and after that every call only reads. Templates that fail to canonicalize
/// are logged and left out.
#[derive(Debug)]
pub struct LazyRecognizer {
    config: Config,
    entries: Vec<(String, Vec<Point2<f64>>)>,
    templates: OnceCell<TemplateSet>,
}

impl LazyRecognizer {
    pub fn new<I, L, P>(entries: I, config: Config) -> LazyRecognizer
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: AsRef<[Point2<f64>]>,
    {
        LazyRecognizer {
            config,
            entries: entries
                .into_iter()
                .map(|(label, points)| (label.into(), points.as_ref().to_vec()))
                .collect(),
            templates: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.templates.get().is_some()
    }

    pub fn templates(&self) -> Result<&TemplateSet> {
        self.templates.get_or_try_init(|| {
            let entries = self.entries.iter().map(|(l, p)| (l.as_str(), p));
            let (set, _rejected) = TemplateSet::build_lenient(entries, self.config.clone())?;
            Ok(set)
        })
    }
}

impl Classifier for LazyRecognizer {
    fn classify(&self, points: &[Point2<f64>]) -> Result<RecognitionResult> {
        let templates = self.templates()?;
        dollar::recognize(points, templates, &self.config)
    }
}

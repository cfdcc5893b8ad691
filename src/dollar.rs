//! The $1 unistroke recognizer.
//!
//! Strokes are resampled to a fixed number of points, then rotated so the first point sits
//! at angle zero from the centroid, squashed into a reference square, and centred on the
//! origin. Two canonical strokes are compared point-by-point, with a golden-section search
//! over a small extra rotation to make up for a slightly-off indicative angle.

use std::cmp::Ordering;
use std::collections::HashMap;

use cgmath::{EuclideanSpace, Point2};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::math;
use crate::stroke::{resample, Stroke};

/// The label reported when there's nothing to match against.
pub const NO_MATCH: &str = "no_match";

/// The golden ratio conjugate, (√5 - 1) / 2.
fn phi() -> f64 {
    0.5 * (-1.0 + 5.0f64.sqrt())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of points every stroke is resampled to.
    pub n: usize,
    /// Extra rotation searched in either direction, in degrees.
    pub angle_range_deg: f64,
    /// The search stops once the bracket is narrower than this, in degrees.
    pub angle_precision_deg: f64,
    /// Side of the reference square strokes are scaled into.
    pub square_size: f64,
    /// If set, bounding box sides shorter than this are scaled as if they were this long,
    /// instead of rejecting the stroke as degenerate.
    pub degenerate_side: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            n: 64,
            angle_range_deg: 45.0,
            angle_precision_deg: 2.0,
            square_size: 250.0,
            degenerate_side: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidConfig(msg));

        if self.n < 2 {
            return invalid(format!("n must be at least 2, got {}", self.n));
        }
        if !(self.square_size > 0.0) || !self.square_size.is_finite() {
            return invalid(format!(
                "square size must be positive, got {}",
                self.square_size
            ));
        }
        if !(self.angle_range_deg >= 0.0) || !self.angle_range_deg.is_finite() {
            return invalid(format!(
                "angle range must be non-negative, got {}",
                self.angle_range_deg
            ));
        }
        if !(self.angle_precision_deg > 0.0) || !self.angle_precision_deg.is_finite() {
            return invalid(format!(
                "angle precision must be positive, got {}",
                self.angle_precision_deg
            ));
        }
        if let Some(side) = self.degenerate_side {
            if !(side > 0.0) || !side.is_finite() {
                return invalid(format!("degenerate side must be positive, got {}", side));
            }
        }
        Ok(())
    }

    /// Half the diagonal of the reference square: the distance that maps to a score of zero.
    pub fn half_diagonal(&self) -> f64 {
        0.5 * 2.0f64.sqrt() * self.square_size
    }

    pub fn score(&self, distance: f64) -> f64 {
        1.0 - distance / self.half_diagonal()
    }
}

/// A resampled stroke after rotation, scale and translation have been normalized away.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalStroke(Vec<Point2<f64>>);

impl CanonicalStroke {
    pub fn points(&self) -> &[Point2<f64>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<CanonicalStroke> for Stroke {
    fn from(canonical: CanonicalStroke) -> Self {
        canonical.0.into()
    }
}

/// Normalize an already-resampled path.
pub fn canonicalize(resampled: &[Point2<f64>], config: &Config) -> Result<CanonicalStroke> {
    if resampled.is_empty() {
        return Err(Error::InvalidStroke {
            points: 0,
            reason: "nothing to canonicalize",
        });
    }
    let angle = math::indicative_angle(resampled);
    let rotated = math::rotate_by(resampled, -angle);
    let scaled = math::scale_to(&rotated, config.square_size, config.degenerate_side)?;
    let translated = math::translate_to(&scaled, Point2::origin());
    Ok(CanonicalStroke(translated))
}

/// Resample and canonicalize a raw stroke.
pub fn preprocess(points: &[Point2<f64>], config: &Config) -> Result<CanonicalStroke> {
    config.validate()?;
    let resampled = resample(points, config.n)?;
    canonicalize(&resampled, config)
}

fn distance_at_angle(points: &[Point2<f64>], template: &[Point2<f64>], radians: f64) -> f64 {
    let rotated = math::rotate_by(points, radians);
    math::unchecked_path_distance(&rotated, template)
}

/// The smallest path distance found by rotating `query` somewhere in `[a, b]` radians,
/// narrowing the bracket by golden-section search until it is at most `threshold` wide.
pub fn distance_at_best_angle(
    query: &CanonicalStroke,
    template: &CanonicalStroke,
    mut a: f64,
    mut b: f64,
    threshold: f64,
) -> Result<f64> {
    if query.len() != template.len() {
        return Err(Error::LengthMismatch {
            expected: template.len(),
            actual: query.len(),
        });
    }
    if !(threshold > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "search threshold must be positive, got {}",
            threshold
        )));
    }

    let points = query.points();
    let template = template.points();
    let phi = phi();

    let mut x1 = phi * a + (1.0 - phi) * b;
    let mut f1 = distance_at_angle(points, template, x1);
    let mut x2 = (1.0 - phi) * a + phi * b;
    let mut f2 = distance_at_angle(points, template, x2);

    let mut iterations = 0;
    while (b - a).abs() > threshold {
        if f1 < f2 {
            b = x2;
            x2 = x1;
            f2 = f1;
            x1 = phi * a + (1.0 - phi) * b;
            f1 = distance_at_angle(points, template, x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = (1.0 - phi) * a + phi * b;
            f2 = distance_at_angle(points, template, x2);
        }
        iterations += 1;
    }
    trace!(iterations, "golden section search converged");

    Ok(f1.min(f2))
}

#[derive(Clone, Debug)]
pub struct Template {
    pub label: String,
    pub path: CanonicalStroke,
}

/// Canonicalized templates, all built with the same config.
#[derive(Clone, Debug)]
pub struct TemplateSet {
    config: Config,
    templates: Vec<Template>,
}

impl TemplateSet {
    pub fn new(config: Config) -> Result<TemplateSet> {
        config.validate()?;
        Ok(TemplateSet {
            config,
            templates: vec![],
        })
    }

    /// Canonicalize and add a template. On error the set is left as it was.
    pub fn push(&mut self, label: impl Into<String>, points: &[Point2<f64>]) -> Result<()> {
        let label: String = label.into();
        let path = preprocess(points, &self.config)?;
        debug!(label = %label, "built template");
        self.templates.push(Template { label, path });
        Ok(())
    }

    /// Build a set from every entry that canonicalizes, returning the rest alongside
    /// their index in the input.
    pub fn build_lenient<I, L, P>(
        entries: I,
        config: Config,
    ) -> Result<(TemplateSet, Vec<(usize, Error)>)>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: AsRef<[Point2<f64>]>,
    {
        let mut set = TemplateSet::new(config)?;
        let mut rejected = vec![];
        for (i, (label, points)) in entries.into_iter().enumerate() {
            let label: String = label.into();
            if let Err(e) = set.push(label.as_str(), points.as_ref()) {
                warn!(index = i, label = %label, error = %e, "skipping template");
                rejected.push((i, e));
            }
        }
        Ok((set, rejected))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Distinct labels, in the order they were first added.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.label.as_str()).unique()
    }
}

/// Build a set from every entry, failing on the first one that can't be canonicalized.
pub fn build_template_set<I, L, P>(entries: I, config: Config) -> Result<TemplateSet>
where
    I: IntoIterator<Item = (L, P)>,
    L: Into<String>,
    P: AsRef<[Point2<f64>]>,
{
    let mut set = TemplateSet::new(config)?;
    for (label, points) in entries {
        set.push(label, points.as_ref())?;
    }
    Ok(set)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub label: String,
    pub score: f64,
}

impl RecognitionResult {
    pub fn no_match() -> RecognitionResult {
        RecognitionResult {
            label: NO_MATCH.to_string(),
            score: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.label != NO_MATCH
    }
}

fn check_compatible(config: &Config, templates: &TemplateSet) -> Result<()> {
    let built = templates.config();
    if config.n != built.n {
        return Err(Error::LengthMismatch {
            expected: built.n,
            actual: config.n,
        });
    }
    if config.square_size != built.square_size || config.degenerate_side != built.degenerate_side
    {
        warn!(
            query = ?config,
            templates = ?built,
            "query is normalized differently from the templates; scores will be off"
        );
    }
    Ok(())
}

/// Best-angle distance from the query to every template, in template order.
fn template_distances(
    query: &[Point2<f64>],
    templates: &TemplateSet,
    config: &Config,
) -> Result<Vec<f64>> {
    check_compatible(config, templates)?;
    let query = preprocess(query, config)?;
    canonical_distances(&query, templates, config)
}

fn canonical_distances(
    query: &CanonicalStroke,
    templates: &TemplateSet,
    config: &Config,
) -> Result<Vec<f64>> {
    let range = config.angle_range_deg.to_radians();
    let precision = config.angle_precision_deg.to_radians();

    templates
        .iter()
        .map(|t| distance_at_best_angle(query, &t.path, -range, range, precision))
        .collect()
}

fn by_distance(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Find the template closest to the query stroke.
///
/// An empty template set always gives [`RecognitionResult::no_match`], whatever the query.
pub fn recognize(
    query: &[Point2<f64>],
    templates: &TemplateSet,
    config: &Config,
) -> Result<RecognitionResult> {
    if templates.is_empty() {
        return Ok(RecognitionResult::no_match());
    }

    let distances = template_distances(query, templates, config)?;
    Ok(closest(templates, distances, config))
}

/// Like [`recognize`], for a query that has already been through [`preprocess`].
pub fn recognize_canonical(
    query: &CanonicalStroke,
    templates: &TemplateSet,
    config: &Config,
) -> Result<RecognitionResult> {
    if templates.is_empty() {
        return Ok(RecognitionResult::no_match());
    }

    config.validate()?;
    check_compatible(config, templates)?;
    let distances = canonical_distances(query, templates, config)?;
    Ok(closest(templates, distances, config))
}

fn closest(templates: &TemplateSet, distances: Vec<f64>, config: &Config) -> RecognitionResult {
    let best = templates
        .iter()
        .zip(distances)
        .filter(|(_, d)| d.is_finite())
        .min_by(|(_, a), (_, b)| by_distance(a, b));

    match best {
        Some((template, distance)) => {
            let score = config.score(distance);
            debug!(
                label = %template.label,
                distance,
                score,
                templates = templates.len(),
                "recognized stroke"
            );
            RecognitionResult {
                label: template.label.clone(),
                score,
            }
        }
        None => RecognitionResult::no_match(),
    }
}

/// The `k` best-matching templates, best first. Labels may repeat.
pub fn recognize_ranked(
    query: &[Point2<f64>],
    templates: &TemplateSet,
    config: &Config,
    k: usize,
) -> Result<Vec<RecognitionResult>> {
    use partial_sort::PartialSort;

    if templates.is_empty() || k == 0 {
        return Ok(vec![]);
    }

    let mut candidates: Vec<(&Template, f64)> = templates
        .iter()
        .zip(template_distances(query, templates, config)?)
        .filter(|(_, d)| d.is_finite())
        .collect();

    let to_sort = k.min(candidates.len());
    candidates.partial_sort(to_sort, |(_, a), (_, b)| by_distance(a, b));
    candidates.truncate(k);

    Ok(candidates
        .into_iter()
        .map(|(template, distance)| RecognitionResult {
            label: template.label.clone(),
            score: config.score(distance),
        })
        .collect())
}

/// The best score for each distinct label, best first.
pub fn recognize_per_label(
    query: &[Point2<f64>],
    templates: &TemplateSet,
    config: &Config,
) -> Result<Vec<RecognitionResult>> {
    if templates.is_empty() {
        return Ok(vec![]);
    }

    let distances = template_distances(query, templates, config)?;

    let mut best: HashMap<&str, f64> = HashMap::new();
    for (template, distance) in templates.iter().zip(distances) {
        if !distance.is_finite() {
            continue;
        }
        let entry = best.entry(template.label.as_str()).or_insert(distance);
        *entry = entry.min(distance);
    }

    // Labels in insertion order first, so equal scores come out in a stable order.
    Ok(templates
        .labels()
        .filter_map(|label| best.get(label).map(|d| (label, *d)))
        .sorted_by(|(_, a), (_, b)| by_distance(a, b))
        .map(|(label, distance)| RecognitionResult {
            label: label.to_string(),
            score: config.score(distance),
        })
        .collect())
}

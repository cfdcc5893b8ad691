//! Leave-one-out evaluation: every stroke on stdin is recognized against all the others.

use std::io;
use std::io::prelude::*;

use itertools::Itertools;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use unistroke::{recognize, Config, Stroke, TemplateSet};

fn main() {
    let verbose = std::env::args().skip(1).any(|a| a == "--verbose" || a == "-v");
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mut strokes: Vec<(String, Stroke)> = vec![];
    while let Some(Ok(line)) = lines.next() {
        let mut halves = line.splitn(2, '\t');
        let expected = halves.next().unwrap_or_default();
        let parsed = halves
            .next()
            .ok_or_else(|| "missing tab".to_string())
            .and_then(|points| points.parse::<Stroke>().map_err(|e| e.to_string()));
        match parsed {
            Ok(stroke) => strokes.push((expected.to_string(), stroke)),
            Err(e) => warn!(line = %line, error = %e, "skipping unparseable line"),
        }
    }

    info!(
        strokes = strokes.len(),
        labels = strokes.iter().map(|(l, _)| l).unique().count(),
        "loaded strokes"
    );

    let config = Config::default();
    let mut correct = 0;
    let mut count = 0;
    for (i, (expected, stroke)) in strokes.iter().enumerate() {
        let others = strokes
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, (label, s))| (label.as_str(), s.points()));

        // Bad templates are already logged by the set itself.
        let (templates, _rejected) = TemplateSet::build_lenient(others, config.clone())
            .expect("default config is valid");

        match recognize(stroke.points(), &templates, &config) {
            Ok(actual) => {
                count += 1;
                if &actual.label == expected {
                    correct += 1;
                }
                println!("[{:.4}] {} -> {}", actual.score, expected, actual.label);
            }
            Err(e) => println!("[error] {} -> {}", expected, e),
        }
    }

    if count > 0 {
        println!("Accuracy: {:.4} ({}/{})", correct as f64 / count as f64, correct, count);
    }
}

use std::io;
use std::io::prelude::*;

use tracing::warn;
use tracing_subscriber::EnvFilter;
use unistroke::{preprocess, Config, Stroke};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut line_no = 0;
    while let Some(Ok(line)) = lines.next() {
        line_no += 1;
        let mut halves = line.splitn(2, '\t');
        let label = halves.next().unwrap_or_default();
        let points = match halves.next() {
            Some(points) => points,
            None => {
                warn!(line = line_no, "expected `label<TAB>stroke`; skipping");
                continue;
            }
        };

        let canonical = points
            .parse::<Stroke>()
            .and_then(|stroke| preprocess(stroke.points(), &config));

        match canonical {
            Ok(canonical) => {
                let stroke: Stroke = canonical.into();
                writeln!(out, "{}\t{}", label, stroke).expect("writing to stdout");
            }
            Err(e) => warn!(line = line_no, label, error = %e, "skipping stroke"),
        }
    }
}

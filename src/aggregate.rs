use crate::error::GchartError;
use crate::model::{Diagnostic, DiagnosticKind};
use crate::source::CommitLogSource;
use chrono::{FixedOffset, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Per-day commit counts plus the diagnostics recovered along the way.
/// `total` equals the number of successfully parsed commit records.
#[derive(Debug, Default, Clone)]
pub struct Aggregation {
    pub counts: BTreeMap<NaiveDate, u64>,
    pub total: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl Aggregation {
    /// Merge another partial aggregation into this one. Counts add, so the
    /// combined result does not depend on stream order or partitioning.
    pub fn absorb(&mut self, other: Aggregation) {
        for (day, count) in other.counts {
            *self.counts.entry(day).or_insert(0) += count;
        }
        self.total += other.total;
        self.diagnostics.extend(other.diagnostics);
    }
}

/// Fold every source's timestamp stream into per-day commit counts, bucketing
/// in the fixed reference `zone`. Commits are counted per repository, without
/// deduplication across repositories that share history.
pub fn aggregate(sources: &[Box<dyn CommitLogSource>], zone: FixedOffset) -> Aggregation {
    let mut merged = Aggregation::default();
    for source in sources {
        merged.absorb(aggregate_one(source.as_ref(), zone));
    }
    merged
}

fn aggregate_one(source: &dyn CommitLogSource, zone: FixedOffset) -> Aggregation {
    let mut agg = Aggregation::default();

    let stream = match source.timestamps() {
        Ok(stream) => stream,
        Err(e) => {
            agg.diagnostics.push(unavailable(source.label(), &e));
            return agg;
        }
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Scanning {}...", source.label()));

    for item in stream {
        match item {
            Ok(timestamp) => {
                let day = timestamp.with_timezone(&zone).date_naive();
                *agg.counts.entry(day).or_insert(0) += 1;
                agg.total += 1;
                pb.inc(1);
            }
            Err(GchartError::MalformedTimestamp(detail)) => {
                // Skip the record, keep consuming the stream.
                agg.diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::MalformedTimestamp,
                    repository: source.label().to_string(),
                    detail,
                });
            }
            Err(e) => {
                // Unrecoverable read error: stop this stream, keep the others.
                agg.diagnostics.push(unavailable(source.label(), &e));
                break;
            }
        }
    }

    pb.finish_and_clear();
    agg
}

fn unavailable(label: &str, err: &GchartError) -> Diagnostic {
    Diagnostic {
        kind: DiagnosticKind::RepositoryUnavailable,
        repository: label.to_string(),
        detail: err.to_string(),
    }
}

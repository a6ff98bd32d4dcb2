use crate::error::{GchartError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// One calendar day with its commit count. Days with zero commits are
/// implicit in the aggregation and only materialized by the layout stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Inclusive span of days the chart covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(GchartError::InvalidRange(format!(
                "start ({start}) is after end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Span from the earliest to the latest day with a nonzero count,
    /// or `None` when there is no data at all.
    pub fn spanning(counts: &BTreeMap<NaiveDate, u64>) -> Option<Self> {
        let start = *counts.keys().next()?;
        let end = *counts.keys().next_back()?;
        Some(Self { start, end })
    }

    /// Last `days` days ending at `today`, inclusive.
    pub fn last_days(today: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(GchartError::InvalidRange("zero-day window".to_string()));
        }
        Self::new(today - Duration::days(i64::from(days) - 1), today)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    RepositoryUnavailable,
    MalformedTimestamp,
}

/// A recovered per-record or per-repository error, reported alongside the
/// successful result rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub repository: String,
    pub detail: String,
}

/// Geometry and colour configuration for the renderer. Passed explicitly
/// so rendering stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    pub cell_size: u32,
    pub gutter: u32,
    pub color_scale: Vec<String>,
    pub background: String,
}

// Box colors, sorted from weaker to stronger.
pub const DEFAULT_COLOR_SCALE: [&str; 5] =
    ["#eeeeee", "#d6e685", "#8cc665", "#44a340", "#1e6823"];

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            cell_size: 11,
            gutter: 2,
            color_scale: DEFAULT_COLOR_SCALE.iter().map(|c| c.to_string()).collect(),
            background: "white".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repositories: Vec<String>,
    pub range: DateRange,
    pub total: u64,
    pub days: Vec<DayCount>,
    pub diagnostics: Vec<Diagnostic>,
}

impl HistogramOutput {
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

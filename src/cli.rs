use crate::aggregate::{self, Aggregation};
use crate::chart;
use crate::model::{
    DateRange, DayCount, Diagnostic, DiagnosticKind, HistogramOutput, RenderStyle, SCHEMA_VERSION,
};
use crate::source::{self, CommitLogSource};
use crate::svg;
use crate::view;
use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Local, NaiveDate, Offset, Utc, Weekday};
use clap::Parser;
use console::style;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gchart")]
#[command(about = "Render a calendar heatmap of per-day commit activity across git repositories")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Repository paths to scan (defaults to the current directory)")]
    pub paths: Vec<PathBuf>,

    #[arg(long, short = 'o', default_value = "activity.svg", help = "Output SVG file")]
    pub out: PathBuf,

    #[arg(long, help = "First day of the chart (YYYY-MM-DD)", conflicts_with = "days")]
    pub since: Option<NaiveDate>,

    #[arg(long, help = "Last day of the chart (YYYY-MM-DD)", conflicts_with = "days")]
    pub until: Option<NaiveDate>,

    #[arg(long, help = "Chart the last N days ending today")]
    pub days: Option<u32>,

    #[arg(
        long,
        default_value = "sun",
        value_parser = parse_week_start,
        help = "Weekday shown as row 0 (e.g. sun, mon)"
    )]
    pub week_start: Weekday,

    #[arg(long, default_value_t = 11, help = "Pixel edge length of each day square")]
    pub cell_size: u32,

    #[arg(long, default_value_t = 2, help = "Pixel spacing between day squares")]
    pub gutter: u32,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Colour scale from least to most intense, one per intensity band"
    )]
    pub colors: Option<Vec<String>>,

    #[arg(long, help = "Bucket commits by their UTC day instead of the local day")]
    pub utc: bool,

    #[arg(long, help = "Print the day counts as JSON instead of writing the chart")]
    pub json: bool,

    #[arg(long, help = "Open the written chart in an image viewer")]
    pub view: bool,

    #[arg(long, default_value = "xdg-open", help = "Viewer command used by --view")]
    pub viewer: String,
}

fn parse_week_start(s: &str) -> std::result::Result<Weekday, String> {
    s.parse::<Weekday>()
        .map_err(|_| format!("invalid weekday '{s}' (try sun, mon, ...)"))
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        // One reference offset for the whole run, so every repository
        // buckets into the same calendar days.
        let zone: FixedOffset = if self.utc {
            Utc.fix()
        } else {
            *Local::now().offset()
        };

        let paths = if self.paths.is_empty() {
            vec![std::env::current_dir().context("Failed to resolve current directory")?]
        } else {
            self.paths.clone()
        };

        let mut sources: Vec<Box<dyn CommitLogSource>> = Vec::new();
        let mut open_failures: Vec<Diagnostic> = Vec::new();
        for path in &paths {
            match source::open(path) {
                Ok(s) => sources.push(s),
                Err(e) => open_failures.push(Diagnostic {
                    kind: DiagnosticKind::RepositoryUnavailable,
                    repository: path.display().to_string(),
                    detail: e.to_string(),
                }),
            }
        }
        if sources.is_empty() {
            for d in &open_failures {
                log::warn!("{}: {}", d.repository, d.detail);
            }
            bail!("no readable repository among {} path(s)", paths.len());
        }

        let mut aggregation = Aggregation {
            diagnostics: open_failures,
            ..Aggregation::default()
        };
        aggregation.absorb(aggregate::aggregate(&sources, zone));

        for d in &aggregation.diagnostics {
            log::warn!("{}: {}", d.repository, d.detail);
        }

        let today = Utc::now().with_timezone(&zone).date_naive();
        let range = self.resolve_range(&aggregation.counts, today)?;
        let chart = chart::layout(&aggregation.counts, range, self.week_start)
            .context("Failed to lay out the calendar grid")?;

        if self.json {
            let output = HistogramOutput {
                version: SCHEMA_VERSION,
                generated_at: Utc::now(),
                repositories: sources.iter().map(|s| s.label().to_string()).collect(),
                range: chart.range,
                total: aggregation.total,
                days: aggregation
                    .counts
                    .iter()
                    .map(|(date, count)| DayCount {
                        date: *date,
                        count: *count,
                    })
                    .collect(),
                diagnostics: aggregation.diagnostics.clone(),
            };
            println!("{}", output.to_json_string()?);
            return Ok(());
        }

        let render_style = RenderStyle {
            cell_size: self.cell_size,
            gutter: self.gutter,
            color_scale: self
                .colors
                .clone()
                .unwrap_or_else(|| RenderStyle::default().color_scale),
            background: RenderStyle::default().background,
        };

        let doc = chart::render(&chart, &render_style).context("Failed to render the chart")?;
        svg::write(&doc, &self.out)
            .with_context(|| format!("Failed to write chart to {}", self.out.display()))?;

        println!(
            "{} commits from {} to {} across {} repositories",
            style(aggregation.total).cyan(),
            style(chart.range.start).dim(),
            style(chart.range.end).dim(),
            sources.len()
        );
        println!("Wrote {}", style(self.out.display()).green());

        if self.view {
            if let Err(e) = view::launch(&self.viewer, &self.out) {
                log::warn!("viewer '{}' failed: {e}", self.viewer);
            }
        }

        Ok(())
    }

    fn resolve_range(
        &self,
        counts: &BTreeMap<NaiveDate, u64>,
        today: NaiveDate,
    ) -> Result<Option<DateRange>> {
        let range = match (self.days, self.since, self.until) {
            (Some(days), _, _) => Some(DateRange::last_days(today, days)?),
            (None, Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            (None, Some(start), None) => Some(DateRange::new(start, today.max(start))?),
            (None, None, Some(end)) => {
                let start = counts
                    .keys()
                    .next()
                    .copied()
                    .filter(|earliest| *earliest <= end)
                    .unwrap_or(end);
                Some(DateRange::new(start, end)?)
            }
            (None, None, None) => None,
        };
        Ok(range)
    }
}

use super::{Chart, GridCell, Intensity, MonthMarker};
use crate::error::{GchartError, Result};
use crate::model::DateRange;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Lay `counts` out as a week-by-weekday grid. `range` defaults to the span
/// from the earliest to the latest day with a commit; column 0 row 0 is the
/// first `week_start` at or before `range.start`, and partial leading or
/// trailing weeks are padded with empty cells so every column has 7 rows.
pub fn layout(
    counts: &BTreeMap<NaiveDate, u64>,
    range: Option<DateRange>,
    week_start: Weekday,
) -> Result<Chart> {
    let range = match range {
        Some(range) => range,
        None => DateRange::spanning(counts).ok_or_else(|| {
            GchartError::InvalidRange("no commit data and no explicit range".to_string())
        })?,
    };
    if range.start > range.end {
        return Err(GchartError::InvalidRange(format!(
            "start ({}) is after end ({})",
            range.start, range.end
        )));
    }

    let grid_start =
        range.start - Duration::days(i64::from(weekday_row(range.start.weekday(), week_start)));
    let weeks = ((range.end - grid_start).num_days() / 7 + 1) as usize;

    let max_count = counts
        .iter()
        .filter(|(day, _)| range.contains(**day))
        .map(|(_, count)| *count)
        .max()
        .unwrap_or(0);

    let mut cells = Vec::with_capacity(weeks * 7);
    for week in 0..weeks {
        for row in 0..7 {
            let date = grid_start + Duration::days((week * 7 + row) as i64);
            let count = if range.contains(date) {
                counts.get(&date).copied().unwrap_or(0)
            } else {
                0
            };
            cells.push(GridCell {
                date,
                week,
                row,
                count,
                intensity: Intensity::for_count(count, max_count),
            });
        }
    }

    Ok(Chart {
        range,
        week_start,
        weeks,
        max_count,
        cells,
        months: month_markers(range, grid_start),
    })
}

/// Row index of `day` under a grid whose row 0 is `week_start`.
pub fn weekday_row(day: Weekday, week_start: Weekday) -> u32 {
    (day.num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7
}

fn month_markers(range: DateRange, grid_start: NaiveDate) -> Vec<MonthMarker> {
    let mut markers: Vec<MonthMarker> = Vec::new();

    let mut cursor = if range.start.day() == 1 {
        Some(range.start)
    } else {
        next_month(first_of_month(range.start))
    };

    while let Some(first) = cursor {
        if first > range.end {
            break;
        }
        let week = ((first - grid_start).num_days() / 7) as usize;
        // One label per week column; the earlier month wins.
        if markers.last().map_or(true, |m| m.week != week) {
            markers.push(MonthMarker {
                week,
                label: first.format("%b").to_string(),
            });
        }
        cursor = next_month(first);
    }

    markers
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.day0()))
}

fn next_month(first: NaiveDate) -> Option<NaiveDate> {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    }
}

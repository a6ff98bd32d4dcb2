use super::{Chart, Intensity};
use crate::error::{GchartError, Result};
use crate::model::RenderStyle;
use crate::svg::{Document, Shape};

// Vertical band reserved above row 0 for month labels.
const MONTH_LABEL_HEIGHT: u32 = 14;
const MONTH_LABEL_FONT_SIZE: u32 = 10;
const MONTH_LABEL_COLOR: &str = "#767676";

/// Turn a laid-out chart into a vector document: one filled square per grid
/// cell, coloured by its intensity band, plus a month label above each
/// month-boundary column. Pure: identical chart and style always yield an
/// identical document.
pub fn render(chart: &Chart, style: &RenderStyle) -> Result<Document> {
    if style.color_scale.len() != Intensity::BANDS {
        return Err(GchartError::StyleMismatch(format!(
            "color scale has {} entries, expected one per intensity band ({})",
            style.color_scale.len(),
            Intensity::BANDS
        )));
    }

    let step = style.cell_size + style.gutter;
    let width = style.gutter + chart.weeks as u32 * step;
    let height = MONTH_LABEL_HEIGHT + style.gutter + 7 * step;

    let mut doc = Document::new(width, height);
    doc.push(Shape::Rect {
        x: 0,
        y: 0,
        width,
        height,
        fill: style.background.clone(),
    });

    for marker in &chart.months {
        doc.push(Shape::Text {
            x: style.gutter + marker.week as u32 * step,
            y: MONTH_LABEL_FONT_SIZE,
            content: marker.label.clone(),
            fill: MONTH_LABEL_COLOR.to_string(),
            font_size: MONTH_LABEL_FONT_SIZE,
        });
    }

    for cell in &chart.cells {
        doc.push(Shape::Rect {
            x: style.gutter + cell.week as u32 * step,
            y: MONTH_LABEL_HEIGHT + style.gutter + cell.row as u32 * step,
            width: style.cell_size,
            height: style.cell_size,
            fill: style.color_scale[cell.intensity.band()].clone(),
        });
    }

    Ok(doc)
}

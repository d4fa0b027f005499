use crate::models::{PieSlice, SeriesPoint, SliceLabel};
use crate::services::formatting::slice_label_text;
use crate::services::label_placement::{
    text_anchor, LabelingSession, PlacementOptions, SliceGeometry,
};

/// Colors handed out in slice order to points without an explicit color.
pub const PALETTE: [&str; 8] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#AA336A", "#33AADD", "#FF6666", "#66CC66",
];

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// A point's own color, or the palette color for its rendered position.
pub fn resolve_color(point: &SeriesPoint, index: usize) -> String {
    point
        .color
        .clone()
        .unwrap_or_else(|| palette_color(index).to_string())
}

/// Where the pie sits on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieFrame {
    pub cx: f64,
    pub cy: f64,
    pub outer_radius: f64,
}

impl PieFrame {
    pub fn centered(width: f64, height: f64, outer_radius: f64) -> Self {
        Self {
            cx: width / 2.0,
            cy: height / 2.0,
            outer_radius,
        }
    }

    /// Monthly category pies.
    pub fn category() -> Self {
        Self::centered(800.0, 350.0, 100.0)
    }

    /// Money in / money out subcategory pies.
    pub fn subcategory() -> Self {
        Self::centered(800.0, 550.0, 180.0)
    }
}

/// Lay out slices for `points` in the given order and label them.
///
/// Slices sweep counter-clockwise from 0° to 360°. Negative totals get a
/// zero-width slice. Every call uses a fresh [`LabelingSession`], so labels
/// are only checked against labels of the same pie.
pub fn layout_pie(
    points: &[SeriesPoint],
    frame: &PieFrame,
    options: PlacementOptions,
) -> Vec<PieSlice> {
    let sum: f64 = points.iter().map(|p| p.total.max(0.0)).sum();
    let mut session = LabelingSession::with_options(options);
    let mut slices = Vec::with_capacity(points.len());
    let mut start_angle = 0.0;

    for (index, point) in points.iter().enumerate() {
        let percent = if sum > 0.0 {
            point.total.max(0.0) / sum
        } else {
            0.0
        };
        let sweep = percent * 360.0;
        let end_angle = start_angle + sweep;
        let mid_angle = start_angle + sweep / 2.0;

        let geometry = SliceGeometry {
            cx: frame.cx,
            cy: frame.cy,
            mid_angle,
            outer_radius: frame.outer_radius,
            percent,
            index,
            name: &point.name,
        };

        let label = session.place(&geometry).map(|placement| {
            let position = placement.position();
            SliceLabel {
                x: position.x,
                y: position.y,
                anchor: text_anchor(&position, frame.cx),
                text: slice_label_text(&point.name, percent),
                resolved: placement.is_resolved(),
                attempts: placement.attempts(),
            }
        });

        slices.push(PieSlice {
            name: point.name.clone(),
            total: point.total,
            color: resolve_color(point, index),
            percent,
            start_angle,
            end_angle,
            mid_angle,
            label,
        });
        start_angle = end_angle;
    }

    slices
}

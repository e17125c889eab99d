//! Letter spacing and line height.

use kurbo::{PathEl, Point};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::ir::{Font, MetricsSet};

/// The advance every glyph of the family is drawn on.
pub const DEFAULT_ADVANCE: f64 = 600.0;

/// Half the family's reference line height.
pub const HALF_HEIGHT: f64 = 500.0;

/// How far to move away from the family's native spacing.
///
/// `letter_spacing` is in tenths of the default advance, so each unit adds
/// ten font units to every advance; `line_height` scales the vertical
/// extents, 1.0 leaves them alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub letter_spacing: f64,
    pub line_height: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing {
            letter_spacing: 0.0,
            line_height: 1.0,
        }
    }
}

impl Spacing {
    pub fn new(letter_spacing: f64, line_height: f64) -> Self {
        Spacing {
            letter_spacing,
            line_height,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Spacing::default()
    }

    /// How far outlines and side bearings move right.
    pub fn move_amount(&self) -> f64 {
        self.letter_spacing * 5.0
    }

    /// How much wider every advance gets.
    pub fn width_increase(&self) -> f64 {
        self.letter_spacing * 10.0
    }

    pub fn advance_width(&self) -> f64 {
        DEFAULT_ADVANCE + self.width_increase()
    }

    /// How far ascenders and descenders each move away from the baseline.
    pub fn height_offset(&self) -> f64 {
        self.line_height * HALF_HEIGHT - HALF_HEIGHT
    }
}

/// Add `dx` to every x coordinate in `el`, control points included.
fn shift_x(el: PathEl, dx: f64) -> PathEl {
    let shift = |p: Point| Point::new(p.x + dx, p.y);
    match el {
        PathEl::MoveTo(p) => PathEl::MoveTo(shift(p)),
        PathEl::LineTo(p) => PathEl::LineTo(shift(p)),
        PathEl::QuadTo(c, p) => PathEl::QuadTo(shift(c), shift(p)),
        PathEl::CurveTo(c0, c1, p) => PathEl::CurveTo(shift(c0), shift(c1), shift(p)),
        PathEl::ClosePath => PathEl::ClosePath,
    }
}

/// Re-space every glyph and bring the font-wide metrics along.
///
/// Empty glyph slots are skipped.
pub fn apply_spacing(font: &mut Font, spacing: Spacing) {
    if spacing.is_identity() {
        debug!("Identity spacing, metrics unchanged");
        return;
    }
    let dx = spacing.move_amount();
    let advance = spacing.advance_width();
    for glyph in font.glyphs.iter_mut() {
        if dx != 0.0 {
            for el in glyph.outline.elements_mut() {
                *el = shift_x(*el, dx);
            }
        }
        glyph.left_side_bearing += dx;
        glyph.advance_width = advance;
    }
    update_metrics(&mut font.metrics, spacing);
    debug!(
        "Spacing {:?}: advance {advance}, outlines moved {dx}, height offset {}",
        spacing,
        spacing.height_offset()
    );
}

fn update_metrics(metrics: &mut MetricsSet, spacing: Spacing) {
    let dx = spacing.move_amount();
    let advance = spacing.advance_width();
    metrics.default_advance_width = advance;
    metrics.average_advance_width = advance;
    metrics.max_advance_width = advance;
    metrics.y_min += dx;
    metrics.y_max += dx;
    metrics.min_left_side_bearing += dx;
    metrics.min_right_side_bearing += dx;
    metrics.x_max_extent += spacing.width_increase();

    let dy = spacing.height_offset();
    metrics.ascender += dy;
    metrics.typo_ascender += dy;
    metrics.win_ascent += dy;
    metrics.descender -= dy;
    metrics.typo_descender -= dy;
    metrics.win_descent += dy;
}

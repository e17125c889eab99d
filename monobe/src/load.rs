//! Reads a font binary into the table model.

use std::collections::BTreeMap;

use kurbo::BezPath;
use log::{debug, trace};
use monoir::ir::{Font, Glyph, GlyphTable, MetricsSet, SubstitutionTable};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
    GlyphId, MetadataProvider,
};
use write_fonts::read::{FontRef, ReadError, TableProvider};

use crate::{error::Error, gsub::read_gsub};

/// Collects skrifa drawing commands into a [`BezPath`].
#[derive(Default)]
struct BezPathPen {
    path: BezPath,
}

impl OutlinePen for BezPathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Draw every glyph unhinted at the default location, in font units.
///
/// Works for glyf and CFF alike; components are flattened into their parent.
fn load_glyphs(data: &[u8], num_glyphs: u16) -> Result<GlyphTable, Error> {
    let font = skrifa::FontRef::new(data).map_err(|e| Error::OutlineError(format!("{e}")))?;
    let outlines = font.outline_glyphs();
    let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());

    let mut glyphs = Vec::with_capacity(num_glyphs as usize);
    for gid in 0..num_glyphs {
        let glyph_id = GlyphId::new(gid as u32);
        let mut pen = BezPathPen::default();
        match outlines.get(glyph_id) {
            Some(outline) => {
                outline
                    .draw(
                        DrawSettings::unhinted(Size::unscaled(), LocationRef::default()),
                        &mut pen,
                    )
                    .map_err(|e| Error::DrawError {
                        gid,
                        reason: format!("{e}"),
                    })?;
            }
            None => trace!("Glyph {gid} has no outline"),
        }
        glyphs.push(Some(Glyph::new(
            pen.path,
            metrics.advance_width(glyph_id).unwrap_or_default() as f64,
            metrics.left_side_bearing(glyph_id).unwrap_or_default() as f64,
        )));
    }
    Ok(GlyphTable::new(glyphs))
}

/// The most common non-zero advance; ties go to the wider advance.
fn most_common_advance(glyphs: &GlyphTable) -> f64 {
    let mut counts = BTreeMap::new();
    for glyph in glyphs.slots().flatten() {
        if glyph.advance_width != 0.0 {
            *counts.entry(glyph.advance_width as i64).or_insert(0usize) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(advance, _)| advance as f64)
        .unwrap_or_default()
}

fn load_metrics(font: &FontRef, glyphs: &GlyphTable) -> Result<MetricsSet, Error> {
    let head = font.head()?;
    let hhea = font.hhea()?;
    let os2 = font.os2()?;
    Ok(MetricsSet {
        default_advance_width: most_common_advance(glyphs),
        average_advance_width: os2.x_avg_char_width() as f64,
        max_advance_width: hhea.advance_width_max().to_u16() as f64,
        y_min: head.y_min() as f64,
        y_max: head.y_max() as f64,
        min_left_side_bearing: hhea.min_left_side_bearing().to_i16() as f64,
        min_right_side_bearing: hhea.min_right_side_bearing().to_i16() as f64,
        x_max_extent: hhea.x_max_extent().to_i16() as f64,
        ascender: hhea.ascender().to_i16() as f64,
        descender: hhea.descender().to_i16() as f64,
        typo_ascender: os2.s_typo_ascender() as f64,
        typo_descender: os2.s_typo_descender() as f64,
        win_ascent: os2.us_win_ascent() as f64,
        win_descent: os2.us_win_descent() as f64,
    })
}

/// Parse `data` into a [`Font`].
///
/// head, hhea, maxp and OS/2 are required. A font without GSUB gets an empty
/// substitution table. The result is validated before it is returned.
pub fn load_font(data: &[u8]) -> Result<Font, Error> {
    let font = FontRef::new(data)?;
    let num_glyphs = font.maxp()?.num_glyphs();
    let glyphs = load_glyphs(data, num_glyphs)?;
    let gsub = match font.gsub() {
        Ok(gsub) => read_gsub(&gsub)?,
        Err(ReadError::TableIsMissing(_)) => {
            debug!("No GSUB, starting from an empty substitution table");
            SubstitutionTable::default()
        }
        Err(e) => return Err(e.into()),
    };
    let metrics = load_metrics(&font, &glyphs)?;
    let font = Font {
        glyphs,
        gsub,
        metrics,
    };
    font.validate()?;
    debug!(
        "Loaded {num_glyphs} glyphs, {} features, {} lookups",
        font.gsub.features.len(),
        font.gsub.lookups.len()
    );
    Ok(font)
}

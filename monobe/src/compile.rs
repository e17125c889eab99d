//! Compiles the table model back into a font binary.
//!
//! Tables the model describes are regenerated; everything else is carried
//! over from the source font byte for byte.

use log::{debug, trace};
use monoir::ir::{Font, MetricsSet};
use write_fonts::{
    from_obj::ToOwnedTable,
    read::{FontRef, ReadError, TableProvider},
    tables::{
        glyf::Bbox,
        gsub::Gsub,
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        os2::Os2,
    },
    types::{FWord, Tag, UfWord},
    FontBuilder, OtRound,
};

use crate::{
    error::Error,
    glyphs::{compile_glyphs, GlyphLimits},
    gsub::build_gsub,
    name::StyleNames,
};

/// Source tables that don't survive compilation.
///
/// CFF outlines are replaced by glyf, device metrics and hinting no longer
/// match the new outlines and advances, and any signature is invalidated.
const DROPPED: &[Tag] = &[
    Tag::new(b"CFF "),
    Tag::new(b"CFF2"),
    Tag::new(b"VORG"),
    Tag::new(b"hdmx"),
    Tag::new(b"LTSH"),
    Tag::new(b"fpgm"),
    Tag::new(b"prep"),
    Tag::new(b"cvt "),
    Tag::new(b"DSIG"),
];

/// One long metric per glyph.
///
/// glyf renderers place outlines by `x_min - lsb`, so a drawn glyph's side
/// bearing is its compiled x_min; only empty glyphs keep the model's value.
fn hmtx(font: &Font, x_mins: &[Option<i16>]) -> Hmtx {
    let metrics = font
        .glyphs
        .slots()
        .zip(x_mins)
        .map(|(glyph, x_min)| match glyph {
            Some(glyph) => LongMetric {
                advance: glyph.advance_width.ot_round(),
                side_bearing: x_min.unwrap_or_else(|| glyph.left_side_bearing.ot_round()),
            },
            None => LongMetric {
                advance: 0,
                side_bearing: 0,
            },
        })
        .collect();
    Hmtx::new(metrics, Vec::new())
}

fn hhea(source: &FontRef, metrics: &MetricsSet, num_glyphs: u16) -> Result<Hhea, Error> {
    let mut hhea: Hhea = source.hhea()?.to_owned_table();
    hhea.ascender = FWord::new(metrics.ascender.ot_round());
    hhea.descender = FWord::new(metrics.descender.ot_round());
    hhea.advance_width_max = UfWord::new(metrics.max_advance_width.ot_round());
    hhea.min_left_side_bearing = FWord::new(metrics.min_left_side_bearing.ot_round());
    hhea.min_right_side_bearing = FWord::new(metrics.min_right_side_bearing.ot_round());
    hhea.x_max_extent = FWord::new(metrics.x_max_extent.ot_round());
    hhea.number_of_h_metrics = num_glyphs;
    Ok(hhea)
}

fn head(
    source: &FontRef,
    metrics: &MetricsSet,
    bbox: Option<Bbox>,
    loca_format: LocaFormat,
) -> Result<Head, Error> {
    let mut head: Head = source.head()?.to_owned_table();
    if let Some(bbox) = bbox {
        head.x_min = bbox.x_min;
        head.x_max = bbox.x_max;
    }
    head.y_min = metrics.y_min.ot_round();
    head.y_max = metrics.y_max.ot_round();
    head.index_to_loc_format = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };
    Ok(head)
}

fn os2(source: &FontRef, metrics: &MetricsSet) -> Result<Os2, Error> {
    let mut os2: Os2 = source.os2()?.to_owned_table();
    os2.x_avg_char_width = metrics.average_advance_width.ot_round();
    os2.s_typo_ascender = metrics.typo_ascender.ot_round();
    os2.s_typo_descender = metrics.typo_descender.ot_round();
    os2.us_win_ascent = metrics.win_ascent.ot_round();
    os2.us_win_descent = metrics.win_descent.ot_round();
    Ok(os2)
}

fn maxp(num_glyphs: u16, limits: GlyphLimits) -> Maxp {
    // every glyph is simple and uninstructed once compiled
    Maxp {
        num_glyphs,
        max_points: Some(limits.max_points),
        max_contours: Some(limits.max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    }
}

fn source_gsub(source: &FontRef) -> Result<Option<Gsub>, Error> {
    match source.gsub() {
        Ok(gsub) => Ok(Some(gsub.to_owned_table())),
        Err(ReadError::TableIsMissing(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Compile `font` into a TrueType font binary.
///
/// `source` is the binary `font` was loaded from; tables the model doesn't
/// describe are copied from it. When `names` is given the family naming is
/// rewritten, otherwise the source name table is kept.
pub fn compile_font(
    source: &[u8],
    font: &Font,
    names: Option<&StyleNames>,
) -> Result<Vec<u8>, Error> {
    font.validate()?;
    let source = FontRef::new(source)?;
    let num_glyphs: u16 = font
        .glyphs
        .len()
        .try_into()
        .map_err(|_| Error::OutOfBounds {
            what: "glyph count".into(),
            value: format!("{}", font.glyphs.len()),
        })?;

    let compiled = compile_glyphs(&font.glyphs)?;
    debug!(
        "Compiled {num_glyphs} glyphs, {:?} loca, at most {} points in {} contours",
        compiled.loca_format, compiled.limits.max_points, compiled.limits.max_contours
    );

    let mut builder = FontBuilder::new();
    builder
        .add_table(&head(
            &source,
            &font.metrics,
            compiled.bbox,
            compiled.loca_format,
        )?)?
        .add_table(&hhea(&source, &font.metrics, num_glyphs)?)?
        .add_table(&maxp(num_glyphs, compiled.limits))?
        .add_table(&os2(&source, &font.metrics)?)?
        .add_table(&hmtx(font, &compiled.x_mins))?
        .add_table(&compiled.glyf)?
        .add_table(&compiled.loca)?;

    if let Some(gsub) = build_gsub(source_gsub(&source)?, &font.gsub)? {
        builder.add_table(&gsub)?;
    }
    if let Some(names) = names {
        let name = match source.name() {
            Ok(name) => Some(name.to_owned_table()),
            Err(ReadError::TableIsMissing(_)) => None,
            Err(e) => return Err(e.into()),
        };
        builder.add_table(&names.apply(name))?;
    }

    for record in source.table_directory.table_records() {
        let tag = record.tag();
        if builder.contains(tag) {
            continue;
        }
        if DROPPED.contains(&tag) {
            debug!("Dropping '{tag}'");
            continue;
        }
        if let Some(data) = source.data_for_tag(tag) {
            trace!("Copying '{tag}'");
            builder.add_raw(tag, data.as_bytes().to_vec());
        }
    }

    let bytes = builder.build();
    debug!("Assembled {} byte font", bytes.len());
    Ok(bytes)
}

//! A small TrueType font assembled in memory.
//!
//! Glyph order:
//!
//! | gid | glyph | notes |
//! |-----|-------|-------|
//! | 0 | .notdef | |
//! | 1 | a | cv01 -> 2 |
//! | 2 | a.cv01 | |
//! | 3 | g | cv02 -> 4, has a quadratic curve |
//! | 4 | g.cv02 | |
//! | 5 | parenleft | cv03 -> 7 |
//! | 6 | parenright | cv03 -> 8 |
//! | 7 | parenleft.cv03 | |
//! | 8 | parenright.cv03 | |
//! | 9 | hyphen | ss03 -> 10, ss01 ligates a pair of them into 10 |
//! | 10 | hyphen.case | |
//! | 11 | space | empty |
//!
//! Every drawn glyph is a box whose width identifies it, see [`box_width`].

use kurbo::{BezPath, Rect, Shape};
use write_fonts::{
    tables::{
        glyf::{GlyfLocaBuilder, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::Os2,
    },
    types::{FWord, GlyphId16, NameId, Tag, UfWord},
    FontBuilder, OffsetMarker,
};

pub const NUM_GLYPHS: usize = 12;
pub const SPACE: u16 = 11;

pub const CV01: Tag = Tag::new(b"cv01");
pub const CV02: Tag = Tag::new(b"cv02");
pub const CV03: Tag = Tag::new(b"cv03");
pub const SS01: Tag = Tag::new(b"ss01");
pub const SS03: Tag = Tag::new(b"ss03");

/// Advance of every glyph in the test font.
pub const ADVANCE: u16 = 600;
/// Left edge of every drawn glyph.
pub const LEFT: i16 = 50;

pub fn gid(id: u16) -> GlyphId16 {
    GlyphId16::new(id)
}

/// The width of the box drawn for `gid`.
pub fn box_width(gid: u16) -> f64 {
    20.0 * (gid + 1) as f64
}

/// A glyph's shape: a box, plus a quadratic bowl under `g`.
pub fn outline(gid: u16) -> BezPath {
    if gid == SPACE {
        return BezPath::new();
    }
    let left = LEFT as f64;
    let mut path = Rect::new(left, 0.0, left + box_width(gid), 500.0).to_path(0.1);
    if gid == 3 {
        path.move_to((left, -200.0));
        path.quad_to((left + 40.0, -300.0), (left + 80.0, -200.0));
        path.line_to((left + 80.0, -100.0));
        path.close_path();
    }
    path
}

fn be(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

/// Offsets of `children` laid out back to back after a header of `header_len` bytes.
fn offsets(header_len: usize, children: &[Vec<u8>]) -> Vec<u16> {
    let mut pos = header_len;
    children
        .iter()
        .map(|child| {
            let offset = pos as u16;
            pos += child.len();
            offset
        })
        .collect()
}

fn lang_sys(feature_indices: &[u16]) -> Vec<u8> {
    let mut bytes = be(&[0, 0xFFFF, feature_indices.len() as u16]);
    bytes.extend(be(feature_indices));
    bytes
}

fn script(default: &[u16], records: &[(&[u8; 4], &[u16])]) -> Vec<u8> {
    let children: Vec<_> = std::iter::once(lang_sys(default))
        .chain(records.iter().map(|(_, indices)| lang_sys(indices)))
        .collect();
    let offsets = offsets(4 + 6 * records.len(), &children);
    let mut bytes = be(&[offsets[0], records.len() as u16]);
    for ((tag, _), offset) in records.iter().zip(&offsets[1..]) {
        bytes.extend_from_slice(*tag);
        bytes.extend(be(&[*offset]));
    }
    bytes.extend(children.concat());
    bytes
}

/// A list of tagged records, each pointing at a child table.
fn record_list(records: Vec<(&[u8; 4], Vec<u8>)>) -> Vec<u8> {
    let children: Vec<_> = records.iter().map(|(_, child)| child.clone()).collect();
    let offsets = offsets(2 + 6 * records.len(), &children);
    let mut bytes = be(&[records.len() as u16]);
    for ((tag, _), offset) in records.iter().zip(&offsets) {
        bytes.extend_from_slice(*tag);
        bytes.extend(be(&[*offset]));
    }
    bytes.extend(children.concat());
    bytes
}

fn feature(lookups: &[u16]) -> Vec<u8> {
    let mut bytes = be(&[0, lookups.len() as u16]);
    bytes.extend(be(lookups));
    bytes
}

fn lookup(lookup_type: u16, subtable: Vec<u8>) -> Vec<u8> {
    let mut bytes = be(&[lookup_type, 0, 1, 8]);
    bytes.extend(subtable);
    bytes
}

fn lookup_list(lookups: Vec<Vec<u8>>) -> Vec<u8> {
    let offsets = offsets(2 + 2 * lookups.len(), &lookups);
    let mut bytes = be(&[lookups.len() as u16]);
    bytes.extend(be(&offsets));
    bytes.extend(lookups.concat());
    bytes
}

fn coverage_list(glyphs: &[u16]) -> Vec<u8> {
    let mut bytes = be(&[1, glyphs.len() as u16]);
    bytes.extend(be(glyphs));
    bytes
}

/// Single substitution, format 2, list coverage.
fn single_list(covered: &[u16], substitutes: &[u16]) -> Vec<u8> {
    let header_len = 6 + 2 * substitutes.len() as u16;
    let mut bytes = be(&[2, header_len, substitutes.len() as u16]);
    bytes.extend(be(substitutes));
    bytes.extend(coverage_list(covered));
    bytes
}

/// Single substitution, format 1, one range of coverage.
fn single_delta(start: u16, end: u16, delta: i16) -> Vec<u8> {
    be(&[1, 6, delta as u16, 2, 1, start, end, 0])
}

/// Ligature substitution with a single ligature.
fn ligature(components: &[u16], ligature: u16) -> Vec<u8> {
    // header, then coverage of the first component, then the ligature set
    let mut bytes = be(&[1, 8, 1, 14]);
    bytes.extend(coverage_list(&components[..1]));
    bytes.extend(be(&[1, 4, ligature, components.len() as u16]));
    bytes.extend(be(&components[1..]));
    bytes
}

/// GSUB with cv01, cv02, cv03, ss01 and ss03, one lookup each, registered
/// under DFLT and latn; latn also has a TRK language system with cv01 and ss03.
pub fn gsub() -> Vec<u8> {
    let all: &[u16] = &[0, 1, 2, 3, 4];
    let script_list = record_list(vec![
        (b"DFLT", script(all, &[])),
        (b"latn", script(all, &[(b"TRK ", &[0u16, 4][..])])),
    ]);
    let feature_list = record_list(vec![
        (b"cv01", feature(&[0])),
        (b"cv02", feature(&[1])),
        (b"cv03", feature(&[2])),
        (b"ss01", feature(&[3])),
        (b"ss03", feature(&[4])),
    ]);
    let lookup_list = lookup_list(vec![
        lookup(1, single_list(&[1], &[2])),
        lookup(1, single_list(&[3], &[4])),
        lookup(1, single_delta(5, 6, 2)),
        lookup(4, ligature(&[9, 9], 10)),
        lookup(1, single_list(&[9], &[10])),
    ]);
    let children = vec![script_list, feature_list, lookup_list];
    let offsets = offsets(10, &children);
    let mut bytes = be(&[1, 0]);
    bytes.extend(be(&offsets));
    bytes.extend(children.concat());
    bytes
}

fn name_record(
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: NameId,
    value: &str,
) -> NameRecord {
    NameRecord {
        name_id,
        platform_id,
        encoding_id,
        language_id,
        string: OffsetMarker::new(value.to_string()),
    }
}

/// The names a font fresh out of the foundry has.
pub fn name() -> Name {
    Name::new(
        vec![
            name_record(1, 0, 0, NameId::FAMILY_NAME, "Commit Mono V143"),
            name_record(3, 1, 0x409, NameId::FAMILY_NAME, "Commit Mono V143"),
            name_record(3, 1, 0x409, NameId::SUBFAMILY_NAME, "Regular"),
            name_record(3, 1, 0x409, NameId::FULL_NAME, "Commit Mono V143 Regular"),
            name_record(3, 1, 0x409, NameId::VERSION_STRING, "Version 1.143"),
        ]
        .into_iter()
        .collect(),
    )
}

/// The font described in the module docs.
pub fn test_font() -> Vec<u8> {
    build_font(true)
}

/// The test font without a GSUB table.
pub fn test_font_without_gsub() -> Vec<u8> {
    build_font(false)
}

fn build_font(with_gsub: bool) -> Vec<u8> {
    let mut glyf_builder = GlyfLocaBuilder::new();
    let mut metrics = Vec::new();
    for gid in 0..NUM_GLYPHS as u16 {
        let path = outline(gid);
        let glyph = if path.elements().is_empty() {
            SimpleGlyph::default()
        } else {
            SimpleGlyph::from_bezpath(&path).unwrap()
        };
        glyf_builder.add_glyph(&glyph).unwrap();
        metrics.push(LongMetric {
            advance: ADVANCE,
            side_bearing: if gid == SPACE { 0 } else { LEFT },
        });
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let head = Head {
        units_per_em: 1000,
        x_min: LEFT,
        y_min: -300,
        x_max: LEFT + box_width(NUM_GLYPHS as u16 - 1) as i16,
        y_max: 500,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    };
    let hhea = Hhea {
        ascender: FWord::new(950),
        descender: FWord::new(-250),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(ADVANCE),
        min_left_side_bearing: FWord::new(LEFT),
        min_right_side_bearing: FWord::new(30),
        x_max_extent: FWord::new(570),
        number_of_h_metrics: NUM_GLYPHS as u16,
        ..Default::default()
    };
    let maxp = Maxp {
        num_glyphs: NUM_GLYPHS as u16,
        max_points: Some(8),
        max_contours: Some(2),
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
    };
    let os2 = Os2 {
        x_avg_char_width: ADVANCE as i16,
        s_typo_ascender: 800,
        s_typo_descender: -200,
        s_typo_line_gap: 0,
        us_win_ascent: 1000,
        us_win_descent: 300,
        ..Default::default()
    };

    let mut builder = FontBuilder::new();
    builder
        .add_table(&head)
        .unwrap()
        .add_table(&hhea)
        .unwrap()
        .add_table(&maxp)
        .unwrap()
        .add_table(&os2)
        .unwrap()
        .add_table(&Hmtx::new(metrics, Vec::new()))
        .unwrap()
        .add_table(&glyf)
        .unwrap()
        .add_table(&loca)
        .unwrap()
        .add_table(&name())
        .unwrap();
    // stale once advances change
    builder.add_raw(Tag::new(b"hdmx"), vec![0u8; 8]);
    builder.add_raw(Tag::new(b"TEST"), b"unchanged".to_vec());
    if with_gsub {
        builder.add_raw(Tag::new(b"GSUB"), gsub());
    }
    builder.build()
}

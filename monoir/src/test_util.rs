use kurbo::{BezPath, Rect, Shape};
use write_fonts::types::{GlyphId16, Tag};

use crate::ir::{Font, Glyph, GlyphTable};

pub(crate) const CV01: Tag = Tag::new(b"cv01");
pub(crate) const CV02: Tag = Tag::new(b"cv02");
pub(crate) const CV03: Tag = Tag::new(b"cv03");
pub(crate) const SS01: Tag = Tag::new(b"ss01");
pub(crate) const SS03: Tag = Tag::new(b"ss03");

pub(crate) fn gid(id: u16) -> GlyphId16 {
    GlyphId16::new(id)
}

pub(crate) fn square() -> BezPath {
    Rect::new(50.0, 0.0, 550.0, 500.0).to_path(0.1)
}

pub(crate) fn triangle() -> BezPath {
    let mut path = BezPath::new();
    path.move_to((100.0, 0.0));
    path.line_to((300.0, 700.0));
    path.quad_to((400.0, 350.0), (500.0, 0.0));
    path.curve_to((400.0, -10.0), (200.0, -10.0), (100.0, 0.0));
    path.close_path();
    path
}

/// `n` outlines that differ from each other by width.
pub(crate) fn shapes(n: usize) -> Vec<BezPath> {
    (0..n)
        .map(|i| Rect::new(0.0, 0.0, 10.0 * (i + 1) as f64, 100.0).to_path(0.1))
        .collect()
}

/// Glyph `i` gets `shapes(n)[i]`, an advance of 600 and a lsb of `10 * i`.
pub(crate) fn glyph_table(n: usize) -> GlyphTable {
    GlyphTable::new(
        shapes(n)
            .into_iter()
            .enumerate()
            .map(|(i, outline)| Some(Glyph::new(outline, 600.0, 10.0 * i as f64)))
            .collect(),
    )
}

/// Which of the [`shapes`] the glyph at `gid` currently carries.
pub(crate) fn outline_of(font: &Font, gid: GlyphId16) -> usize {
    let outline = &font.glyphs.get(gid).unwrap().outline;
    shapes(font.glyphs.len())
        .iter()
        .position(|shape| shape == outline)
        .unwrap()
}

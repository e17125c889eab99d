//! Make stylistic alternates the default shapes.
//!
//! Each character variant feature maps base glyphs to their alternates with
//! single substitutions. Rather than keeping the feature around we exchange
//! the outlines of every base/alternate pair, so the alternate shape shows up
//! without any shaping support. Metrics stay with the glyph id.

use log::debug;
use write_fonts::types::Tag;

use crate::{error::Error, ir::Font};

/// Swap outlines for every feature in `alternates`.
///
/// Features are applied in reverse of the order given. When two features
/// cover the same glyphs the result depends on that order; callers that
/// care should list the feature they want to win first.
///
/// Every pair is resolved and checked before any outline moves, so an error
/// leaves the font untouched.
pub fn swap_alternates(font: &mut Font, alternates: &[Tag]) -> Result<(), Error> {
    let mut pending = Vec::with_capacity(alternates.len());
    for tag in alternates.iter().rev() {
        let pairs = font.gsub.substitution_pairs(*tag)?;
        if pairs.is_empty() {
            debug!("No substitutions for '{tag}', nothing to swap");
        }
        pending.push((*tag, pairs));
    }
    for (original, substitute) in pending.iter().flat_map(|(_, pairs)| pairs) {
        font.glyphs.check(*original)?;
        font.glyphs.check(*substitute)?;
    }

    for (tag, pairs) in pending {
        debug!("Swap {} outlines for '{tag}'", pairs.len());
        for (original, substitute) in pairs {
            font.glyphs.swap_outlines(original, substitute)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use write_fonts::types::GlyphId16;

    use crate::{
        ir::{Coverage, Feature, GlyphRange, Lookup, Subtable},
        test_util::{gid, glyph_table, outline_of, shapes, CV01, CV02, CV03},
    };

    use super::*;

    /// Glyphs 0..6 each get a distinct shape; cv01 maps 1->4, cv02 maps 1->5,
    /// cv03 maps 2..3 -> 4..5 through a range coverage.
    fn font() -> Font {
        Font {
            glyphs: glyph_table(6),
            gsub: crate::ir::SubstitutionTable {
                scripts: Vec::new(),
                features: vec![
                    Feature::new(CV01, vec![0]),
                    Feature::new(CV02, vec![1]),
                    Feature::new(CV03, vec![2]),
                ],
                lookups: vec![
                    Lookup::single(vec![Subtable {
                        coverage: Coverage::List(vec![gid(1)]),
                        substitute: vec![gid(4)],
                    }]),
                    Lookup::single(vec![Subtable {
                        coverage: Coverage::List(vec![gid(1)]),
                        substitute: vec![gid(5)],
                    }]),
                    Lookup::single(vec![Subtable {
                        coverage: Coverage::Ranges(vec![GlyphRange::new(gid(2), gid(3))]),
                        substitute: vec![gid(4), gid(5)],
                    }]),
                ],
            },
            metrics: Default::default(),
        }
    }

    fn outlines(font: &Font) -> Vec<usize> {
        (0..font.glyphs.len() as u16)
            .map(|g| outline_of(font, GlyphId16::new(g)))
            .collect()
    }

    #[test]
    fn single_feature_exchanges_pair() {
        let mut font = font();
        swap_alternates(&mut font, &[CV01]).unwrap();
        assert_eq!(vec![0, 4, 2, 3, 1, 5], outlines(&font));
    }

    #[test]
    fn metrics_do_not_move() {
        let mut font = font();
        let before: Vec<_> = font
            .glyphs
            .slots()
            .map(|g| g.map(|g| (g.advance_width, g.left_side_bearing)))
            .collect();
        swap_alternates(&mut font, &[CV01, CV03]).unwrap();
        let after: Vec<_> = font
            .glyphs
            .slots()
            .map(|g| g.map(|g| (g.advance_width, g.left_side_bearing)))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn applying_twice_restores_original() {
        let mut font = font();
        swap_alternates(&mut font, &[CV01]).unwrap();
        swap_alternates(&mut font, &[CV01]).unwrap();
        assert_eq!(outlines(&self::font()), outlines(&font));
    }

    #[test]
    fn range_coverage_swaps_in_order() {
        let mut font = font();
        swap_alternates(&mut font, &[CV03]).unwrap();
        assert_eq!(vec![0, 1, 4, 5, 2, 3], outlines(&font));
    }

    // Overlapping features resolve in reverse of the declared order; pin it.
    #[test]
    fn overlapping_features_apply_last_declared_first() {
        let mut font = font();
        swap_alternates(&mut font, &[CV01, CV02]).unwrap();
        // cv02 first: 1<->5 gives [0,5,2,3,4,1]; then cv01: 1<->4 gives [0,4,2,3,5,1]
        assert_eq!(vec![0, 4, 2, 3, 5, 1], outlines(&font));

        let mut font = self::font();
        swap_alternates(&mut font, &[CV02, CV01]).unwrap();
        // cv01 first: [0,4,2,3,1,5]; then cv02: 1<->5 gives [0,5,2,3,1,4]
        assert_eq!(vec![0, 5, 2, 3, 1, 4], outlines(&font));
    }

    #[test]
    fn missing_feature_is_a_nop() {
        let mut font = font();
        swap_alternates(&mut font, &[Tag::new(b"cv11")]).unwrap();
        assert_eq!(outlines(&self::font()), outlines(&font));
    }

    #[test]
    fn misaligned_subtable_swaps_nothing() {
        let mut font = font();
        font.gsub.lookups[2].subtables[0].substitute.pop();
        let result = swap_alternates(&mut font, &[CV03, CV01]);
        assert_eq!(
            Err(Error::CoverageMismatch {
                lookup: 2,
                subtable: 0,
                coverage: 2,
                substitute: 1,
            }),
            result
        );
        assert_eq!(outlines(&self::font()), outlines(&font));
    }

    #[test]
    fn out_of_range_substitute_swaps_nothing() {
        let mut font = font();
        font.gsub.lookups[1].subtables[0].substitute = vec![gid(40)];
        let result = swap_alternates(&mut font, &[CV02, CV01]);
        assert_eq!(Err(Error::GlyphOutOfBounds { gid: 40, len: 6 }), result);
        assert_eq!(outlines(&self::font()), outlines(&font));
    }

    #[test]
    fn shapes_are_distinct() {
        // guard for the helpers the tests above lean on
        let shapes = shapes(6);
        for (i, a) in shapes.iter().enumerate() {
            for b in shapes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}

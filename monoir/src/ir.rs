//! The in-memory table model.
//!
//! Every cross reference is an integer index into an owning table, mirroring
//! the binary layout. Glyph ids are stable for the lifetime of a [`Font`]:
//! glyphs are never inserted or removed, only their outlines and metrics
//! change.

use kurbo::BezPath;
use write_fonts::types::{GlyphId16, Tag};

use crate::error::Error;

/// The root of the model; owns every table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Font {
    pub glyphs: GlyphTable,
    pub gsub: SubstitutionTable,
    pub metrics: MetricsSet,
}

impl Font {
    /// Check every index in the substitution table against the tables it
    /// points into.
    pub fn validate(&self) -> Result<(), Error> {
        self.gsub.validate(self.glyphs.len())
    }
}

/// A single glyph: an outline plus its horizontal metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Glyph {
    pub outline: BezPath,
    pub advance_width: f64,
    pub left_side_bearing: f64,
}

impl Glyph {
    pub fn new(outline: BezPath, advance_width: f64, left_side_bearing: f64) -> Self {
        Glyph {
            outline,
            advance_width,
            left_side_bearing,
        }
    }
}

/// Glyphs indexed densely by glyph id.
///
/// A slot may be empty; passes that visit every glyph skip such slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphTable {
    glyphs: Vec<Option<Glyph>>,
}

impl GlyphTable {
    pub fn new(glyphs: Vec<Option<Glyph>>) -> Self {
        GlyphTable { glyphs }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn get(&self, gid: GlyphId16) -> Option<&Glyph> {
        self.glyphs
            .get(gid.to_u16() as usize)
            .and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, gid: GlyphId16) -> Option<&mut Glyph> {
        self.glyphs
            .get_mut(gid.to_u16() as usize)
            .and_then(Option::as_mut)
    }

    /// Every slot, in glyph id order, including empty ones.
    pub fn slots(&self) -> impl Iterator<Item = Option<&Glyph>> + '_ {
        self.glyphs.iter().map(Option::as_ref)
    }

    /// Every present glyph, in glyph id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Glyph> + '_ {
        self.glyphs.iter_mut().flatten()
    }

    pub(crate) fn check(&self, gid: GlyphId16) -> Result<usize, Error> {
        let idx = gid.to_u16() as usize;
        match self.glyphs.get(idx) {
            None => Err(Error::GlyphOutOfBounds {
                gid: gid.to_u16(),
                len: self.glyphs.len(),
            }),
            Some(None) => Err(Error::MissingGlyph(gid.to_u16())),
            Some(Some(_)) => Ok(idx),
        }
    }

    /// Exchange the outlines of two glyphs, leaving their metrics in place.
    pub fn swap_outlines(&mut self, a: GlyphId16, b: GlyphId16) -> Result<(), Error> {
        let a = self.check(a)?;
        let b = self.check(b)?;
        if a == b {
            return Ok(());
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.glyphs.split_at_mut(hi);
        if let (Some(lo), Some(hi)) = (head[lo].as_mut(), tail[0].as_mut()) {
            std::mem::swap(&mut lo.outline, &mut hi.outline);
        }
        Ok(())
    }
}

/// An inclusive range of glyph ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRange {
    pub start: GlyphId16,
    pub end: GlyphId16,
}

impl GlyphRange {
    pub fn new(start: GlyphId16, end: GlyphId16) -> Self {
        GlyphRange { start, end }
    }

    pub fn len(&self) -> usize {
        (self.end.to_u16() as usize + 1).saturating_sub(self.start.to_u16() as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = GlyphId16> {
        (self.start.to_u16()..=self.end.to_u16()).map(GlyphId16::new)
    }
}

/// The glyphs a substitution applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    /// Explicit glyph ids, in stored order
    List(Vec<GlyphId16>),
    /// Closed ranges, expanded in range order
    Ranges(Vec<GlyphRange>),
}

impl Default for Coverage {
    fn default() -> Self {
        Coverage::List(Vec::new())
    }
}

impl Coverage {
    /// The ordered glyph sequence this coverage describes.
    ///
    /// Returns the first range whose end precedes its start, if any.
    pub fn expand(&self) -> Result<Vec<GlyphId16>, GlyphRange> {
        match self {
            Coverage::List(glyphs) => Ok(glyphs.clone()),
            Coverage::Ranges(ranges) => {
                if let Some(bad) = ranges.iter().find(|r| r.end < r.start) {
                    return Err(*bad);
                }
                Ok(ranges.iter().flat_map(GlyphRange::iter).collect())
            }
        }
    }
}

/// A single substitution subtable.
///
/// Position `i` of the expanded coverage maps to `substitute[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subtable {
    pub coverage: Coverage,
    pub substitute: Vec<GlyphId16>,
}

/// A lookup; only single substitution lookups carry subtables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    pub lookup_type: u16,
    pub subtables: Vec<Subtable>,
}

impl Lookup {
    pub const SINGLE_SUBSTITUTION: u16 = 1;
    pub const LIGATURE_SUBSTITUTION: u16 = 4;

    pub fn single(subtables: Vec<Subtable>) -> Self {
        Lookup {
            lookup_type: Self::SINGLE_SUBSTITUTION,
            subtables,
        }
    }

    pub fn is_single(&self) -> bool {
        self.lookup_type == Self::SINGLE_SUBSTITUTION
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub tag: Tag,
    pub lookup_indices: Vec<u16>,
}

impl Feature {
    pub fn new(tag: Tag, lookup_indices: Vec<u16>) -> Self {
        Feature {
            tag,
            lookup_indices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangSys {
    /// 0xFFFF when there is no required feature
    pub required_feature_index: u16,
    pub feature_indices: Vec<u16>,
}

impl LangSys {
    pub const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

    pub fn new(feature_indices: Vec<u16>) -> Self {
        LangSys {
            required_feature_index: Self::NO_REQUIRED_FEATURE,
            feature_indices,
        }
    }
}

impl Default for LangSys {
    fn default() -> Self {
        LangSys::new(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangSysRecord {
    pub tag: Tag,
    pub lang_sys: LangSys,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub tag: Tag,
    pub default_lang_sys: Option<LangSys>,
    pub lang_sys_records: Vec<LangSysRecord>,
}

impl Script {
    /// Every language system of this script, default first.
    pub fn lang_systems(&self) -> impl Iterator<Item = &LangSys> + '_ {
        self.default_lang_sys
            .iter()
            .chain(self.lang_sys_records.iter().map(|r| &r.lang_sys))
    }

    pub fn lang_systems_mut(&mut self) -> impl Iterator<Item = &mut LangSys> + '_ {
        self.default_lang_sys
            .iter_mut()
            .chain(self.lang_sys_records.iter_mut().map(|r| &mut r.lang_sys))
    }
}

/// The GSUB table: scripts reference features, features reference lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    pub scripts: Vec<Script>,
    pub features: Vec<Feature>,
    pub lookups: Vec<Lookup>,
}

impl SubstitutionTable {
    /// Check every index in this table.
    ///
    /// Glyph ids are checked against `num_glyphs`; reports the first
    /// violation found.
    pub fn validate(&self, num_glyphs: usize) -> Result<(), Error> {
        for script in self.scripts.iter() {
            for lang_sys in script.lang_systems() {
                let required = (lang_sys.required_feature_index != LangSys::NO_REQUIRED_FEATURE)
                    .then_some(lang_sys.required_feature_index);
                for index in lang_sys.feature_indices.iter().copied().chain(required) {
                    if index as usize >= self.features.len() {
                        return Err(Error::FeatureOutOfBounds {
                            script: script.tag,
                            index,
                            len: self.features.len(),
                        });
                    }
                }
            }
        }
        for feature in self.features.iter() {
            self.checked_lookup_indices(feature)?;
        }
        for (lookup_idx, lookup) in self.lookups.iter().enumerate() {
            for (subtable_idx, subtable) in lookup.subtables.iter().enumerate() {
                let covered =
                    crate::gsub::aligned_coverage(lookup_idx as u16, subtable_idx, subtable)?;
                for gid in covered.into_iter().chain(subtable.substitute.iter().copied()) {
                    if gid.to_u16() as usize >= num_glyphs {
                        return Err(Error::GlyphOutOfBounds {
                            gid: gid.to_u16(),
                            len: num_glyphs,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The lookup indices of `feature`, each checked against the lookup list.
    pub(crate) fn checked_lookup_indices<'a>(
        &self,
        feature: &'a Feature,
    ) -> Result<&'a [u16], Error> {
        if let Some(index) = feature
            .lookup_indices
            .iter()
            .copied()
            .find(|idx| *idx as usize >= self.lookups.len())
        {
            return Err(Error::LookupOutOfBounds {
                feature: feature.tag,
                index,
                len: self.lookups.len(),
            });
        }
        Ok(&feature.lookup_indices)
    }
}

/// Font-wide metrics, spread across head, hhea and OS/2.
///
/// `descender` and `typo_descender` are signed and negative below the
/// baseline; `win_descent` is a positive distance below the baseline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSet {
    pub default_advance_width: f64,
    pub average_advance_width: f64,
    pub max_advance_width: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub min_left_side_bearing: f64,
    pub min_right_side_bearing: f64,
    pub x_max_extent: f64,
    pub ascender: f64,
    pub descender: f64,
    pub typo_ascender: f64,
    pub typo_descender: f64,
    pub win_ascent: f64,
    pub win_descent: f64,
}

#[cfg(test)]
mod tests {
    use kurbo::BezPath;
    use pretty_assertions::assert_eq;

    use crate::test_util::{gid, square, triangle};

    use super::*;

    #[test]
    fn range_coverage_expands_in_range_order() {
        let coverage = Coverage::Ranges(vec![
            GlyphRange::new(gid(7), gid(8)),
            GlyphRange::new(gid(2), gid(4)),
        ]);
        assert_eq!(
            vec![gid(7), gid(8), gid(2), gid(3), gid(4)],
            coverage.expand().unwrap()
        );
    }

    #[test]
    fn list_coverage_keeps_stored_order() {
        let coverage = Coverage::List(vec![gid(9), gid(1), gid(5)]);
        assert_eq!(vec![gid(9), gid(1), gid(5)], coverage.expand().unwrap());
    }

    #[test]
    fn backwards_range_is_rejected() {
        let bad = GlyphRange::new(gid(5), gid(3));
        let coverage = Coverage::Ranges(vec![GlyphRange::new(gid(1), gid(1)), bad]);
        assert_eq!(Err(bad), coverage.expand());
    }

    #[test]
    fn swap_outlines_keeps_metrics() {
        let mut glyphs = GlyphTable::new(vec![
            Some(Glyph::new(square(), 600.0, 50.0)),
            Some(Glyph::new(triangle(), 500.0, 20.0)),
        ]);
        glyphs.swap_outlines(gid(1), gid(0)).unwrap();

        let first = glyphs.get(gid(0)).unwrap();
        let second = glyphs.get(gid(1)).unwrap();
        assert_eq!(triangle(), first.outline);
        assert_eq!((600.0, 50.0), (first.advance_width, first.left_side_bearing));
        assert_eq!(square(), second.outline);
        assert_eq!((500.0, 20.0), (second.advance_width, second.left_side_bearing));
    }

    #[test]
    fn swap_with_self_is_a_nop() {
        let mut glyphs = GlyphTable::new(vec![Some(Glyph::new(square(), 600.0, 0.0))]);
        glyphs.swap_outlines(gid(0), gid(0)).unwrap();
        assert_eq!(square(), glyphs.get(gid(0)).unwrap().outline);
    }

    #[test]
    fn swap_reports_bad_glyphs() {
        let mut glyphs = GlyphTable::new(vec![Some(Glyph::default()), None]);
        assert_eq!(
            Err(Error::GlyphOutOfBounds { gid: 4, len: 2 }),
            glyphs.swap_outlines(gid(0), gid(4))
        );
        assert_eq!(
            Err(Error::MissingGlyph(1)),
            glyphs.swap_outlines(gid(1), gid(0))
        );
    }

    #[test]
    fn iter_mut_skips_empty_slots() {
        let mut glyphs = GlyphTable::new(vec![None, Some(Glyph::default()), None]);
        assert_eq!(1, glyphs.iter_mut().count());
        assert_eq!(3, glyphs.slots().count());
        assert!(glyphs.get(gid(0)).is_none());
        assert_eq!(Some(&Glyph::new(BezPath::new(), 0.0, 0.0)), glyphs.get(gid(1)));
    }

    #[test]
    fn validate_catches_dangling_feature_index() {
        let mut gsub = SubstitutionTable::default();
        gsub.scripts.push(Script {
            tag: Tag::new(b"latn"),
            default_lang_sys: Some(LangSys::new(vec![0])),
            lang_sys_records: Vec::new(),
        });
        assert_eq!(
            Err(Error::FeatureOutOfBounds {
                script: Tag::new(b"latn"),
                index: 0,
                len: 0,
            }),
            gsub.validate(10)
        );
    }

    #[test]
    fn validate_catches_dangling_lookup_and_glyph() {
        let mut gsub = SubstitutionTable {
            features: vec![Feature::new(Tag::new(b"cv01"), vec![1])],
            lookups: vec![Lookup::single(vec![Subtable {
                coverage: Coverage::List(vec![gid(1)]),
                substitute: vec![gid(12)],
            }])],
            ..Default::default()
        };
        assert_eq!(
            Err(Error::LookupOutOfBounds {
                feature: Tag::new(b"cv01"),
                index: 1,
                len: 1,
            }),
            gsub.validate(10)
        );

        gsub.features[0].lookup_indices = vec![0];
        assert_eq!(
            Err(Error::GlyphOutOfBounds { gid: 12, len: 10 }),
            gsub.validate(10)
        );
        assert_eq!(Ok(()), gsub.validate(13));
    }
}

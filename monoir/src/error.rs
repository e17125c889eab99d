use thiserror::Error;
use write_fonts::types::Tag;

/// A structural problem in the table model.
///
/// All of these indicate that an index stored in one table does not resolve
/// in the table it points into, so the font can't be transformed safely.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("glyph {gid} is out of bounds for a glyph table of length {len}")]
    GlyphOutOfBounds { gid: u16, len: usize },
    #[error("glyph {0} has no entry in the glyph table")]
    MissingGlyph(u16),
    #[error("feature '{feature}' references lookup {index}, but only {len} lookups exist")]
    LookupOutOfBounds { feature: Tag, index: u16, len: usize },
    #[error("script '{script}' references feature {index}, but only {len} features exist")]
    FeatureOutOfBounds { script: Tag, index: u16, len: usize },
    #[error("lookup {lookup} subtable {subtable} covers {coverage} glyphs but has {substitute} substitutes")]
    CoverageMismatch {
        lookup: u16,
        subtable: usize,
        coverage: usize,
        substitute: usize,
    },
    #[error("lookup {lookup} subtable {subtable} has a range that ends ({end}) before it starts ({start})")]
    InvalidRange {
        lookup: u16,
        subtable: usize,
        start: u16,
        end: u16,
    },
    #[error("too many features, {0} does not fit in a feature index")]
    TooManyFeatures(usize),
}

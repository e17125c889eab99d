use thiserror::Error;
use write_fonts::{read::ReadError, tables::glyf::MalformedPath, types::Tag, BuilderError};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to read font: {0}")]
    ReadError(#[from] ReadError),
    #[error("Unable to load outlines: {0}")]
    OutlineError(String),
    #[error("Unable to draw glyph {gid}: {reason}")]
    DrawError { gid: u16, reason: String },
    #[error("Glyph {gid} has a cubic that can't be approximated with quadratics")]
    QuadraticConversion { gid: u16 },
    #[error("Glyph {gid} has a malformed path: {problem:?}")]
    MalformedPath { gid: u16, problem: MalformedPath },
    #[error("Glyph {gid} failed to compile: {reason}")]
    GlyphCompile { gid: u16, reason: String },
    #[error("{what} out of bounds: {value}")]
    OutOfBounds { what: String, value: String },
    #[error("The model has {model} lookups but the source GSUB has {source_count}")]
    LookupCountMismatch { model: usize, source_count: usize },
    #[error("Invalid table model: {0}")]
    ModelError(#[from] monoir::error::Error),
    #[error("Generating bytes for '{tag}' failed: {reason}")]
    DumpTableError { tag: Tag, reason: String },
}

impl From<BuilderError> for Error {
    fn from(err: BuilderError) -> Self {
        Error::DumpTableError {
            tag: err.tag,
            reason: format!("{:?}", err.inner),
        }
    }
}

//! The features a user can ask for, and how their names map to GSUB tags.

use indexmap::IndexSet;
use log::debug;
use write_fonts::types::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Baked in by exchanging outlines with the alternates
    Alternate,
    /// Turned on by default through calt
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureEntry {
    pub name: &'static str,
    pub tag: Tag,
    pub kind: FeatureKind,
}

const fn alternate(name: &'static str, tag: &[u8; 4]) -> FeatureEntry {
    FeatureEntry {
        name,
        tag: Tag::new(tag),
        kind: FeatureKind::Alternate,
    }
}

const fn feature(name: &'static str, tag: &[u8; 4]) -> FeatureEntry {
    FeatureEntry {
        name,
        tag: Tag::new(tag),
        kind: FeatureKind::Feature,
    }
}

pub static FEATURES: &[FeatureEntry] = &[
    alternate("a", b"cv01"),
    alternate("g", b"cv02"),
    alternate("square", b"cv03"),
    alternate("i", b"cv04"),
    alternate("at", b"cv05"),
    alternate("six", b"cv06"),
    alternate("zero", b"cv07"),
    alternate("slanted", b"cv08"),
    alternate("asterisk", b"cv09"),
    alternate("l", b"cv10"),
    alternate("one", b"cv11"),
    feature("less_equal", b"ss01"),
    feature("arrows", b"ss02"),
    feature("case", b"ss03"),
    feature("ellipsis", b"ss04"),
    feature("smartkerning", b"ss05"),
];

/// Find a feature by its name or by its tag.
pub fn find_feature(id: &str) -> Option<&'static FeatureEntry> {
    FEATURES
        .iter()
        .find(|entry| entry.name == id || id.as_bytes() == entry.tag.to_be_bytes())
}

/// The features requested by a comma separated list, split by kind.
///
/// Returns (alternates, features), each in request order without duplicates.
/// Unknown identifiers are ignored.
pub fn resolve_features(list: &str) -> (IndexSet<Tag>, IndexSet<Tag>) {
    let mut alternates = IndexSet::new();
    let mut features = IndexSet::new();
    for id in list.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        match find_feature(id) {
            Some(entry) if entry.kind == FeatureKind::Alternate => {
                alternates.insert(entry.tag);
            }
            Some(entry) => {
                features.insert(entry.tag);
            }
            None => debug!("Ignoring unknown feature '{id}'"),
        }
    }
    (alternates, features)
}

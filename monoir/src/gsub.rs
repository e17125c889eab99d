//! Traversal helpers shared by the GSUB driven passes.

use log::{trace, warn};
use write_fonts::types::{GlyphId16, Tag};

use crate::{
    error::Error,
    ir::{Feature, SubstitutionTable, Subtable},
};

/// Expand the coverage of a subtable, insisting it lines up with the substitutes.
pub(crate) fn aligned_coverage(
    lookup: u16,
    subtable_idx: usize,
    subtable: &Subtable,
) -> Result<Vec<GlyphId16>, Error> {
    let covered = subtable
        .coverage
        .expand()
        .map_err(|range| Error::InvalidRange {
            lookup,
            subtable: subtable_idx,
            start: range.start.to_u16(),
            end: range.end.to_u16(),
        })?;
    if covered.len() != subtable.substitute.len() {
        return Err(Error::CoverageMismatch {
            lookup,
            subtable: subtable_idx,
            coverage: covered.len(),
            substitute: subtable.substitute.len(),
        });
    }
    Ok(covered)
}

impl SubstitutionTable {
    /// Features carrying `tag`, with their index, in table order.
    pub fn features_tagged(&self, tag: Tag) -> impl Iterator<Item = (usize, &Feature)> + '_ {
        self.features
            .iter()
            .enumerate()
            .filter(move |(_, feature)| feature.tag == tag)
    }

    /// The lookup indices of every feature tagged `tag`, concatenated.
    ///
    /// Duplicates are kept.
    pub fn lookup_indices_for(&self, tag: Tag) -> Result<Vec<u16>, Error> {
        let mut indices = Vec::new();
        for (_, feature) in self.features_tagged(tag) {
            indices.extend_from_slice(self.checked_lookup_indices(feature)?);
        }
        Ok(indices)
    }

    /// Every `(original, substitute)` pair reachable from features tagged `tag`.
    ///
    /// Pairs are yielded per feature, per lookup, per subtable, per coverage
    /// position. Every subtable is checked before anything is returned, so a
    /// misaligned table produces an error rather than a partial list.
    pub fn substitution_pairs(&self, tag: Tag) -> Result<Vec<(GlyphId16, GlyphId16)>, Error> {
        let mut pairs = Vec::new();
        for lookup_idx in self.lookup_indices_for(tag)? {
            let lookup = &self.lookups[lookup_idx as usize];
            if !lookup.is_single() {
                warn!(
                    "'{tag}' references lookup {lookup_idx} of type {}, only single substitutions can swap outlines",
                    lookup.lookup_type
                );
                continue;
            }
            for (subtable_idx, subtable) in lookup.subtables.iter().enumerate() {
                let covered = aligned_coverage(lookup_idx, subtable_idx, subtable)?;
                trace!(
                    "'{tag}' lookup {lookup_idx} subtable {subtable_idx}: {} pairs",
                    covered.len()
                );
                pairs.extend(covered.into_iter().zip(subtable.substitute.iter().copied()));
            }
        }
        Ok(pairs)
    }
}

//! Fold optional stylistic sets into an always-on `calt` feature.

use log::debug;
use write_fonts::types::Tag;

use crate::{
    error::Error,
    ir::{Feature, SubstitutionTable},
};

pub const CALT: Tag = Tag::new(b"calt");

/// Append a `calt` feature made of the lookups of every feature in `features`
/// and register it with every language system of every script.
///
/// Lookup indices are concatenated in the order of `features`, then in table
/// order for features sharing a tag; duplicates are kept. A new feature is
/// appended even if the font already has a `calt`, or if no lookups were
/// found. Every `calt` feature, old or new, ends up with the same lookups.
/// Returns the index of the new feature.
pub fn add_calt(gsub: &mut SubstitutionTable, features: &[Tag]) -> Result<u16, Error> {
    let mut lookup_indices = Vec::new();
    for tag in features {
        let indices = gsub.lookup_indices_for(*tag)?;
        debug!("'{tag}' contributes lookups {indices:?} to '{CALT}'");
        lookup_indices.extend(indices);
    }

    let index = u16::try_from(gsub.features.len())
        .ok()
        .filter(|idx| *idx != u16::MAX)
        .ok_or(Error::TooManyFeatures(gsub.features.len()))?;
    for (idx, feature) in gsub.features.iter_mut().enumerate() {
        if feature.tag == CALT {
            debug!("Replacing lookups of existing '{CALT}' feature {idx}");
            feature.lookup_indices = lookup_indices.clone();
        }
    }
    gsub.features.push(Feature::new(CALT, lookup_indices));

    for script in gsub.scripts.iter_mut() {
        for lang_sys in script.lang_systems_mut() {
            lang_sys.feature_indices.push(index);
        }
    }
    debug!(
        "Registered '{CALT}' as feature {index} in {} scripts",
        gsub.scripts.len()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ir::{LangSys, LangSysRecord, Lookup, Script},
        test_util::{CV01, SS01, SS03},
    };

    use super::*;

    const SS02: Tag = Tag::new(b"ss02");

    fn table() -> SubstitutionTable {
        SubstitutionTable {
            scripts: vec![
                Script {
                    tag: Tag::new(b"DFLT"),
                    default_lang_sys: Some(LangSys::new(vec![0, 1, 2])),
                    lang_sys_records: Vec::new(),
                },
                Script {
                    tag: Tag::new(b"latn"),
                    default_lang_sys: Some(LangSys::new(vec![0, 1, 2])),
                    lang_sys_records: vec![LangSysRecord {
                        tag: Tag::new(b"TRK "),
                        lang_sys: LangSys::new(vec![1]),
                    }],
                },
                Script {
                    tag: Tag::new(b"grek"),
                    default_lang_sys: None,
                    lang_sys_records: Vec::new(),
                },
            ],
            features: vec![
                Feature::new(CV01, vec![0]),
                Feature::new(SS01, vec![2, 5]),
                Feature::new(SS02, vec![7]),
            ],
            lookups: vec![Lookup::default(); 8],
        }
    }

    fn calts(gsub: &SubstitutionTable) -> Vec<usize> {
        gsub.features_tagged(CALT).map(|(idx, _)| idx).collect()
    }

    #[test]
    fn lookups_are_concatenated_in_request_order() {
        let mut gsub = table();
        assert_eq!(3, add_calt(&mut gsub, &[SS01, SS02]).unwrap());
        assert_eq!(Feature::new(CALT, vec![2, 5, 7]), gsub.features[3]);

        let mut gsub = table();
        add_calt(&mut gsub, &[SS02, SS01]).unwrap();
        assert_eq!(vec![7, 2, 5], gsub.features[3].lookup_indices);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut gsub = table();
        gsub.features.push(Feature::new(SS01, vec![5]));
        add_calt(&mut gsub, &[SS01, SS01]).unwrap();
        assert_eq!(vec![2, 5, 5, 2, 5, 5], gsub.features[4].lookup_indices);
    }

    #[test]
    fn registered_once_per_language_system() {
        let mut gsub = table();
        let idx = add_calt(&mut gsub, &[SS01]).unwrap();
        for script in gsub.scripts.iter() {
            for lang_sys in script.lang_systems() {
                assert_eq!(
                    1,
                    lang_sys.feature_indices.iter().filter(|i| **i == idx).count(),
                    "{}",
                    script.tag
                );
            }
        }
        assert_eq!(
            vec![1, 3],
            gsub.scripts[1].lang_sys_records[0].lang_sys.feature_indices
        );
        // no language systems, nothing to register with
        assert_eq!(None, gsub.scripts[2].default_lang_sys);
        assert_eq!(Ok(()), gsub.validate(0));
    }

    #[test]
    fn empty_request_still_appends() {
        let mut gsub = table();
        let idx = add_calt(&mut gsub, &[]).unwrap();
        assert_eq!(Feature::new(CALT, Vec::new()), gsub.features[idx as usize]);
        assert_eq!(
            vec![0, 1, 2, 3],
            gsub.scripts[0]
                .default_lang_sys
                .as_ref()
                .unwrap()
                .feature_indices
        );
    }

    #[test]
    fn unknown_features_contribute_nothing() {
        let mut gsub = table();
        add_calt(&mut gsub, &[SS03, SS02]).unwrap();
        assert_eq!(vec![7], gsub.features[3].lookup_indices);
    }

    #[test]
    fn running_twice_adds_two_calts() {
        let mut gsub = table();
        add_calt(&mut gsub, &[SS01]).unwrap();
        add_calt(&mut gsub, &[SS01]).unwrap();
        assert_eq!(vec![3, 4], calts(&gsub));
        // the second run does not pick up the first calt's lookups
        assert_eq!(gsub.features[3], gsub.features[4]);
    }

    #[test]
    fn dangling_lookup_fails_before_appending() {
        let mut gsub = table();
        gsub.features[2].lookup_indices.push(8);
        let before = gsub.clone();
        assert_eq!(
            Err(Error::LookupOutOfBounds {
                feature: SS02,
                index: 8,
                len: 8,
            }),
            add_calt(&mut gsub, &[SS01, SS02])
        );
        assert_eq!(before, gsub);
    }

    #[test]
    fn existing_calt_takes_the_new_lookups() {
        let mut gsub = table();
        gsub.features[0] = Feature::new(CALT, vec![0]);
        let idx = add_calt(&mut gsub, &[SS01]).unwrap();
        assert_eq!(vec![0, 3], calts(&gsub));
        assert_eq!(3, idx);
        assert!(gsub
            .features_tagged(CALT)
            .all(|(_, feature)| feature.lookup_indices == vec![2, 5]));
    }
}

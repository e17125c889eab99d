//! Moves [GSUB](https://learn.microsoft.com/en-us/typography/opentype/spec/gsub)
//! between its binary form and the substitution model.
//!
//! Only the script and feature lists are rebuilt on the way out. Lookups are
//! never edited by the model, so they are carried over from the source
//! untouched, including everything the model doesn't represent.

use log::debug;
use monoir::ir::{
    Coverage, Feature, GlyphRange, LangSys, LangSysRecord, Lookup, Script, SubstitutionTable,
    Subtable,
};
use write_fonts::{
    read::{
        tables::{
            gsub::{self as rgsub, SingleSubst, SubstitutionSubtables},
            layout::{self as rlayout, CoverageTable},
        },
        ReadError,
    },
    tables::{
        gsub::{Gsub, SubstitutionLookupList},
        layout as wlayout,
    },
    types::GlyphId16,
};

use crate::error::Error;

fn read_lang_sys(lang_sys: &rlayout::LangSys) -> LangSys {
    LangSys {
        required_feature_index: lang_sys.required_feature_index(),
        feature_indices: lang_sys.feature_indices().iter().map(|i| i.get()).collect(),
    }
}

fn read_scripts(script_list: &rlayout::ScriptList) -> Result<Vec<Script>, ReadError> {
    let data = script_list.offset_data();
    script_list
        .script_records()
        .iter()
        .map(|record| {
            let script = record.script(data)?;
            let default_lang_sys = script
                .default_lang_sys()
                .transpose()?
                .map(|lang_sys| read_lang_sys(&lang_sys));
            let lang_sys_records = script
                .lang_sys_records()
                .iter()
                .map(|record| {
                    Ok(LangSysRecord {
                        tag: record.lang_sys_tag(),
                        lang_sys: read_lang_sys(&record.lang_sys(script.offset_data())?),
                    })
                })
                .collect::<Result<_, ReadError>>()?;
            Ok(Script {
                tag: record.script_tag(),
                default_lang_sys,
                lang_sys_records,
            })
        })
        .collect()
}

fn read_features(feature_list: &rlayout::FeatureList) -> Result<Vec<Feature>, ReadError> {
    let data = feature_list.offset_data();
    feature_list
        .feature_records()
        .iter()
        .map(|record| {
            let feature = record.feature(data)?;
            Ok(Feature::new(
                record.feature_tag(),
                feature
                    .lookup_list_indices()
                    .iter()
                    .map(|i| i.get())
                    .collect(),
            ))
        })
        .collect()
}

fn read_coverage(coverage: &CoverageTable) -> Coverage {
    match coverage {
        CoverageTable::Format1(table) => {
            Coverage::List(table.glyph_array().iter().map(|g| g.get()).collect())
        }
        CoverageTable::Format2(table) => Coverage::Ranges(
            table
                .range_records()
                .iter()
                .map(|r| GlyphRange::new(r.start_glyph_id(), r.end_glyph_id()))
                .collect(),
        ),
    }
}

fn read_single(subtable: &SingleSubst) -> Result<Subtable, ReadError> {
    let (coverage, substitute) = match subtable {
        SingleSubst::Format1(table) => {
            let coverage = read_coverage(&table.coverage()?);
            // delta arithmetic is modulo 65536
            let delta = table.delta_glyph_id() as u16;
            let substitute = match coverage.expand() {
                Ok(glyphs) => glyphs
                    .into_iter()
                    .map(|gid| GlyphId16::new(gid.to_u16().wrapping_add(delta)))
                    .collect(),
                // leave the substitutes empty, validation reports the bad range
                Err(_) => Vec::new(),
            };
            (coverage, substitute)
        }
        SingleSubst::Format2(table) => (
            read_coverage(&table.coverage()?),
            table.substitute_glyph_ids().iter().map(|g| g.get()).collect(),
        ),
    };
    Ok(Subtable {
        coverage,
        substitute,
    })
}

fn read_lookup(lookup: &rgsub::SubstitutionLookup) -> Result<Lookup, ReadError> {
    let lookup_type = match lookup.subtables()? {
        SubstitutionSubtables::Single(subtables) => {
            return Ok(Lookup::single(
                subtables
                    .iter()
                    .map(|subtable| read_single(&subtable?))
                    .collect::<Result<_, _>>()?,
            ))
        }
        SubstitutionSubtables::Multiple(_) => 2,
        SubstitutionSubtables::Alternate(_) => 3,
        SubstitutionSubtables::Ligature(_) => Lookup::LIGATURE_SUBSTITUTION,
        SubstitutionSubtables::Contextual(_) => 5,
        SubstitutionSubtables::ChainContextual(_) => 6,
        SubstitutionSubtables::Reverse(_) => 8,
    };
    Ok(Lookup {
        lookup_type,
        subtables: Vec::new(),
    })
}

/// Read a GSUB table into the model.
///
/// Extension lookups are unwrapped; the model records the type they wrap.
pub(crate) fn read_gsub(gsub: &rgsub::Gsub) -> Result<SubstitutionTable, Error> {
    let scripts = read_scripts(&gsub.script_list()?)?;
    let features = read_features(&gsub.feature_list()?)?;
    let lookups = gsub
        .lookup_list()?
        .lookups()
        .iter()
        .map(|lookup| read_lookup(&lookup?))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(
        "Read GSUB with {} scripts, {} features and {} lookups",
        scripts.len(),
        features.len(),
        lookups.len()
    );
    Ok(SubstitutionTable {
        scripts,
        features,
        lookups,
    })
}

fn build_lang_sys(lang_sys: &LangSys) -> wlayout::LangSys {
    let mut result = wlayout::LangSys::new(lang_sys.feature_indices.clone());
    result.required_feature_index = lang_sys.required_feature_index;
    result
}

fn build_script(script: &Script) -> wlayout::Script {
    let mut result = wlayout::Script::default();
    result.default_lang_sys = script.default_lang_sys.as_ref().map(build_lang_sys).into();
    result.lang_sys_records = script
        .lang_sys_records
        .iter()
        .map(|record| wlayout::LangSysRecord::new(record.tag, build_lang_sys(&record.lang_sys)))
        .collect();
    result
}

/// Rebuild GSUB from the model, keeping what the model can't express from `source`.
///
/// Feature records are matched to the source by position; a record whose tag
/// still agrees keeps its feature params. Returns None when there was no
/// source table and the model has nothing to add.
pub(crate) fn build_gsub(
    source: Option<Gsub>,
    table: &SubstitutionTable,
) -> Result<Option<Gsub>, Error> {
    if source.is_none() && table.features.is_empty() && table.scripts.is_empty() {
        return Ok(None);
    }
    let mut gsub = source.unwrap_or_else(|| {
        Gsub::new(
            Default::default(),
            Default::default(),
            SubstitutionLookupList::new(Vec::new()),
        )
    });
    if gsub.lookup_list.lookups.len() != table.lookups.len() {
        return Err(Error::LookupCountMismatch {
            model: table.lookups.len(),
            source_count: gsub.lookup_list.lookups.len(),
        });
    }

    let mut source_features = std::mem::take(&mut gsub.feature_list.feature_records).into_iter();
    let feature_records = table
        .features
        .iter()
        .map(|feature| {
            let mut record = match source_features.next() {
                Some(record) if record.feature_tag == feature.tag => record,
                _ => wlayout::FeatureRecord::new(
                    feature.tag,
                    wlayout::Feature::new(None, Vec::new()),
                ),
            };
            record.feature.lookup_list_indices = feature.lookup_indices.clone();
            record
        })
        .collect();
    gsub.feature_list = wlayout::FeatureList::new(feature_records).into();

    gsub.script_list = wlayout::ScriptList::new(
        table
            .scripts
            .iter()
            .map(|script| wlayout::ScriptRecord::new(script.tag, build_script(script)))
            .collect(),
    )
    .into();
    Ok(Some(gsub))
}

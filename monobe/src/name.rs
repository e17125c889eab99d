//! Rewrites the family naming in a [name](https://learn.microsoft.com/en-us/typography/opentype/spec/name) table.

use log::debug;
use write_fonts::{
    tables::name::{Name, NameRecord},
    types::NameId,
    OffsetMarker,
};

pub const FAMILY_NAME: &str = "CommitMono";

/// Windows, Unicode BMP, en-US
const WINDOWS_PLATFORM: (u16, u16, u16) = (3, 1, 0x409);

/// The names every output font carries, derived from its style label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleNames {
    pub family: String,
    pub subfamily: String,
    pub full_name: String,
    pub postscript_name: String,
}

impl StyleNames {
    /// Names for `style`, e.g. "Bold Italic".
    pub fn new(style: &str) -> Self {
        let compact: String = style.split_whitespace().collect();
        StyleNames {
            family: FAMILY_NAME.to_string(),
            subfamily: style.to_string(),
            full_name: format!("{FAMILY_NAME} {style}"),
            postscript_name: format!("{FAMILY_NAME}-{compact}"),
        }
    }

    fn value_for(&self, name_id: NameId) -> Option<&str> {
        match name_id {
            NameId::FAMILY_NAME => Some(&self.family),
            NameId::SUBFAMILY_NAME => Some(&self.subfamily),
            NameId::FULL_NAME => Some(&self.full_name),
            NameId::POSTSCRIPT_NAME => Some(&self.postscript_name),
            _ => None,
        }
    }

    fn name_ids() -> [NameId; 4] {
        [
            NameId::FAMILY_NAME,
            NameId::SUBFAMILY_NAME,
            NameId::FULL_NAME,
            NameId::POSTSCRIPT_NAME,
        ]
    }

    /// Rewrite the family naming of `name`, creating the table if there is none.
    ///
    /// Every record with a family naming id is rewritten whatever its platform.
    /// An id with no record at all gets a Windows record.
    pub fn apply(&self, name: Option<Name>) -> Name {
        let mut records: Vec<NameRecord> = name
            .map(|name| name.name_record.into_iter().collect())
            .unwrap_or_default();

        for record in records.iter_mut() {
            if let Some(value) = self.value_for(record.name_id) {
                record.string = OffsetMarker::new(value.to_string());
            }
        }
        for name_id in Self::names_missing_from(&records) {
            let (platform_id, encoding_id, language_id) = WINDOWS_PLATFORM;
            debug!("Adding name {name_id:?}");
            records.push(NameRecord {
                name_id,
                platform_id,
                encoding_id,
                language_id,
                string: OffsetMarker::new(self.value_for(name_id).unwrap_or_default().to_string()),
            });
        }
        records.sort();
        Name::new(records.into_iter().collect())
    }

    fn names_missing_from(records: &[NameRecord]) -> Vec<NameId> {
        Self::name_ids()
            .into_iter()
            .filter(|id| !records.iter().any(|r| r.name_id == *id))
            .collect()
    }
}

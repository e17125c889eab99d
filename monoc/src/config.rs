//! The resolved settings of a run

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use monoir::metrics::Spacing;
use serde::{Deserialize, Serialize};
use write_fonts::types::Tag;

use crate::{features::resolve_features, Args, Error};

/// What a run does to every style, resolved from [`Args`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Alternate tags, in request order
    #[serde(with = "tag_names")]
    pub alternates: IndexSet<Tag>,
    /// Tags of the features bundled into calt, in request order
    #[serde(with = "tag_names")]
    pub features: IndexSet<Tag>,
    pub spacing: Spacing,
    pub regular_weight: String,
    pub bold_weight: String,
}

/// Tags are written as their four character names.
mod tag_names {
    use indexmap::IndexSet;
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
    use write_fonts::types::Tag;

    pub fn serialize<S: Serializer>(
        tags: &IndexSet<Tag>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let names: Vec<String> = tags.iter().map(|tag| tag.to_string()).collect();
        names.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexSet<Tag>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|name| {
                Tag::new_checked(name.as_bytes())
                    .map_err(|e| D::Error::custom(format!("bad tag '{name}': {e:?}")))
            })
            .collect()
    }
}

impl Settings {
    pub fn new(args: &Args) -> Settings {
        let (alternates, features) = resolve_features(&args.features);
        Settings {
            input_dir: args.input_dir.clone(),
            output_dir: args.output_dir.clone(),
            alternates,
            features,
            spacing: args.spacing(),
            regular_weight: args.regular_weight().to_string(),
            bold_weight: args.bold_weight().to_string(),
        }
    }

    /// Returns the path the settings are written to
    pub fn file(dir: &Path) -> PathBuf {
        dir.join("settings.yml")
    }

    /// Write these settings as yaml into `dir`.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, Error> {
        let file = Self::file(dir);
        fs::write(&file, serde_yaml::to_string(self)?).map_err(|source| Error::FileIo {
            path: file.clone(),
            source,
        })?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn resolves_args() {
        let args = Args::parse_from([
            "monoc",
            "--features",
            "square,a,case,nope",
            "--letter-spacing",
            "3",
            "--bold-weight",
            "",
        ]);
        let settings = Settings::new(&args);
        assert_eq!(
            vec![Tag::new(b"cv03"), Tag::new(b"cv01")],
            settings.alternates.iter().copied().collect::<Vec<_>>()
        );
        assert_eq!(
            vec![Tag::new(b"ss03")],
            settings.features.iter().copied().collect::<Vec<_>>()
        );
        assert_eq!(Spacing::new(3.0, 1.0), settings.spacing);
        assert_eq!("700", settings.bold_weight);
    }

    #[test]
    fn written_settings_read_back() {
        let temp_dir = tempdir().unwrap();
        let mut args = Args::new(temp_dir.path(), temp_dir.path());
        args.features = "g,arrows".to_string();
        let settings = Settings::new(&args);

        let file = settings.write(temp_dir.path()).unwrap();
        assert_eq!(Settings::file(temp_dir.path()), file);
        let yml = fs::read_to_string(file).unwrap();
        assert!(yml.contains("- cv02"), "{yml}");
        assert!(yml.contains("- ss02"), "{yml}");
        assert_eq!(settings, serde_yaml::from_str::<Settings>(&yml).unwrap());
    }

    #[test]
    fn malformed_tag_is_rejected_not_dropped() {
        let temp_dir = tempdir().unwrap();
        let settings = Settings::new(&Args::new(temp_dir.path(), temp_dir.path()));
        let yml = serde_yaml::to_string(&settings)
            .unwrap()
            .replace("alternates: []", "alternates:\n- cv01\n- toolong");
        assert!(yml.contains("toolong"), "{yml}");
        assert!(serde_yaml::from_str::<Settings>(&yml).is_err());
    }
}

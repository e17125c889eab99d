//! The four style variants built per run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use monobe::name::FAMILY_NAME;

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    /// Weight label, such as 400
    pub weight: String,
    pub bold: bool,
    pub italic: bool,
}

impl Style {
    /// Regular, Italic, Bold and Bold Italic, in that order.
    pub fn variants(regular_weight: &str, bold_weight: &str) -> Vec<Style> {
        [(regular_weight, false), (bold_weight, true)]
            .into_iter()
            .flat_map(|(weight, bold)| {
                [false, true].into_iter().map(move |italic| Style {
                    weight: weight.to_string(),
                    bold,
                    italic,
                })
            })
            .collect()
    }

    /// The label naming is derived from.
    pub fn label(&self) -> &'static str {
        match (self.bold, self.italic) {
            (false, false) => "Regular",
            (false, true) => "Italic",
            (true, false) => "Bold",
            (true, true) => "Bold Italic",
        }
    }

    fn slope(&self) -> &'static str {
        if self.italic {
            "Italic"
        } else {
            "Regular"
        }
    }

    /// Source files for this style end with this.
    pub fn input_suffix(&self) -> String {
        format!("{}{}.otf", self.weight, self.slope())
    }

    pub fn output_name(&self) -> String {
        format!("{FAMILY_NAME}-{}-{}.otf", self.weight, self.slope())
    }

    /// The first file in `dir`, by name, that ends with [`Style::input_suffix`].
    pub fn find_input(&self, dir: &Path) -> Result<Option<PathBuf>, Error> {
        let suffix = self.input_suffix();
        Ok(list_files(dir)?
            .into_iter()
            .find(|name| name.ends_with(&suffix))
            .map(|name| dir.join(name)))
    }
}

/// Names of the files in `dir`, sorted.
pub(crate) fn list_files(dir: &Path) -> Result<Vec<String>, Error> {
    let entries = fs::read_dir(dir).map_err(|source| Error::FileIo {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::FileIo {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

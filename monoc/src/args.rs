//! Command line arguments

use std::path::{Path, PathBuf};

use clap::Parser;
use monoir::metrics::Spacing;
use serde::{Deserialize, Serialize};

const DEFAULT_REGULAR_WEIGHT: &str = "400";
const DEFAULT_BOLD_WEIGHT: &str = "700";

/// What CommitMono can we build for you today?
#[derive(Serialize, Deserialize, Parser, Debug, Clone, PartialEq)]
pub struct Args {
    /// Directory holding the source fonts, named like 400Regular.otf
    #[arg(short, long)]
    #[clap(default_value = "./source_fonts/fontlab")]
    pub input_dir: PathBuf,

    /// Directory the customized fonts are written to
    #[arg(short, long)]
    #[clap(default_value = "./source_fonts/commit-mono")]
    pub output_dir: PathBuf,

    /// Comma separated features to enable, by name (square, case) or tag (cv03, ss03)
    #[arg(short, long)]
    #[clap(default_value = "")]
    pub features: String,

    /// Tracking in units of 10 font units of advance; may be negative
    #[arg(long, allow_negative_numbers = true)]
    #[clap(default_value = "0")]
    pub letter_spacing: f64,

    /// Line height as a multiple of the default, 1.0 leaves it unchanged
    #[arg(long)]
    #[clap(default_value = "1.0")]
    pub line_height: f64,

    /// Weight label of the regular source fonts
    #[arg(long)]
    #[clap(default_value = DEFAULT_REGULAR_WEIGHT)]
    pub regular_weight: String,

    /// Weight label of the bold source fonts
    #[arg(long)]
    #[clap(default_value = DEFAULT_BOLD_WEIGHT)]
    pub bold_weight: String,

    /// Whether to record the resolved settings as settings.yml in the output directory
    #[arg(long)]
    #[clap(default_value = "false")]
    pub emit_settings: bool,
}

fn or_default<'a>(weight: &'a str, default: &'a str) -> &'a str {
    match weight.trim() {
        "" => default,
        weight => weight,
    }
}

impl Args {
    /// Defaults for everything but the directories.
    pub fn new(input_dir: &Path, output_dir: &Path) -> Args {
        Args {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            features: String::new(),
            letter_spacing: 0.0,
            line_height: 1.0,
            regular_weight: DEFAULT_REGULAR_WEIGHT.to_string(),
            bold_weight: DEFAULT_BOLD_WEIGHT.to_string(),
            emit_settings: false,
        }
    }

    pub fn regular_weight(&self) -> &str {
        or_default(&self.regular_weight, DEFAULT_REGULAR_WEIGHT)
    }

    pub fn bold_weight(&self) -> &str {
        or_default(&self.bold_weight, DEFAULT_BOLD_WEIGHT)
    }

    pub fn spacing(&self) -> Spacing {
        Spacing::new(self.letter_spacing, self.line_height)
    }
}

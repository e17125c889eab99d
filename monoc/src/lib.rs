//! Builds customized CommitMono fonts.
//!
//! Each style variant is read from the input directory, has the requested
//! alternates baked in, spacing applied and features bundled into calt, and
//! is written to the output directory.

mod args;
mod config;
mod error;
pub mod features;
pub mod style;

pub use args::Args;
pub use config::Settings;
pub use error::Error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use monobe::{compile::compile_font, load::load_font, name::StyleNames};
use monoir::{calt::add_calt, metrics::apply_spacing, swap::swap_alternates};
use rayon::prelude::*;
use write_fonts::types::Tag;

use style::{list_files, Style};

pub fn require_dir(dir: &Path) -> Result<PathBuf, Error> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::ExpectedDirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| Error::FileIo {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    debug!("require_dir {:?}", dir);
    Ok(dir.to_path_buf())
}

/// Apply `settings` to the font in `source`, in memory.
///
/// Alternates are swapped first, then spacing is applied, then calt is
/// added. Returns the compiled font.
pub fn customize(source: &[u8], settings: &Settings, style: &Style) -> Result<Vec<u8>, Error> {
    let mut font = load_font(source)?;

    let alternates: Vec<Tag> = settings.alternates.iter().copied().collect();
    swap_alternates(&mut font, &alternates)?;
    apply_spacing(&mut font, settings.spacing);
    let features: Vec<Tag> = settings.features.iter().copied().collect();
    let calt = add_calt(&mut font.gsub, &features)?;
    debug!("{}: calt is feature {calt}", style.label());

    Ok(compile_font(
        source,
        &font,
        Some(&StyleNames::new(style.label())),
    )?)
}

/// What happened to a single style.
#[derive(Debug)]
enum Outcome {
    Written(PathBuf),
    Skipped,
}

fn build_style(settings: &Settings, style: &Style) -> Result<Outcome, Error> {
    let Some(input) = style.find_input(&settings.input_dir)? else {
        warn!(
            "No file ending in {} in {:?}, skipping {}. Available: {:?}",
            style.input_suffix(),
            settings.input_dir,
            style.label(),
            list_files(&settings.input_dir)?
        );
        return Ok(Outcome::Skipped);
    };
    info!("Building {} from {input:?}", style.label());
    let source = fs::read(&input).map_err(|source| Error::FileIo {
        path: input.clone(),
        source,
    })?;
    let bytes = customize(&source, settings, style)?;

    let output = settings.output_dir.join(style.output_name());
    fs::write(&output, bytes).map_err(|source| Error::FileIo {
        path: output.clone(),
        source,
    })?;
    info!("Wrote {output:?}");
    Ok(Outcome::Written(output))
}

/// The result of a run, by style label.
#[derive(Debug, Default)]
pub struct Report {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<&'static str>,
    pub failed: Vec<(&'static str, Error)>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Build every style variant described by `args`.
///
/// Styles are independent and built in parallel. A style whose input is
/// missing is skipped, one that fails is reported; neither stops the others.
pub fn run(args: &Args) -> Result<Report, Error> {
    let settings = Settings::new(args);
    require_dir(&settings.output_dir)?;
    if args.emit_settings {
        let file = settings.write(&settings.output_dir)?;
        debug!("Wrote settings to {file:?}");
    }

    let styles = Style::variants(&settings.regular_weight, &settings.bold_weight);
    let outcomes: Vec<_> = styles
        .par_iter()
        .map(|style| (style.label(), build_style(&settings, style)))
        .collect();

    let mut report = Report::default();
    for (label, outcome) in outcomes {
        match outcome {
            Ok(Outcome::Written(path)) => report.written.push(path),
            Ok(Outcome::Skipped) => report.skipped.push(label),
            Err(e) => {
                error!("{label} failed: {e}");
                report.failed.push((label, e));
            }
        }
    }
    Ok(report)
}

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'{0}' exists but is not a directory")]
    ExpectedDirectory(PathBuf),
    #[error("io failed for '{path}': '{source}'")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    YamlSerError(#[from] serde_yaml::Error),
    #[error(transparent)]
    Model(#[from] monoir::error::Error),
    #[error(transparent)]
    Backend(#[from] monobe::error::Error),
    #[error("{0} of {1} styles failed")]
    StylesFailed(usize, usize),
}

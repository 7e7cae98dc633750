//! Errors reading inputs and writing reports.
use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The leading count is missing or not a non-negative integer.
    #[error("{}: invalid or missing count header {line:?}", path.display())]
    Header { path: PathBuf, line: String },

    #[error("{}:{line}: cannot parse {token:?} as a number", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        token: String,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

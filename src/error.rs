//! Error taxonomy for the listing engine

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    /// The directory could not be opened or read to the end.
    #[error("cannot open directory '{}': {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// stat or readlink failed for a single entry.
    #[error("cannot access '{}': {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An operand or subdirectory could not be reached at all.
    #[error("cannot access '{}': {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The listing output was closed by the reader.
    #[error("broken pipe")]
    BrokenPipe,

    #[error("error writing output: {0}")]
    Output(#[source] io::Error),
}

impl ListingError {
    pub fn enumeration(path: &Path, source: io::Error) -> Self {
        Self::Enumeration {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn metadata(path: &Path, source: io::Error) -> Self {
        Self::Metadata {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn access(path: &Path, source: io::Error) -> Self {
        Self::Access {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Enumeration { path, .. }
            | Self::Metadata { path, .. }
            | Self::Access { path, .. } => Some(path),
            Self::BrokenPipe | Self::Output(_) => None,
        }
    }

    /// Whether the whole traversal must stop.
    ///
    /// Losing the output channel is fatal; everything tied to a single path
    /// only skips that path.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BrokenPipe | Self::Output(_))
    }
}

impl From<io::Error> for ListingError {
    /// Classify a write failure on the listing channel.
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::BrokenPipe {
            Self::BrokenPipe
        } else {
            Self::Output(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read the header row of {}: {source}", .path.display())]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Read error in {} at line {line}: {source}", .path.display())]
    Read {
        path: PathBuf,
        line: u64,
        #[source]
        source: csv::Error,
    },
}

impl LoaderError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoaderError::Open { path, .. }
            | LoaderError::Header { path, .. }
            | LoaderError::Read { path, .. } => path,
        }
    }
}

/// Error type shared by every stage of the conversion pipeline.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    /// Reading the source or writing a generated macro failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The syntax-tree provider could not be loaded or gave up on a file.
    #[error("syntax provider error: {0}")]
    Provider(String),

    /// The provider pointed at a line the file does not have.
    #[error("line {line} not found in {}", path.display())]
    MissingLine { path: PathBuf, line: usize },

    /// A comment line escaped the strip pattern; the extractors produced something they never should.
    #[error("internal inconsistency: {0}")]
    Invariant(String),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

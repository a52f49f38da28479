use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseDiffError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not start with a case header
    #[error("{}: 1st line doesn't match pattern", path.display())]
    MalformedInput { path: PathBuf },

    #[error("{}:{line}: expected case #{expected} but got #{actual}", path.display())]
    Sequence {
        path: PathBuf,
        line: usize,
        expected: usize,
        /// Case number found in the header
        actual: String,
    },

    #[error("Invalid case pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CaseDiffError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for a fatal error. Every error is structural.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

pub type Result<T> = std::result::Result<T, CaseDiffError>;

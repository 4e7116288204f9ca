//! Error type shared by the yinxing crates.

use std::path::PathBuf;

/// Errors raised while loading tables, reading configuration or merging
/// code tables.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A malformed line in one of the text tables.
    #[error("{origin}:{line}: {message}")]
    Parse {
        origin: String,
        line: usize,
        message: String,
    },

    /// A shape code of fewer than two letters reached the merge stage.
    /// This means the shape table was not produced by a correct stage 1
    /// run and the whole merge must stop.
    #[error("shape code for {character} is shorter than two letters: {code:?}")]
    ShapeCodeTooShort { character: String, code: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown double pinyin scheme: {0}")]
    UnknownScheme(String),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(origin: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }

    /// True for the error that must abort a merge run.
    pub fn is_fatal_contract_violation(&self) -> bool {
        matches!(self, Error::ShapeCodeTooShort { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

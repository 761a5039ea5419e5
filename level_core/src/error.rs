use std::path::PathBuf;

/// Represents errors that can occur while loading or building a level.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing field `{field}` in {entity}")]
    MissingField { entity: &'static str, field: String },
    #[error("field `{field}` in {entity} should be {expected}")]
    TypeMismatch {
        entity: &'static str,
        field: String,
        expected: &'static str,
    },
    #[error("unexpected field `{field}` in {entity}")]
    UnexpectedField { entity: &'static str, field: String },
    #[error("Unknown movement strategy: {0}")]
    InvalidStrategyName(String),
}

/// Broad category of a [`LevelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Directory or file could not be read.
    Filesystem,
    /// File is not valid JSON.
    Decode,
    /// A record is missing a field or has one of the wrong type.
    Schema,
    /// The data is well formed but names something unknown.
    Domain,
}

impl LevelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LevelError::Io { .. } => ErrorKind::Filesystem,
            LevelError::Json { .. } => ErrorKind::Decode,
            LevelError::MissingField { .. }
            | LevelError::TypeMismatch { .. }
            | LevelError::UnexpectedField { .. } => ErrorKind::Schema,
            LevelError::InvalidStrategyName(_) => ErrorKind::Domain,
        }
    }
}

//! Errors raised while compiling a schema.

use std::path::PathBuf;

/// Broad category of a [`CompileError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A `$ref` could not be followed.
    Reference,
    /// A referenced document is not valid JSON.
    Type,
    /// A fragment has a shape the classifier rejects.
    Classification,
    /// The top-level input file could not be read or parsed.
    Io,
}

/// Error that aborts a compile. There is no partial output.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("remote references are not supported: could not read \"{reference}\"")]
    RemoteReference { reference: String },

    #[error("unable to find referenced file \"{}\"", path.display())]
    MissingReference {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("referenced local schema \"{}\" contains malformed JSON: {source}", path.display())]
    MalformedReference {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("property enum and property tsEnumNames must be the same length: {rule}")]
    EnumLengthMismatch { rule: String },

    #[error("if tsEnumNames is declared, it must be an array of strings")]
    EnumNamesNotText,

    #[error("property enum must be an array: {rule}")]
    EnumNotArray { rule: String },

    #[error("failed to read schema \"{}\"", path.display())]
    ReadSchema {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema \"{}\" is not valid JSON: {source}", path.display())]
    ParseSchema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RemoteReference { .. } | Self::MissingReference { .. } => ErrorKind::Reference,
            Self::MalformedReference { .. } => ErrorKind::Type,
            Self::EnumLengthMismatch { .. } | Self::EnumNamesNotText | Self::EnumNotArray { .. } => {
                ErrorKind::Classification
            }
            Self::ReadSchema { .. } | Self::ParseSchema { .. } => ErrorKind::Io,
        }
    }
}

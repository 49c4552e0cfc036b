//! Error types for the sigolyze crate.

use std::fmt;

use thiserror::Error;

use crate::loader::SourceFormat;

pub type Result<T> = std::result::Result<T, SigolyzeError>;

/// Every way a load can fail. Matching never fails.
#[derive(Debug, Error)]
pub enum SigolyzeError {
    /// The signature source could not be read.
    #[error("IO error reading {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The signature definition is malformed.
    #[error("{format} parsing error in {origin}: {message}")]
    Parse {
        origin: String,
        format: SourceFormat,
        message: String,
    },

    /// A regex pattern inside a signature failed to compile.
    #[error("Invalid regex pattern '{pattern}' ({regex}) in signature '{signature}': {source}")]
    PatternCompile {
        signature: String,
        pattern: String,
        regex: String,
        #[source]
        source: regex::Error,
    },
}

impl SigolyzeError {
    pub(crate) fn io(origin: impl Into<String>, source: std::io::Error) -> Self {
        SigolyzeError::Io {
            origin: origin.into(),
            source,
        }
    }

    pub(crate) fn parse(
        origin: impl Into<String>,
        format: SourceFormat,
        message: impl fmt::Display,
    ) -> Self {
        SigolyzeError::Parse {
            origin: origin.into(),
            format,
            message: message.to_string(),
        }
    }

    pub fn is_io(&self) -> bool {
        matches!(self, SigolyzeError::Io { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SigolyzeError::Parse { .. })
    }

    pub fn is_pattern_compile(&self) -> bool {
        matches!(self, SigolyzeError::PatternCompile { .. })
    }

    /// Name of the signature that was being built, when known.
    pub fn signature_name(&self) -> Option<&str> {
        match self {
            SigolyzeError::PatternCompile { signature, .. } => Some(signature),
            _ => None,
        }
    }
}

//! Reading and parsing signature sources.
//!
//! This module is the boundary to the outside world: it turns paths,
//! streams and raw bytes into [`SignatureDefinition`]s. It never compiles
//! anything; that is the registry's job.
//!
//! A source holds either one definition object or an array of them, encoded
//! as JSON or YAML. The format of a file is chosen by its extension.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::{Result, SigolyzeError};
use crate::signature::SignatureDefinition;

pub(crate) const INLINE_ORIGIN: &str = "<inline>";
pub(crate) const STREAM_ORIGIN: &str = "<stream>";

/// Serialization format of a signature source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    #[default]
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick a format from a file extension. Unknown extensions read as JSON.
    ///
    /// ```rust
    /// use sigolyze::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::from_path("rules/web.yml"), SourceFormat::Yaml);
    /// assert_eq!(SourceFormat::from_path("rules/web.json"), SourceFormat::Json);
    /// assert_eq!(SourceFormat::from_path("rules/web"), SourceFormat::Json);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match extension(path.as_ref()).as_deref() {
            Some("yaml") | Some("yml") => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Json => write!(f, "JSON"),
            SourceFormat::Yaml => write!(f, "YAML"),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn is_signature_file(path: &Path) -> bool {
    matches!(
        extension(path).as_deref(),
        Some("json") | Some("yaml") | Some("yml")
    )
}

fn from_slice<'de, T: Deserialize<'de>>(
    raw: &'de [u8],
    format: SourceFormat,
    origin: &str,
) -> Result<T> {
    match format {
        SourceFormat::Json => {
            serde_json::from_slice(raw).map_err(|e| SigolyzeError::parse(origin, format, e))
        }
        SourceFormat::Yaml => {
            serde_yaml::from_slice(raw).map_err(|e| SigolyzeError::parse(origin, format, e))
        }
    }
}

/// Parse exactly one signature definition.
pub fn parse_definition(
    raw: &[u8],
    format: SourceFormat,
    origin: &str,
) -> Result<SignatureDefinition> {
    from_slice(raw, format, origin)
}

/// Parse a document holding one definition or an array of definitions.
///
/// The document is read into a generic value first so that comments,
/// directives and document markers are handled by the format parser.
pub fn parse_definitions(
    raw: &[u8],
    format: SourceFormat,
    origin: &str,
) -> Result<Vec<SignatureDefinition>> {
    let parse_error = |e: &dyn std::fmt::Display| SigolyzeError::parse(origin, format, e);

    match format {
        SourceFormat::Json => {
            let document: serde_json::Value = from_slice(raw, format, origin)?;
            if document.is_array() {
                serde_json::from_value(document).map_err(|e| parse_error(&e))
            } else {
                serde_json::from_value(document)
                    .map(|definition| vec![definition])
                    .map_err(|e| parse_error(&e))
            }
        }
        SourceFormat::Yaml => {
            let document: serde_yaml::Value = from_slice(raw, format, origin)?;
            if document.is_sequence() {
                serde_yaml::from_value(document).map_err(|e| parse_error(&e))
            } else {
                serde_yaml::from_value(document)
                    .map(|definition| vec![definition])
                    .map_err(|e| parse_error(&e))
            }
        }
    }
}

/// Read an entire file.
pub fn read_path(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    trace!(path = %path.display(), "reading signature file");
    fs::read(path).map_err(|e| SigolyzeError::io(path.display().to_string(), e))
}

/// Read a stream to its end.
pub fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|e| SigolyzeError::io(STREAM_ORIGIN, e))?;
    Ok(raw)
}

/// List the signature files (`.json`, `.yaml`, `.yml`) directly inside `dir`,
/// sorted by path.
pub fn signature_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let origin = || dir.display().to_string();

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| SigolyzeError::io(origin(), e))? {
        let entry = entry.map_err(|e| SigolyzeError::io(origin(), e))?;
        let path = entry.path();
        if path.is_file() && is_signature_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    debug!(dir = %dir.display(), files = files.len(), "found signature files");
    Ok(files)
}

/// Read and parse every definition in a file.
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<SignatureDefinition>> {
    let path = path.as_ref();
    let raw = read_path(path)?;
    parse_definitions(
        &raw,
        SourceFormat::from_path(path),
        &path.display().to_string(),
    )
}

//! File loading: format detection, file discovery, and deserialization.
//!
//! Configuration files (recipes, layout) may be RON, TOML, or JSON.
//! Template files are JSON documents or exchange strings.

use std::path::{Path, PathBuf};

use cityblock_core::codec::{self, CodecError};
use cityblock_core::{Blueprint, BlueprintString, ValidationError};
use serde::de::DeserializeOwned;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support here.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An exchange string could not be decoded.
    #[error("cannot decode {file}: {source}")]
    Codec {
        file: PathBuf,
        #[source]
        source: CodecError,
    },

    /// A template failed its integrity check.
    #[error("template {file} is malformed: {source}")]
    InvalidTemplate {
        file: PathBuf,
        #[source]
        source: ValidationError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
    /// A blueprint exchange string (`.bp` or `.txt`).
    Exchange,
}

/// Extensions searched for configuration files, in order.
pub const CONFIG_EXTENSIONS: &[&str] = &["ron", "toml", "json"];

/// Extensions searched for template files, in order.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["json", "bp", "txt"];

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        Some("bp" | "txt") => Ok(Format::Exchange),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for `{base_name}.{ext}` for each of `extensions`.
///
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// more than one extension exists for the same base name.
pub fn find_file(
    dir: &Path,
    base_name: &str,
    extensions: &[&str],
) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// A configuration file (`.ron`, `.toml` or `.json`) called `base_name`.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    find_file(dir, base_name, CONFIG_EXTENSIONS)
}

/// A template file (`.json`, `.bp` or `.txt`) called `base_name`.
pub fn find_template_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    find_file(dir, base_name, TEMPLATE_EXTENSIONS)
}

/// Like [`find_template_file`], but returns an error if no file is found.
pub fn require_template_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_template_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given configuration format. `file` is only
/// used for error messages.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Exchange => Err(DataLoadError::UnsupportedFormat {
            file: file.to_path_buf(),
        }),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Parse a template from its text. JSON must be a full `{"blueprint": ...}`
/// document; exchange strings go through the codec. The result is validated.
pub fn parse_template(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<Blueprint, DataLoadError> {
    let doc: BlueprintString = match format {
        Format::Json => deserialize_str(content, format, file)?,
        Format::Exchange => codec::decode(content).map_err(|source| DataLoadError::Codec {
            file: file.to_path_buf(),
            source,
        })?,
        Format::Ron | Format::Toml => {
            return Err(DataLoadError::UnsupportedFormat {
                file: file.to_path_buf(),
            });
        }
    };

    doc.blueprint
        .validate()
        .map_err(|source| DataLoadError::InvalidTemplate {
            file: file.to_path_buf(),
            source,
        })?;
    Ok(doc.blueprint)
}

/// Read and validate a template file.
pub fn load_template(path: &Path) -> Result<Blueprint, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_template(&content, format, path)
}

// ===========================================================================
// Tests
// ===========================================================================

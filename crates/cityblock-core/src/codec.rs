//! Blueprint exchange strings.
//!
//! An exchange string is a one-character version tag followed by the
//! standard base64 encoding of the zlib-compressed JSON document.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::blueprint::BlueprintString;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Version tag of the only exchange format this crate reads and writes.
pub const VERSION_TAG: char = '0';

/// How much of a malformed input is quoted back in error messages.
const EXCERPT_LEN: usize = 24;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from encoding or decoding exchange strings.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("exchange string is empty")]
    Empty,
    #[error("unsupported exchange string version '{found}' in \"{input}\"")]
    UnsupportedVersion { found: char, input: String },
    #[error("invalid base64 payload in \"{input}\": {source}")]
    Base64 {
        input: String,
        #[source]
        source: base64::DecodeError,
    },
    #[error("failed to inflate payload of \"{input}\": {source}")]
    Inflate {
        input: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid blueprint JSON in \"{input}\": {source}")]
    Json {
        input: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize blueprint: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to compress blueprint: {0}")]
    Deflate(#[source] std::io::Error),
}

/// The start of `input`, for error messages.
fn excerpt(input: &str) -> String {
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(EXCERPT_LEN).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Encode a document as an exchange string.
pub fn encode(doc: &BlueprintString) -> Result<String, CodecError> {
    let json = serde_json::to_vec(doc).map_err(CodecError::Serialize)?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json).map_err(CodecError::Deflate)?;
    let compressed = encoder.finish().map_err(CodecError::Deflate)?;

    let mut out = String::with_capacity(1 + compressed.len().div_ceil(3) * 4);
    out.push(VERSION_TAG);
    BASE64_STANDARD.encode_string(&compressed, &mut out);
    Ok(out)
}

/// Decode an exchange string. Surrounding whitespace is ignored.
pub fn decode(input: &str) -> Result<BlueprintString, CodecError> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    let found = chars.next().ok_or(CodecError::Empty)?;
    if found != VERSION_TAG {
        return Err(CodecError::UnsupportedVersion {
            found,
            input: excerpt(trimmed),
        });
    }

    let compressed = BASE64_STANDARD
        .decode(chars.as_str())
        .map_err(|source| CodecError::Base64 {
            input: excerpt(trimmed),
            source,
        })?;

    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|source| CodecError::Inflate {
            input: excerpt(trimmed),
            source,
        })?;

    serde_json::from_slice(&json).map_err(|source| CodecError::Json {
        input: excerpt(trimmed),
        source,
    })
}

/// Pretty-printed JSON of a document, for inspection.
pub fn to_json_pretty(doc: &BlueprintString) -> Result<String, CodecError> {
    serde_json::to_string_pretty(doc).map_err(CodecError::Serialize)
}

// ===========================================================================
// Tests
// ===========================================================================

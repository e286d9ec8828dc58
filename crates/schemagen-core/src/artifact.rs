//! Reading inputs and persisting generated artifacts

use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Indentation used for every JSON artifact
const JSON_INDENT: &[u8] = b"    ";

/// Read a whole input file
///
/// A missing or unreadable file is `NotFound`; non-UTF-8 content is a parse
/// failure.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => Error::parse(path.display().to_string(), e.to_string()),
        _ => {
            tracing::debug!(path = %path.display(), error = %e, "input unavailable");
            Error::not_found(path.display().to_string())
        }
    })
}

/// Serialize `value` as pretty JSON with a four-space indent
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Hex-encoded SHA-256 of `contents`
pub fn sha256_hex(contents: &[u8]) -> String {
    hex::encode(Sha256::digest(contents))
}

/// Write `contents` to `path`, returning the artifact digest
pub fn write_artifact(path: &Path, contents: &str) -> Result<String> {
    std::fs::write(path, contents)
        .map_err(|e| Error::write(path.display().to_string(), e.to_string()))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(sha256_hex(contents.as_bytes()))
}

/// Serialize `value` as pretty JSON and write it to `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<String> {
    let json = to_json_pretty(value)
        .map_err(|e| Error::write(path.display().to_string(), e.to_string()))?;
    write_artifact(path, &json)
}

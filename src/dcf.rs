//! Minimal DCF (Debian-control-format) reader for the farm's metadata
//! records, plus the lenient text decoding used for everything the nodes
//! upload.
//!
//! Records are separated by blank lines; fields are `Key: value` with
//! continuation lines starting with whitespace. Node output has no
//! declared encoding, so files are decoded as UTF-8 where valid, falling
//! back to the node's declared legacy encoding, and lossily as a last
//! resort. Encoding trouble is always recovered locally, never escalated.

use crate::error::{ReportError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One DCF record: an unordered field map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DcfRecord {
    fields: HashMap<String, String>,
}

impl DcfRecord {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Looks up a field that the report cannot proceed without.
    ///
    /// # Errors
    /// Returns [`ReportError::MissingField`] naming `file` when absent.
    pub fn required(&self, file: &Path, field: &str) -> Result<&str> {
        self.get(field).ok_or_else(|| ReportError::MissingField {
            file: file.to_path_buf(),
            field: field.to_string(),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn insert(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }

    fn append(&mut self, field: &str, continuation: &str) {
        if let Some(value) = self.fields.get_mut(field) {
            value.push('\n');
            value.push_str(continuation);
        }
    }
}

/// Parses DCF text into records.
#[must_use]
pub fn parse_str(text: &str) -> Vec<DcfRecord> {
    let mut records = Vec::new();
    let mut current = DcfRecord::default();
    let mut last_field: Option<String> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                records.push(std::mem::take(&mut current));
            }
            last_field = None;
            continue;
        }
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(field) = &last_field {
                current.append(field, line.trim());
            }
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            current.insert(key, value.trim());
            last_field = Some(key.to_string());
        }
        // Lines with no colon and no leading whitespace are silently
        // dropped, matching the tolerant upstream readers.
    }
    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// Reads and parses a whole DCF file.
pub fn parse_file(path: &Path) -> Result<Vec<DcfRecord>> {
    Ok(parse_str(&read_lenient(path)?))
}

/// Reads and parses a DCF file expected to hold a single record; multiple
/// records are merged, later fields winning.
pub fn parse_single(path: &Path) -> Result<DcfRecord> {
    let mut merged = DcfRecord::default();
    for record in parse_file(path)? {
        merged.fields.extend(record.fields);
    }
    Ok(merged)
}

/// Reads one field from the first record of a DCF file. Missing file or
/// field is not an error here; callers decide whether that is fatal.
pub fn read_field(path: &Path, field: &str) -> Option<String> {
    let records = parse_file(path).ok()?;
    records
        .first()
        .and_then(|r| r.get(field))
        .map(ToString::to_string)
}

/// Decodes bytes leniently: strict UTF-8 when valid, Latin-1 when the
/// node declares it, lossy UTF-8 otherwise.
#[must_use]
pub fn decode_lenient(bytes: &[u8], encoding: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let enc = encoding.to_ascii_lowercase();
            if enc == "latin1" || enc == "latin-1" || enc == "iso-8859-1" {
                bytes.iter().map(|&b| b as char).collect()
            } else {
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    }
}

/// Reads a whole file with lossy UTF-8 decoding.
pub fn read_lenient(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| ReportError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads a whole file decoded per the node's declared encoding.
pub fn read_with_encoding(path: &Path, encoding: &str) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| ReportError::io(path, e))?;
    Ok(decode_lenient(&bytes, encoding))
}

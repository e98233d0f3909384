//! Line format of the store file
//!
//! One record per line: `<key><delimiter><optional single space><value>`.

use crate::{Result, StoreError};
use std::fmt::Display;

/// A line is a record candidate when it is non-empty and holds the delimiter
pub fn is_valid_line(line: &str, delimiter: char) -> bool {
    !line.is_empty() && line.contains(delimiter)
}

/// Split a line at the first delimiter, dropping one space after it
///
/// Returns `None` when the line has no delimiter.
pub fn split_line(line: &str, delimiter: char) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(delimiter)?;
    Some((key, value.strip_prefix(' ').unwrap_or(value)))
}

/// Render one record as written by `dump`
///
/// Fails when the key would not split back out of the line or when either
/// side spans several lines.
pub fn format_line<K: Display, V: Display>(key: &K, value: &V, delimiter: char) -> Result<String> {
    let key = key.to_string();
    let value = value.to_string();

    if key.is_empty() || key.contains(delimiter) {
        return Err(StoreError::InvalidRecord(format!(
            "key {key:?} is empty or contains the delimiter {delimiter:?}"
        )));
    }
    if key.contains(['\n', '\r']) || value.contains(['\n', '\r']) {
        return Err(StoreError::InvalidRecord(format!(
            "record for key {key:?} contains a line break"
        )));
    }

    Ok(format!("{key}{delimiter} {value}"))
}

//! Header field collection.
//!
//! Field names are stored lower-cased, so every lookup is case-insensitive.
//! Repeated fields are combined into a single comma-separated value in the
//! order they were encountered.

use indexmap::IndexMap;
use thiserror::Error;

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("header line has no colon separator")]
    MissingColon,
    #[error("malformed header name {0:?}: whitespace before colon")]
    MalformedKey(String),
    #[error("invalid characters in header name {0:?}")]
    InvalidKey(String),
}

/// A mapping of lower-cased header names to their (combined) values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: IndexMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one header line from the front of `data`.
    ///
    /// Returns the number of bytes consumed and whether the blank line ending
    /// the header block was reached. `(0, false)` means no complete line is
    /// buffered yet and the caller should read more bytes.
    ///
    /// The name must be an ASCII token. The value may carry any bytes; ones
    /// that are not UTF-8 are replaced with U+FFFD.
    pub fn parse(&mut self, data: &[u8]) -> Result<(usize, bool), HeaderError> {
        let Some(idx) = find_crlf(data) else {
            return Ok((0, false));
        };
        if idx == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = &data[..idx];
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(HeaderError::MissingColon)?;

        let key = std::str::from_utf8(&line[..colon])
            .map_err(|_| HeaderError::InvalidKey(String::from_utf8_lossy(&line[..colon]).into_owned()))?;
        let value = String::from_utf8_lossy(&line[colon + 1..]);

        let key = key.trim_start_matches(' ');
        if key.chars().any(char::is_whitespace) {
            return Err(HeaderError::MalformedKey(key.to_string()));
        }

        self.set(key, value.trim())?;
        Ok((idx + CRLF.len(), false))
    }

    /// Adds a field, appending `", " + value` if the name is already present.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), HeaderError> {
        let key = validate_key(key)?;
        match self.fields.get_mut(&key) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => {
                self.fields.insert(key, value.to_string());
            }
        }
        Ok(())
    }

    /// Replaces any existing value for the field.
    pub fn overwrite(&mut self, key: &str, value: &str) -> Result<(), HeaderError> {
        let key = validate_key(key)?;
        self.fields.insert(key, value.to_string());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(&key.to_ascii_lowercase())
    }

    /// Removes a field, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.shift_remove(&key.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Replaces a field whose name is a known-valid token.
    pub(crate) fn insert_static(&mut self, key: &'static str, value: String) {
        debug_assert!(validate_key(key).is_ok(), "{key} is not a token");
        self.fields.insert(key.to_ascii_lowercase(), value);
    }

    /// Serializes every field as `name: value\r\n`, followed by a blank line.
    pub(crate) fn encode_into(&self, buf: &mut Vec<u8>) {
        for (k, v) in self.iter() {
            buf.extend_from_slice(k.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(v.as_bytes());
            buf.extend_from_slice(CRLF);
        }
        buf.extend_from_slice(CRLF);
    }
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

fn validate_key(key: &str) -> Result<String, HeaderError> {
    if key.is_empty() || !key.bytes().all(is_token_char) {
        return Err(HeaderError::InvalidKey(key.to_string()));
    }
    Ok(key.to_ascii_lowercase())
}

// RFC 9110 tchar
fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
}

//! Core domain types for CSV-driven page generation.

use std::fmt;
use std::str::FromStr;

use crate::error::MdGenError;

// ---------------------------------------------------------------------------
// Delimiter
// ---------------------------------------------------------------------------

/// A single-byte CSV field delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    /// The raw byte handed to the CSV reader.
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self(b',')
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as char)
    }
}

impl FromStr for Delimiter {
    type Err = MdGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [b] if b.is_ascii() => Ok(Self(*b)),
            _ => Err(MdGenError::config(format!(
                "delimiter must be a single ASCII character, got {s:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Header / Row
// ---------------------------------------------------------------------------

/// The column-name record of a CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header(Vec<String>);

impl Header {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Position of the first column named exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One data record. May be shorter or longer than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    /// Cell at `index`, if the record is long enough.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

// src/index.rs

//! APKINDEX parser
//!
//! Decodes the plain-text APKINDEX record format into a name -> record map.
//! Records are separated by blank lines; each record is a sequence of
//! `KEY:VALUE` lines split on the first colon only.

use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// One package entry from the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    /// Direct dependency tokens in listed order, duplicates preserved
    pub depends: Vec<String>,
}

/// A snapshot mapping package names to their records.
///
/// Built once per resolution run and immutable afterwards. Duplicate `P`
/// values across records are resolved last-wins: the later record in the
/// byte stream supersedes earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Index {
    records: HashMap<String, PackageRecord>,
}

impl Index {
    /// Parse raw APKINDEX bytes into an index.
    ///
    /// Fails only if the bytes are not valid UTF-8. Malformed individual
    /// records (missing the required `P` field) are skipped, not fatal.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| Error::FormatError(format!("Index is not valid UTF-8: {e}")))?;

        let mut records = HashMap::new();
        let mut skipped = 0usize;

        for block in text.split("\n\n") {
            if block.trim().is_empty() {
                continue;
            }
            match Self::parse_record(block) {
                Some(record) => {
                    records.insert(record.name.clone(), record);
                }
                None => skipped += 1,
            }
        }

        debug!(
            "Parsed index: {} packages ({} malformed records skipped)",
            records.len(),
            skipped
        );

        Ok(Self { records })
    }

    /// Parse one blank-line-delimited record block.
    ///
    /// Returns `None` when the record has no usable `P` field.
    fn parse_record(block: &str) -> Option<PackageRecord> {
        let mut name = None;
        let mut version = String::new();
        let mut description = None;
        let mut depends = Vec::new();

        for line in block.lines() {
            // Values may contain colons, so split on the first one only
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            match key {
                "P" => {
                    let value = value.trim();
                    if !value.is_empty() {
                        name = Some(value.to_string());
                    }
                }
                "V" => version = value.trim().to_string(),
                "T" => description = Some(value.trim().to_string()),
                "D" => {
                    // split_whitespace drops empty and whitespace-only tokens
                    depends = value.split_whitespace().map(str::to_string).collect();
                }
                _ => {} // Unrecognized keys are ignored for forward compatibility
            }
        }

        Some(PackageRecord {
            name: name?,
            version,
            description,
            depends,
        })
    }

    /// Look up a package record by name
    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.records.get(name)
    }

    /// Check whether a package is present in the index
    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of packages in the index
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

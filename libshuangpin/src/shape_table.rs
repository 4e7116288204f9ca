//! The intermediate `character<TAB>shape code` table read by the merge.

use ahash::RandomState;
use indexmap::IndexMap;
use std::path::Path;

use yinxing_core::{io, Error, Result};

/// Character → shape codes, both in file order.
#[derive(Debug, Clone, Default)]
pub struct ShapeTable {
    entries: IndexMap<String, Vec<String>, RandomState>,
}

impl ShapeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from in-memory rows, e.g. the output of a stage 1 run.
    pub fn from_rows<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (character, code) in rows {
            table.push(character.to_string(), code.into());
        }
        table
    }

    pub fn push(&mut self, character: String, code: String) {
        self.entries.entry(character).or_default().push(code);
    }

    pub fn codes(&self, character: &str) -> Option<&[String]> {
        self.entries.get(character).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the table. Blank lines are skipped; any other line must hold
    /// at least two tab-separated fields.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut table = Self::new();
        for (ln, line) in io::numbered_lines(text) {
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            match (fields.next(), fields.next()) {
                (Some(character), Some(code)) => {
                    table.push(character.trim().to_string(), code.trim().to_string())
                }
                _ => {
                    return Err(Error::parse(
                        origin,
                        ln,
                        format!("expected character<TAB>code, got {line:?}"),
                    ))
                }
            }
        }
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::parse(&io::read_text(path)?, &path.display().to_string())
    }
}

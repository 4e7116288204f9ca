//! Root map: elementary glyph component → keystroke letter.
//!
//! The root table lists one letter per line followed by every
//! component assigned to that letter, e.g. `G一五夫`.

use ahash::AHashMap;
use std::path::Path;
use tracing::{debug, warn};

use yinxing_core::{io, Result};

/// Immutable lookup from elementary symbol to its letter.
#[derive(Debug, Clone, Default)]
pub struct RootMap {
    map: AHashMap<char, char>,
}

impl RootMap {
    /// Create an empty root map.
    pub fn new() -> Self {
        Self {
            map: AHashMap::new(),
        }
    }

    /// Build from `(letter, symbols)` records. Later records win when a
    /// symbol is assigned twice.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (char, S)>,
        S: AsRef<str>,
    {
        let mut rm = Self::new();
        for (letter, symbols) in records {
            for symbol in symbols.as_ref().chars().filter(|c| !c.is_whitespace()) {
                rm.insert(symbol, letter);
            }
        }
        rm
    }

    /// Parse the textual root table.
    pub fn parse(text: &str) -> Self {
        let mut records = Vec::new();
        for (ln, line) in io::numbered_lines(text) {
            let line = line.trim();
            let mut chars = line.chars();
            let Some(letter) = chars.next() else {
                continue;
            };
            if !letter.is_ascii_alphabetic() {
                warn!(line = ln, %letter, "root letter is not an ASCII letter");
            }
            let symbols = chars.as_str();
            if symbols.trim().is_empty() {
                warn!(line = ln, %letter, "root letter has no symbols");
            }
            records.push((letter, symbols));
        }
        let rm = Self::from_records(records);
        debug!(roots = rm.len(), "parsed root table");
        rm
    }

    /// Load the root table from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::parse(&io::read_text(path)?))
    }

    /// Assign `symbol` to `letter`, returning the previous letter if any.
    pub fn insert(&mut self, symbol: char, letter: char) -> Option<char> {
        let prev = self.map.insert(symbol, letter);
        if let Some(old) = prev {
            if old != letter {
                warn!(%symbol, %old, new = %letter, "root reassigned");
            }
        }
        prev
    }

    pub fn letter(&self, symbol: char) -> Option<char> {
        self.map.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.map.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

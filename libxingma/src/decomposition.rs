//! Decomposition table: part → ordered alternative breakdowns.
//!
//! Source lines look like `旦<TAB>日一`; additional tab-separated fields are
//! further alternatives. Alternatives are tried in source order, so that
//! order is preserved exactly.

use ahash::RandomState;
use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, warn};

use yinxing_core::{io, Result};

/// One candidate breakdown of a part into sub-parts.
pub type Alternative = Vec<char>;

/// Render an alternative back to its source string form.
pub fn alternative_string(alt: &[char]) -> String {
    alt.iter().collect()
}

/// Part → alternatives, iterated in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct DecompositionTable {
    entries: IndexMap<char, Vec<Alternative>, RandomState>,
}

impl DecompositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alternatives of `part`. A part that is already present keeps
    /// its position but has its alternatives replaced.
    pub fn insert(&mut self, part: char, alternatives: Vec<Alternative>) {
        if self.entries.insert(part, alternatives).is_some() {
            debug!(%part, "decomposition replaced by later record");
        }
    }

    /// Convenience for fixtures: each alternative given as a string.
    pub fn insert_str<S: AsRef<str>>(&mut self, part: char, alternatives: &[S]) {
        let alts = alternatives
            .iter()
            .map(|s| s.as_ref().chars().collect())
            .collect();
        self.insert(part, alts);
    }

    pub fn alternatives(&self, part: char) -> Option<&[Alternative]> {
        self.entries.get(&part).map(|v| v.as_slice())
    }

    pub fn contains(&self, part: char) -> bool {
        self.entries.contains_key(&part)
    }

    /// Iterate parts with their alternatives in source order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &[Alternative])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the textual decomposition library.
    ///
    /// Lines whose first field is not a single character cannot name a part
    /// and are skipped with a warning. Such records (multi-character keys
    /// like component sequences) therefore produce no stage 1 rows, unlike
    /// tables that keep them as string keys.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        for (ln, line) in io::numbered_lines(text) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let head = fields.next().unwrap_or_default();
            let mut head_chars = head.chars();
            let part = match (head_chars.next(), head_chars.next()) {
                (Some(c), None) => c,
                _ => {
                    warn!(line = ln, head, "decomposition key is not a single character");
                    continue;
                }
            };
            let alternatives = fields
                .map(|f| f.chars().filter(|c| !c.is_whitespace()).collect())
                .collect();
            table.insert(part, alternatives);
        }
        debug!(parts = table.len(), "parsed decomposition table");
        table
    }

    /// Load the decomposition library from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::parse(&io::read_text(path)?))
    }
}

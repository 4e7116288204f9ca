//! Character → readings database.
//!
//! Source lines look like `U+4E2D: zhōng,zhòng  # 中`. Anything after `#`
//! is commentary; lines that do not start with a code point are skipped.

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

use yinxing_core::{io, Result};

use crate::normalize::normalize_syllable;

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^U\+([0-9A-Fa-f]+)\s*:\s*(.+)$").expect("pinyin database line pattern")
});

#[derive(Debug, Clone, Default)]
pub struct PinyinDb {
    readings: AHashMap<String, Vec<String>>,
}

impl PinyinDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw reading for `character`. The reading is normalized first;
    /// empty and repeated readings are dropped.
    pub fn insert(&mut self, character: &str, raw_reading: &str) {
        let reading = normalize_syllable(raw_reading);
        if reading.is_empty() {
            return;
        }
        let bucket = self.readings.entry(character.to_string()).or_default();
        if !bucket.contains(&reading) {
            bucket.push(reading);
        }
    }

    /// Normalized readings of `character`, in source order.
    pub fn readings(&self, character: &str) -> Option<&[String]> {
        self.readings
            .get(character)
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }

    /// Number of characters with at least one reading.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Parse the textual database.
    pub fn parse(text: &str) -> Self {
        let mut db = Self::new();
        let mut skipped = 0usize;
        for (_, line) in io::numbered_lines(text) {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let Some((character, payload)) = parse_line(line) else {
                skipped += 1;
                continue;
            };
            let key = character.to_string();
            for token in payload
                .split(',')
                .flat_map(str::split_whitespace)
            {
                db.insert(&key, token);
            }
        }
        debug!(characters = db.len(), skipped, "parsed pinyin database");
        db
    }

    /// Load the database from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::parse(&io::read_text(path)?))
    }
}

fn parse_line(line: &str) -> Option<(char, &str)> {
    let caps = LINE_RE.captures(line)?;
    let code = u32::from_str_radix(caps.get(1)?.as_str(), 16).ok()?;
    let character = char::from_u32(code)?;
    Some((character, caps.get(2)?.as_str().trim()))
}

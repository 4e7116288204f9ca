//! Plain-text table helpers.
//!
//! Every table the generator reads or writes is a UTF-8 text file with one
//! record per line. Loaders in the language crates take the whole text plus
//! an origin name (used in parse errors), so they can be fed from files or
//! from in-memory fixtures alike.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Read a UTF-8 file into a string, dropping a leading byte order mark.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_text<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    fs::write(path, content).map_err(|e| Error::io(path, e))
}

/// Iterate lines with 1-based line numbers, without their line endings.
pub fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
}

/// Render `(key, value)` rows as tab-separated lines, one row per line.
pub fn render_rows<K, V>(rows: &[(K, V)]) -> String
where
    K: std::fmt::Display,
    V: std::fmt::Display,
{
    let mut out = String::new();
    for (k, v) in rows {
        out.push_str(&format!("{}\t{}\n", k, v));
    }
    out
}

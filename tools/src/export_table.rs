use anyhow::{Context, Result};
use redb::{Database, TableDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Characters typed by one composite code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodeEntry {
    pub text: String,
    /// How many (shape code, reading) pairs of `text` produce this code.
    pub freq: u64,
}

pub const CODES_TABLE: TableDefinition<u64, Vec<u8>> = TableDefinition::new("codes");

/// Group a final `character<TAB>code` table by code, in first-seen order
/// of characters within each code.
pub fn group_by_code(text: &str) -> HashMap<String, Vec<CodeEntry>> {
    let mut global: HashMap<String, Vec<CodeEntry>> = HashMap::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut parts = line.split('\t');
        let (Some(character), Some(code)) = (parts.next(), parts.next()) else {
            continue;
        };
        let bucket = global.entry(code.trim().to_string()).or_default();
        match bucket.iter_mut().find(|e| e.text == character) {
            Some(e) => e.freq += 1,
            None => bucket.push(CodeEntry {
                text: character.to_string(),
                freq: 1,
            }),
        }
    }
    global
}

/// Build an fst (code → index) and a redb store (index → bincode entries).
pub fn run(table: &Path, out_fst: &Path, out_redb: &Path) -> Result<usize> {
    let text = yinxing_core::io::read_text(table)?;
    let global = group_by_code(&text);

    let mut keys: Vec<&String> = global.keys().collect();
    keys.sort();
    let mut builder = fst::MapBuilder::new(Vec::new())?;
    for (i, k) in keys.iter().enumerate() {
        builder.insert(k, i as u64)?;
    }
    let fst_bytes = builder.into_inner()?;
    let mut out = File::create(out_fst).with_context(|| format!("creating {}", out_fst.display()))?;
    out.write_all(&fst_bytes)?;

    let db = Database::create(out_redb).with_context(|| format!("creating {}", out_redb.display()))?;
    let w = db.begin_write()?;
    {
        let mut t = w.open_table(CODES_TABLE)?;
        for (i, k) in keys.iter().enumerate() {
            let ser = bincode::serialize(&global[*k])?;
            t.insert(&(i as u64), &ser)?;
        }
    }
    w.commit()?;

    Ok(keys.len())
}

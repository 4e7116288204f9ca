//! Stage 2 driver: combine shape codes with double pinyin.
//!
//! Each output code is the two double pinyin keys of a reading followed by
//! the first and last letter of a shape code. Every (shape code, reading)
//! pair of a character produces its own row.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, error, info};

use yinxing_core::{io, Error, MergeConfig, Result};

use crate::double_pinyin::SchemeTable;
use crate::pinyin_db::PinyinDb;
use crate::shape_table::ShapeTable;

/// Recoverable problems collected during a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeDiagnostics {
    /// Characters with shape codes but no readings.
    pub missing_pinyin: BTreeSet<String>,
    /// `(character, reading)` pairs the scheme could not write.
    pub cannot_convert: Vec<(String, String)>,
    /// Rows written to the final table.
    pub rows: usize,
}

impl MergeDiagnostics {
    pub fn render_log(&self) -> String {
        let mut out = String::new();
        if !self.missing_pinyin.is_empty() {
            out.push_str("MISSING PINYIN:\n");
            out.extend(self.missing_pinyin.iter().map(String::as_str));
            out.push_str("\n\n");
        }
        if !self.cannot_convert.is_empty() {
            out.push_str("CANNOT CONVERT:\n");
            out.push_str(&io::render_rows(&self.cannot_convert));
            out.push('\n');
        }
        out.push_str(&format!("SUMMARY: rows = {}\n", self.rows));
        out
    }
}

/// Result of a completed merge.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub rows: Vec<(String, String)>,
    pub diagnostics: MergeDiagnostics,
}

impl MergeOutcome {
    pub fn render_table(&self) -> String {
        io::render_rows(&self.rows)
    }

    /// Write the final table and the diagnostics log.
    pub fn write(&self, config: &MergeConfig) -> Result<()> {
        io::write_text(&config.output, &self.render_table())?;
        io::write_text(&config.error_log, &self.diagnostics.render_log())
    }
}

/// Error log written when a merge aborts on a too-short shape code.
pub fn render_fatal_log(character: &str, code: &str) -> String {
    format!(
        "ERROR: shape code shorter than two letters; fix the decomposition or root tables and rerun stage 1.\n{}\t{}\n",
        character, code
    )
}

/// Composite code: double pinyin keys, then the shape code's first and
/// last letter. `None` if the shape code has fewer than two letters.
pub fn composite_code(keys: (char, char), shape_code: &str) -> Option<String> {
    let mut letters = shape_code.chars();
    let first = letters.next()?;
    let last = letters.next_back()?;
    Some([keys.0, keys.1, first, last].iter().collect())
}

#[derive(Debug, Clone, Copy)]
pub struct MergeGenerator<'a> {
    scheme: &'a SchemeTable,
    pinyin: &'a PinyinDb,
}

impl<'a> MergeGenerator<'a> {
    pub fn new(scheme: &'a SchemeTable, pinyin: &'a PinyinDb) -> Self {
        Self { scheme, pinyin }
    }

    /// Merge every character of `shapes`.
    ///
    /// Returns `Error::ShapeCodeTooShort` as soon as a shape code with fewer
    /// than two letters is met; no outcome is produced in that case.
    pub fn run(&self, shapes: &ShapeTable) -> Result<MergeOutcome> {
        let mut outcome = MergeOutcome::default();

        for (character, codes) in shapes.iter() {
            let Some(readings) = self.pinyin.readings(character) else {
                debug!(%character, "no pinyin");
                outcome.diagnostics.missing_pinyin.insert(character.to_string());
                continue;
            };

            let mut char_rows = Vec::with_capacity(codes.len() * readings.len());
            for code in codes {
                if code.chars().count() < 2 {
                    return Err(Error::ShapeCodeTooShort {
                        character: character.to_string(),
                        code: code.clone(),
                    });
                }
                for reading in readings {
                    match self.scheme.to_double(reading) {
                        Ok(keys) => {
                            if let Some(full) = composite_code(keys, code) {
                                char_rows.push((character.to_string(), full));
                            }
                        }
                        Err(e) => {
                            debug!(%character, %reading, error = %e, "cannot convert");
                            outcome
                                .diagnostics
                                .cannot_convert
                                .push((character.to_string(), reading.clone()));
                        }
                    }
                }
            }
            outcome.rows.extend(char_rows);
        }

        outcome.diagnostics.rows = outcome.rows.len();
        let d = &outcome.diagnostics;
        info!(
            scheme = self.scheme.name(),
            rows = d.rows,
            missing_pinyin = d.missing_pinyin.len(),
            cannot_convert = d.cannot_convert.len(),
            "sound+shape table merged"
        );
        Ok(outcome)
    }
}

/// Merge `shapes` and write the outputs named in `config`.
///
/// On a too-short shape code the error log is written with the offending
/// row and the error is returned; the final table is left untouched.
pub fn merge_and_write(
    shapes: &ShapeTable,
    pinyin: &PinyinDb,
    scheme: &SchemeTable,
    config: &MergeConfig,
) -> Result<MergeOutcome> {
    match MergeGenerator::new(scheme, pinyin).run(shapes) {
        Ok(outcome) => {
            outcome.write(config)?;
            Ok(outcome)
        }
        Err(Error::ShapeCodeTooShort { character, code }) => {
            error!(%character, %code, log = %config.error_log.display(), "shape code shorter than two letters");
            io::write_text(&config.error_log, &render_fatal_log(&character, &code))?;
            Err(Error::ShapeCodeTooShort { character, code })
        }
        Err(e) => Err(e),
    }
}

/// Load the configured inputs and run stage 2.
pub fn run_from_config(config: &MergeConfig) -> Result<MergeOutcome> {
    let shapes = ShapeTable::load(&config.shape_table)?;
    let pinyin = PinyinDb::load(&config.pinyin_db)?;
    let scheme = SchemeTable::from_config(config)?;
    info!(
        characters = shapes.len(),
        pinyin = pinyin.len(),
        scheme = scheme.name(),
        "stage 2 inputs loaded"
    );
    merge_and_write(&shapes, &pinyin, &scheme, config)
}

//! Stage 1 driver: build the `character<TAB>shape code` table.

use tracing::{debug, info};

use yinxing_core::{io, GenerateConfig, Result};

use crate::decomposition::{alternative_string, DecompositionTable};
use crate::resolver::{MissingRoots, Resolver};
use crate::roots::RootMap;
use crate::shape_code::ShapeCodeDeriver;
use crate::substitution::Substitutions;

/// Everything stage 1 could not encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateDiagnostics {
    /// Parts that neither are roots nor decompose into roots.
    pub missing_roots: MissingRoots,
    /// `(character, alternative)` for characters with no usable alternative.
    pub failed: Vec<(char, String)>,
    /// `(character, alternative)` rejected for resolving to a single letter.
    pub single_letter: Vec<(char, String)>,
}

impl GenerateDiagnostics {
    /// Missing-roots log: the sorted missing symbols on the first line,
    /// followed by every alternative of every failed character.
    pub fn render_missing_log(&self) -> String {
        let mut out: String = self.missing_roots.iter().collect();
        out.push('\n');
        out.push_str(&io::render_rows(&self.failed));
        out
    }

    pub fn render_single_code_log(&self) -> String {
        io::render_rows(&self.single_letter)
    }
}

/// Result of a stage 1 run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOutcome {
    /// One row per successful alternative, in table order.
    pub rows: Vec<(char, String)>,
    pub diagnostics: GenerateDiagnostics,
}

impl GenerateOutcome {
    pub fn render_table(&self) -> String {
        io::render_rows(&self.rows)
    }

    /// Write the table and both logs to the configured paths.
    pub fn write(&self, config: &GenerateConfig) -> Result<()> {
        io::write_text(&config.output, &self.render_table())?;
        io::write_text(&config.missing_log, &self.diagnostics.render_missing_log())?;
        io::write_text(
            &config.single_code_log,
            &self.diagnostics.render_single_code_log(),
        )?;
        Ok(())
    }
}

/// Iterates the decomposition table and derives every character's codes.
#[derive(Debug, Clone, Copy)]
pub struct TableGenerator<'a> {
    table: &'a DecompositionTable,
    deriver: ShapeCodeDeriver<'a>,
}

impl<'a> TableGenerator<'a> {
    pub fn new(
        table: &'a DecompositionTable,
        roots: &'a RootMap,
        substitutions: &'a Substitutions,
    ) -> Self {
        let resolver = Resolver::new(table, roots, substitutions);
        Self {
            table,
            deriver: ShapeCodeDeriver::new(resolver),
        }
    }

    /// Shape codes of every alternative of `character` that succeeds.
    pub fn codes_for(&self, character: char, diagnostics: &mut GenerateDiagnostics) -> Vec<String> {
        let Some(alternatives) = self.table.alternatives(character) else {
            return Vec::new();
        };
        self.codes_from(character, alternatives, diagnostics)
    }

    fn codes_from(
        &self,
        character: char,
        alternatives: &[Vec<char>],
        diagnostics: &mut GenerateDiagnostics,
    ) -> Vec<String> {
        let codes: Vec<String> = alternatives
            .iter()
            .filter_map(|alt| self.deriver.derive(character, alt, diagnostics))
            .collect();

        if codes.is_empty() {
            debug!(%character, alternatives = alternatives.len(), "no alternative encodable");
            diagnostics.failed.extend(
                alternatives
                    .iter()
                    .map(|alt| (character, alternative_string(alt))),
            );
        }
        codes
    }

    /// Run over the whole table.
    pub fn run(&self) -> GenerateOutcome {
        let mut outcome = GenerateOutcome::default();
        for (character, alternatives) in self.table.iter() {
            if alternatives.is_empty() {
                continue;
            }
            for code in self.codes_from(character, alternatives, &mut outcome.diagnostics) {
                outcome.rows.push((character, code));
            }
        }

        let d = &outcome.diagnostics;
        info!(
            rows = outcome.rows.len(),
            failed = d.failed.len(),
            single_letter = d.single_letter.len(),
            missing_roots = d.missing_roots.len(),
            "shape code table generated"
        );
        outcome
    }
}

/// Load the configured inputs, run stage 1 and write its outputs.
pub fn run_from_config(config: &GenerateConfig) -> Result<GenerateOutcome> {
    let roots = RootMap::load(&config.roots)?;
    let table = DecompositionTable::load(&config.decomposition)?;
    let substitutions = Substitutions::new(config.substitutions.clone());
    info!(
        roots = roots.len(),
        parts = table.len(),
        substitutions = substitutions.rules().len(),
        "stage 1 inputs loaded"
    );

    let outcome = TableGenerator::new(&table, &roots, &substitutions).run();
    outcome.write(config)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> RootMap {
        RootMap::from_records([('G', "一"), ('K', "口"), ('J', "日")])
    }

    #[test]
    fn every_successful_alternative_is_a_row() {
        let mut table = DecompositionTable::new();
        table.insert_str('旦', &["日一", "X", "日一口"]);
        let roots = roots();
        let subs = Substitutions::none();
        let outcome = TableGenerator::new(&table, &roots, &subs).run();
        assert_eq!(
            outcome.rows,
            vec![('旦', "JG".to_string()), ('旦', "JGK".to_string())]
        );
        assert!(outcome.diagnostics.failed.is_empty());
    }

    #[test]
    fn failed_character_logs_all_alternatives() {
        let mut table = DecompositionTable::new();
        table.insert_str('甲', &["X一", "日"]);
        let roots = roots();
        let subs = Substitutions::none();
        let outcome = TableGenerator::new(&table, &roots, &subs).run();
        assert!(outcome.rows.is_empty());
        assert_eq!(
            outcome.diagnostics.failed,
            vec![('甲', "X一".to_string()), ('甲', "日".to_string())]
        );
        assert_eq!(outcome.diagnostics.single_letter, vec![('甲', "日".to_string())]);
    }

    #[test]
    fn missing_log_starts_with_sorted_symbols() {
        let mut diags = GenerateDiagnostics::default();
        diags.missing_roots.extend(['乙', '丁', '乙']);
        diags.failed.push(('甲', "乙丁".to_string()));
        assert_eq!(diags.render_missing_log(), "丁乙\n甲\t乙丁\n");
    }

    #[test]
    fn empty_diagnostics_still_write_missing_header_line() {
        assert_eq!(GenerateDiagnostics::default().render_missing_log(), "\n");
    }

    #[test]
    fn codes_for_unknown_character_is_empty() {
        let table = DecompositionTable::new();
        let roots = roots();
        let subs = Substitutions::none();
        let gen = TableGenerator::new(&table, &roots, &subs);
        let mut diags = GenerateDiagnostics::default();
        assert!(gen.codes_for('无', &mut diags).is_empty());
        assert!(diags.failed.is_empty());
    }
}

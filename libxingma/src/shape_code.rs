//! Shape code derivation from one decomposition alternative.

use tracing::debug;

use crate::decomposition::alternative_string;
use crate::generator::GenerateDiagnostics;
use crate::resolver::Resolver;

/// Turn a root-letter sequence into a shape code.
///
/// Two or three letters are kept whole; longer sequences keep the first
/// three letters and the last one. Fewer than two letters never form a
/// code.
pub fn take_code(letters: &[char]) -> Option<String> {
    match letters.len() {
        0 | 1 => None,
        2 | 3 => Some(letters.iter().collect()),
        n => Some([letters[0], letters[1], letters[2], letters[n - 1]].iter().collect()),
    }
}

/// Derives shape codes for characters, recording failures as it goes.
#[derive(Debug, Clone, Copy)]
pub struct ShapeCodeDeriver<'a> {
    resolver: Resolver<'a>,
}

impl<'a> ShapeCodeDeriver<'a> {
    pub fn new(resolver: Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Derive the shape code of `character` through `alternative`.
    ///
    /// Each top-level part is resolved with its own cycle guard. Returns
    /// `None` when a part cannot be resolved or when only one letter comes
    /// out; the latter is recorded in `diagnostics.single_letter`.
    pub fn derive(
        &self,
        character: char,
        alternative: &[char],
        diagnostics: &mut GenerateDiagnostics,
    ) -> Option<String> {
        let mut roots = Vec::new();
        for part in self.resolver.substitutions().apply(alternative) {
            let resolved = self.resolver.resolve(part, &mut diagnostics.missing_roots)?;
            roots.extend(resolved);
        }

        let root_map = self.resolver.roots();
        let letters: Vec<char> = roots.iter().filter_map(|r| root_map.letter(*r)).collect();

        if letters.len() == 1 {
            let source = alternative_string(alternative);
            debug!(%character, alternative = %source, "single-letter shape code rejected");
            diagnostics.single_letter.push((character, source));
            return None;
        }
        take_code(&letters)
    }
}

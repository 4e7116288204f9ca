//! Literal rewrites of recurring component groupings.
//!
//! Some decompositions spell out a pair of components that has to be
//! expanded through a different pair (e.g. `甘一` is really `其` over
//! `上`'s bottom). The pass joins the parts, rewrites every configured
//! pattern, and splits the result back into single-character parts.

use yinxing_core::{default_substitutions, SubstitutionRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    rules: Vec<SubstitutionRule>,
}

impl Default for Substitutions {
    fn default() -> Self {
        Self::new(default_substitutions())
    }
}

impl Substitutions {
    /// Rules are applied in the given order; empty patterns are ignored.
    pub fn new(rules: Vec<SubstitutionRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter(|r| !r.pattern.is_empty())
            .collect();
        Self { rules }
    }

    /// A pass that rewrites nothing.
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    /// Rewrite `parts`. Each rule replaces all of its non-overlapping
    /// matches left to right before the next rule runs.
    pub fn apply(&self, parts: &[char]) -> Vec<char> {
        let mut joined: String = parts.iter().collect();
        for rule in &self.rules {
            if joined.contains(rule.pattern.as_str()) {
                joined = joined.replace(rule.pattern.as_str(), &rule.replacement);
            }
        }
        joined.chars().collect()
    }
}

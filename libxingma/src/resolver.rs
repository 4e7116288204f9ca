//! Recursive expansion of a part into root symbols.
//!
//! A part is either a root (leaf) or is expanded through its alternatives
//! in source order; the first alternative whose every sub-part resolves
//! wins. The decomposition data may contain cycles, so each top-level
//! resolution carries a [`Resolution`] holding the parts on the current
//! descent path. A part may appear again in a sibling branch; only a part
//! that re-enters its own ancestry is cut.
//!
//! Failures that did not depend on the descent path are remembered for the
//! rest of the resolution, so every part is expanded at most once per
//! top-level call unless a cycle cut above it was involved.

use ahash::{AHashMap, AHashSet};
use std::collections::BTreeSet;
use tracing::trace;

use crate::decomposition::DecompositionTable;
use crate::roots::RootMap;
use crate::substitution::Substitutions;

/// Sorted, de-duplicated set of parts that could not be decomposed.
pub type MissingRoots = BTreeSet<char>;

/// State of one top-level resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Parts currently being expanded, with their depth on the path.
    path: AHashMap<char, usize>,
    /// Parts known to fail whatever path reaches them.
    failed: AHashSet<char>,
    /// Shallowest path depth cut by the cycle guard in the current subtree.
    cycle_floor: usize,
    expansions: usize,
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolution {
    pub fn new() -> Self {
        Self {
            path: AHashMap::new(),
            failed: AHashSet::new(),
            cycle_floor: usize::MAX,
            expansions: 0,
        }
    }

    /// Number of parts expanded through their alternatives so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// True when no part is being expanded.
    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }
}

/// Read-only view over the tables needed for resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    table: &'a DecompositionTable,
    roots: &'a RootMap,
    substitutions: &'a Substitutions,
}

impl<'a> Resolver<'a> {
    pub fn new(
        table: &'a DecompositionTable,
        roots: &'a RootMap,
        substitutions: &'a Substitutions,
    ) -> Self {
        Self {
            table,
            roots,
            substitutions,
        }
    }

    pub fn roots(&self) -> &'a RootMap {
        self.roots
    }

    pub fn substitutions(&self) -> &'a Substitutions {
        self.substitutions
    }

    /// Resolve `part` with a fresh [`Resolution`].
    pub fn resolve(&self, part: char, missing: &mut MissingRoots) -> Option<Vec<char>> {
        let mut state = Resolution::new();
        self.resolve_in(part, &mut state, missing)
    }

    /// Resolve `part` inside an existing resolution. `state` must belong to
    /// a single top-level call; its path is left as it was found on return.
    pub fn resolve_in(
        &self,
        part: char,
        state: &mut Resolution,
        missing: &mut MissingRoots,
    ) -> Option<Vec<char>> {
        if self.roots.contains(part) {
            return Some(vec![part]);
        }
        if let Some(&depth) = state.path.get(&part) {
            trace!(%part, depth, "cycle");
            state.cycle_floor = state.cycle_floor.min(depth);
            return None;
        }
        if state.failed.contains(&part) {
            return None;
        }

        let depth = state.path.len();
        state.path.insert(part, depth);
        let outer_floor = std::mem::replace(&mut state.cycle_floor, usize::MAX);
        state.expansions += 1;

        let resolved = self.expand_alternatives(part, state, missing);

        let floor = std::mem::replace(&mut state.cycle_floor, outer_floor);
        state.path.remove(&part);
        // Cuts above this part still constrain the caller.
        state.cycle_floor = state.cycle_floor.min(floor);

        if resolved.is_none() {
            missing.insert(part);
            if floor >= depth {
                state.failed.insert(part);
            }
        }
        resolved
    }

    fn expand_alternatives(
        &self,
        part: char,
        state: &mut Resolution,
        missing: &mut MissingRoots,
    ) -> Option<Vec<char>> {
        let alternatives = self.table.alternatives(part)?;
        'alternatives: for alt in alternatives {
            let mut expanded = Vec::new();
            for sub in self.substitutions.apply(alt) {
                match self.resolve_in(sub, state, missing) {
                    Some(roots) => expanded.extend(roots),
                    None => continue 'alternatives,
                }
            }
            return Some(expanded);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (DecompositionTable, RootMap) {
        let roots = RootMap::from_records([('G', "一"), ('K', "口"), ('J', "日")]);
        let mut table = DecompositionTable::new();
        table.insert_str('旦', &["日一"]);
        table.insert_str('品', &["吅口"]);
        table.insert_str('吅', &["口口"]);
        (table, roots)
    }

    #[test]
    fn root_resolves_to_itself() {
        let (table, roots) = fixture();
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        for root in ['一', '口', '日'] {
            assert_eq!(r.resolve(root, &mut missing), Some(vec![root]));
        }
        assert!(missing.is_empty());
    }

    #[test]
    fn nested_parts_expand_in_order() {
        let (table, roots) = fixture();
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        assert_eq!(r.resolve('品', &mut missing), Some(vec!['口', '口', '口']));
    }

    #[test]
    fn repeated_component_in_sibling_branches_is_not_a_cycle() {
        let (mut table, roots) = fixture();
        table.insert_str('昌', &["旦旦"]);
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        assert_eq!(
            r.resolve('昌', &mut missing),
            Some(vec!['日', '一', '日', '一'])
        );
    }

    #[test]
    fn cycle_without_escape_fails() {
        let (mut table, roots) = fixture();
        table.insert_str('甲', &["乙"]);
        table.insert_str('乙', &["甲"]);
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        assert_eq!(r.resolve('甲', &mut missing), None);
        assert!(missing.contains(&'甲'));
        assert!(missing.contains(&'乙'));
    }

    #[test]
    fn cycle_with_later_escape_uses_the_escape() {
        let (mut table, roots) = fixture();
        table.insert_str('甲', &["乙", "日"]);
        table.insert_str('乙', &["甲"]);
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        assert_eq!(r.resolve('甲', &mut missing), Some(vec!['日']));
    }

    #[test]
    fn first_successful_alternative_wins() {
        let (mut table, roots) = fixture();
        table.insert_str('叶', &["X口", "口一", "日"]);
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        assert_eq!(r.resolve('叶', &mut missing), Some(vec!['口', '一']));
        assert!(missing.contains(&'X'));
    }

    #[test]
    fn substitution_runs_before_expansion() {
        let roots = RootMap::from_records([('Q', "其"), ('S', "上")]);
        let mut table = DecompositionTable::new();
        table.insert_str('甚', &["甘一"]);
        let subs = Substitutions::default();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        assert_eq!(r.resolve('甚', &mut missing), Some(vec!['其', '上']));
    }

    #[test]
    fn path_is_restored_after_resolution() {
        let (table, roots) = fixture();
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        let mut state = Resolution::new();
        r.resolve_in('品', &mut state, &mut missing);
        assert!(state.is_idle());
    }

    #[test]
    fn shared_failing_parts_are_expanded_once() {
        // P(i) = P(i+1) | P(i+2); the last two parts are unknown.
        let n = 40u32;
        let part = |i: u32| char::from_u32(0x4E00 + i).unwrap();
        let roots = RootMap::from_records([('G', "一")]);
        let mut table = DecompositionTable::new();
        for i in 1..=n {
            table.insert(part(i), vec![vec![part(i + 1)], vec![part(i + 2)]]);
        }
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        let mut state = Resolution::new();

        assert_eq!(r.resolve_in(part(1), &mut state, &mut missing), None);
        assert!(state.expansions() <= n as usize + 2);
        assert!(missing.contains(&part(n + 2)));
        assert!(state.is_idle());
    }

    #[test]
    fn failure_caused_by_a_cycle_is_retried_elsewhere() {
        // Under 甲, 乙 only fails because it loops back to 甲; as a sibling
        // of 甲 it resolves through 甲's escape.
        let (mut table, roots) = fixture();
        table.insert_str('丙', &["甲乙"]);
        table.insert_str('甲', &["乙", "日"]);
        table.insert_str('乙', &["甲"]);
        let subs = Substitutions::none();
        let r = Resolver::new(&table, &roots, &subs);
        let mut missing = MissingRoots::new();
        assert_eq!(r.resolve('丙', &mut missing), Some(vec!['日', '日']));
    }
}

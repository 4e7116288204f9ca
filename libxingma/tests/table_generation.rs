//! End-to-end tests for shape code table generation.

use libxingma::{
    run_from_config, DecompositionTable, MissingRoots, Resolver, RootMap, Substitutions,
    TableGenerator,
};
use yinxing_core::GenerateConfig;

fn sample_roots() -> RootMap {
    RootMap::parse("G一\nK口\nJ日\n")
}

#[test]
fn dan_resolves_to_jg() {
    let roots = sample_roots();
    let table = DecompositionTable::parse("旦\t日一\n");
    let subs = Substitutions::default();

    let resolver = Resolver::new(&table, &roots, &subs);
    let mut missing = MissingRoots::new();
    let resolved = resolver.resolve('旦', &mut missing).expect("旦 resolves");
    let letters: Vec<char> = resolved.iter().filter_map(|r| roots.letter(*r)).collect();
    assert_eq!(letters, vec!['J', 'G']);

    let outcome = TableGenerator::new(&table, &roots, &subs).run();
    assert_eq!(outcome.rows, vec![('旦', "JG".to_string())]);
}

#[test]
fn single_root_character_only_reaches_single_code_log() {
    let roots = sample_roots();
    let table = DecompositionTable::parse("曰\t日\n旦\t日一\n");
    let subs = Substitutions::default();

    let outcome = TableGenerator::new(&table, &roots, &subs).run();
    assert!(outcome.rows.iter().all(|(c, _)| *c != '曰'));
    assert_eq!(
        outcome.diagnostics.single_letter,
        vec![('曰', "日".to_string())]
    );
    assert_eq!(outcome.render_table(), "旦\tJG\n");
    assert_eq!(outcome.diagnostics.render_single_code_log(), "曰\t日\n");
}

#[test]
fn cyclic_data_terminates() {
    let roots = sample_roots();
    let table = DecompositionTable::parse("甲\t乙口\n乙\t丙\n丙\t甲\n");
    let subs = Substitutions::default();

    let outcome = TableGenerator::new(&table, &roots, &subs).run();
    assert!(outcome.rows.is_empty());
    let missing: String = outcome.diagnostics.missing_roots.iter().collect();
    assert_eq!(missing, "丙乙甲");
}

#[test]
fn long_decomposition_is_truncated_to_four_letters() {
    let roots = RootMap::parse("A一\nB口\nC日\nD月\nE木\n");
    let table = DecompositionTable::parse("字\t一口日月木\n");
    let subs = Substitutions::default();

    let outcome = TableGenerator::new(&table, &roots, &subs).run();
    assert_eq!(outcome.rows, vec![('字', "ABCE".to_string())]);
}

#[test]
fn run_from_config_writes_table_and_logs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path();
    std::fs::write(base.join("parts.txt"), "G一\nK口\nJ日\n").unwrap();
    std::fs::write(
        base.join("chaizi.txt"),
        "旦\t日一\n曰\t日\n甲\t田丨\n",
    )
    .unwrap();

    let config = GenerateConfig {
        roots: base.join("parts.txt"),
        decomposition: base.join("chaizi.txt"),
        output: base.join("output.txt"),
        missing_log: base.join("missing.log"),
        single_code_log: base.join("singlecode.log"),
        ..GenerateConfig::default()
    };
    let outcome = run_from_config(&config).expect("stage 1 runs");
    assert_eq!(outcome.rows.len(), 1);

    let table = std::fs::read_to_string(base.join("output.txt")).unwrap();
    assert_eq!(table, "旦\tJG\n");
    let missing = std::fs::read_to_string(base.join("missing.log")).unwrap();
    assert_eq!(missing, "田\n曰\t日\n甲\t田丨\n");
    let single = std::fs::read_to_string(base.join("singlecode.log")).unwrap();
    assert_eq!(single, "曰\t日\n");
}

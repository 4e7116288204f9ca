//! Stage 1 → stage 2 runs through real files.

use libshuangpin::{run_from_config, DoublePinyinScheme, SchemeTable};
use yinxing_core::{Error, GenerateConfig, MergeConfig};

fn write(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

#[test]
fn generated_shape_table_merges_into_composite_codes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path();

    let gen = GenerateConfig {
        roots: write(base, "parts.txt", "G一\nK口\nJ日\nM木\n"),
        decomposition: write(base, "chaizi.txt", "旦\t日一\n林\t木木\n曰\t日\n杏\t木口\n"),
        output: base.join("output.txt"),
        missing_log: base.join("missing.log"),
        single_code_log: base.join("singlecode.log"),
        ..GenerateConfig::default()
    };
    let stage1 = libxingma::run_from_config(&gen).expect("stage 1");
    assert_eq!(stage1.rows.len(), 3);

    let merge = MergeConfig {
        shape_table: gen.output.clone(),
        pinyin_db: write(
            base,
            "zdic.txt",
            "# readings\nU+65E6: dàn\nU+6797: lín  # forest\n",
        ),
        output: base.join("final.txt"),
        error_log: base.join("error.log"),
        ..MergeConfig::default()
    };
    let outcome = run_from_config(&merge).expect("stage 2");

    let table = std::fs::read_to_string(&merge.output).unwrap();
    assert_eq!(table, "旦\tdjJG\n林\tlbMM\n");
    assert!(outcome.diagnostics.missing_pinyin.contains("杏"));

    let log = std::fs::read_to_string(&merge.error_log).unwrap();
    assert_eq!(log, "MISSING PINYIN:\n杏\n\nSUMMARY: rows = 2\n");
}

#[test]
fn one_letter_shape_code_aborts_before_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path();

    let merge = MergeConfig {
        shape_table: write(base, "output.txt", "旦\tJG\n曰\tJ\n"),
        pinyin_db: write(base, "zdic.txt", "U+65E6: dàn\nU+66F0: yuē\n"),
        output: base.join("final.txt"),
        error_log: base.join("error.log"),
        ..MergeConfig::default()
    };
    let err = run_from_config(&merge).unwrap_err();
    assert!(matches!(err, Error::ShapeCodeTooShort { .. }));

    assert!(!merge.output.exists());
    let log = std::fs::read_to_string(&merge.error_log).unwrap();
    assert!(log.starts_with("ERROR:"));
    assert!(log.ends_with("曰\tJ\n"));
}

#[test]
fn custom_scheme_file_is_used() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = dir.path();

    let merge = MergeConfig {
        shape_table: write(base, "output.txt", "旦\tJG\n"),
        pinyin_db: write(base, "zdic.txt", "U+65E6: dan4\n"),
        output: base.join("final.txt"),
        error_log: base.join("error.log"),
        scheme: "custom".to_string(),
        scheme_file: Some(write(base, "mine.txt", "D d\nQ an\n")),
    };
    let outcome = run_from_config(&merge).expect("stage 2");
    assert_eq!(outcome.rows, vec![("旦".to_string(), "dqJG".to_string())]);

    let table = SchemeTable::from_config(&merge).unwrap();
    assert_eq!(table.name(), "mine");
}

#[test]
fn zh_initial_with_exact_final_is_deterministic() {
    let xh = DoublePinyinScheme::XiaoHe.table();
    let zrm = DoublePinyinScheme::ZiRanMa.table();
    for _ in 0..3 {
        assert_eq!(xh.to_double("zhuang"), Ok(('v', 'l')));
        assert_eq!(xh.to_double("ZhUang"), Ok(('v', 'l')));
        assert_eq!(zrm.to_double("zhuang"), Ok(('v', 'd')));
    }
}

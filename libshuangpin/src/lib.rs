//! libshuangpin crate root
//!
//! Sound side of the sound+shape (yinxing) code: pinyin normalization,
//! double pinyin transliteration, and the merge of shape codes with
//! readings into the final 4-letter codes.
//!
//! Public API exported here:
//! - `normalize_syllable` from `normalize`
//! - `DoublePinyinScheme`, `SchemeTable`, `TransliterationError` from `double_pinyin`
//! - `PinyinDb` from `pinyin_db`
//! - `ShapeTable` from `shape_table`
//! - `MergeGenerator`, `MergeOutcome`, `MergeDiagnostics` from `merge`

pub mod double_pinyin;
pub mod merge;
pub mod normalize;
pub mod pinyin_db;
pub mod shape_table;

pub use double_pinyin::{split_initial_final, DoublePinyinScheme, SchemeTable, TransliterationError};
pub use merge::{
    composite_code, merge_and_write, render_fatal_log, run_from_config, MergeDiagnostics,
    MergeGenerator, MergeOutcome,
};
pub use normalize::normalize_syllable;
pub use pinyin_db::PinyinDb;
pub use shape_table::ShapeTable;

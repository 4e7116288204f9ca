//! libxingma crate root
//!
//! Shape code (xingma) generation: glyph decompositions are expanded into
//! elementary roots, roots are mapped to letters, and the letters are cut
//! down to a 2-4 letter code.
//!
//! Public API exported here:
//! - `RootMap` from `roots`
//! - `DecompositionTable` from `decomposition`
//! - `Substitutions` from `substitution`
//! - `Resolver` from `resolver`
//! - `ShapeCodeDeriver` and `take_code` from `shape_code`
//! - `TableGenerator`, `GenerateOutcome`, `GenerateDiagnostics` from `generator`

pub mod decomposition;
pub mod generator;
pub mod resolver;
pub mod roots;
pub mod shape_code;
pub mod substitution;

pub use decomposition::{Alternative, DecompositionTable};
pub use generator::{run_from_config, GenerateDiagnostics, GenerateOutcome, TableGenerator};
pub use resolver::{MissingRoots, Resolution, Resolver};
pub use roots::RootMap;
pub use shape_code::{take_code, ShapeCodeDeriver};
pub use substitution::Substitutions;

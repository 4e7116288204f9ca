//! yinxing-core
//!
//! Configuration, error handling and text-table helpers shared by the two
//! generator stages (`libxingma` for shape codes, `libshuangpin` for the
//! double pinyin merge).
//!
//! Public API:
//! - `Config` - TOML-backed run configuration for both stages
//! - `Error` / `Result` - shared error type
//! - `io` - text table reading and writing
//! - `utils` - string normalization helpers
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result};

pub mod io;

/// One literal rewrite applied to a decomposition before expansion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubstitutionRule {
    pub pattern: String,
    pub replacement: String,
}

impl SubstitutionRule {
    pub fn new<P: Into<String>, R: Into<String>>(pattern: P, replacement: R) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// The component groupings that must be rewritten before expansion.
pub fn default_substitutions() -> Vec<SubstitutionRule> {
    vec![
        SubstitutionRule::new("甘一", "其上"),
        SubstitutionRule::new("目一", "具上"),
        SubstitutionRule::new("于八", "余下"),
    ]
}

/// Stage 1 settings: shape code table generation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Root specification (`L` followed by the symbols assigned to `L`).
    pub roots: PathBuf,
    /// Decomposition library (`part<TAB>alt<TAB>alt...`).
    pub decomposition: PathBuf,
    /// Intermediate `character<TAB>shape code` table.
    pub output: PathBuf,
    pub missing_log: PathBuf,
    pub single_code_log: PathBuf,
    /// Applied in order; earlier rules run first.
    pub substitutions: Vec<SubstitutionRule>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            roots: PathBuf::from("parts.txt"),
            decomposition: PathBuf::from("chaizi-jt.txt"),
            output: PathBuf::from("output.txt"),
            missing_log: PathBuf::from("missing.log"),
            single_code_log: PathBuf::from("singlecode.log"),
            substitutions: default_substitutions(),
        }
    }
}

/// Stage 2 settings: merging shape codes with double pinyin.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Intermediate table produced by stage 1.
    pub shape_table: PathBuf,
    /// Pinyin database (`U+XXXX: reading, reading  # comment`).
    pub pinyin_db: PathBuf,
    /// Final `character<TAB>composite code` table.
    pub output: PathBuf,
    pub error_log: PathBuf,
    /// Built-in scheme name ("xiaohe", "ziranma") or "custom".
    pub scheme: String,
    /// Scheme definition file, required when `scheme = "custom"`.
    pub scheme_file: Option<PathBuf>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            shape_table: PathBuf::from("output.txt"),
            pinyin_db: PathBuf::from("zdic.txt"),
            output: PathBuf::from("xhe_final_yinxing.txt"),
            error_log: PathBuf::from("xhe_generate_error.log"),
            scheme: "xiaohe".to_string(),
            scheme_file: None,
        }
    }
}

/// Run configuration for both generator stages.
///
/// Every field has a default, so a TOML file only needs to name the values
/// it changes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub generate: GenerateConfig,
    pub merge: MergeConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = io::read_text(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        io::write_text(path, &content)
    }

    /// Load configuration from TOML string and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if let Some(rule) = self
            .generate
            .substitutions
            .iter()
            .find(|r| r.pattern.is_empty())
        {
            return Err(Error::InvalidConfig(format!(
                "substitution with empty pattern (replacement {:?})",
                rule.replacement
            )));
        }
        if self.merge.scheme.eq_ignore_ascii_case("custom") && self.merge.scheme_file.is_none() {
            return Err(Error::InvalidConfig(
                "scheme = \"custom\" requires scheme_file".to_string(),
            ));
        }
        Ok(())
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_builtin_substitutions() {
        let cfg = Config::default();
        assert_eq!(cfg.generate.substitutions.len(), 3);
        assert_eq!(cfg.generate.substitutions[0].pattern, "甘一");
        assert_eq!(cfg.merge.scheme, "xiaohe");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [merge]
            scheme = "ziranma"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.merge.scheme, "ziranma");
        assert_eq!(cfg.merge.pinyin_db, PathBuf::from("zdic.txt"));
        assert_eq!(cfg.generate.roots, PathBuf::from("parts.txt"));
    }

    #[test]
    fn empty_substitution_pattern_is_rejected() {
        let err = Config::from_toml_str(
            r#"
            [[generate.substitutions]]
            pattern = ""
            replacement = "口"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn custom_scheme_requires_file() {
        let err = Config::from_toml_str("[merge]\nscheme = \"custom\"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn normalize_composes_combining_marks() {
        assert_eq!(utils::normalize(" pi\u{0304}n "), "pīn");
    }
}

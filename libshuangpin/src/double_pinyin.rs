//! Double Pinyin (Shuangpin 双拼) transliteration
//!
//! Double pinyin writes every syllable with exactly 2 keys: the first key
//! stands for the initial consonant (shengmu 声母), the second for the final
//! (yunmu 韵母). Syllables with no initial use the first letter of the final
//! as their first key.
//!
//! ## Supported Schemes
//!
//! 1. **XiaoHe** (小鹤) - default. Key V types both `zh` and `ui`, as on the
//!    published XiaoHe layout; older generator tables listed only `ui`, which
//!    wrote zh- syllables with `z`.
//! 2. **ZiRanMa** (自然码)
//! 3. Custom schemes loaded from a file in the same text format
//!
//! ## Scheme text format
//!
//! One key per line, the key letter followed by the tokens it types:
//!
//! ```text
//! K ing, uai
//! L iang, uang
//! ```
//!
//! ## How a syllable is converted
//!
//! Example (XiaoHe scheme):
//! - "zhang" = "zh" + "ang" → "vh" (v=zh, h=ang)
//! - "ai" (no initial) → "ad" (a, d=ai)
//! - "a" (no initial, single letter) → "aa"

use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use yinxing_core::{io, Error, MergeConfig, Result};

/// Initials tried as syllable prefixes, longest first. `y` and `w` count as
/// initials; only syllables that start with a vowel have a zero initial.
pub const INITIALS: [&str; 23] = [
    "zh", "ch", "sh", "b", "p", "m", "f", "d", "t", "n", "l", "g", "k", "h", "j", "q", "x", "r",
    "z", "c", "s", "y", "w",
];

/// Double pinyin schemes shipped with the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoublePinyinScheme {
    /// XiaoHe (小鹤) - Little crane scheme
    XiaoHe,
    /// ZiRanMa (自然码) - Natural input method
    ZiRanMa,
}

impl DoublePinyinScheme {
    pub fn name(&self) -> &'static str {
        match self {
            DoublePinyinScheme::XiaoHe => "XiaoHe",
            DoublePinyinScheme::ZiRanMa => "ZiRanMa",
        }
    }

    /// Get the token → key table for this scheme.
    pub fn table(&self) -> &'static SchemeTable {
        match self {
            DoublePinyinScheme::XiaoHe => &XIAOHE,
            DoublePinyinScheme::ZiRanMa => &ZIRANMA,
        }
    }
}

impl FromStr for DoublePinyinScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xiaohe" | "xhe" => Ok(DoublePinyinScheme::XiaoHe),
            "ziranma" | "zrm" => Ok(DoublePinyinScheme::ZiRanMa),
            _ => Err(Error::UnknownScheme(s.to_string())),
        }
    }
}

/// XiaoHe (小鹤) scheme
const XIAOHE_KEYS: &str = "
Q iu
W ei
R uan
T ue, ve
Y un
U sh
I ch
V zh, ui
O uo
P ie
S iong, ong
D ai
F en
G eng
H ang
J an
K ing, uai
L iang, uang
Z ou
X ia, ua
C ao
B in
N iao
M ian
";

/// ZiRanMa (自然码) scheme
const ZIRANMA_KEYS: &str = "
Q iu
W ia, ua
R uan
T ue, ve
Y ing, uai
U sh
I ch
V zh, ui
O uo
P un
S iong, ong
D iang, uang
F en
G eng
H ang
J an
K ao
L ai
Z ei
X ie
C iao
B ou
N in
M ian
";

static XIAOHE: Lazy<SchemeTable> = Lazy::new(|| builtin("XiaoHe", XIAOHE_KEYS));
static ZIRANMA: Lazy<SchemeTable> = Lazy::new(|| builtin("ZiRanMa", ZIRANMA_KEYS));

fn builtin(name: &str, keys: &str) -> SchemeTable {
    SchemeTable::parse(name, keys).unwrap_or_else(|e| panic!("built-in scheme {name}: {e}"))
}

/// A syllable that cannot be written with two keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot map pinyin {pinyin:?} to double pinyin (initial {initial:?}, final {final_part:?})")]
pub struct TransliterationError {
    pub pinyin: String,
    pub initial: String,
    pub final_part: String,
}

/// Split a normalized syllable into (initial, final).
///
/// The first initial in `INITIALS` that prefixes the syllable wins; with no
/// match the initial is empty and the whole syllable is the final.
pub fn split_initial_final(pinyin: &str) -> (&str, &str) {
    INITIALS
        .iter()
        .find(|init| pinyin.starts_with(**init))
        .map(|init| pinyin.split_at(init.len()))
        .unwrap_or(("", pinyin))
}

/// Token → key letter mapping for one scheme.
#[derive(Debug, Clone)]
pub struct SchemeTable {
    name: String,
    map: AHashMap<String, char>,
    /// Keys ordered for suffix matching: longest first, then lexicographic.
    suffix_order: Vec<String>,
}

impl SchemeTable {
    /// Build from `(key letter, tokens)` records. Letters and tokens are
    /// lowercased; a token listed twice keeps its last key.
    pub fn from_records<I, T, S>(name: &str, records: I) -> Self
    where
        I: IntoIterator<Item = (char, T)>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = AHashMap::new();
        for (letter, tokens) in records {
            let letter = letter.to_ascii_lowercase();
            for token in tokens {
                let token = token.as_ref().trim().to_lowercase();
                if !token.is_empty() {
                    map.insert(token, letter);
                }
            }
        }
        let mut suffix_order: Vec<String> = map.keys().cloned().collect();
        suffix_order.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self {
            name: name.to_string(),
            map,
            suffix_order,
        }
    }

    /// Parse the scheme text format (`LETTER token, token`).
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (ln, line) in io::numbered_lines(text) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, tokens) = line
                .split_once(char::is_whitespace)
                .ok_or_else(|| Error::parse(name, ln, "expected a key letter followed by tokens"))?;
            let mut key_chars = key.chars();
            let letter = match (key_chars.next(), key_chars.next()) {
                (Some(c), None) => c,
                _ => return Err(Error::parse(name, ln, format!("key {key:?} is not a single letter"))),
            };
            let tokens: Vec<&str> = tokens.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
            if tokens.is_empty() {
                return Err(Error::parse(name, ln, format!("key {letter} has no tokens")));
            }
            records.push((letter, tokens));
        }
        let table = Self::from_records(name, records);
        debug!(scheme = name, tokens = table.len(), "parsed double pinyin scheme");
        Ok(table)
    }

    /// Load a custom scheme from a file; the file stem names the scheme.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom")
            .to_string();
        Self::parse(&name, &io::read_text(path)?)
    }

    /// Resolve the scheme selected by a merge configuration.
    pub fn from_config(config: &MergeConfig) -> Result<Self> {
        if config.scheme.eq_ignore_ascii_case("custom") {
            let path = config.scheme_file.as_ref().ok_or_else(|| {
                Error::InvalidConfig("scheme = \"custom\" requires scheme_file".to_string())
            })?;
            return Self::load(path);
        }
        let scheme: DoublePinyinScheme = config.scheme.parse()?;
        Ok(scheme.table().clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Exact token lookup.
    pub fn get(&self, token: &str) -> Option<char> {
        self.map.get(token).copied()
    }

    /// Key of a final: exact match, else the longest scheme token that the
    /// final ends with.
    pub fn lookup_final(&self, final_part: &str) -> Option<char> {
        self.get(final_part).or_else(|| {
            self.suffix_order
                .iter()
                .find(|k| final_part.ends_with(k.as_str()))
                .and_then(|k| self.get(k))
        })
    }

    /// Convert a normalized syllable into its two keys.
    pub fn to_double(&self, pinyin: &str) -> std::result::Result<(char, char), TransliterationError> {
        let lowered = pinyin.trim().to_lowercase();
        let (initial, final_part) = split_initial_final(&lowered);
        let fail = || TransliterationError {
            pinyin: pinyin.to_string(),
            initial: initial.to_string(),
            final_part: final_part.to_string(),
        };

        if initial.is_empty() {
            let mut chars = final_part.chars();
            let first = chars.next().ok_or_else(fail)?;
            if chars.next().is_none() {
                return Ok((first, first));
            }
            let second = self.lookup_final(final_part).unwrap_or(first);
            return Ok((first, second));
        }

        let first = self
            .get(initial)
            .or_else(|| initial.chars().next())
            .ok_or_else(fail)?;
        let second = self
            .lookup_final(final_part)
            .or_else(|| final_part.chars().next())
            .ok_or_else(fail)?;
        Ok((first, second))
    }
}

//! Pinyin syllable normalization.
//!
//! Readings in the pinyin database carry tone marks (`pīn`), sometimes tone
//! numbers (`nv3`), and spell ü in several ways. Everything downstream works
//! on bare lowercase syllables with ü written as `v`.

use phf::phf_map;

/// Toned (and umlauted) letters → base letter.
static TONE_MAP: phf::Map<char, char> = phf_map! {
    'ā' => 'a', 'á' => 'a', 'ǎ' => 'a', 'à' => 'a',
    'ē' => 'e', 'é' => 'e', 'ě' => 'e', 'è' => 'e',
    'ī' => 'i', 'í' => 'i', 'ǐ' => 'i', 'ì' => 'i',
    'ō' => 'o', 'ó' => 'o', 'ǒ' => 'o', 'ò' => 'o',
    'ū' => 'u', 'ú' => 'u', 'ǔ' => 'u', 'ù' => 'u',
    'ǖ' => 'v', 'ǘ' => 'v', 'ǚ' => 'v', 'ǜ' => 'v',
    'ü' => 'v',
    'ń' => 'n', 'ň' => 'n', 'ǹ' => 'n',
    'ḿ' => 'm',
};

/// Normalize one raw syllable: NFC-compose, lowercase, drop tone marks,
/// write ü as `v`, and strip a trailing tone number. Combining marks left
/// over after composition (e.g. the macron of `m̄`) are dropped.
///
/// Characters outside the tone map pass through unchanged, so this never
/// fails.
///
/// ```
/// use libshuangpin::normalize::normalize_syllable;
///
/// assert_eq!(normalize_syllable("pīn"), "pin");
/// assert_eq!(normalize_syllable("nǚ"), "nv");
/// assert_eq!(normalize_syllable("nv3"), "nv");
/// ```
pub fn normalize_syllable(raw: &str) -> String {
    let composed = yinxing_core::utils::normalize(raw);
    let mapped: String = composed
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| TONE_MAP.get(&c).copied().unwrap_or(c))
        .filter(|c| !is_combining_mark(*c))
        .collect();
    mapped
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .to_string()
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

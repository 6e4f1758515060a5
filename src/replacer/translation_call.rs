use once_cell::sync::Lazy;
use regex::Regex;

// @module: Recognition of already-translated text

// @const: A t('.key') / _t("key") call shape
static CALL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b_?t\(\s*['"](\.?)([^'"]*)['"]\s*\)"#).unwrap());

/// A recognized call to the translation lookup function.
///
/// Parsed once per fragment instead of re-matching a magic call-shape pattern
/// at every call site; the key comes back with the call wrapper, quoting, and
/// any leading relative-key dot already stripped, and nothing else changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationCall {
    /// The key inside the call, without the leading `.`
    pub key: String,
}

impl TranslationCall {
    /// Recognize a translation call anywhere in the fragment.
    pub fn parse(fragment: &str) -> Option<Self> {
        CALL_REGEX.captures(fragment).map(|captures| TranslationCall {
            key: captures[2].to_string(),
        })
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::line::LineCategory;
use crate::replacer::interpolation;
use crate::replacer::translation_call::TranslationCall;
use crate::replacer::{
    attribute_skip, LineMetadata, ReplacerConfig, TextPlace, TAG_ATTRIBUTES_REGEX,
    TAG_CLASSES_AND_ID_REGEX, TAG_REGEX,
};
use crate::scanner::Scanner;

// @module: Line classification and candidate-text location

// @const: Implicit-div selector at the start of a line, e.g. .card or #main
static LEADING_SELECTOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[.#]\w").unwrap());

// @const: A double-quoted string literal spanning the whole expression
static DOUBLE_QUOTED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"[^"]*"$"#).unwrap());

// @const: A single-quoted string literal spanning the whole expression
static SINGLE_QUOTED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^'[^']*'$").unwrap());

/// What the classifier found on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundText {
    /// The line's category
    pub category: LineCategory,
    /// The candidate text eligible for translation, when any
    pub candidate: Option<String>,
    /// Structural facts the replacer needs alongside the category
    pub metadata: LineMetadata,
}

impl FoundText {
    fn bare(category: LineCategory) -> Self {
        FoundText {
            category,
            candidate: None,
            metadata: LineMetadata::default(),
        }
    }
}

/// Classifies a single (indentation-stripped) line and locates the candidate
/// substring the replacer should work on.
pub struct TextFinder<'a> {
    content: &'a str,
    config: &'a ReplacerConfig,
}

impl<'a> TextFinder<'a> {
    pub fn new(content: &'a str, config: &'a ReplacerConfig) -> Self {
        TextFinder { content, config }
    }

    /// Classify the line and locate its candidate text.
    pub fn process(&self) -> FoundText {
        let content = self.content;
        if content.trim().is_empty() {
            return FoundText::bare(LineCategory::NotText);
        }
        if content.starts_with("!!!")
            || content.starts_with("-#")
            || content.starts_with('/')
            || content.starts_with(':')
        {
            return FoundText::bare(LineCategory::NotText);
        }
        if content.starts_with('%') || LEADING_SELECTOR_REGEX.is_match(content) {
            return self.element();
        }
        if content.starts_with('=') || content.starts_with('~') {
            let expression = content[1..].trim();
            return FoundText {
                category: LineCategory::ScriptLoud,
                candidate: script_candidate(expression),
                metadata: LineMetadata::default(),
            };
        }
        if content.starts_with('-') {
            return FoundText::bare(LineCategory::ScriptSilent);
        }
        FoundText {
            category: LineCategory::PlainText,
            candidate: Some(content.to_string()),
            metadata: LineMetadata::default(),
        }
    }

    /// Tag-element lines: skip the tag syntax, then read either the content
    /// or the configured attribute's value.
    fn element(&self) -> FoundText {
        let mut scanner = Scanner::new(self.content);
        scanner.skip(&TAG_REGEX);
        scanner.skip(&TAG_CLASSES_AND_ID_REGEX);

        if self.config.place == TextPlace::Attribute {
            let candidate = self
                .config
                .attribute_name
                .as_deref()
                .and_then(|attribute| attribute_skip(scanner.rest(), attribute)
                    .map(|consumed| &scanner.rest()[consumed..]))
                .and_then(quoted_value);
            return FoundText {
                category: LineCategory::TagElement,
                candidate,
                metadata: LineMetadata::default(),
            };
        }

        scanner.skip(&TAG_ATTRIBUTES_REGEX);
        let rest = scanner.rest();
        if let Some(expression) = rest.strip_prefix('=') {
            return FoundText {
                category: LineCategory::TagElement,
                candidate: script_candidate(expression.trim()),
                metadata: LineMetadata { tag_has_code: true },
            };
        }
        let text = rest.trim();
        FoundText {
            category: LineCategory::TagElement,
            candidate: (!text.is_empty()).then(|| text.to_string()),
            metadata: LineMetadata::default(),
        }
    }
}

/// Candidate rules for script expressions (loud lines and `%tag= expr`):
/// an existing translation call flows through so the replacer can decide to
/// skip or re-qualify it; a string literal is translatable; anything else is
/// code, not copy.
fn script_candidate(expression: &str) -> Option<String> {
    if expression.is_empty() {
        return None;
    }
    if TranslationCall::parse(expression).is_some() {
        return Some(expression.to_string());
    }
    if DOUBLE_QUOTED_REGEX.is_match(expression) {
        if interpolation::is_interpolated(expression) {
            // the replacer strips this residual quote pair itself
            return Some(expression.to_string());
        }
        return Some(expression[1..expression.len() - 1].to_string());
    }
    if SINGLE_QUOTED_REGEX.is_match(expression) {
        return Some(expression[1..expression.len() - 1].to_string());
    }
    None
}

/// The leading quoted string of an attribute value, without its quotes.
fn quoted_value(region: &str) -> Option<String> {
    let trimmed = region.trim_start();
    let quote = trimmed.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &trimmed[1..];
    let end = inner.find(quote)?;
    Some(inner[..end].to_string())
}

use once_cell::sync::Lazy;
use regex::Regex;

// @module: Structural pass/fail oracle for template syntax

// @const: A % immediately followed by something that is not a tag name
static MALFORMED_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^%($|[^\w])").unwrap());

/// Pass/fail syntax oracle consulted before and after a document rewrite.
///
/// The real grammar belongs to an external template parser; implementations
/// here only need to answer "still structurally plausible?". The shipped
/// checker is deliberately lenient so it never rejects templates the
/// rewriter did not break.
pub trait TemplateValidator {
    /// Ok when the document passes; Err carries a human-readable reason.
    fn validate(&self, body: &str) -> Result<(), String>;
}

/// Line-level structural checks: tag-name shape, attribute-brace balance,
/// and unmixed indentation.
#[derive(Debug, Default)]
pub struct StructuralChecker;

impl TemplateValidator for StructuralChecker {
    fn validate(&self, body: &str) -> Result<(), String> {
        let mut open_braces: i64 = 0;
        for (index, raw) in body.lines().enumerate() {
            let content = raw.trim_start();
            let indent = &raw[..raw.len() - content.len()];
            if indent.contains(' ') && indent.contains('\t') {
                return Err(format!("line {}: mixed tab/space indentation", index + 1));
            }
            if MALFORMED_TAG_REGEX.is_match(content) {
                return Err(format!("line {}: % without a tag name", index + 1));
            }
            // attribute blocks may span lines; balance is checked document-wide
            for c in content.chars() {
                match c {
                    '{' => open_braces += 1,
                    '}' => open_braces -= 1,
                    _ => {}
                }
            }
            if open_braces < 0 {
                return Err(format!("line {}: unbalanced closing brace", index + 1));
            }
        }
        if open_braces != 0 {
            return Err("unbalanced attribute braces at end of document".to_string());
        }
        Ok(())
    }
}

/*!
 * The text-replacement and key-synthesis engine.
 *
 * Given a classified line and the candidate substring located by the finder,
 * the replacer decides whether the candidate is translatable, synthesizes a
 * catalog key (parameterized when the text carries interpolation), splices a
 * `_t("...")` call into the exact span of the original text, and inserts the
 * evaluation marker where the line structurally needs one.
 *
 * The engine is pure text transformation: no I/O happens here, and the same
 * request always produces the same result.
 */

pub mod interpolation;
pub mod translation_call;

use std::path::{Path, PathBuf};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ExtractorError;
use crate::line::LineCategory;
use crate::scanner::Scanner;
use translation_call::TranslationCall;

// @const: Tag name token, e.g. %p
pub(crate) static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"%\w+").unwrap());

// @const: Run of class/id selector tokens, e.g. .title#main
pub(crate) static TAG_CLASSES_AND_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[.#]\w+)*").unwrap());

// @const: Optional bracketed attribute block, e.g. {class: 'x'}
pub(crate) static TAG_ATTRIBUTES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\{[^}]+\})?").unwrap());

// @const: A candidate that is nothing but one interpolation marker
static BARE_EXPRESSION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#\{[^}]+\}$").unwrap());

// @const: A script line already led by an output marker, = or the
// whitespace-preserving ~
static SCRIPT_EVAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[=~]").unwrap());

/// Where in a tag line the candidate text lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPlace {
    /// The tag's content, after name, selectors and attribute block
    #[default]
    Content,
    /// The value of a named attribute inside the attribute block
    Attribute,
}

/// Per-invocation configuration for the replacer.
#[derive(Debug, Clone, Default)]
pub struct ReplacerConfig {
    /// Where the candidate text lives in a tag line
    pub place: TextPlace,
    /// Attribute to target; required when `place` is `Attribute`
    pub attribute_name: Option<String>,
    /// Qualify keys with a namespace derived from the source path
    pub add_filename_prefix: bool,
    /// Path prefix stripped before deriving the namespace
    pub base_path: Option<String>,
}

/// Classifier-supplied facts about the line the candidate came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineMetadata {
    /// The tag carries an embedded-code attribute (`%p= expr`)
    pub tag_has_code: bool,
}

/// The outcome of one replacement attempt; the unit the catalog accumulates.
#[derive(Debug, Clone, Serialize)]
pub struct ReplacementResult {
    /// The rewritten line, or None when nothing was replaced
    pub modified_line: Option<String>,
    /// The synthesized catalog key, or None when nothing was replaced
    pub key_name: Option<String>,
    /// The candidate text, quote-normalized when it was spliced
    pub replaced_text: String,
    /// Whether a replacement actually happened
    pub success: bool,
    /// The source template path
    pub path: PathBuf,
}

impl ReplacementResult {
    fn unchanged(replaced_text: &str, path: &Path) -> Self {
        ReplacementResult {
            modified_line: None,
            key_name: None,
            replaced_text: replaced_text.to_string(),
            success: false,
            path: path.to_path_buf(),
        }
    }
}

/// The core engine: one instance per (line, candidate) pair.
pub struct TextReplacer<'a> {
    full_line: &'a str,
    candidate: &'a str,
    category: LineCategory,
    path: &'a Path,
    metadata: LineMetadata,
    config: &'a ReplacerConfig,
}

impl<'a> TextReplacer<'a> {
    pub fn new(
        full_line: &'a str,
        candidate: &'a str,
        category: LineCategory,
        path: &'a Path,
        metadata: LineMetadata,
        config: &'a ReplacerConfig,
    ) -> Self {
        TextReplacer {
            full_line,
            candidate,
            category,
            path,
            metadata,
            config,
        }
    }

    /// Run the full replacement pipeline for this line.
    ///
    /// Already-translated lines and bare-expression candidates come back with
    /// `success = false` and no rewritten line; structural failures are loud.
    pub fn replace(&self) -> Result<ReplacementResult, ExtractorError> {
        // Re-running on our own output is a no-op, except when a filename
        // prefix is requested and the existing key must be re-qualified.
        if TranslationCall::parse(self.full_line).is_some() && !self.config.add_filename_prefix {
            debug!("already translated, leaving untouched: {}", self.full_line);
            return Ok(ReplacementResult::unchanged(self.candidate, self.path));
        }

        if self.is_bare_expression() {
            debug!("bare expression, nothing to translate: {}", self.candidate);
            return Ok(ReplacementResult::unchanged(self.candidate, self.path));
        }

        let spliced_text = self.normalized_candidate();
        let key = self.synthesize_key(spliced_text);
        let call = translate_call(&key);
        let mut line = self.splice(spliced_text, &call)?;
        self.apply_eval_marker(&mut line, &call);

        Ok(ReplacementResult {
            modified_line: Some(line),
            key_name: Some(key),
            replaced_text: spliced_text.to_string(),
            success: true,
            path: self.path.to_path_buf(),
        })
    }

    /// A candidate that is exactly one interpolation marker carries no
    /// literal text; translating it would wrap code, not copy.
    fn is_bare_expression(&self) -> bool {
        let expression = if self.category.is_script() || self.metadata.tag_has_code {
            strip_outer_quotes(self.candidate)
        } else {
            self.candidate
        };
        BARE_EXPRESSION_REGEX.is_match(expression.trim())
    }

    /// Interpolation extraction leaves a residual pair of double quotes
    /// around the candidate; strip exactly that one outer pair.
    fn normalized_candidate(&self) -> &'a str {
        if interpolation::is_interpolated(self.full_line) {
            strip_outer_double_quotes(self.candidate)
        } else {
            self.candidate
        }
    }

    /// Produce the catalog key for this candidate.
    fn synthesize_key(&self, spliced_text: &str) -> String {
        let name = if let Some(call) = TranslationCall::parse(self.candidate) {
            call.key
        } else if interpolation::is_interpolated(self.full_line) {
            interpolation::parameterize(spliced_text)
        } else {
            spliced_text.to_string()
        };

        if self.config.add_filename_prefix {
            self.qualified_key(&name)
        } else {
            name
        }
    }

    /// Rewrite the key as `<dotted.path>.<key>`, deriving the dotted path
    /// from the source path with the base path and template extensions
    /// removed, and the partial-marker underscore stripped from the filename.
    fn qualified_key(&self, name: &str) -> String {
        let path = self.path.to_string_lossy();
        let base = self.config.base_path.as_deref().unwrap_or("");
        let without_base = if base.is_empty() {
            path.to_string()
        } else {
            path.replace(base, "")
        };

        let filename = Path::new(without_base.as_str())
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        let directory = &without_base[..without_base.len() - filename.len()];
        let filename = filename.strip_prefix('_').unwrap_or(&filename);

        let mut qualified = format!("{}{}", directory, filename);
        for extension in [".html.haml", ".haml"] {
            if let Some(stripped) = qualified.strip_suffix(extension) {
                qualified = stripped.to_string();
                break;
            }
        }
        let dotted = qualified.replace('/', ".");
        format!("{}.{}", dotted, name.strip_prefix('_').unwrap_or(name))
    }

    /// Replace the candidate's span with the call expression, skipping past
    /// tag syntax first so tag names, selectors and attribute maps can never
    /// shadow the candidate text.
    fn splice(&self, text: &str, call: &str) -> Result<String, ExtractorError> {
        let mut scanner = Scanner::new(self.full_line);
        let mut region_start = 0;
        if self.category.is_tag_like() {
            scanner.skip(&TAG_REGEX);
            scanner.skip(&TAG_CLASSES_AND_ID_REGEX);
            region_start = scanner.pos();
            match self.config.place {
                TextPlace::Content => {
                    scanner.skip(&TAG_ATTRIBUTES_REGEX);
                    region_start = scanner.pos();
                }
                TextPlace::Attribute => {
                    let attribute = self.config.attribute_name.as_deref().unwrap_or("");
                    let consumed = attribute_skip(scanner.rest(), attribute)
                        .ok_or_else(|| self.match_failure(text))?;
                    region_start += consumed;
                }
            }
        }

        let region = &self.full_line[region_start..];
        let (offset, length) =
            find_occurrence(region, text).ok_or_else(|| self.match_failure(text))?;
        let start = region_start + offset;
        let end = start + length;

        if self.full_line[end..].contains(text) {
            debug!(
                "candidate {:?} occurs again after the first match; only the first is replaced",
                text
            );
        }

        Ok(format!(
            "{}{}{}",
            &self.full_line[..start],
            call,
            &self.full_line[end..]
        ))
    }

    fn match_failure(&self, text: &str) -> ExtractorError {
        ExtractorError::StructuralMatchFailure {
            line: self.full_line.to_string(),
            candidate: text.to_string(),
        }
    }

    /// Insert the `=` evaluation marker where the category requires one.
    fn apply_eval_marker(&self, line: &mut String, call: &str) {
        if !self.category.allows_eval_marker() {
            return;
        }
        match self.category {
            LineCategory::TagElement => {
                let snapshot = line.clone();
                let mut scanner = Scanner::new(&snapshot);
                scanner.skip(&TAG_REGEX);
                scanner.skip(&TAG_CLASSES_AND_ID_REGEX);
                scanner.skip(&TAG_ATTRIBUTES_REGEX);
                if let Some(offset) = scanner.rest().find(call) {
                    // the marker goes directly before the evaluated segment,
                    // pulling any run of blanks in with it
                    let call_start = scanner.pos() + offset;
                    let prefix_end = snapshot[..call_start].trim_end_matches([' ', '\t']).len();
                    let prefix = &snapshot[..prefix_end];
                    if !self.already_evaled(prefix) {
                        *line = format!("{}={}", prefix, &snapshot[prefix_end..]);
                    }
                }
            }
            LineCategory::PlainText => {
                *line = format!("= {}", line);
            }
            LineCategory::ScriptLoud => {
                if !SCRIPT_EVAL_REGEX.is_match(line) {
                    *line = format!("= {}", line);
                }
            }
            _ => {}
        }
    }

    /// Whether the segment before the call is already in an evaluated
    /// context. Interpolated tags can carry an inline marker the classifier
    /// cannot see, so the character check trumps the metadata there.
    fn already_evaled(&self, prefix: &str) -> bool {
        if interpolation::is_interpolated(self.full_line) {
            prefix.ends_with('=')
        } else {
            self.metadata.tag_has_code
        }
    }
}

/// Wrap a key in the translation lookup call. Double quotes, so keys with
/// apostrophes survive.
pub fn translate_call(key: &str) -> String {
    format!("_t(\"{}\")", key)
}

/// Strip one enclosing pair of double quotes spanning the whole text.
fn strip_outer_double_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Strip one enclosing pair of matching quotes of either kind.
fn strip_outer_quotes(text: &str) -> &str {
    if text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')))
    {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Find the earliest occurrence of the candidate in the region, optionally
/// wrapped in one pair of quotes. A quoted occurrence subsumes the bare one
/// starting inside it, so the quotes are consumed together with the text.
fn find_occurrence(region: &str, text: &str) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for quote in ['"', '\''] {
        let wrapped = format!("{}{}{}", quote, text, quote);
        if let Some(start) = region.find(&wrapped) {
            if best.is_none_or(|(s, _)| start < s) {
                best = Some((start, wrapped.len()));
            }
        }
    }
    if let Some(start) = region.find(text) {
        if best.is_none_or(|(s, _)| start < s) {
            best = Some((start, text.len()));
        }
    }
    best
}

/// Locate the configured attribute name in the region, in either supported
/// attribute syntax, and return how many bytes to consume to land just past
/// it. `None` when the attribute is not present where expected.
pub(crate) fn attribute_skip(region: &str, attribute: &str) -> Option<usize> {
    if attribute.is_empty() {
        return None;
    }
    let mut matches: Vec<(usize, usize)> = Vec::new();

    // new-style hash: `name:` with a word boundary before the name
    let labeled = format!("{}:", attribute);
    let mut from = 0;
    while let Some(found) = region[from..].find(&labeled) {
        let start = from + found;
        let bounded = region[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_');
        if bounded {
            matches.push((start, start + labeled.len()));
            break;
        }
        from = start + 1;
    }

    // hash-rocket style: `:name => `, trailing blanks consumed too
    let symbol = format!(":{}", attribute);
    let mut from = 0;
    while let Some(found) = region[from..].find(&symbol) {
        let start = from + found;
        let after = &region[start + symbol.len()..];
        let blanks = after.len() - after.trim_start().len();
        if after.trim_start().starts_with("=>") {
            let arrow_end = start + symbol.len() + blanks + 2;
            let tail = &region[arrow_end..];
            let tail_blanks = tail.len() - tail.trim_start().len();
            matches.push((start, arrow_end + tail_blanks));
            break;
        }
        from = start + 1;
    }

    matches.into_iter().min_by_key(|(start, _)| *start).map(|(_, end)| end)
}

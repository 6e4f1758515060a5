use std::fmt;
use serde::{Deserialize, Serialize};

// @module: Line model and the closed set of line categories

/// The closed set of line categories a classified template line can carry.
///
/// The category decides two things downstream: whether the evaluation marker
/// (`=`) may be inserted, and whether the structural splicer must skip past
/// tag syntax before searching for the candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCategory {
    /// A `=`-led script line whose result is rendered into the page
    ScriptLoud,
    /// A `-`-led script line evaluated for side effects only
    ScriptSilent,
    /// Plain content with no leading template syntax
    PlainText,
    /// A `%tag` (or implicit-div `.class` / `#id`) element line
    TagElement,
    /// Comments, filters, doctype and other non-text lines
    NotText,
}

impl LineCategory {
    /// Categories eligible for evaluation-marker insertion.
    pub fn allows_eval_marker(&self) -> bool {
        matches!(self, Self::PlainText | Self::TagElement | Self::ScriptLoud)
    }

    /// Categories whose lines carry tag syntax the splicer must skip past.
    pub fn is_tag_like(&self) -> bool {
        matches!(self, Self::TagElement)
    }

    /// Script categories, loud or silent.
    pub fn is_script(&self) -> bool {
        matches!(self, Self::ScriptLoud | Self::ScriptSilent)
    }
}

impl fmt::Display for LineCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ScriptLoud => "script_loud",
            Self::ScriptSilent => "script_silent",
            Self::PlainText => "plain_text",
            Self::TagElement => "tag_element",
            Self::NotText => "not_text",
        };
        write!(f, "{}", name)
    }
}

/// A single template line: raw content with its indentation split off.
///
/// The indentation prefix is preserved verbatim and reattached after
/// processing; the core engine only ever sees the trimmed content.
#[derive(Debug, Clone)]
pub struct Line {
    /// Zero-based position in the document
    pub number: usize,
    /// Leading whitespace, exactly as it appeared
    pub indent: String,
    /// Line content with the indentation removed
    pub content: String,
}

impl Line {
    /// Split a raw line into its indentation prefix and content.
    pub fn new(number: usize, raw: &str) -> Self {
        let trimmed_end = raw.trim_end_matches(['\r', '\n']);
        let (indent, content) = split_indent(trimmed_end);
        Line {
            number,
            indent: indent.to_string(),
            content: content.to_string(),
        }
    }

    /// Reassemble the line with a (possibly rewritten) content part.
    pub fn render(&self, content: &str) -> String {
        format!("{}{}", self.indent, content)
    }
}

/// Split leading spaces/tabs from the rest of the line.
pub fn split_indent(raw: &str) -> (&str, &str) {
    let boundary = raw
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw.split_at(boundary)
}

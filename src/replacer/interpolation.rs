use once_cell::sync::Lazy;
use regex::Regex;

// @module: Interpolation extraction and placeholder naming

// @const: One #{...} interpolation marker
static INTERPOLATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\{[^}]*\}").unwrap());

/// Whether the text contains at least one `#{...}` marker.
pub fn is_interpolated(text: &str) -> bool {
    INTERPOLATION_REGEX.is_match(text)
}

/// The source code inside one `#{...}` marker.
pub fn inner_code(marker: &str) -> &str {
    marker
        .strip_prefix("#{")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(marker)
}

/// Collapse an interpolated expression into an identifier-safe placeholder.
///
/// Receiver/call syntax is folded into underscores, so `@job.id` becomes
/// `job_id` and `current_user.name` becomes `current_user_name`.
pub fn placeholder_name(code: &str) -> String {
    let trimmed = code.trim().trim_start_matches(['@', '$']);
    let mut name = String::with_capacity(trimmed.len());
    let mut last_was_separator = false;
    for c in trimmed.chars() {
        if c.is_alphanumeric() {
            name.extend(c.to_lowercase());
            last_was_separator = false;
        } else if !last_was_separator && !name.is_empty() {
            name.push('_');
            last_was_separator = true;
        }
    }
    while name.ends_with('_') {
        name.pop();
    }
    name
}

/// Rebuild the text with every `#{...}` marker replaced by a `{placeholder}`
/// token, producing a parameterized catalog key template.
///
/// One marker is consumed per iteration, so the loop terminates after as many
/// steps as there are markers; everything between markers is kept verbatim.
pub fn parameterize(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        match INTERPOLATION_REGEX.find(rest) {
            None => {
                output.push_str(rest);
                return output;
            }
            Some(marker) => {
                output.push_str(&rest[..marker.start()]);
                output.push('{');
                output.push_str(&placeholder_name(inner_code(marker.as_str())));
                output.push('}');
                rest = &rest[marker.end()..];
            }
        }
    }
}

/*!
 * Tests for the text-replacement and key-synthesis engine
 */

use std::path::Path;
use haml_i18n_extract::errors::ExtractorError;
use haml_i18n_extract::line::LineCategory;
use haml_i18n_extract::replacer::translation_call::TranslationCall;
use haml_i18n_extract::replacer::{
    LineMetadata, ReplacementResult, ReplacerConfig, TextPlace, TextReplacer,
};

const TEST_PATH: &str = "views/users/_profile.haml";

fn replace(
    line: &str,
    candidate: &str,
    category: LineCategory,
    metadata: LineMetadata,
    config: &ReplacerConfig,
) -> Result<ReplacementResult, ExtractorError> {
    TextReplacer::new(line, candidate, category, Path::new(TEST_PATH), metadata, config).replace()
}

fn default_replace(
    line: &str,
    candidate: &str,
    category: LineCategory,
) -> ReplacementResult {
    replace(line, candidate, category, LineMetadata::default(), &ReplacerConfig::default())
        .unwrap()
}

/// Tag content becomes a call with the marker inserted before it
#[test]
fn test_tag_content_withLiteralText_shouldWrapAndEval() {
    let result = default_replace("%p Hello World", "Hello World", LineCategory::TagElement);
    assert!(result.success);
    assert_eq!(result.modified_line.as_deref(), Some(r#"%p= _t("Hello World")"#));
    assert_eq!(result.key_name.as_deref(), Some("Hello World"));
}

/// Interpolated script strings get quote-stripped, parameterized keys
#[test]
fn test_script_withInterpolatedString_shouldParameterizeKey() {
    let line = r##"= "Job ##{@job.id}""##;
    let result = default_replace(line, r##""Job ##{@job.id}""##, LineCategory::ScriptLoud);
    assert!(result.success);
    assert_eq!(result.key_name.as_deref(), Some("Job #{job_id}"));
    // the marker was already present, no duplicate =
    assert_eq!(result.modified_line.as_deref(), Some(r##"= _t("Job #{job_id}")"##));
    assert_eq!(result.replaced_text, "Job ##{@job.id}");
}

/// One placeholder per marker, in left-to-right order
#[test]
fn test_interpolation_withTwoMarkers_shouldEmitTwoPlaceholders() {
    let line = r##"= "Job ##{@job.id} (#{@job.queue})""##;
    let result = default_replace(
        line,
        r##""Job ##{@job.id} (#{@job.queue})""##,
        LineCategory::ScriptLoud,
    );
    assert_eq!(result.key_name.as_deref(), Some("Job #{job_id} ({job_queue})"));
}

/// Already-translated lines pass through untouched
#[test]
fn test_replace_withTranslatedLine_shouldSkip() {
    let line = "%span= _t('.already_done')";
    let result = default_replace(line, "_t('.already_done')", LineCategory::TagElement);
    assert!(!result.success);
    assert!(result.modified_line.is_none());
    // the existing key is still recoverable from the line
    let call = TranslationCall::parse(line).unwrap();
    assert_eq!(call.key, "already_done");
}

/// The engine's own output is recognized as already translated
#[test]
fn test_replace_withOwnOutput_shouldBeIdempotent() {
    let first = default_replace("%p Hello World", "Hello World", LineCategory::TagElement);
    let rewritten = first.modified_line.unwrap();
    let result = replace(
        &rewritten,
        r#"_t("Hello World")"#,
        LineCategory::TagElement,
        LineMetadata { tag_has_code: true },
        &ReplacerConfig::default(),
    )
    .unwrap();
    assert!(!result.success);
    assert!(result.modified_line.is_none());
}

/// Round-trip key extraction leaves the key exactly as written
#[test]
fn test_translation_call_withRelativeKey_shouldExtractExactKey() {
    let call = TranslationCall::parse("= t('.foo_bar')").unwrap();
    assert_eq!(call.key, "foo_bar");
}

/// A candidate that is one bare interpolation marker is refused
#[test]
fn test_replace_withBareExpression_shouldRefuse() {
    let result = default_replace("%p #{foo}", "#{foo}", LineCategory::TagElement);
    assert!(!result.success);
    assert!(result.modified_line.is_none());
    assert!(result.key_name.is_none());

    // same for a quoted bare expression in a script line
    let result = default_replace(r##"= "#{foo}""##, r##""#{foo}""##, LineCategory::ScriptLoud);
    assert!(!result.success);
}

/// A whitespace-preserving script line keeps its single ~ marker
#[test]
fn test_script_withTildeMarker_shouldNotAddSecondMarker() {
    let result = default_replace(r#"~ "Hello""#, "Hello", LineCategory::ScriptLoud);
    assert!(result.success);
    assert_eq!(result.modified_line.as_deref(), Some(r#"~ _t("Hello")"#));
}

/// Plain text is always prefixed with the evaluation marker
#[test]
fn test_plain_text_shouldPrefixMarker() {
    let result = default_replace("Just plain text", "Just plain text", LineCategory::PlainText);
    assert_eq!(
        result.modified_line.as_deref(),
        Some(r#"= _t("Just plain text")"#)
    );
}

/// Keys get qualified with the dotted path when the prefix policy is on
#[test]
fn test_keys_withFilenamePrefix_shouldQualify() {
    let config = ReplacerConfig {
        add_filename_prefix: true,
        base_path: Some("views/".to_string()),
        ..ReplacerConfig::default()
    };
    let result = replace(
        "%p name",
        "name",
        LineCategory::TagElement,
        LineMetadata::default(),
        &config,
    )
    .unwrap();
    assert_eq!(result.key_name.as_deref(), Some("users.profile.name"));
}

/// With the prefix policy on, translated lines are reprocessed to requalify
#[test]
fn test_translatedLine_withFilenamePrefix_shouldRequalify() {
    let config = ReplacerConfig {
        add_filename_prefix: true,
        base_path: Some("views/".to_string()),
        ..ReplacerConfig::default()
    };
    let result = replace(
        "%span= _t('.already_done')",
        "_t('.already_done')",
        LineCategory::TagElement,
        LineMetadata { tag_has_code: true },
        &config,
    )
    .unwrap();
    assert!(result.success);
    assert_eq!(result.key_name.as_deref(), Some("users.profile.already_done"));
    assert_eq!(
        result.modified_line.as_deref(),
        Some(r#"%span= _t("users.profile.already_done")"#)
    );
}

/// Text colliding with tag syntax is only replaced in the content region
#[test]
fn test_splice_withCollidingAttributeValue_shouldReplaceContentOnly() {
    let result = default_replace("%p{class: 'Hello'} Hello", "Hello", LineCategory::TagElement);
    assert_eq!(
        result.modified_line.as_deref(),
        Some(r#"%p{class: 'Hello'}= _t("Hello")"#)
    );
}

/// Attribute place targets the configured attribute's value
#[test]
fn test_splice_withAttributePlace_shouldReplaceAttributeValue() {
    let config = ReplacerConfig {
        place: TextPlace::Attribute,
        attribute_name: Some("title".to_string()),
        ..ReplacerConfig::default()
    };
    let result = replace(
        "%a{title: 'Save changes'} Save",
        "Save changes",
        LineCategory::TagElement,
        LineMetadata::default(),
        &config,
    )
    .unwrap();
    assert_eq!(
        result.modified_line.as_deref(),
        Some(r#"%a{title: _t("Save changes")} Save"#)
    );
    // content is untouched, no marker belongs in the attribute block
    assert!(result.modified_line.unwrap().ends_with("} Save"));
}

/// A missing attribute is a loud failure, never a truncated line
#[test]
fn test_splice_withMissingAttribute_shouldFailLoudly() {
    let config = ReplacerConfig {
        place: TextPlace::Attribute,
        attribute_name: Some("title".to_string()),
        ..ReplacerConfig::default()
    };
    let error = replace(
        "%a{href: '/jobs'} Save",
        "Save changes",
        LineCategory::TagElement,
        LineMetadata::default(),
        &config,
    )
    .unwrap_err();
    assert!(matches!(error, ExtractorError::StructuralMatchFailure { .. }));
}

/// A candidate absent from the scanned region is a loud failure too
#[test]
fn test_splice_withAbsentCandidate_shouldFailLoudly() {
    let error = replace(
        "%p Hello",
        "Missing",
        LineCategory::TagElement,
        LineMetadata::default(),
        &ReplacerConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(error, ExtractorError::StructuralMatchFailure { .. }));
}

/// Only the first occurrence in the region is replaced
#[test]
fn test_splice_withRepeatedText_shouldReplaceFirstOnly() {
    let result = default_replace("%p foo foo", "foo", LineCategory::TagElement);
    assert_eq!(result.modified_line.as_deref(), Some(r#"%p= _t("foo") foo"#));
}

/// An interpolated tag already carrying the marker is left evaluated once
#[test]
fn test_marker_withInterpolatedEvaledTag_shouldNotDuplicate() {
    let result = replace(
        r##"%td= "#{@user.name} account""##,
        r##""#{@user.name} account""##,
        LineCategory::TagElement,
        LineMetadata { tag_has_code: true },
        &ReplacerConfig::default(),
    )
    .unwrap();
    assert_eq!(
        result.modified_line.as_deref(),
        Some(r#"%td= _t("{user_name} account")"#)
    );
}

/*!
 * Tests for document orchestration
 */

use haml_i18n_extract::document::WriteMode;
use haml_i18n_extract::errors::ExtractorError;
use haml_i18n_extract::extractor::{Extractor, ExtractorOptions};
use haml_i18n_extract::validation::TemplateValidator;

const SAMPLE: &str = "\
%h1 Dashboard
%p.lead Welcome back
= \"Job ##{@job.id}\"
- total = 5
/ layout comment
Just plain text
%span= _t('.already_done')
";

fn dry_run_options() -> ExtractorOptions {
    ExtractorOptions {
        write_mode: WriteMode::DryRun,
        ..ExtractorOptions::default()
    }
}

/// The whole document is rewritten line by line, code and comments untouched
#[test]
fn test_rewrite_withMixedDocument_shouldRewriteTextLines() {
    let mut extractor =
        Extractor::from_string("views/dashboard.haml", SAMPLE, dry_run_options()).unwrap();
    let body = extractor.rewrite().unwrap();
    let expected = "\
%h1= _t(\"Dashboard\")
%p.lead= _t(\"Welcome back\")
= _t(\"Job #{job_id}\")
- total = 5
/ layout comment
= _t(\"Just plain text\")
%span= _t('.already_done')
";
    assert_eq!(body, expected);
}

/// Indentation is preserved verbatim regardless of replacement outcome
#[test]
fn test_rewrite_withIndentedLines_shouldPreserveWhitespace() {
    let source = "%ul\n  %li First item\n\t%li Second item\n";
    let mut extractor =
        Extractor::from_string("views/list.haml", source, dry_run_options()).unwrap();
    let body = extractor.rewrite().unwrap();
    assert_eq!(
        body,
        "%ul\n  %li= _t(\"First item\")\n\t%li= _t(\"Second item\")\n"
    );
}

/// ~ script lines are rewritten in place without a stacked = marker
#[test]
fn test_rewrite_withTildeScriptLine_shouldKeepSingleMarker() {
    let mut extractor =
        Extractor::from_string("views/banner.haml", "~ \"Hello\"\n", dry_run_options()).unwrap();
    assert_eq!(extractor.rewrite().unwrap(), "~ _t(\"Hello\")\n");
}

/// Outcomes are keyed by document position; skipped lines keep a record too
#[test]
fn test_records_shouldBeKeyedByPosition() {
    let mut extractor =
        Extractor::from_string("views/dashboard.haml", SAMPLE, dry_run_options()).unwrap();
    extractor.rewrite().unwrap();

    let records = extractor.records();
    assert_eq!(records.len(), 5);
    assert!(records[&0].success);
    assert!(records[&2].success);
    // the already-translated span records a failure, not a rewrite
    assert!(!records[&6].success);
    // pure code and comment lines carry no record at all
    assert!(!records.contains_key(&3));
    assert!(!records.contains_key(&4));
}

/// The catalog collects successful replacements in document order
#[test]
fn test_catalog_shouldCollectSuccessfulKeys() {
    let mut extractor =
        Extractor::from_string("views/dashboard.haml", SAMPLE, dry_run_options()).unwrap();
    extractor.rewrite().unwrap();

    let catalog = extractor.catalog();
    assert_eq!(catalog.len(), 4);
    let value = catalog.to_value();
    assert_eq!(value["en"]["Dashboard"], "Dashboard");
    assert_eq!(value["en"]["Job #{job_id}"], "Job ##{@job.id}");
}

/// A malformed input document is rejected before any rewriting
#[test]
fn test_new_withInvalidInput_shouldFailFast() {
    let error = Extractor::from_string("views/broken.haml", "% broken\n", dry_run_options())
        .err()
        .unwrap();
    assert!(matches!(error, ExtractorError::InvalidSyntax { .. }));
}

struct RejectEverything;

impl TemplateValidator for RejectEverything {
    fn validate(&self, _body: &str) -> Result<(), String> {
        Err("rejected by test oracle".to_string())
    }
}

/// A rewrite the oracle rejects surfaces as a distinct fatal error
#[test]
fn test_run_withFailingOracle_shouldReportPostRewriteError() {
    let mut extractor =
        Extractor::from_string("views/dashboard.haml", SAMPLE, dry_run_options())
            .unwrap()
            .with_validator(Box::new(RejectEverything));
    let error = extractor.run().unwrap_err();
    assert!(matches!(
        error,
        ExtractorError::PostRewriteSyntaxInvalid { .. }
    ));
}

/// Documents without a trailing newline stay that way
#[test]
fn test_rewrite_withoutTrailingNewline_shouldNotAddOne() {
    let mut extractor =
        Extractor::from_string("views/min.haml", "%p Hi", dry_run_options()).unwrap();
    assert_eq!(extractor.rewrite().unwrap(), "%p= _t(\"Hi\")");
}

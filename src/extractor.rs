/*!
 * Per-document and per-directory orchestration.
 *
 * The extractor owns one document pass: validate the input, classify and
 * rewrite line by line, validate the output, and only then hand the body to
 * the writer and the successful replacements to the catalog. A structurally
 * invalid rewrite aborts before anything touches disk.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use log::{debug, info};

use crate::catalog::LocaleCatalog;
use crate::document::{HamlReader, HamlWriter, WriteMode};
use crate::errors::ExtractorError;
use crate::file_utils::FileManager;
use crate::finder::TextFinder;
use crate::line::Line;
use crate::replacer::{ReplacementResult, ReplacerConfig, TextReplacer};
use crate::validation::{StructuralChecker, TemplateValidator};

/// Options for one extraction run.
#[derive(Debug, Clone, Default)]
pub struct ExtractorOptions {
    /// Replacer configuration shared by every line
    pub replacer: ReplacerConfig,
    /// Locale root for the catalog (empty means "en")
    pub locale: String,
    /// Where the rewritten document goes
    pub write_mode: WriteMode,
}

impl ExtractorOptions {
    fn locale(&self) -> &str {
        if self.locale.is_empty() {
            "en"
        } else {
            &self.locale
        }
    }
}

/// What one document pass did.
#[derive(Debug)]
pub struct RunSummary {
    /// The source template
    pub path: PathBuf,
    /// Total lines seen
    pub lines_seen: usize,
    /// Lines actually rewritten
    pub lines_replaced: usize,
    /// Where the rewritten body landed, None for a dry run
    pub output_path: Option<PathBuf>,
}

/// Orchestrates one document pass.
pub struct Extractor {
    reader: HamlReader,
    writer: HamlWriter,
    options: ExtractorOptions,
    validator: Box<dyn TemplateValidator>,
    body: Vec<String>,
    records: BTreeMap<usize, ReplacementResult>,
}

impl Extractor {
    /// Open a template and validate its syntax before any rewriting.
    pub fn new<P: AsRef<Path>>(path: P, options: ExtractorOptions) -> Result<Self, ExtractorError> {
        let reader = HamlReader::open(path)?;
        Self::with_reader(reader, options)
    }

    /// Build an extractor over an in-memory document.
    pub fn from_string<P: AsRef<Path>>(
        path: P,
        body: &str,
        options: ExtractorOptions,
    ) -> Result<Self, ExtractorError> {
        let reader = HamlReader::from_string(path, body.to_string());
        Self::with_reader(reader, options)
    }

    fn with_reader(reader: HamlReader, options: ExtractorOptions) -> Result<Self, ExtractorError> {
        let validator: Box<dyn TemplateValidator> = Box::new(StructuralChecker);
        if let Err(reason) = validator.validate(&reader.body) {
            return Err(ExtractorError::InvalidSyntax {
                path: reader.path.clone(),
                reason,
            });
        }
        let writer = HamlWriter::new(&reader.path, options.write_mode.clone());
        Ok(Extractor {
            reader,
            writer,
            options,
            validator,
            body: Vec::new(),
            records: BTreeMap::new(),
        })
    }

    /// Swap in a different syntax oracle.
    pub fn with_validator(mut self, validator: Box<dyn TemplateValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Run the full pass: rewrite, validate, write.
    pub fn run(&mut self) -> Result<RunSummary, ExtractorError> {
        let new_body = self.rewrite()?;
        if let Err(reason) = self.validator.validate(&new_body) {
            return Err(ExtractorError::PostRewriteSyntaxInvalid {
                path: self.reader.path.clone(),
                reason,
            });
        }
        let output_path = self.writer.write(&new_body)?;
        let lines_replaced = self.records.values().filter(|r| r.success).count();
        let summary = RunSummary {
            path: self.reader.path.clone(),
            lines_seen: self.reader.lines().len(),
            lines_replaced,
            output_path,
        };
        info!(
            "{:?}: replaced {} of {} lines",
            summary.path, summary.lines_replaced, summary.lines_seen
        );
        Ok(summary)
    }

    /// Rewrite every line, accumulating the new body and per-line records.
    pub fn rewrite(&mut self) -> Result<String, ExtractorError> {
        self.body.clear();
        self.records.clear();
        for line in self.reader.lines() {
            self.process_line(&line)?;
        }
        let mut body = self.body.join("\n");
        if self.reader.trailing_newline {
            body.push('\n');
        }
        Ok(body)
    }

    /// Classify one line, replace when a candidate exists, and record the
    /// outcome against the line's position.
    fn process_line(&mut self, line: &Line) -> Result<bool, ExtractorError> {
        let found = TextFinder::new(&line.content, &self.options.replacer).process();
        match found.candidate.as_deref() {
            Some(candidate) if !candidate.is_empty() => {
                let replacer = TextReplacer::new(
                    &line.content,
                    candidate,
                    found.category,
                    &self.reader.path,
                    found.metadata,
                    &self.options.replacer,
                );
                let result = replacer.replace()?;
                let content = result.modified_line.as_deref().unwrap_or(&line.content);
                self.body.push(line.render(content));
                let replaced = result.success;
                if replaced {
                    debug!(
                        "line {}: {:?} -> {:?}",
                        line.number, line.content, content
                    );
                }
                self.records.insert(line.number, result);
                Ok(replaced)
            }
            _ => {
                self.body.push(line.render(&line.content));
                Ok(false)
            }
        }
    }

    /// Per-line outcomes, keyed by document position.
    pub fn records(&self) -> &BTreeMap<usize, ReplacementResult> {
        &self.records
    }

    /// The catalog of successful replacements, in document order.
    pub fn catalog(&self) -> LocaleCatalog {
        let mut catalog = LocaleCatalog::new(self.options.locale());
        for result in self.records.values() {
            catalog.record(result);
        }
        catalog
    }

    /// The source path this extractor reads from.
    pub fn path(&self) -> &Path {
        &self.reader.path
    }
}

/// What a directory pass did.
#[derive(Debug)]
pub struct DirectorySummary {
    /// Per-file summaries in traversal order
    pub runs: Vec<RunSummary>,
    /// The merged catalog across all processed templates
    pub catalog: LocaleCatalog,
}

/// Run the pipeline over every `.haml` template under a directory, merging
/// all catalogs into one.
pub fn run_directory<P: AsRef<Path>>(
    dir: P,
    options: &ExtractorOptions,
) -> Result<DirectorySummary, ExtractorError> {
    let dir = dir.as_ref();
    if !FileManager::dir_exists(dir) {
        return Err(ExtractorError::NotADirectory(dir.to_path_buf()));
    }
    let templates = FileManager::find_templates(dir)
        .map_err(|e| ExtractorError::File(e.to_string()))?;
    info!("processing {} templates under {:?}", templates.len(), dir);

    let mut catalog = LocaleCatalog::new(options.locale());
    let mut runs = Vec::with_capacity(templates.len());
    for template in templates {
        let mut extractor = Extractor::new(&template, options.clone())?;
        let summary = extractor.run()?;
        catalog.merge(&extractor.catalog());
        runs.push(summary);
    }
    Ok(DirectorySummary { runs, catalog })
}

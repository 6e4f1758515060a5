use std::path::{Path, PathBuf};
use log::{debug, info};

use crate::errors::ExtractorError;
use crate::file_utils::FileManager;
use crate::line::Line;

// @module: Template reading and writing

/// A template document loaded into memory, split into indexed lines.
#[derive(Debug)]
pub struct HamlReader {
    /// Source path (also used for key qualification and error reporting)
    pub path: PathBuf,
    /// Full document text as read
    pub body: String,
    /// Whether the document ended with a newline, restored on write
    pub trailing_newline: bool,
}

impl HamlReader {
    /// Load a template from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractorError> {
        let path = path.as_ref();
        let body = FileManager::read_to_string(path)
            .map_err(|e| ExtractorError::File(e.to_string()))?;
        debug!("read {} bytes from {:?}", body.len(), path);
        Ok(Self::from_string(path, body))
    }

    /// Build a reader over an in-memory document.
    pub fn from_string<P: AsRef<Path>>(path: P, body: String) -> Self {
        let trailing_newline = body.ends_with('\n');
        HamlReader {
            path: path.as_ref().to_path_buf(),
            body,
            trailing_newline,
        }
    }

    /// The document's lines with indentation split off, in document order.
    pub fn lines(&self) -> Vec<Line> {
        self.body
            .lines()
            .enumerate()
            .map(|(number, raw)| Line::new(number, raw))
            .collect()
    }
}

/// Where the rewritten document goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Do not touch disk; the caller inspects the rewritten body
    #[default]
    DryRun,
    /// Overwrite the source template in place
    Overwrite,
    /// Write next to the original layout under another root directory
    OutputDir(PathBuf),
}

/// Writes a rewritten document according to the selected mode.
#[derive(Debug)]
pub struct HamlWriter {
    path: PathBuf,
    mode: WriteMode,
}

impl HamlWriter {
    pub fn new<P: AsRef<Path>>(path: P, mode: WriteMode) -> Self {
        HamlWriter {
            path: path.as_ref().to_path_buf(),
            mode,
        }
    }

    /// Write the body out; returns the path written, or None for a dry run.
    pub fn write(&self, body: &str) -> Result<Option<PathBuf>, ExtractorError> {
        let target = match &self.mode {
            WriteMode::DryRun => {
                info!("dry run, not writing {:?}", self.path);
                return Ok(None);
            }
            WriteMode::Overwrite => self.path.clone(),
            WriteMode::OutputDir(root) => {
                let filename = self.path.file_name().ok_or_else(|| {
                    ExtractorError::File(format!("no filename in {:?}", self.path))
                })?;
                root.join(filename)
            }
        };
        FileManager::write_to_file(&target, body)
            .map_err(|e| ExtractorError::File(e.to_string()))?;
        info!("wrote rewritten template to {:?}", target);
        Ok(Some(target))
    }
}

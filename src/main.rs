// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use haml_i18n_extract::app_config::Config;
use haml_i18n_extract::document::WriteMode;
use haml_i18n_extract::extractor::{run_directory, Extractor, ExtractorOptions};
use haml_i18n_extract::file_utils::FileManager;
use haml_i18n_extract::replacer::{ReplacerConfig, TextPlace};

/// CLI wrapper for TextPlace to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTextPlace {
    Content,
    Attribute,
}

impl From<CliTextPlace> for TextPlace {
    fn from(place: CliTextPlace) -> Self {
        match place {
            CliTextPlace::Content => TextPlace::Content,
            CliTextPlace::Attribute => TextPlace::Attribute,
        }
    }
}

/// CLI wrapper for log levels
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// haml-i18n-extract - migrate hardcoded Haml strings into an i18n catalog
#[derive(Parser, Debug)]
#[command(name = "haml-i18n-extract")]
#[command(version = "1.0.0")]
#[command(about = "Rewrite literal text in Haml templates into _t(...) lookups")]
#[command(long_about = "haml-i18n-extract scans Haml templates, rewrites literal \
human-readable text into _t(\"...\") translation lookups, and accumulates the \
synthesized keys in a nested YAML locale catalog.

EXAMPLES:
    haml-i18n-extract app/views/users/show.haml            # Dry run a single template
    haml-i18n-extract --write app/views/                   # Rewrite a whole directory in place
    haml-i18n-extract --write --catalog-path config/locales/en.yml app/views/
    haml-i18n-extract --add-filename-prefix --base-path app/views/ app/views/
    haml-i18n-extract --place attribute --attribute-name title form.haml")]
struct CommandLineOptions {
    /// Input template file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Rewrite templates in place (default is a dry run printing to stdout)
    #[arg(short, long)]
    write: bool,

    /// Write rewritten templates into this directory instead of in place
    #[arg(short, long, conflicts_with = "write")]
    output_dir: Option<PathBuf>,

    /// Write the accumulated locale catalog to this YAML file
    #[arg(short, long)]
    catalog_path: Option<PathBuf>,

    /// Optional JSON configuration file, consulted when it exists
    #[arg(short = 'f', long, default_value = "haml-i18n.json")]
    config: PathBuf,

    /// Locale root for catalog entries (default "en")
    #[arg(long)]
    locale: Option<String>,

    /// Where in a tag line the candidate text lives (default content)
    #[arg(long, value_enum)]
    place: Option<CliTextPlace>,

    /// Attribute to target when --place attribute
    #[arg(long, required_if_eq("place", "attribute"))]
    attribute_name: Option<String>,

    /// Qualify keys with a namespace derived from the template path
    #[arg(short, long)]
    add_filename_prefix: bool,

    /// Path prefix stripped before deriving the key namespace
    #[arg(short, long)]
    base_path: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut stderr = std::io::stderr();
            let color = Self::color_for_level(record.level());
            let _ = writeln!(
                stderr,
                "{}{:5} {}\x1B[0m",
                color,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// File config with command-line flags folded in; flags always win.
fn merge_options(cli: &CommandLineOptions, mut config: Config) -> Result<Config> {
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }
    if let Some(place) = &cli.place {
        config.place = place.clone().into();
    }
    if cli.attribute_name.is_some() {
        config.attribute_name = cli.attribute_name.clone();
    }
    if cli.add_filename_prefix {
        config.add_filename_prefix = true;
    }
    if cli.base_path.is_some() {
        config.base_path = cli.base_path.clone();
    }
    if cli.catalog_path.is_some() {
        config.catalog_path = cli.catalog_path.clone();
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = CommandLineOptions::parse();
    let config = merge_options(&cli, Config::from_file_or_default(&cli.config)?)?;
    let level = match (&cli.log_level, &config.log_level) {
        (Some(level), _) => LevelFilter::from(level.clone()),
        (None, Some(name)) => name
            .parse()
            .with_context(|| format!("invalid log_level {:?} in config", name))?,
        (None, None) => LevelFilter::Info,
    };
    CustomLogger::init(level)?;

    let write_mode = if cli.write {
        WriteMode::Overwrite
    } else if let Some(dir) = &cli.output_dir {
        WriteMode::OutputDir(dir.clone())
    } else {
        WriteMode::DryRun
    };
    let dry_run = write_mode == WriteMode::DryRun;

    let options = ExtractorOptions {
        replacer: ReplacerConfig {
            place: config.place,
            attribute_name: config.attribute_name,
            add_filename_prefix: config.add_filename_prefix,
            base_path: config.base_path,
        },
        locale: config.locale,
        write_mode,
    };

    let catalog = if FileManager::dir_exists(&cli.input_path) {
        let summary = run_directory(&cli.input_path, &options)
            .with_context(|| format!("failed processing directory {:?}", cli.input_path))?;
        let replaced: usize = summary.runs.iter().map(|r| r.lines_replaced).sum();
        info!(
            "processed {} templates, {} lines replaced",
            summary.runs.len(),
            replaced
        );
        summary.catalog
    } else {
        if !FileManager::file_exists(&cli.input_path) {
            return Err(anyhow!("input path {:?} does not exist", cli.input_path));
        }
        let mut extractor = Extractor::new(&cli.input_path, options)
            .with_context(|| format!("failed opening {:?}", cli.input_path))?;
        if dry_run {
            let body = extractor.rewrite()?;
            print!("{}", body);
        }
        extractor.run()?;
        extractor.catalog()
    };

    if let Some(path) = &config.catalog_path {
        catalog.write_file(path)?;
        info!("wrote {} catalog entries to {:?}", catalog.len(), path);
    } else if dry_run && !catalog.is_empty() {
        print!("{}", catalog.to_yaml_string()?);
    }

    Ok(())
}

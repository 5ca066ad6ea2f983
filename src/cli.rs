//! Command-line interface for stackscope.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::aggregate::Analyzer;
use crate::classify::SubmittedFile;
use crate::report;
use crate::ruleset::Ruleset;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_BELOW_THRESHOLD: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never worth descending into.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "dist",
    "build",
    "out",
    "coverage",
    "target",
    "__pycache__",
];

/// Hidden directories that still hold files we classify.
const KEPT_HIDDEN_DIRS: &[&str] = &[".github", ".circleci"];

/// Per-file size cap in bytes unless overridden.
const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Evidence-based technology pattern detection.
///
/// Stackscope reads a project tree, classifies every file, scans file
/// contents for structural signals, and reports the frameworks, tools,
/// and infrastructure it finds with calibrated confidence scores.
#[derive(Parser)]
#[command(name = "stackscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a project directory or a single file
    #[command(visible_alias = "scan")]
    Analyze(AnalyzeArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to a yaml ruleset overriding the built-in indicator tables
    #[arg(short, long)]
    pub ruleset: Option<PathBuf>,

    /// Glob patterns to exclude, relative to the analyzed path
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Skip files larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: u64,

    /// Exit non-zero when overall confidence falls below this value
    #[arg(short, long)]
    pub min_confidence: Option<f64>,
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    // Load ruleset if specified
    let ruleset = match &args.ruleset {
        Some(path) => match Ruleset::parse_file(path) {
            Ok(ruleset) => Some(ruleset),
            Err(e) => {
                eprintln!("Error parsing ruleset: {}", e);
                return Ok(EXIT_ERROR);
            }
        },
        None => None,
    };

    let excludes = match build_excludes(&args.exclude) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: invalid exclude pattern: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let metadata = match std::fs::metadata(&abs_path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if metadata.is_dir() {
        collect_files(&abs_path, &excludes, args.max_file_size)?
    } else {
        collect_single(&abs_path, args.max_file_size)?
    };

    if files.is_empty() {
        eprintln!("Warning: no files to analyze");
    }

    let analyzer = match &ruleset {
        Some(ruleset) => Analyzer::with_ruleset(ruleset),
        None => Analyzer::new(),
    };
    let result = analyzer.analyze_files(&files);

    match args.format.as_str() {
        "json" => report::write_json(&result)?,
        _ => report::write_pretty(&args.path.to_string_lossy(), &result),
    }

    // Return appropriate exit code
    if let Some(threshold) = args.min_confidence {
        if result.summary.confidence < threshold {
            return Ok(EXIT_BELOW_THRESHOLD);
        }
    }
    Ok(EXIT_SUCCESS)
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}

/// Collect readable text files under a directory root. Names are made
/// relative to the root with forward slashes so directory-prefix
/// classification sees paths like `.github/workflows/ci.yml`.
fn collect_files(
    root: &Path,
    excludes: &GlobSet,
    max_file_size: u64,
) -> anyhow::Result<Vec<SubmittedFile>> {
    let debug = std::env::var("STACKSCOPE_DEBUG").is_ok();
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') {
                return KEPT_HIDDEN_DIRS.contains(&name.as_ref());
            }
            !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        if excludes.is_match(&name) {
            continue;
        }
        let size = entry.metadata()?.len();
        if size > max_file_size {
            if debug {
                eprintln!("[debug] skipping {} ({} bytes over cap)", name, size);
            }
            continue;
        }
        let content = match String::from_utf8(std::fs::read(path)?) {
            Ok(content) => content,
            Err(_) => {
                if debug {
                    eprintln!("[debug] skipping {} (not utf-8 text)", name);
                }
                continue;
            }
        };
        files.push(SubmittedFile::new(name, content));
    }

    Ok(files)
}

fn collect_single(path: &Path, max_file_size: u64) -> anyhow::Result<Vec<SubmittedFile>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let metadata = std::fs::metadata(path)?;
    if metadata.len() > max_file_size {
        anyhow::bail!("{} is larger than the {} byte cap", name, max_file_size);
    }
    let content = match String::from_utf8(std::fs::read(path)?) {
        Ok(content) => content,
        Err(_) => anyhow::bail!("{} is not utf-8 text", name),
    };

    Ok(vec![SubmittedFile::new(name, content)])
}

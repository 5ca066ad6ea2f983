//! Stackscope - evidence-based technology pattern detection.
//!
//! Stackscope takes a set of submitted project files, classifies each
//! one from its name, extracts structural signals from content with
//! lightweight regex scanning, and folds the evidence into calibrated
//! confidence scores for the frameworks, tools, and infrastructure the
//! project appears to use.
//!
//! # Architecture
//!
//! The pipeline is a pure, synchronous fold over the file list:
//!
//! - `classify`: File type classification from names alone
//! - `parse`: Per-type content scanners for source files
//! - `manifest`: Dependency manifest analysis and scoring
//! - `infra`: Config analyzers (compose, container builds, env, bundlers)
//! - `aggregate`: Batch orchestration and evidence merging
//! - `score`: Weights, caps, and the merged pattern set
//! - `ruleset`: Indicator tables, compiled-in or loaded from yaml
//! - `report`: Output formatting (text, JSON)
//!
//! # Adding a New Indicator
//!
//! Compiled-in tables live in `ruleset.rs`; a yaml ruleset passed at
//! runtime overrides any table wholesale.

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod infra;
pub mod manifest;
pub mod parse;
pub mod report;
pub mod ruleset;
pub mod score;

pub use aggregate::{analyze_files, AnalysisResult, Analyzer, FileReport, Summary};
pub use classify::{classify, FileCategory, FileClassification, FileKind, SubmittedFile};
pub use infra::ConfigAnalysis;
pub use manifest::{ManifestAnalysis, ManifestReport};
pub use parse::{ContentMetadata, ParsedContent};
pub use ruleset::{Ruleset, RulesetError};
pub use score::{DetectedPattern, PatternSet};

//! Whole-batch analysis.
//!
//! Single pass over the submitted files: classify, route to the
//! manifest/config/source analyzers, then fold the per-file evidence
//! into one pattern set and an overall confidence. Per-file parsing is
//! parallel; the merge fold runs in file-list order.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::{self, FileCategory, FileClassification, FileKind, SubmittedFile};
use crate::infra::{self, ConfigAnalysis};
use crate::manifest::{self, ManifestReport};
use crate::parse::{self, ContentMetadata, ParsedContent};
use crate::ruleset::Ruleset;
use crate::score::{self, caps, signals, PatternSet};

/// Complete analysis of one submitted file set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: Summary,
    pub files: Vec<FileReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestReport>,
    pub configs: Vec<ConfigAnalysis>,
    pub patterns: PatternSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_files: usize,
    /// Only categories that actually occurred appear here.
    pub category_counts: BTreeMap<FileCategory, usize>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub name: String,
    pub classification: FileClassification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_content: Option<ParsedContent>,
}

/// Batch analyzer bound to a ruleset.
pub struct Analyzer<'a> {
    ruleset: &'a Ruleset,
}

impl Analyzer<'static> {
    /// Analyzer over the built-in ruleset.
    pub fn new() -> Self {
        Analyzer {
            ruleset: Ruleset::shared(),
        }
    }
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Analyzer::new()
    }
}

impl<'a> Analyzer<'a> {
    pub fn with_ruleset(ruleset: &'a Ruleset) -> Self {
        Analyzer { ruleset }
    }

    /// Analyze a file set. Never fails: malformed inputs surface as
    /// `success=false` sub-results and the batch keeps going.
    pub fn analyze_files(&self, files: &[SubmittedFile]) -> AnalysisResult {
        let classified: Vec<FileClassification> = files
            .iter()
            .map(|file| classify::classify(&file.name))
            .collect();

        let mut category_counts: BTreeMap<FileCategory, usize> = BTreeMap::new();
        for classification in &classified {
            *category_counts.entry(classification.category).or_insert(0) += 1;
        }

        // the first manifest is the project manifest; any later one is
        // treated as an ordinary config file
        let manifest_index = classified
            .iter()
            .position(|classification| classification.kind == FileKind::Manifest);
        let manifest =
            manifest_index.map(|index| manifest::analyze(&files[index].content, self.ruleset));

        let configs: Vec<ConfigAnalysis> = files
            .iter()
            .zip(&classified)
            .enumerate()
            .filter(|(index, (_, classification))| {
                classification.category == FileCategory::Config && Some(*index) != manifest_index
            })
            .map(|(_, (file, _))| infra::analyze(&file.name, &file.content))
            .collect();

        let parsed: Vec<Option<ParsedContent>> = files
            .par_iter()
            .zip(classified.par_iter())
            .map(|(file, classification)| {
                match classification.category {
                    FileCategory::Frontend | FileCategory::Backend => {
                        Some(parse::parse(&file.content, classification.kind))
                    }
                    _ => None,
                }
            })
            .collect();

        let patterns = self.extract_patterns(files, &classified, manifest.as_ref(), &configs, &parsed);
        let confidence = self.overall_confidence(manifest.as_ref(), &configs, &parsed);

        let files: Vec<FileReport> = files
            .iter()
            .zip(classified)
            .zip(parsed)
            .map(|((file, classification), parsed_content)| FileReport {
                name: file.name.clone(),
                classification,
                parsed_content,
            })
            .collect();

        AnalysisResult {
            summary: Summary {
                total_files: files.len(),
                category_counts,
                confidence,
            },
            files,
            manifest,
            configs,
            patterns,
        }
    }

    /// Fold all evidence sources into one pattern set. Source-level
    /// heuristics only ever raise a confidence, never lower one.
    fn extract_patterns(
        &self,
        files: &[SubmittedFile],
        classified: &[FileClassification],
        manifest: Option<&ManifestReport>,
        configs: &[ConfigAnalysis],
        parsed: &[Option<ParsedContent>],
    ) -> PatternSet {
        let mut patterns = PatternSet::new();

        if let Some(analysis) = manifest.and_then(|report| report.analysis.as_ref()) {
            for (name, pattern) in &analysis.frameworks {
                patterns = patterns.raise_framework(name, pattern.confidence, &pattern.evidence);
            }
            for (name, pattern) in &analysis.tools {
                patterns = patterns.raise_tool(name, pattern.confidence, &pattern.evidence);
            }
            for (name, pattern) in &analysis.backend_libraries {
                patterns = patterns.raise_framework(name, pattern.confidence, &pattern.evidence);
                if self.ruleset.is_database_library(name) {
                    patterns = patterns.raise_infrastructure(
                        "database",
                        signals::DATABASE,
                        &pattern.evidence,
                    );
                }
            }
        }

        for config in configs {
            match config {
                ConfigAnalysis::Compose(compose) if !compose.services.is_empty() => {
                    patterns = patterns.raise_infrastructure(
                        "containerization",
                        signals::CONTAINERIZATION,
                        &[compose.file.clone()],
                    );
                }
                ConfigAnalysis::ContainerBuild(build) => {
                    patterns = patterns.raise_infrastructure(
                        "containerization",
                        signals::CONTAINERIZATION,
                        &[build.file.clone()],
                    );
                }
                _ => {}
            }
            if config.has_database() {
                patterns = patterns.raise_infrastructure(
                    "database",
                    signals::DATABASE,
                    &[config.file().to_string()],
                );
            }
        }

        for ((file, classification), parsed_content) in
            files.iter().zip(classified).zip(parsed)
        {
            let Some(content) = parsed_content else { continue };
            if !content.success {
                continue;
            }
            let evidence = [file.name.clone()];
            match &content.metadata {
                ContentMetadata::Script(script) => {
                    if script.has_jsx {
                        patterns =
                            patterns.raise_framework("react", signals::SOURCE_JSX, &evidence);
                    }
                    if script.has_hooks {
                        patterns =
                            patterns.raise_framework("react", signals::SOURCE_HOOKS, &evidence);
                    }
                }
                ContentMetadata::Python(python) => {
                    if python.has_flask {
                        patterns =
                            patterns.raise_framework("flask", signals::SOURCE_BACKEND, &evidence);
                    }
                    if python.has_django {
                        patterns =
                            patterns.raise_framework("django", signals::SOURCE_BACKEND, &evidence);
                    }
                    if python.has_fastapi {
                        patterns =
                            patterns.raise_framework("fastapi", signals::SOURCE_BACKEND, &evidence);
                    }
                }
                _ => {}
            }
            match classification.kind {
                FileKind::Vue => {
                    patterns =
                        patterns.raise_framework("vue", signals::SOURCE_COMPONENT, &evidence);
                }
                FileKind::Svelte => {
                    patterns =
                        patterns.raise_framework("svelte", signals::SOURCE_COMPONENT, &evidence);
                }
                _ => {}
            }
        }

        patterns
    }

    /// Weighted overall confidence. A term enters the denominator only
    /// when its evidence source was submitted at all; a failed manifest
    /// parse counts as no manifest evidence.
    fn overall_confidence(
        &self,
        manifest: Option<&ManifestReport>,
        configs: &[ConfigAnalysis],
        parsed: &[Option<ParsedContent>],
    ) -> f64 {
        let weights = &self.ruleset.weights;
        let mut terms: Vec<(f64, f64)> = Vec::new();

        if let Some(analysis) = manifest
            .filter(|report| report.success)
            .and_then(|report| report.analysis.as_ref())
        {
            terms.push((analysis.confidence, weights.manifest));
        }
        if !configs.is_empty() {
            terms.push((
                score::normalized_count(configs.len(), caps::CONFIGS),
                weights.config,
            ));
        }
        let source_submitted = parsed.iter().any(Option::is_some);
        if source_submitted {
            let parsed_ok = parsed
                .iter()
                .filter(|content| content.as_ref().is_some_and(|c| c.success))
                .count();
            terms.push((
                score::normalized_count(parsed_ok, caps::SOURCE_FILES),
                weights.source,
            ));
        }

        score::weighted_average(&terms)
    }
}

/// Analyze a file set with the built-in ruleset.
pub fn analyze_files(files: &[SubmittedFile]) -> AnalysisResult {
    Analyzer::new().analyze_files(files)
}

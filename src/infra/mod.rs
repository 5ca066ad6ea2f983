//! Infrastructure config analysis.
//!
//! Dispatches on the classified file kind and hands each config file to
//! a purpose-built analyzer, with a structural fallback for anything we
//! do not recognize by name.

pub mod bundler;
pub mod compose;
pub mod dockerfile;
pub mod envfile;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{self, FileKind};

pub use bundler::BundlerAnalysis;
pub use compose::ComposeAnalysis;
pub use dockerfile::ContainerBuildAnalysis;
pub use envfile::EnvFileAnalysis;

/// Analysis of one recognized or fallback config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConfigAnalysis {
    Compose(ComposeAnalysis),
    ContainerBuild(ContainerBuildAnalysis),
    Env(EnvFileAnalysis),
    Bundler(BundlerAnalysis),
    Generic(GenericConfigAnalysis),
}

impl ConfigAnalysis {
    pub fn file(&self) -> &str {
        match self {
            ConfigAnalysis::Compose(analysis) => &analysis.file,
            ConfigAnalysis::ContainerBuild(analysis) => &analysis.file,
            ConfigAnalysis::Env(analysis) => &analysis.file,
            ConfigAnalysis::Bundler(analysis) => &analysis.file,
            ConfigAnalysis::Generic(analysis) => &analysis.file,
        }
    }

    /// Whether this config carries database evidence.
    pub fn has_database(&self) -> bool {
        match self {
            ConfigAnalysis::Compose(analysis) => analysis.has_database,
            ConfigAnalysis::Env(analysis) => analysis.has_database,
            _ => false,
        }
    }
}

/// Structural look at a config file we have no dedicated analyzer for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericConfigAnalysis {
    pub file: String,
    pub valid_structured_data: bool,
    pub looks_key_value: bool,
    pub line_count: usize,
    pub has_comments: bool,
}

/// Analyze a config file, dispatching on its classified kind.
pub fn analyze(file_name: &str, content: &str) -> ConfigAnalysis {
    match classify::classify(file_name).kind {
        FileKind::Compose => ConfigAnalysis::Compose(compose::analyze(file_name, content)),
        FileKind::ContainerBuild => {
            ConfigAnalysis::ContainerBuild(dockerfile::analyze(file_name, content))
        }
        FileKind::EnvFile => ConfigAnalysis::Env(envfile::analyze(file_name, content)),
        FileKind::WebpackConfig => {
            ConfigAnalysis::Bundler(bundler::analyze(file_name, "webpack", content))
        }
        FileKind::ViteConfig => {
            ConfigAnalysis::Bundler(bundler::analyze(file_name, "vite", content))
        }
        FileKind::NextConfig => {
            ConfigAnalysis::Bundler(bundler::analyze(file_name, "next", content))
        }
        _ => ConfigAnalysis::Generic(analyze_generic(file_name, content)),
    }
}

fn analyze_generic(file_name: &str, content: &str) -> GenericConfigAnalysis {
    lazy_static::lazy_static! {
        // indented key-value syntax, yaml or ini flavored
        static ref KEY_VALUE_RE: Regex = Regex::new(
            r"(?m)^\s*[A-Za-z_][\w.-]*\s*[:=]"
        ).unwrap();
    }

    let json_structured = serde_json::from_str::<serde_json::Value>(content)
        .map(|value| value.is_object() || value.is_array())
        .unwrap_or(false);
    let yaml_structured = serde_yaml::from_str::<serde_yaml::Value>(content)
        .map(|value| value.is_mapping() || value.is_sequence())
        .unwrap_or(false);

    GenericConfigAnalysis {
        file: file_name.to_string(),
        valid_structured_data: json_structured || yaml_structured,
        looks_key_value: KEY_VALUE_RE.is_match(content),
        line_count: content.lines().count(),
        has_comments: content.lines().any(|line| {
            let trimmed = line.trim();
            trimmed.starts_with('#') || trimmed.starts_with("//")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_dispatches_compose() {
        let analysis = analyze("docker-compose.yml", "services:\n  web:\n    image: nginx\n");
        assert!(matches!(analysis, ConfigAnalysis::Compose(_)));
        assert_eq!(analysis.file(), "docker-compose.yml");
    }

    #[test]
    fn test_analyze_dispatch_is_case_insensitive() {
        let analysis = analyze("DOCKERFILE", "FROM alpine\n");
        assert!(matches!(analysis, ConfigAnalysis::ContainerBuild(_)));
    }

    #[test]
    fn test_analyze_dispatches_env_and_bundler() {
        assert!(matches!(
            analyze(".env", "PORT=3000\n"),
            ConfigAnalysis::Env(_)
        ));
        match analyze("webpack.config.js", "module.exports = {};") {
            ConfigAnalysis::Bundler(bundler) => assert_eq!(bundler.bundler, "webpack"),
            other => panic!("expected bundler analysis, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_without_dedicated_analyzer_falls_back_to_generic() {
        let analysis = analyze(".gitlab-ci.yml", "stages:\n  - build\n# pipeline\n");
        match analysis {
            ConfigAnalysis::Generic(generic) => {
                assert!(generic.valid_structured_data);
                assert!(generic.looks_key_value);
                assert!(generic.has_comments);
                assert_eq!(generic.line_count, 3);
            }
            other => panic!("expected generic analysis, got {other:?}"),
        }
    }

    #[test]
    fn test_analyze_unknown_name_is_generic() {
        let analysis = analyze("settings.conf", "retries = 3\n");
        match analysis {
            ConfigAnalysis::Generic(generic) => {
                assert!(generic.looks_key_value);
                assert!(!generic.has_comments);
            }
            other => panic!("expected generic analysis, got {other:?}"),
        }
    }

    #[test]
    fn test_has_database_accessor() {
        let compose = analyze(
            "docker-compose.yml",
            "services:\n  postgres:\n    image: postgres:16\n",
        );
        assert!(compose.has_database());

        let env = analyze(".env", "API_KEY=abc\n");
        assert!(!env.has_database());
    }

    #[test]
    fn test_serialized_shape_is_flat_and_tagged() {
        let analysis = analyze(
            "docker-compose.yml",
            "services:\n  postgres:\n    image: postgres:16\n",
        );
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["type"], "compose");
        assert_eq!(json["hasDatabase"], true);
        assert_eq!(json["file"], "docker-compose.yml");
    }
}

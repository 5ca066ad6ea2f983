//! Ruleset schema: indicator tables and evidence weights.
//!
//! The compiled-in defaults cover the common web stack; a YAML ruleset can
//! replace any table or weight. Field names follow the recognized option
//! names of the downstream consumers (`frameworkIndicators`, etc.).

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::weights;

/// Errors from loading or validating a ruleset.
#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("failed to read ruleset file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse ruleset YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid ruleset: {0}")]
    Invalid(String),
}

/// A named pattern and the dependency names that imply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub dependencies: Vec<String>,
}

impl Indicator {
    fn from_static(entry: &(&str, &[&str])) -> Self {
        Self {
            name: entry.0.to_string(),
            dependencies: entry.1.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Weights for the three evidence sources of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvidenceWeights {
    #[serde(default = "default_manifest_weight")]
    pub manifest: f64,
    #[serde(default = "default_config_weight")]
    pub config: f64,
    #[serde(default = "default_source_weight")]
    pub source: f64,
}

fn default_manifest_weight() -> f64 {
    weights::MANIFEST
}

fn default_config_weight() -> f64 {
    weights::CONFIG
}

fn default_source_weight() -> f64 {
    weights::SOURCE
}

impl Default for EvidenceWeights {
    fn default() -> Self {
        Self {
            manifest: weights::MANIFEST,
            config: weights::CONFIG,
            source: weights::SOURCE,
        }
    }
}

/// The full detection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ruleset {
    #[serde(default = "default_framework_indicators")]
    pub framework_indicators: Vec<Indicator>,
    #[serde(default = "default_tool_indicators")]
    pub tool_indicators: Vec<Indicator>,
    #[serde(default = "default_backend_library_indicators")]
    pub backend_library_indicators: Vec<Indicator>,
    /// Backend-library pattern names that imply a database dependency.
    #[serde(default = "default_database_libraries")]
    pub database_libraries: Vec<String>,
    #[serde(default)]
    pub weights: EvidenceWeights,
}

static DEFAULT_FRAMEWORKS: &[(&str, &[&str])] = &[
    ("react", &["react", "react-dom"]),
    ("next", &["next"]),
    ("vue", &["vue"]),
    ("nuxt", &["nuxt"]),
    ("angular", &["@angular/core", "@angular/common"]),
    ("svelte", &["svelte"]),
    ("sveltekit", &["@sveltejs/kit"]),
    ("remix", &["@remix-run/react", "@remix-run/node"]),
    ("gatsby", &["gatsby"]),
    ("astro", &["astro"]),
    ("solid", &["solid-js"]),
    ("preact", &["preact"]),
];

static DEFAULT_TOOLS: &[(&str, &[&str])] = &[
    ("webpack", &["webpack"]),
    ("vite", &["vite"]),
    ("rollup", &["rollup"]),
    ("parcel", &["parcel"]),
    ("esbuild", &["esbuild"]),
    ("babel", &["@babel/core"]),
    ("typescript", &["typescript"]),
    ("eslint", &["eslint"]),
    ("prettier", &["prettier"]),
    ("jest", &["jest"]),
    ("vitest", &["vitest"]),
    ("tailwindcss", &["tailwindcss"]),
    ("sass", &["sass"]),
    ("storybook", &["storybook"]),
];

static DEFAULT_BACKEND_LIBRARIES: &[(&str, &[&str])] = &[
    ("express", &["express"]),
    ("koa", &["koa"]),
    ("fastify", &["fastify"]),
    ("nestjs", &["@nestjs/core"]),
    ("hapi", &["@hapi/hapi"]),
    ("socket.io", &["socket.io"]),
    ("graphql", &["graphql"]),
    ("apollo", &["@apollo/server"]),
    ("prisma", &["prisma", "@prisma/client"]),
    ("mongoose", &["mongoose"]),
    ("sequelize", &["sequelize"]),
    ("typeorm", &["typeorm"]),
    ("knex", &["knex"]),
    ("pg", &["pg"]),
    ("mysql", &["mysql2"]),
    ("redis", &["redis"]),
];

static DEFAULT_DATABASE_LIBRARIES: &[&str] = &[
    "prisma",
    "mongoose",
    "sequelize",
    "typeorm",
    "knex",
    "pg",
    "mysql",
    "redis",
];

fn default_framework_indicators() -> Vec<Indicator> {
    DEFAULT_FRAMEWORKS.iter().map(Indicator::from_static).collect()
}

fn default_tool_indicators() -> Vec<Indicator> {
    DEFAULT_TOOLS.iter().map(Indicator::from_static).collect()
}

fn default_backend_library_indicators() -> Vec<Indicator> {
    DEFAULT_BACKEND_LIBRARIES
        .iter()
        .map(Indicator::from_static)
        .collect()
}

fn default_database_libraries() -> Vec<String> {
    DEFAULT_DATABASE_LIBRARIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            framework_indicators: default_framework_indicators(),
            tool_indicators: default_tool_indicators(),
            backend_library_indicators: default_backend_library_indicators(),
            database_libraries: default_database_libraries(),
            weights: EvidenceWeights::default(),
        }
    }
}

static DEFAULT_RULESET: Lazy<Ruleset> = Lazy::new(Ruleset::default);

impl Ruleset {
    /// The shared compiled-in ruleset.
    pub fn shared() -> &'static Ruleset {
        &DEFAULT_RULESET
    }

    /// Parse a ruleset from a YAML file. Missing sections keep their
    /// compiled-in defaults.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, RulesetError> {
        let content = fs::read_to_string(path.as_ref())?;
        let ruleset: Ruleset = serde_yaml::from_str(&content)?;
        ruleset.validate()?;
        Ok(ruleset)
    }

    /// Whether a backend-library pattern name implies a database.
    pub fn is_database_library(&self, name: &str) -> bool {
        self.database_libraries.iter().any(|n| n == name)
    }

    /// Check the ruleset for structural problems.
    pub fn validate(&self) -> Result<(), RulesetError> {
        validate_indicators("frameworkIndicators", &self.framework_indicators)?;
        validate_indicators("toolIndicators", &self.tool_indicators)?;
        validate_indicators("backendLibraryIndicators", &self.backend_library_indicators)?;

        for (label, weight) in [
            ("manifest", self.weights.manifest),
            ("config", self.weights.config),
            ("source", self.weights.source),
        ] {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(RulesetError::Invalid(format!(
                    "weights.{} must be a positive number, got {}",
                    label, weight
                )));
            }
        }

        Ok(())
    }
}

fn validate_indicators(table: &str, indicators: &[Indicator]) -> Result<(), RulesetError> {
    let mut seen = std::collections::HashSet::new();
    for (i, indicator) in indicators.iter().enumerate() {
        if indicator.name.is_empty() {
            return Err(RulesetError::Invalid(format!(
                "{}[{}]: empty pattern name",
                table, i
            )));
        }
        if indicator.dependencies.is_empty() {
            return Err(RulesetError::Invalid(format!(
                "{}[{}] ({}): empty dependency list",
                table, i, indicator.name
            )));
        }
        if !seen.insert(indicator.name.as_str()) {
            return Err(RulesetError::Invalid(format!(
                "{}: duplicate pattern name {:?}",
                table, indicator.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ruleset_is_valid() {
        assert!(Ruleset::default().validate().is_ok());
    }

    #[test]
    fn test_react_indicator_shape() {
        let ruleset = Ruleset::default();
        let react = ruleset
            .framework_indicators
            .iter()
            .find(|i| i.name == "react")
            .unwrap();
        assert_eq!(react.dependencies, vec!["react", "react-dom"]);
    }

    #[test]
    fn test_parse_partial_yaml_keeps_defaults() {
        let yaml = r#"
frameworkIndicators:
  - name: ember
    dependencies: ["ember-source"]
"#;
        let ruleset: Ruleset = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ruleset.framework_indicators.len(), 1);
        assert_eq!(ruleset.framework_indicators[0].name, "ember");
        // Untouched sections keep the compiled-in tables.
        assert!(!ruleset.tool_indicators.is_empty());
        assert_eq!(ruleset.weights, EvidenceWeights::default());
    }

    #[test]
    fn test_parse_custom_weights() {
        let yaml = r#"
weights:
  manifest: 0.5
  config: 0.25
  source: 0.25
"#;
        let ruleset: Ruleset = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ruleset.weights.manifest, 0.5);
        assert!(ruleset.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_dependency_list() {
        let mut ruleset = Ruleset::default();
        ruleset.framework_indicators.push(Indicator {
            name: "broken".to_string(),
            dependencies: vec![],
        });
        let err = ruleset.validate().unwrap_err();
        assert!(err.to_string().contains("empty dependency list"));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let mut ruleset = Ruleset::default();
        ruleset.tool_indicators.push(Indicator {
            name: "webpack".to_string(),
            dependencies: vec!["webpack-cli".to_string()],
        });
        let err = ruleset.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate pattern name"));
    }

    #[test]
    fn test_validate_rejects_nonpositive_weight() {
        let mut ruleset = Ruleset::default();
        ruleset.weights.config = 0.0;
        assert!(ruleset.validate().is_err());
    }

    #[test]
    fn test_database_library_lookup() {
        let ruleset = Ruleset::default();
        assert!(ruleset.is_database_library("mongoose"));
        assert!(!ruleset.is_database_library("express"));
    }
}

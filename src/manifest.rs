//! Dependency manifest analysis.
//!
//! Matches declared dependencies against the ruleset's indicator
//! tables, classifies run scripts into roles, and scores the manifest
//! with the partial-evidence weighting rule: a term only enters the
//! denominator when its evidence section exists in the manifest.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ruleset::{Indicator, Ruleset};
use crate::score::{self, caps, weights, DetectedPattern};

/// Canonical script roles with their accepted key aliases, in claim order.
const ROLE_ALIASES: [(&str, &[&str]); 6] = [
    ("build", &["build", "compile", "dist"]),
    ("start", &["start"]),
    ("dev", &["dev", "develop", "serve"]),
    ("test", &["test", "spec"]),
    ("lint", &["lint", "eslint"]),
    ("deploy", &["deploy", "publish", "release"]),
];

/// Tool names searched for in script commands, first match wins.
const BUILD_TOOLS: &[&str] = &[
    "webpack",
    "vite",
    "rollup",
    "parcel",
    "esbuild",
    "turbopack",
    "tsc",
    "babel",
];

/// Outcome of analyzing the dependency manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ManifestAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ManifestReport {
    fn ok(analysis: ManifestAnalysis) -> Self {
        ManifestReport {
            success: true,
            analysis: Some(analysis),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        ManifestReport {
            success: false,
            analysis: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub frameworks: BTreeMap<String, DetectedPattern>,
    pub tools: BTreeMap<String, DetectedPattern>,
    pub backend_libraries: BTreeMap<String, DetectedPattern>,
    pub scripts: ScriptRoles,
    pub dependency_counts: DependencyCounts,
    pub confidence: f64,
}

/// Run scripts classified into canonical roles.
///
/// Role fields hold the command string of the first key that claimed
/// the role; keys claiming no role land in `custom`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRoles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<String>,
    pub custom: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<String>,
}

impl ScriptRoles {
    fn slot_mut(&mut self, role: &str) -> Option<&mut Option<String>> {
        match role {
            "build" => Some(&mut self.build),
            "start" => Some(&mut self.start),
            "dev" => Some(&mut self.dev),
            "test" => Some(&mut self.test),
            "lint" => Some(&mut self.lint),
            "deploy" => Some(&mut self.deploy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCounts {
    pub production: usize,
    pub development: usize,
    pub total: usize,
}

/// Analyze a package manifest. Parse failure is fatal for this
/// component only and is reported, not propagated.
pub fn analyze(content: &str, ruleset: &Ruleset) -> ManifestReport {
    let parsed: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(error) => return ManifestReport::failed(error.to_string()),
    };
    let Some(root) = parsed.as_object() else {
        return ManifestReport::failed("manifest root is not an object".to_string());
    };

    let production_section = root.get("dependencies").and_then(Value::as_object);
    let development_section = root.get("devDependencies").and_then(Value::as_object);
    let has_dependency_sections = production_section.is_some() || development_section.is_some();

    let production: Vec<String> = production_section
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    let development: Vec<String> = development_section
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();
    let declared: BTreeSet<String> = production.iter().chain(&development).cloned().collect();

    let scripts_section = root.get("scripts").and_then(Value::as_object);
    let has_scripts_section = scripts_section.is_some();
    let script_commands: BTreeMap<String, String> = scripts_section
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| {
                    value.as_str().map(|command| (key.clone(), command.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    let frameworks = match_indicators(&ruleset.framework_indicators, &declared);
    let tools = match_indicators(&ruleset.tool_indicators, &declared);
    let backend_libraries = match_indicators(&ruleset.backend_library_indicators, &declared);
    let scripts = classify_scripts(&script_commands);

    let dependency_counts = DependencyCounts {
        production: production.len(),
        development: development.len(),
        total: production.len() + development.len(),
    };

    let mut terms: Vec<(f64, f64)> = Vec::new();
    if has_dependency_sections {
        terms.push((average_confidence(&frameworks), weights::PKG_FRAMEWORKS));
        terms.push((
            score::normalized_count(dependency_counts.total, caps::DEPENDENCIES),
            weights::PKG_DEP_COUNT,
        ));
        terms.push((
            score::normalized_count(tools.len(), caps::TOOLS),
            weights::PKG_TOOLS,
        ));
    }
    if has_scripts_section {
        let build_term = if scripts.build.is_some() { 1.0 } else { 0.0 };
        terms.push((build_term, weights::PKG_BUILD_SCRIPT));
    }
    let confidence = score::weighted_average(&terms);

    ManifestReport::ok(ManifestAnalysis {
        name: root.get("name").and_then(Value::as_str).map(str::to_string),
        version: root
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string),
        frameworks,
        tools,
        backend_libraries,
        scripts,
        dependency_counts,
        confidence,
    })
}

/// Intersect each indicator's dependency list with the declared set.
/// An indicator with no matches is omitted rather than reported at zero.
fn match_indicators(
    indicators: &[Indicator],
    declared: &BTreeSet<String>,
) -> BTreeMap<String, DetectedPattern> {
    let mut detected = BTreeMap::new();
    for indicator in indicators {
        let matched: Vec<String> = indicator
            .dependencies
            .iter()
            .filter(|dependency| declared.contains(*dependency))
            .cloned()
            .collect();
        if matched.is_empty() {
            continue;
        }
        let confidence = matched.len() as f64 / indicator.dependencies.len() as f64;
        detected.insert(indicator.name.clone(), DetectedPattern::new(confidence, matched));
    }
    detected
}

fn average_confidence(detected: &BTreeMap<String, DetectedPattern>) -> f64 {
    if detected.is_empty() {
        return 0.0;
    }
    detected.values().map(|pattern| pattern.confidence).sum::<f64>() / detected.len() as f64
}

fn matches_alias(key: &str, aliases: &[&str]) -> bool {
    aliases.iter().any(|alias| {
        key == *alias
            || key
                .strip_prefix(alias)
                .is_some_and(|rest| rest.starts_with(':'))
    })
}

/// Classify script keys into roles, visiting keys in sorted order so
/// the first claim is deterministic.
fn classify_scripts(scripts: &BTreeMap<String, String>) -> ScriptRoles {
    let mut roles = ScriptRoles::default();

    for (key, command) in scripts {
        let mut claimed = false;
        for (role, aliases) in ROLE_ALIASES {
            let Some(slot) = roles.slot_mut(role) else {
                continue;
            };
            if slot.is_some() || !matches_alias(key, aliases) {
                continue;
            }
            *slot = Some(command.clone());
            claimed = true;
            break;
        }
        if !claimed {
            roles.custom.push(key.clone());
        }
    }

    roles.build_tool = BUILD_TOOLS
        .iter()
        .find(|tool| scripts.values().any(|command| command.contains(*tool)))
        .map(|tool| tool.to_string());
    roles
}

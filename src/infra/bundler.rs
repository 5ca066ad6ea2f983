//! Bundler and framework config analysis.
//!
//! Feature flags come from substring presence, which is enough for
//! javascript config files we never execute.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Analysis of one bundler or framework config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerAnalysis {
    pub file: String,
    pub bundler: String,
    pub has_dev_server: bool,
    pub has_hot_reload: bool,
    pub ssr_disabled: bool,
    pub has_code_splitting: bool,
    pub plugins: Vec<String>,
}

/// Analyze a bundler config file.
pub fn analyze(file_name: &str, bundler: &str, content: &str) -> BundlerAnalysis {
    lazy_static::lazy_static! {
        // plugin constructor calls, e.g. new HtmlWebpackPlugin(...)
        static ref PLUGIN_RE: Regex = Regex::new(
            r"new\s+([A-Z][A-Za-z0-9_]*Plugin)\s*\("
        ).unwrap();
    }

    let mut plugins = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for caps in PLUGIN_RE.captures_iter(content) {
        let name = caps[1].to_string();
        if seen.insert(name.clone()) {
            plugins.push(name);
        }
    }

    BundlerAnalysis {
        file: file_name.to_string(),
        bundler: bundler.to_string(),
        has_dev_server: content.contains("devServer") || content.contains("server:"),
        has_hot_reload: content.contains("hmr")
            || content.contains("hot:")
            || content.contains("HotModuleReplacement"),
        ssr_disabled: content.contains("ssr: false"),
        has_code_splitting: content.contains("splitChunks") || content.contains("manualChunks"),
        plugins,
    }
}

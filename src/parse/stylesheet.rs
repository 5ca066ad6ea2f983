//! Stylesheet scanning for css, scss, sass, and less.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Signals extracted from a stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesheetMetadata {
    pub imports: Vec<String>,
    pub rule_count: usize,
    pub has_media_queries: bool,
    /// Custom properties or preprocessor variables.
    pub has_variables: bool,
}

/// Scan stylesheet content.
pub fn scan(content: &str) -> StylesheetMetadata {
    lazy_static::lazy_static! {
        static ref IMPORT_RE: Regex = Regex::new(
            r#"@import\s+(?:url\()?["']?([^"')\s;]+)"#
        ).unwrap();
        static ref MEDIA_RE: Regex = Regex::new(r"@media\b").unwrap();
        // css custom properties or scss/less variable definitions
        static ref VARIABLE_RE: Regex = Regex::new(
            r"--[A-Za-z][\w-]*\s*:|[$@][A-Za-z][\w-]*\s*:"
        ).unwrap();
    }

    let mut metadata = StylesheetMetadata::default();

    for caps in IMPORT_RE.captures_iter(content) {
        metadata.imports.push(caps[1].to_string());
    }
    metadata.rule_count = content.matches('{').count();
    metadata.has_media_queries = MEDIA_RE.is_match(content);
    metadata.has_variables = VARIABLE_RE.is_match(content);

    metadata
}

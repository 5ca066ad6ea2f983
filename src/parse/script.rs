//! Script scanning for javascript, react, and typescript sources.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Signals extracted from a script source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptMetadata {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    #[serde(rename = "hasJSX")]
    pub has_jsx: bool,
    pub has_hooks: bool,
    pub has_async: bool,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub type_aliases: Vec<String>,
    #[serde(default)]
    pub has_decorators: bool,
}

/// Scan script content. `typed` additionally collects interface and
/// type-alias names and decorator usage.
pub fn scan(content: &str, typed: bool) -> ScriptMetadata {
    lazy_static::lazy_static! {
        // import x from 'target', import 'target', import('target')
        static ref IMPORT_RE: Regex = Regex::new(
            r#"^\s*import\s+(?:type\s+)?(?:[\w{},*\s]+?\s+from\s+)?['"]([^'"]+)['"]"#
        ).unwrap();
        static ref DYNAMIC_IMPORT_RE: Regex = Regex::new(
            r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#
        ).unwrap();
        // require('target')
        static ref REQUIRE_RE: Regex = Regex::new(
            r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#
        ).unwrap();
        // export default function Name / export const Name
        static ref EXPORT_DECL_RE: Regex = Regex::new(
            r"^\s*export\s+(?:default\s+)?(?:async\s+)?(?:function|class|const|let|var)\s+([A-Za-z_$][\w$]*)"
        ).unwrap();
        // export { a, b as c }
        static ref EXPORT_LIST_RE: Regex = Regex::new(
            r"^\s*export\s*\{([^}]*)\}"
        ).unwrap();
        // function Name(
        static ref FUNCTION_RE: Regex = Regex::new(
            r"\bfunction\s+([A-Za-z_$][\w$]*)"
        ).unwrap();
        // const Name = (...) => / const Name = x =>
        static ref ARROW_RE: Regex = Regex::new(
            r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>"
        ).unwrap();
        static ref CLASS_RE: Regex = Regex::new(
            r"\bclass\s+([A-Za-z_$][\w$]*)"
        ).unwrap();
        // Capitalized component tag, or a closing/self-closing html tag.
        static ref JSX_COMPONENT_RE: Regex = Regex::new(
            r"<[A-Z][A-Za-z0-9]*[\s/>]"
        ).unwrap();
        static ref JSX_HTML_RE: Regex = Regex::new(
            r"</\s*[a-z][a-z0-9]*\s*>"
        ).unwrap();
        // Hook-convention call: useXxx(
        static ref HOOK_RE: Regex = Regex::new(
            r"\buse[A-Z][A-Za-z0-9]*\s*\("
        ).unwrap();
        static ref ASYNC_RE: Regex = Regex::new(
            r"\basync\s|\bawait\s"
        ).unwrap();
        static ref INTERFACE_RE: Regex = Regex::new(
            r"^\s*(?:export\s+)?interface\s+([A-Za-z_$][\w$]*)"
        ).unwrap();
        static ref TYPE_ALIAS_RE: Regex = Regex::new(
            r"^\s*(?:export\s+)?type\s+([A-Za-z_$][\w$]*)\s*="
        ).unwrap();
        static ref DECORATOR_RE: Regex = Regex::new(
            r"^\s*@[A-Za-z_$][\w$]*"
        ).unwrap();
    }

    let mut metadata = ScriptMetadata::default();
    let mut seen_imports = HashSet::new();
    let mut seen_exports = HashSet::new();
    let mut seen_functions = HashSet::new();
    let mut seen_classes = HashSet::new();
    let mut seen_interfaces = HashSet::new();
    let mut seen_aliases = HashSet::new();

    for line in content.lines() {
        let trimmed = line.trim();

        // Skip comments
        if trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*') {
            continue;
        }

        for caps in IMPORT_RE
            .captures_iter(line)
            .chain(DYNAMIC_IMPORT_RE.captures_iter(line))
            .chain(REQUIRE_RE.captures_iter(line))
        {
            if let Some(target) = caps.get(1) {
                let target = target.as_str().to_string();
                if seen_imports.insert(target.clone()) {
                    metadata.imports.push(target);
                }
            }
        }

        if let Some(caps) = EXPORT_DECL_RE.captures(line) {
            let name = caps[1].to_string();
            if seen_exports.insert(name.clone()) {
                metadata.exports.push(name);
            }
        }
        if let Some(caps) = EXPORT_LIST_RE.captures(line) {
            for item in caps[1].split(',') {
                // "a as b" exports the name b
                let name = item.split_whitespace().last().unwrap_or("").to_string();
                if !name.is_empty() && seen_exports.insert(name.clone()) {
                    metadata.exports.push(name);
                }
            }
        }

        for caps in FUNCTION_RE.captures_iter(line) {
            let name = caps[1].to_string();
            if seen_functions.insert(name.clone()) {
                metadata.functions.push(name);
            }
        }
        for caps in ARROW_RE.captures_iter(line) {
            let name = caps[1].to_string();
            if seen_functions.insert(name.clone()) {
                metadata.functions.push(name);
            }
        }
        for caps in CLASS_RE.captures_iter(line) {
            let name = caps[1].to_string();
            if seen_classes.insert(name.clone()) {
                metadata.classes.push(name);
            }
        }

        if !metadata.has_jsx && (JSX_COMPONENT_RE.is_match(line) || JSX_HTML_RE.is_match(line)) {
            metadata.has_jsx = true;
        }
        if !metadata.has_hooks && HOOK_RE.is_match(line) {
            metadata.has_hooks = true;
        }
        if !metadata.has_async && ASYNC_RE.is_match(line) {
            metadata.has_async = true;
        }

        if typed {
            if let Some(caps) = INTERFACE_RE.captures(line) {
                let name = caps[1].to_string();
                if seen_interfaces.insert(name.clone()) {
                    metadata.interfaces.push(name);
                }
            }
            if let Some(caps) = TYPE_ALIAS_RE.captures(line) {
                let name = caps[1].to_string();
                if seen_aliases.insert(name.clone()) {
                    metadata.type_aliases.push(name);
                }
            }
            if !metadata.has_decorators && DECORATOR_RE.is_match(line) {
                metadata.has_decorators = true;
            }
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_imports() {
        let content = r#"
import React from 'react';
import { useState } from 'react';
import styles from './App.css';
const lodash = require('lodash');
"#;
        let meta = scan(content, false);
        assert_eq!(meta.imports, vec!["react", "./App.css", "lodash"]);
    }

    #[test]
    fn test_scan_exports_and_functions() {
        let content = r#"
export default function App() {}
export const helper = (x) => x + 1;
export { format, render as draw }
function internal() {}
class Store {}
"#;
        let meta = scan(content, false);
        assert_eq!(meta.exports, vec!["App", "helper", "format", "draw"]);
        assert!(meta.functions.contains(&"App".to_string()));
        assert!(meta.functions.contains(&"helper".to_string()));
        assert!(meta.functions.contains(&"internal".to_string()));
        assert_eq!(meta.classes, vec!["Store"]);
    }

    #[test]
    fn test_scan_jsx_detection() {
        let meta = scan("return <Header title=\"hi\" />;", false);
        assert!(meta.has_jsx);

        let meta = scan("return <div>hello</div>;", false);
        assert!(meta.has_jsx);

        let meta = scan("const smaller = a < b;", false);
        assert!(!meta.has_jsx);
    }

    #[test]
    fn test_scan_hooks_detection() {
        let content =
            "import React from 'react'; export default function App(){ const [x,setX]=React.useState(0); return null; }";
        let meta = scan(content, false);
        assert!(meta.has_hooks);
        assert!(!meta.has_jsx);

        let meta = scan("const user = fetchUser();", false);
        assert!(!meta.has_hooks);
    }

    #[test]
    fn test_scan_async_detection() {
        let meta = scan("async function load() { await fetch('/api'); }", false);
        assert!(meta.has_async);
        assert!(scan("const data = await load();", false).has_async);
        assert!(!scan("const asyncish = 1;", false).has_async);
    }

    #[test]
    fn test_scan_typed_extras() {
        let content = r#"
interface Props { title: string }
export type State = { count: number };
@Component
class Widget {}
"#;
        let meta = scan(content, true);
        assert_eq!(meta.interfaces, vec!["Props"]);
        assert_eq!(meta.type_aliases, vec!["State"]);
        assert!(meta.has_decorators);

        // Plain scan ignores typed constructs.
        let meta = scan(content, false);
        assert!(meta.interfaces.is_empty());
        assert!(!meta.has_decorators);
    }

    #[test]
    fn test_scan_skips_comments() {
        let content = r#"
// import React from 'react';
/* const x = require('lodash'); */
import vue from 'vue';
"#;
        let meta = scan(content, false);
        assert_eq!(meta.imports, vec!["vue"]);
    }

    #[test]
    fn test_scan_deduplicates() {
        let content = "import a from 'pkg';\nimport b from 'pkg';\n";
        let meta = scan(content, false);
        assert_eq!(meta.imports, vec!["pkg"]);
    }

    #[test]
    fn test_scan_empty_content() {
        let meta = scan("", false);
        assert!(meta.imports.is_empty());
        assert!(!meta.has_jsx && !meta.has_hooks && !meta.has_async);
    }
}

//! Python source scanning.
//!
//! The backend heuristics care about web-framework markers more than the
//! full import graph, so the scan keeps the first module segment and a few
//! framework booleans.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Signals extracted from a python source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonMetadata {
    pub imports: Vec<String>,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub has_flask: bool,
    pub has_django: bool,
    pub has_fastapi: bool,
    pub route_count: usize,
}

/// Scan python content for imports, definitions, and framework markers.
pub fn scan(content: &str) -> PythonMetadata {
    lazy_static::lazy_static! {
        // import foo, import foo.bar
        static ref IMPORT_RE: Regex = Regex::new(
            r"^\s*import\s+([A-Za-z_][\w]*)"
        ).unwrap();
        // from foo import bar
        static ref FROM_IMPORT_RE: Regex = Regex::new(
            r"^\s*from\s+([A-Za-z_][\w]*)\S*\s+import\b"
        ).unwrap();
        static ref DEF_RE: Regex = Regex::new(
            r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)"
        ).unwrap();
        static ref CLASS_RE: Regex = Regex::new(
            r"^\s*class\s+([A-Za-z_]\w*)"
        ).unwrap();
        // @app.route("/"), @router.get("/"), @blueprint.post(...)
        static ref ROUTE_RE: Regex = Regex::new(
            r"^\s*@\w+\.(?:route|get|post|put|delete|patch)\s*\("
        ).unwrap();
        static ref FLASK_RE: Regex = Regex::new(
            r"\bfrom\s+flask\b|\bimport\s+flask\b|\bFlask\s*\("
        ).unwrap();
        static ref DJANGO_RE: Regex = Regex::new(
            r"\bfrom\s+django\b|\bimport\s+django\b"
        ).unwrap();
        static ref FASTAPI_RE: Regex = Regex::new(
            r"\bfrom\s+fastapi\b|\bimport\s+fastapi\b|\bFastAPI\s*\("
        ).unwrap();
    }

    let mut metadata = PythonMetadata::default();
    let mut seen_imports = HashSet::new();
    let mut seen_functions = HashSet::new();
    let mut seen_classes = HashSet::new();
    let mut in_docstring = false;

    for line in content.lines() {
        let trimmed = line.trim();

        // Triple-quoted docstring tracking, single level.
        if in_docstring {
            if trimmed.contains("\"\"\"") || trimmed.contains("'''") {
                in_docstring = false;
            }
            continue;
        }
        if trimmed.starts_with("\"\"\"") || trimmed.starts_with("'''") {
            let rest = &trimmed[3..];
            if !rest.contains("\"\"\"") && !rest.contains("'''") {
                in_docstring = true;
            }
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        for caps in IMPORT_RE
            .captures_iter(line)
            .chain(FROM_IMPORT_RE.captures_iter(line))
        {
            let name = caps[1].to_string();
            if seen_imports.insert(name.clone()) {
                metadata.imports.push(name);
            }
        }
        if let Some(caps) = DEF_RE.captures(line) {
            let name = caps[1].to_string();
            if seen_functions.insert(name.clone()) {
                metadata.functions.push(name);
            }
        }
        if let Some(caps) = CLASS_RE.captures(line) {
            let name = caps[1].to_string();
            if seen_classes.insert(name.clone()) {
                metadata.classes.push(name);
            }
        }
        if ROUTE_RE.is_match(line) {
            metadata.route_count += 1;
        }
        if !metadata.has_flask && FLASK_RE.is_match(line) {
            metadata.has_flask = true;
        }
        if !metadata.has_django && DJANGO_RE.is_match(line) {
            metadata.has_django = true;
        }
        if !metadata.has_fastapi && FASTAPI_RE.is_match(line) {
            metadata.has_fastapi = true;
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_flask_app() {
        let content = r#"
from flask import Flask, jsonify
import os

app = Flask(__name__)

@app.route("/api/health")
def health():
    return jsonify(status="ok")

@app.route("/api/users")
def users():
    return jsonify([])
"#;
        let meta = scan(content);
        assert!(meta.has_flask);
        assert!(!meta.has_django);
        assert_eq!(meta.imports, vec!["flask", "os"]);
        assert_eq!(meta.functions, vec!["health", "users"]);
        assert_eq!(meta.route_count, 2);
    }

    #[test]
    fn test_scan_fastapi_markers() {
        let content = "from fastapi import FastAPI\napp = FastAPI()\n\n@app.get(\"/\")\nasync def root():\n    return {}\n";
        let meta = scan(content);
        assert!(meta.has_fastapi);
        assert_eq!(meta.route_count, 1);
        assert_eq!(meta.functions, vec!["root"]);
    }

    #[test]
    fn test_scan_classes_and_django() {
        let content = "from django.db import models\n\nclass User(models.Model):\n    pass\n";
        let meta = scan(content);
        assert!(meta.has_django);
        assert_eq!(meta.classes, vec!["User"]);
    }

    #[test]
    fn test_scan_skips_docstrings_and_comments() {
        let content = r#"
"""
import fake_module
"""
# import other_fake
import real_module
"#;
        let meta = scan(content);
        assert_eq!(meta.imports, vec!["real_module"]);
    }

    #[test]
    fn test_scan_plain_script_has_no_framework_markers() {
        let meta = scan("import sys\n\ndef main():\n    print(sys.argv)\n");
        assert!(!meta.has_flask && !meta.has_django && !meta.has_fastapi);
        assert_eq!(meta.route_count, 0);
    }
}

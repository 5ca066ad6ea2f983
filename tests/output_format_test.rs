//! Tests for the serialized output contract.
//!
//! Downstream consumers key on exact member names: camelCase fields,
//! lowercase category names, kebab-case kind names, and flat
//! `type`-tagged config objects. These tests pin that surface.

use serde_json::Value;

use stackscope::aggregate::{analyze_files, AnalysisResult};
use stackscope::classify::SubmittedFile;

fn file(name: &str, content: &str) -> SubmittedFile {
    SubmittedFile::new(name, content)
}

/// A small set that exercises every branch of the serialized shape.
fn shape_fixture() -> Vec<SubmittedFile> {
    vec![
        file(
            "package.json",
            r#"{"name":"demo","version":"0.1.0","scripts":{"build":"vite build"},"dependencies":{"react":"18","react-dom":"18","express":"4"},"devDependencies":{"vite":"5"}}"#,
        ),
        file("docker-compose.yml", "services:\n  web:\n  postgres:\n"),
        file(".env", "DATABASE_URL=postgres://localhost/demo\nAWS_REGION=us-east-1\n"),
        file(
            "src/App.jsx",
            "import React from 'react';\nexport default function App() { return <div>hi</div>; }\n",
        ),
    ]
}

fn analyzed() -> Value {
    let result = analyze_files(&shape_fixture());
    serde_json::to_value(&result).expect("result should serialize")
}

#[test]
fn test_top_level_members() {
    let value = analyzed();
    for key in ["summary", "files", "manifest", "configs", "patterns"] {
        assert!(value.get(key).is_some(), "missing top-level member {}", key);
    }
}

#[test]
fn test_summary_members() {
    let value = analyzed();
    let summary = &value["summary"];
    assert_eq!(summary["totalFiles"], 4);
    assert!(summary["confidence"].is_f64());

    let counts = summary["categoryCounts"]
        .as_object()
        .expect("categoryCounts should be an object");
    assert_eq!(counts["config"], 3);
    assert_eq!(counts["frontend"], 1);
    // Absent categories are absent, not zero.
    assert!(counts.get("backend").is_none());
}

#[test]
fn test_classification_names() {
    let value = analyzed();
    let files = value["files"].as_array().expect("files should be an array");
    assert_eq!(files.len(), 4);

    let manifest = &files[0]["classification"];
    assert_eq!(manifest["category"], "config");
    assert_eq!(manifest["kind"], "manifest");
    assert_eq!(manifest["extension"], "json");

    let jsx = &files[3]["classification"];
    assert_eq!(jsx["category"], "frontend");
    assert_eq!(jsx["kind"], "react");
    assert_eq!(jsx["extension"], "jsx");
}

#[test]
fn test_parsed_content_only_on_source_files() {
    let value = analyzed();
    let files = value["files"].as_array().expect("files should be an array");

    // Config files carry no parsedContent member at all.
    assert!(files[0].get("parsedContent").is_none());
    assert!(files[1].get("parsedContent").is_none());
    assert!(files[2].get("parsedContent").is_none());

    let parsed = &files[3]["parsedContent"];
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["metadata"]["kind"], "script");
    assert_eq!(parsed["metadata"]["hasJSX"], true);
    assert_eq!(parsed["metadata"]["hasHooks"], false);
    assert!(parsed.get("error").is_none());
}

#[test]
fn test_manifest_member_names() {
    let value = analyzed();
    let manifest = &value["manifest"];
    assert_eq!(manifest["success"], true);

    let analysis = &manifest["analysis"];
    assert_eq!(analysis["name"], "demo");
    assert_eq!(analysis["version"], "0.1.0");
    assert!(analysis["frameworks"]["react"].is_object());
    assert!(analysis["tools"]["vite"].is_object());
    assert!(analysis["backendLibraries"]["express"].is_object());
    assert_eq!(analysis["scripts"]["build"], "vite build");
    assert_eq!(analysis["scripts"]["buildTool"], "vite");
    assert_eq!(analysis["dependencyCounts"]["production"], 3);
    assert_eq!(analysis["dependencyCounts"]["development"], 1);
    assert_eq!(analysis["dependencyCounts"]["total"], 4);
    assert!(analysis["confidence"].is_f64());
}

#[test]
fn test_configs_are_flat_type_tagged_objects() {
    let value = analyzed();
    let configs = value["configs"]
        .as_array()
        .expect("configs should be an array");
    assert_eq!(configs.len(), 2);

    let compose = &configs[0];
    assert_eq!(compose["type"], "compose");
    assert_eq!(compose["file"], "docker-compose.yml");
    assert_eq!(compose["hasDatabase"], true);
    assert!(compose["services"].is_array());
    assert!(compose["complexity"].is_u64());

    let env = &configs[1];
    assert_eq!(env["type"], "env");
    assert_eq!(env["file"], ".env");
    assert_eq!(env["hasDatabase"], true);
    assert_eq!(env["hasAuth"], false);
    assert_eq!(env["hasAWS"], true);
}

#[test]
fn test_pattern_entries_carry_confidence_and_evidence() {
    let value = analyzed();

    let react = &value["patterns"]["frameworks"]["react"];
    assert!(react["confidence"].is_f64());
    let evidence = react["evidence"]
        .as_array()
        .expect("evidence should be an array");
    assert!(!evidence.is_empty());

    let database = &value["patterns"]["infrastructure"]["database"];
    assert_eq!(database["confidence"], 0.8);
}

#[test]
fn test_camel_case_members_in_raw_output() {
    let result = analyze_files(&shape_fixture());
    let json = serde_json::to_string(&result).expect("should serialize");

    for member in [
        "\"totalFiles\"",
        "\"categoryCounts\"",
        "\"parsedContent\"",
        "\"hasJSX\"",
        "\"hasHooks\"",
        "\"backendLibraries\"",
        "\"dependencyCounts\"",
        "\"buildTool\"",
        "\"hasDatabase\"",
        "\"hasAWS\"",
    ] {
        assert!(json.contains(member), "output should contain {}", member);
    }

    // No snake_case leaks.
    assert!(!json.contains("\"total_files\""));
    assert!(!json.contains("\"has_database\""));
}

#[test]
fn test_absent_manifest_is_omitted() {
    let result = analyze_files(&[file("notes.md", "# notes")]);
    let value = serde_json::to_value(&result).expect("should serialize");

    assert!(value.get("manifest").is_none());
    // Empty pattern maps stay empty objects, not null.
    assert!(value["patterns"]["frameworks"]
        .as_object()
        .is_some_and(|map| map.is_empty()));
}

#[test]
fn test_result_round_trips_through_json() {
    let result = analyze_files(&shape_fixture());
    let value = serde_json::to_value(&result).expect("should serialize");
    let back: AnalysisResult = serde_json::from_value(value).expect("should deserialize");
    assert_eq!(back, result);
}

//! Container build file analysis.
//!
//! Line-based extraction of the base image, exposed ports, and the
//! ordered set of distinct instruction keywords. Not a full Dockerfile
//! parser.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Signals from container build content, independent of any file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerBuildFacts {
    pub base_image: Option<String>,
    pub exposed_ports: Vec<String>,
    pub instructions: Vec<String>,
    pub multi_stage: bool,
}

/// Analysis of one container build file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerBuildAnalysis {
    pub file: String,
    pub base_image: Option<String>,
    pub exposed_ports: Vec<String>,
    pub instructions: Vec<String>,
    pub multi_stage: bool,
}

/// Scan container build content for its structural signals.
pub fn scan(content: &str) -> ContainerBuildFacts {
    let mut facts = ContainerBuildFacts::default();
    let mut seen_instructions: HashSet<String> = HashSet::new();
    let mut from_count = 0usize;
    let mut continued = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if continued {
            // argument continuation, not a new instruction
            continued = trimmed.ends_with('\\');
            continue;
        }
        continued = trimmed.ends_with('\\');

        let mut tokens = trimmed.split_whitespace();
        let keyword = match tokens.next() {
            Some(word) if word.chars().all(|c| c.is_ascii_alphabetic()) => {
                word.to_ascii_uppercase()
            }
            _ => continue,
        };

        match keyword.as_str() {
            "FROM" => {
                from_count += 1;
                if facts.base_image.is_none() {
                    // FROM [--platform=...] <image> [AS <stage>]
                    facts.base_image = tokens
                        .find(|t| !t.starts_with("--"))
                        .map(str::to_string);
                }
            }
            "EXPOSE" => {
                for token in tokens {
                    if let Some(port) = token.split('/').next() {
                        if !port.is_empty() {
                            facts.exposed_ports.push(port.to_string());
                        }
                    }
                }
            }
            _ => {}
        }

        if seen_instructions.insert(keyword.clone()) {
            facts.instructions.push(keyword);
        }
    }

    facts.multi_stage = from_count > 1;
    facts
}

/// Analyze a container build file.
pub fn analyze(file_name: &str, content: &str) -> ContainerBuildAnalysis {
    let facts = scan(content);
    ContainerBuildAnalysis {
        file: file_name.to_string(),
        base_image: facts.base_image,
        exposed_ports: facts.exposed_ports,
        instructions: facts.instructions,
        multi_stage: facts.multi_stage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_build() {
        let content = r#"
FROM node:20-alpine
WORKDIR /app
COPY package.json .
RUN npm install
COPY . .
EXPOSE 3000
CMD ["node", "server.js"]
"#;
        let facts = scan(content);
        assert_eq!(facts.base_image.as_deref(), Some("node:20-alpine"));
        assert_eq!(facts.exposed_ports, vec!["3000"]);
        assert_eq!(
            facts.instructions,
            vec!["FROM", "WORKDIR", "COPY", "RUN", "EXPOSE", "CMD"]
        );
        assert!(!facts.multi_stage);
    }

    #[test]
    fn test_scan_multi_stage_keeps_first_base() {
        let content = "FROM node:20 AS build\nRUN npm run build\nFROM nginx:alpine\nCOPY --from=build /app/dist /usr/share/nginx/html\n";
        let facts = scan(content);
        assert_eq!(facts.base_image.as_deref(), Some("node:20"));
        assert!(facts.multi_stage);
    }

    #[test]
    fn test_scan_platform_flag_skipped() {
        let facts = scan("FROM --platform=linux/amd64 python:3.12-slim\n");
        assert_eq!(facts.base_image.as_deref(), Some("python:3.12-slim"));
    }

    #[test]
    fn test_scan_expose_variants() {
        let facts = scan("FROM alpine\nEXPOSE 8080/tcp 9090\nEXPOSE 5432\n");
        assert_eq!(facts.exposed_ports, vec!["8080", "9090", "5432"]);
    }

    #[test]
    fn test_scan_continuation_lines_not_instructions() {
        let content = "FROM debian:bookworm\nRUN apt-get update \\\n    && apt-get install -y curl \\\n    && rm -rf /var/lib/apt/lists/*\nCMD [\"bash\"]\n";
        let facts = scan(content);
        assert_eq!(facts.instructions, vec!["FROM", "RUN", "CMD"]);
    }

    #[test]
    fn test_scan_comments_and_case() {
        let content = "# syntax=docker/dockerfile:1\nfrom ubuntu:22.04\nrun echo hi\n";
        let facts = scan(content);
        assert_eq!(facts.base_image.as_deref(), Some("ubuntu:22.04"));
        assert_eq!(facts.instructions, vec!["FROM", "RUN"]);
    }

    #[test]
    fn test_analyze_carries_file_name() {
        let analysis = analyze("Dockerfile", "FROM alpine\n");
        assert_eq!(analysis.file, "Dockerfile");
        assert_eq!(analysis.base_image.as_deref(), Some("alpine"));
    }
}

//! Compose file analysis.
//!
//! Indentation-bounded block scanning of the top-level `services`,
//! `volumes`, and `networks` mappings. Deliberately not a yaml parse:
//! the block names are all we need, and sloppy real-world compose
//! files should still yield them.

use serde::{Deserialize, Serialize};

/// Engine substrings that mark a service as a database.
const DATABASE_ENGINES: &[&str] = &[
    "postgres",
    "mysql",
    "mariadb",
    "mongo",
    "redis",
    "elasticsearch",
    "cassandra",
    "clickhouse",
];

/// Analysis of one compose file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeAnalysis {
    pub file: String,
    pub services: Vec<String>,
    pub volumes: Vec<String>,
    pub networks: Vec<String>,
    pub has_database: bool,
    /// Count of services + volumes + networks.
    pub complexity: usize,
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Services,
    Volumes,
    Networks,
}

/// Analyze a compose file.
pub fn analyze(file_name: &str, content: &str) -> ComposeAnalysis {
    let mut services = Vec::new();
    let mut volumes = Vec::new();
    let mut networks = Vec::new();

    let mut section: Option<Section> = None;
    let mut child_indent: Option<usize> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - line.trim_start().len();

        if indent == 0 {
            section = match trimmed {
                "services:" => Some(Section::Services),
                "volumes:" => Some(Section::Volumes),
                "networks:" => Some(Section::Networks),
                _ => None,
            };
            child_indent = None;
            continue;
        }

        let Some(current) = section else { continue };

        // first indented line under the header fixes the entry depth
        let entry_indent = *child_indent.get_or_insert(indent);
        if indent != entry_indent || trimmed.starts_with('-') {
            continue;
        }

        let Some((name, _)) = trimmed.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        match current {
            Section::Services => services.push(name.to_string()),
            Section::Volumes => volumes.push(name.to_string()),
            Section::Networks => networks.push(name.to_string()),
        }
    }

    let has_database = services.iter().any(|service| {
        let lowered = service.to_lowercase();
        DATABASE_ENGINES.iter().any(|engine| lowered.contains(engine))
    });
    let complexity = services.len() + volumes.len() + networks.len();

    ComposeAnalysis {
        file: file_name.to_string(),
        services,
        volumes,
        networks,
        has_database,
        complexity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEB_WITH_POSTGRES: &str = r#"version: "3.8"
services:
  web:
    image: nginx
    ports:
      - "80:80"
  postgres:
    image: postgres:16
    environment:
      POSTGRES_PASSWORD: secret
volumes:
  pgdata:
"#;

    #[test]
    fn test_analyze_services_and_volumes() {
        let analysis = analyze("docker-compose.yml", WEB_WITH_POSTGRES);
        assert_eq!(analysis.services, vec!["web", "postgres"]);
        assert_eq!(analysis.volumes, vec!["pgdata"]);
        assert!(analysis.networks.is_empty());
        assert_eq!(analysis.complexity, 3);
    }

    #[test]
    fn test_analyze_database_service() {
        let analysis = analyze("docker-compose.yml", WEB_WITH_POSTGRES);
        assert!(analysis.has_database);
    }

    #[test]
    fn test_analyze_no_database() {
        let content = "services:\n  app:\n    image: node:20\n  worker:\n    image: node:20\n";
        let analysis = analyze("compose.yml", content);
        assert_eq!(analysis.services, vec!["app", "worker"]);
        assert!(!analysis.has_database);
        assert_eq!(analysis.complexity, 2);
    }

    #[test]
    fn test_analyze_networks_section() {
        let content = "networks:\n  frontend:\n    driver: bridge\n  backend:\n";
        let analysis = analyze("compose.yaml", content);
        assert_eq!(analysis.networks, vec!["frontend", "backend"]);
    }

    #[test]
    fn test_analyze_children_not_counted_as_entries() {
        let analysis = analyze("docker-compose.yml", WEB_WITH_POSTGRES);
        assert!(!analysis.services.contains(&"image".to_string()));
        assert!(!analysis.services.contains(&"ports".to_string()));
    }

    #[test]
    fn test_analyze_empty_content() {
        let analysis = analyze("docker-compose.yml", "");
        assert!(analysis.services.is_empty());
        assert_eq!(analysis.complexity, 0);
        assert!(!analysis.has_database);
    }

    #[test]
    fn test_analyze_redis_counts_as_database() {
        let content = "services:\n  redis-cache:\n    image: redis:7\n";
        let analysis = analyze("docker-compose.yml", content);
        assert!(analysis.has_database);
    }
}

//! Environment file analysis.

use serde::{Deserialize, Serialize};

const DATABASE_MARKERS: &[&str] = &["DATABASE", "DB_", "POSTGRES", "MYSQL", "MONGO", "REDIS"];
const AUTH_MARKERS: &[&str] = &["AUTH", "JWT", "SECRET", "TOKEN", "SESSION"];
const AWS_MARKERS: &[&str] = &["AWS_", "S3_"];

/// Analysis of one environment file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvFileAnalysis {
    pub file: String,
    pub variables: Vec<String>,
    pub has_database: bool,
    pub has_auth: bool,
    #[serde(rename = "hasAWS")]
    pub has_aws: bool,
}

/// Analyze an environment file: variable names plus naming-pattern booleans.
pub fn analyze(file_name: &str, content: &str) -> EnvFileAnalysis {
    let mut variables = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((name, _)) = trimmed.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if !name.is_empty() {
            variables.push(name.to_string());
        }
    }

    let matches_any = |markers: &[&str]| {
        variables.iter().any(|variable| {
            let upper = variable.to_uppercase();
            markers.iter().any(|marker| upper.contains(marker))
        })
    };

    let has_database = matches_any(DATABASE_MARKERS);
    let has_auth = matches_any(AUTH_MARKERS);
    let has_aws = matches_any(AWS_MARKERS);

    EnvFileAnalysis {
        file: file_name.to_string(),
        variables,
        has_database,
        has_auth,
        has_aws,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_variable_names() {
        let content = "# local overrides\nPORT=3000\nDATABASE_URL=postgres://localhost/app\n\nNODE_ENV=development\n";
        let analysis = analyze(".env", content);
        assert_eq!(analysis.variables, vec!["PORT", "DATABASE_URL", "NODE_ENV"]);
    }

    #[test]
    fn test_analyze_database_marker() {
        let analysis = analyze(".env", "DATABASE_URL=postgres://localhost/app\n");
        assert!(analysis.has_database);
        assert!(!analysis.has_auth);
        assert!(!analysis.has_aws);
    }

    #[test]
    fn test_analyze_auth_markers() {
        let analysis = analyze(".env", "JWT_SECRET=abc123\nSESSION_TTL=3600\n");
        assert!(analysis.has_auth);
    }

    #[test]
    fn test_analyze_aws_markers() {
        let analysis = analyze(".env.production", "AWS_ACCESS_KEY_ID=AKIA\nS3_BUCKET=assets\n");
        assert!(analysis.has_aws);
    }

    #[test]
    fn test_analyze_case_insensitive_markers() {
        let analysis = analyze(".env", "db_host=localhost\n");
        assert!(analysis.has_database);
    }

    #[test]
    fn test_analyze_comments_and_blanks_skipped() {
        let analysis = analyze(".env", "# DATABASE_URL=commented-out\n\n");
        assert!(analysis.variables.is_empty());
        assert!(!analysis.has_database);
    }
}

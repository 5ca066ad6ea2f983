//! Structural scanning of json and yaml data files.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shape summary of a structured data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredMetadata {
    pub format: DataFormat,
    pub top_level_keys: Vec<String>,
    pub entry_count: usize,
}

/// Parse content in the given format and summarize its top-level shape.
///
/// Returns the parser's message on malformed input so callers can record
/// the failure without aborting.
pub fn scan(content: &str, format: DataFormat) -> Result<StructuredMetadata, String> {
    match format {
        DataFormat::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|e| e.to_string())?;
            Ok(summarize_json(&value, format))
        }
        DataFormat::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| e.to_string())?;
            Ok(summarize_yaml(&value, format))
        }
    }
}

fn summarize_json(value: &serde_json::Value, format: DataFormat) -> StructuredMetadata {
    match value {
        serde_json::Value::Object(map) => StructuredMetadata {
            format,
            top_level_keys: map.keys().cloned().collect(),
            entry_count: map.len(),
        },
        serde_json::Value::Array(items) => StructuredMetadata {
            format,
            top_level_keys: Vec::new(),
            entry_count: items.len(),
        },
        _ => StructuredMetadata {
            format,
            top_level_keys: Vec::new(),
            entry_count: 0,
        },
    }
}

fn summarize_yaml(value: &serde_yaml::Value, format: DataFormat) -> StructuredMetadata {
    match value {
        serde_yaml::Value::Mapping(map) => StructuredMetadata {
            format,
            top_level_keys: map
                .keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect(),
            entry_count: map.len(),
        },
        serde_yaml::Value::Sequence(items) => StructuredMetadata {
            format,
            top_level_keys: Vec::new(),
            entry_count: items.len(),
        },
        _ => StructuredMetadata {
            format,
            top_level_keys: Vec::new(),
            entry_count: 0,
        },
    }
}

//! Content parsing.
//!
//! Extracts structured signals from file contents using per-kind regex
//! scanning. This is deliberately not real parsing: the scoring layer
//! assumes cheap, noisy signals combined redundantly across sources.
//! Dispatch is an exhaustive match on the classification kind; kinds with
//! no dedicated scanner fall back to a generic line/character profile.

pub mod markup;
pub mod python;
pub mod script;
pub mod structured;
pub mod stylesheet;

use serde::{Deserialize, Serialize};

use crate::classify::FileKind;
use crate::infra;

pub use markup::MarkupMetadata;
pub use python::PythonMetadata;
pub use script::ScriptMetadata;
pub use structured::{DataFormat, StructuredMetadata};
pub use stylesheet::StylesheetMetadata;

/// The outcome of parsing one file's content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedContent {
    pub success: bool,
    pub metadata: ContentMetadata,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl ParsedContent {
    pub fn ok(metadata: ContentMetadata) -> Self {
        Self {
            success: true,
            metadata,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            metadata: ContentMetadata::Empty,
            error: Some(error.into()),
        }
    }
}

/// Extracted metadata, keyed by the scanner family that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentMetadata {
    Script(ScriptMetadata),
    Python(PythonMetadata),
    Markup(MarkupMetadata),
    Stylesheet(StylesheetMetadata),
    Structured(StructuredMetadata),
    ContainerBuild(ContainerBuildMetadata),
    Generic(GenericMetadata),
    /// No metadata; the parse failed.
    Empty,
}

/// Signals from a container build file, absent the file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerBuildMetadata {
    pub base_image: Option<String>,
    pub exposed_ports: Vec<String>,
    pub instructions: Vec<String>,
    pub multi_stage: bool,
}

/// Fallback profile for kinds without a dedicated scanner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericMetadata {
    pub line_count: usize,
    pub char_count: usize,
    pub looks_like_code: bool,
}

/// Parse file content according to its classified kind.
///
/// Never panics and never returns an error: scanner failures (malformed
/// structured data) come back as a `success = false` result with the
/// message in `error`.
pub fn parse(content: &str, kind: FileKind) -> ParsedContent {
    match kind {
        FileKind::Javascript | FileKind::React | FileKind::Vue | FileKind::Svelte => {
            ParsedContent::ok(ContentMetadata::Script(script::scan(content, false)))
        }
        FileKind::TypeScript => {
            ParsedContent::ok(ContentMetadata::Script(script::scan(content, true)))
        }
        // Bundler configs are javascript modules; scan them as scripts.
        FileKind::WebpackConfig
        | FileKind::ViteConfig
        | FileKind::NextConfig
        | FileKind::BabelConfig => {
            ParsedContent::ok(ContentMetadata::Script(script::scan(content, false)))
        }
        FileKind::Python => ParsedContent::ok(ContentMetadata::Python(python::scan(content))),
        FileKind::Html => ParsedContent::ok(ContentMetadata::Markup(markup::scan(content))),
        FileKind::Stylesheet => {
            ParsedContent::ok(ContentMetadata::Stylesheet(stylesheet::scan(content)))
        }
        FileKind::Manifest | FileKind::Json | FileKind::TsConfig => {
            match structured::scan(content, DataFormat::Json) {
                Ok(metadata) => ParsedContent::ok(ContentMetadata::Structured(metadata)),
                Err(error) => ParsedContent::failed(error),
            }
        }
        FileKind::Yaml | FileKind::Compose | FileKind::CiPipeline => {
            match structured::scan(content, DataFormat::Yaml) {
                Ok(metadata) => ParsedContent::ok(ContentMetadata::Structured(metadata)),
                Err(error) => ParsedContent::failed(error),
            }
        }
        FileKind::ContainerBuild => {
            let facts = infra::dockerfile::scan(content);
            ParsedContent::ok(ContentMetadata::ContainerBuild(ContainerBuildMetadata {
                base_image: facts.base_image,
                exposed_ports: facts.exposed_ports,
                instructions: facts.instructions,
                multi_stage: facts.multi_stage,
            }))
        }
        FileKind::Ruby
        | FileKind::Go
        | FileKind::Java
        | FileKind::Php
        | FileKind::Rust
        | FileKind::Shell
        | FileKind::EnvFile
        | FileKind::Toml
        | FileKind::Xml
        | FileKind::Csv
        | FileKind::Sql
        | FileKind::Markdown
        | FileKind::PlainText
        | FileKind::Unknown => ParsedContent::ok(ContentMetadata::Generic(profile(content))),
    }
}

/// Build the generic line/character profile.
pub fn profile(content: &str) -> GenericMetadata {
    lazy_static::lazy_static! {
        // Keyword-like tokens that suggest source code.
        static ref CODE_RE: regex::Regex = regex::Regex::new(
            r"\b(function|class|def|fn|const|let|var|import|return|if|for|while|public|private)\b"
        ).unwrap();
    }

    GenericMetadata {
        line_count: content.lines().count(),
        char_count: content.chars().count(),
        looks_like_code: CODE_RE.is_match(content),
    }
}

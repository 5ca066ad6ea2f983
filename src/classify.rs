//! File classification.
//!
//! Maps file names to a (category, kind, extension) triple using ordered
//! matcher tables. Matching precedence: exact basename, then suffix, then
//! directory prefix. Classification is total: unmatched names come back as
//! `unknown` rather than an error.

use serde::{Deserialize, Serialize};

/// A file submitted for analysis.
///
/// Owned by the caller for the duration of one analysis call; the engine
/// only reads it. `content` must already be decoded text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedFile {
    pub name: String,
    pub content: String,
    pub size: usize,
}

impl SubmittedFile {
    /// Build a file entry with `size` taken from the content length.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let content = content.into();
        let size = content.len();
        Self {
            name,
            content,
            size,
        }
    }
}

/// Top-level file categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Frontend,
    Backend,
    Config,
    Data,
    Docs,
    Unknown,
}

impl FileCategory {
    /// All categories in a fixed order, for bucket iteration.
    pub const ALL: [FileCategory; 6] = [
        FileCategory::Frontend,
        FileCategory::Backend,
        FileCategory::Config,
        FileCategory::Data,
        FileCategory::Docs,
        FileCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Frontend => "frontend",
            FileCategory::Backend => "backend",
            FileCategory::Config => "config",
            FileCategory::Data => "data",
            FileCategory::Docs => "docs",
            FileCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Specific file kinds within a category.
///
/// Serialized as the lowercase names the downstream consumers key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    // Frontend sources
    Javascript,
    React,
    TypeScript,
    Vue,
    Svelte,
    Html,
    Stylesheet,
    // Backend sources
    Python,
    Ruby,
    Go,
    Java,
    Php,
    Rust,
    Shell,
    // Config files
    Manifest,
    Compose,
    ContainerBuild,
    #[serde(rename = "env")]
    EnvFile,
    WebpackConfig,
    ViteConfig,
    NextConfig,
    BabelConfig,
    #[serde(rename = "tsconfig")]
    TsConfig,
    CiPipeline,
    // Data files
    Json,
    Yaml,
    Toml,
    Xml,
    Csv,
    Sql,
    // Docs
    Markdown,
    #[serde(rename = "text")]
    PlainText,
    Unknown,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Javascript => "javascript",
            FileKind::React => "react",
            FileKind::TypeScript => "typescript",
            FileKind::Vue => "vue",
            FileKind::Svelte => "svelte",
            FileKind::Html => "html",
            FileKind::Stylesheet => "stylesheet",
            FileKind::Python => "python",
            FileKind::Ruby => "ruby",
            FileKind::Go => "go",
            FileKind::Java => "java",
            FileKind::Php => "php",
            FileKind::Rust => "rust",
            FileKind::Shell => "shell",
            FileKind::Manifest => "manifest",
            FileKind::Compose => "compose",
            FileKind::ContainerBuild => "container-build",
            FileKind::EnvFile => "env",
            FileKind::WebpackConfig => "webpack-config",
            FileKind::ViteConfig => "vite-config",
            FileKind::NextConfig => "next-config",
            FileKind::BabelConfig => "babel-config",
            FileKind::TsConfig => "tsconfig",
            FileKind::CiPipeline => "ci-pipeline",
            FileKind::Json => "json",
            FileKind::Yaml => "yaml",
            FileKind::Toml => "toml",
            FileKind::Xml => "xml",
            FileKind::Csv => "csv",
            FileKind::Sql => "sql",
            FileKind::Markdown => "markdown",
            FileKind::PlainText => "text",
            FileKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The classification derived from a file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileClassification {
    pub category: FileCategory,
    pub kind: FileKind,
    pub extension: String,
}

/// Exact basename matches, keyed lowercase. Checked first.
static EXACT_NAMES: phf::Map<&'static str, (FileCategory, FileKind)> = phf::phf_map! {
    "package.json" => (FileCategory::Config, FileKind::Manifest),
    "docker-compose.yml" => (FileCategory::Config, FileKind::Compose),
    "docker-compose.yaml" => (FileCategory::Config, FileKind::Compose),
    "docker-compose.override.yml" => (FileCategory::Config, FileKind::Compose),
    "compose.yml" => (FileCategory::Config, FileKind::Compose),
    "compose.yaml" => (FileCategory::Config, FileKind::Compose),
    "dockerfile" => (FileCategory::Config, FileKind::ContainerBuild),
    "containerfile" => (FileCategory::Config, FileKind::ContainerBuild),
    ".env" => (FileCategory::Config, FileKind::EnvFile),
    ".env.local" => (FileCategory::Config, FileKind::EnvFile),
    ".env.development" => (FileCategory::Config, FileKind::EnvFile),
    ".env.production" => (FileCategory::Config, FileKind::EnvFile),
    ".env.test" => (FileCategory::Config, FileKind::EnvFile),
    ".env.example" => (FileCategory::Config, FileKind::EnvFile),
    "webpack.config.js" => (FileCategory::Config, FileKind::WebpackConfig),
    "webpack.config.ts" => (FileCategory::Config, FileKind::WebpackConfig),
    "webpack.config.mjs" => (FileCategory::Config, FileKind::WebpackConfig),
    "vite.config.js" => (FileCategory::Config, FileKind::ViteConfig),
    "vite.config.ts" => (FileCategory::Config, FileKind::ViteConfig),
    "vite.config.mjs" => (FileCategory::Config, FileKind::ViteConfig),
    "next.config.js" => (FileCategory::Config, FileKind::NextConfig),
    "next.config.mjs" => (FileCategory::Config, FileKind::NextConfig),
    "next.config.ts" => (FileCategory::Config, FileKind::NextConfig),
    ".babelrc" => (FileCategory::Config, FileKind::BabelConfig),
    "babel.config.js" => (FileCategory::Config, FileKind::BabelConfig),
    "babel.config.json" => (FileCategory::Config, FileKind::BabelConfig),
    "tsconfig.json" => (FileCategory::Config, FileKind::TsConfig),
    "jsconfig.json" => (FileCategory::Config, FileKind::TsConfig),
    ".gitlab-ci.yml" => (FileCategory::Config, FileKind::CiPipeline),
};

/// Suffix matches, checked in order after exact names.
static SUFFIXES: &[(&str, FileCategory, FileKind)] = &[
    (".jsx", FileCategory::Frontend, FileKind::React),
    (".tsx", FileCategory::Frontend, FileKind::React),
    (".ts", FileCategory::Frontend, FileKind::TypeScript),
    (".mjs", FileCategory::Frontend, FileKind::Javascript),
    (".cjs", FileCategory::Frontend, FileKind::Javascript),
    (".js", FileCategory::Frontend, FileKind::Javascript),
    (".vue", FileCategory::Frontend, FileKind::Vue),
    (".svelte", FileCategory::Frontend, FileKind::Svelte),
    (".html", FileCategory::Frontend, FileKind::Html),
    (".htm", FileCategory::Frontend, FileKind::Html),
    (".css", FileCategory::Frontend, FileKind::Stylesheet),
    (".scss", FileCategory::Frontend, FileKind::Stylesheet),
    (".sass", FileCategory::Frontend, FileKind::Stylesheet),
    (".less", FileCategory::Frontend, FileKind::Stylesheet),
    (".py", FileCategory::Backend, FileKind::Python),
    (".rb", FileCategory::Backend, FileKind::Ruby),
    (".go", FileCategory::Backend, FileKind::Go),
    (".java", FileCategory::Backend, FileKind::Java),
    (".php", FileCategory::Backend, FileKind::Php),
    (".rs", FileCategory::Backend, FileKind::Rust),
    (".sh", FileCategory::Backend, FileKind::Shell),
    (".dockerfile", FileCategory::Config, FileKind::ContainerBuild),
    (".json", FileCategory::Data, FileKind::Json),
    (".yml", FileCategory::Data, FileKind::Yaml),
    (".yaml", FileCategory::Data, FileKind::Yaml),
    (".toml", FileCategory::Data, FileKind::Toml),
    (".xml", FileCategory::Data, FileKind::Xml),
    (".csv", FileCategory::Data, FileKind::Csv),
    (".sql", FileCategory::Data, FileKind::Sql),
    (".md", FileCategory::Docs, FileKind::Markdown),
    (".markdown", FileCategory::Docs, FileKind::Markdown),
    (".txt", FileCategory::Docs, FileKind::PlainText),
    (".rst", FileCategory::Docs, FileKind::PlainText),
];

/// Directory-prefix matches, checked last.
static DIR_PREFIXES: &[(&str, FileCategory, FileKind)] = &[
    (".github/workflows/", FileCategory::Config, FileKind::CiPipeline),
    (".circleci/", FileCategory::Config, FileKind::CiPipeline),
];

/// Extract the basename from a path-like submitted name.
fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Extension after the last `.` of the basename, or empty.
fn extension_of(name: &str) -> &str {
    let base = basename(name);
    match base.rfind('.') {
        Some(idx) => &base[idx + 1..],
        None => "",
    }
}

/// Classify a file name into a category/kind/extension triple.
///
/// Always returns a value; names nothing matches come back as
/// `unknown`/`unknown` with just the extension filled in. Matching is
/// case-insensitive on the basename.
pub fn classify(name: &str) -> FileClassification {
    let base = basename(name).to_ascii_lowercase();
    let lower_name = name.to_ascii_lowercase();
    let extension = extension_of(&lower_name).to_string();

    if let Some(&(category, kind)) = EXACT_NAMES.get(base.as_str()) {
        return FileClassification {
            category,
            kind,
            extension,
        };
    }

    for &(suffix, category, kind) in SUFFIXES {
        if base.ends_with(suffix) {
            return FileClassification {
                category,
                kind,
                extension,
            };
        }
    }

    for &(prefix, category, kind) in DIR_PREFIXES {
        if lower_name.contains(prefix) {
            return FileClassification {
                category,
                kind,
                extension,
            };
        }
    }

    FileClassification {
        category: FileCategory::Unknown,
        kind: FileKind::Unknown,
        extension,
    }
}

/// True iff the name classifies as frontend or backend source.
pub fn is_source_file(name: &str) -> bool {
    matches!(
        classify(name).category,
        FileCategory::Frontend | FileCategory::Backend
    )
}

/// True iff the name classifies as a config file.
pub fn is_config_file(name: &str) -> bool {
    classify(name).category == FileCategory::Config
}

/// Files grouped into category buckets, input order preserved within each.
#[derive(Debug, Default)]
pub struct CategorizedFiles<'a> {
    pub frontend: Vec<&'a SubmittedFile>,
    pub backend: Vec<&'a SubmittedFile>,
    pub config: Vec<&'a SubmittedFile>,
    pub data: Vec<&'a SubmittedFile>,
    pub docs: Vec<&'a SubmittedFile>,
    pub unknown: Vec<&'a SubmittedFile>,
}

impl<'a> CategorizedFiles<'a> {
    /// The bucket for a category.
    pub fn bucket(&self, category: FileCategory) -> &[&'a SubmittedFile] {
        match category {
            FileCategory::Frontend => &self.frontend,
            FileCategory::Backend => &self.backend,
            FileCategory::Config => &self.config,
            FileCategory::Data => &self.data,
            FileCategory::Docs => &self.docs,
            FileCategory::Unknown => &self.unknown,
        }
    }
}

/// Group files into the six category buckets.
pub fn categorize_files<'a>(files: &'a [SubmittedFile]) -> CategorizedFiles<'a> {
    let mut buckets = CategorizedFiles::default();
    for file in files {
        match classify(&file.name).category {
            FileCategory::Frontend => buckets.frontend.push(file),
            FileCategory::Backend => buckets.backend.push(file),
            FileCategory::Config => buckets.config.push(file),
            FileCategory::Data => buckets.data.push(file),
            FileCategory::Docs => buckets.docs.push(file),
            FileCategory::Unknown => buckets.unknown.push(file),
        }
    }
    buckets
}

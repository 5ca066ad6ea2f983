//! HTML markup scanning.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Signals extracted from an html file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupMetadata {
    pub scripts: Vec<String>,
    pub stylesheets: Vec<String>,
    pub title: Option<String>,
    pub meta_tags: Vec<String>,
    /// An element with one of the conventional SPA mount ids.
    pub has_app_root: bool,
}

/// Scan html content for linked resources and app-root conventions.
pub fn scan(content: &str) -> MarkupMetadata {
    lazy_static::lazy_static! {
        static ref SCRIPT_SRC_RE: Regex = Regex::new(
            r#"(?i)<script[^>]*\bsrc\s*=\s*["']([^"']+)["']"#
        ).unwrap();
        // rel and href in either order
        static ref LINK_REL_FIRST_RE: Regex = Regex::new(
            r#"(?i)<link[^>]*\brel\s*=\s*["']stylesheet["'][^>]*\bhref\s*=\s*["']([^"']+)["']"#
        ).unwrap();
        static ref LINK_HREF_FIRST_RE: Regex = Regex::new(
            r#"(?i)<link[^>]*\bhref\s*=\s*["']([^"']+)["'][^>]*\brel\s*=\s*["']stylesheet["']"#
        ).unwrap();
        static ref TITLE_RE: Regex = Regex::new(
            r"(?is)<title[^>]*>([^<]*)</title>"
        ).unwrap();
        static ref META_NAME_RE: Regex = Regex::new(
            r#"(?i)<meta[^>]*\bname\s*=\s*["']([^"']+)["']"#
        ).unwrap();
        static ref APP_ROOT_RE: Regex = Regex::new(
            r#"(?i)\bid\s*=\s*["'](?:root|app)["']"#
        ).unwrap();
    }

    let mut metadata = MarkupMetadata::default();

    for caps in SCRIPT_SRC_RE.captures_iter(content) {
        metadata.scripts.push(caps[1].to_string());
    }
    for caps in LINK_REL_FIRST_RE
        .captures_iter(content)
        .chain(LINK_HREF_FIRST_RE.captures_iter(content))
    {
        let href = caps[1].to_string();
        if !metadata.stylesheets.contains(&href) {
            metadata.stylesheets.push(href);
        }
    }
    metadata.title = TITLE_RE
        .captures(content)
        .map(|caps| caps[1].trim().to_string())
        .filter(|t| !t.is_empty());
    for caps in META_NAME_RE.captures_iter(content) {
        metadata.meta_tags.push(caps[1].to_string());
    }
    metadata.has_app_root = APP_ROOT_RE.is_match(content);

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_full_document() {
        let content = r#"<!DOCTYPE html>
<html>
<head>
  <title>My Shop</title>
  <meta name="viewport" content="width=device-width">
  <meta name="description" content="storefront">
  <link rel="stylesheet" href="/styles/main.css">
  <link href="/styles/theme.css" rel="stylesheet">
</head>
<body>
  <div id="root"></div>
  <script src="/bundle.js"></script>
</body>
</html>"#;
        let meta = scan(content);
        assert_eq!(meta.title.as_deref(), Some("My Shop"));
        assert_eq!(meta.scripts, vec!["/bundle.js"]);
        assert_eq!(meta.stylesheets, vec!["/styles/main.css", "/styles/theme.css"]);
        assert_eq!(meta.meta_tags, vec!["viewport", "description"]);
        assert!(meta.has_app_root);
    }

    #[test]
    fn test_scan_app_root_variants() {
        assert!(scan(r#"<div id="app"></div>"#).has_app_root);
        assert!(scan(r#"<div id='root'></div>"#).has_app_root);
        assert!(!scan(r#"<div id="main"></div>"#).has_app_root);
    }

    #[test]
    fn test_scan_inline_script_not_listed() {
        let meta = scan("<script>console.log(1)</script>");
        assert!(meta.scripts.is_empty());
    }

    #[test]
    fn test_scan_empty_title_is_none() {
        let meta = scan("<title>  </title>");
        assert_eq!(meta.title, None);
    }
}

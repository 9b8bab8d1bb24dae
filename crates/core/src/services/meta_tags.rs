//! Fallback extraction from plain meta tags.
//!
//! Used when a page carries no Open Graph markup at all.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use super::opengraph::MetadataMap;

/// Meta tag names carried over into the fallback result.
const WANTED_NAMES: [&str; 2] = ["description", "title"];

#[allow(clippy::unwrap_used)] // the CSS literal is valid
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

#[allow(clippy::unwrap_used)] // the CSS literal is valid
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());

/// Extract plain meta tags from a page.
///
/// The `<title>` element is reported under the `title` key and takes
/// precedence over a `<meta name="title">` tag. Tag names are matched
/// case-insensitively, and a tag without `content` yields an empty value.
#[must_use]
pub fn extract_meta_tags(html: &str) -> MetadataMap {
    let document = Html::parse_document(html);
    let mut metadata = MetadataMap::new();

    if let Some(title) = document.select(&TITLE).next() {
        metadata.insert("title".to_string(), title.text().collect());
    }

    for element in document.select(&META) {
        let tag = element.value();
        let Some(name) = tag.attr("name") else {
            continue;
        };

        let name = name.to_lowercase();
        if WANTED_NAMES.contains(&name.as_str()) {
            metadata
                .entry(name)
                .or_insert_with(|| tag.attr("content").unwrap_or_default().to_string());
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_title_element_and_description() {
        let html = r#"
            <html><head>
                <title>Plain Page</title>
                <meta name="description" content="A page without Open Graph markup">
            </head></html>
        "#;

        let metadata = extract_meta_tags(html);

        assert_eq!(metadata.get("title").map(String::as_str), Some("Plain Page"));
        assert_eq!(
            metadata.get("description").map(String::as_str),
            Some("A page without Open Graph markup")
        );
    }

    #[test]
    fn test_title_element_beats_the_meta_tag() {
        let html = r#"
            <html><head>
                <title>From Element</title>
                <meta name="title" content="From Meta">
            </head></html>
        "#;

        let metadata = extract_meta_tags(html);

        assert_eq!(metadata.get("title").map(String::as_str), Some("From Element"));
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let html = r#"<html><head><meta name="Description" content="Mixed case"></head></html>"#;

        let metadata = extract_meta_tags(html);

        assert_eq!(metadata.get("description").map(String::as_str), Some("Mixed case"));
    }

    #[test]
    fn test_skips_tags_without_a_name() {
        let html = r#"
            <html><head>
                <meta charset="utf-8">
                <meta property="article:author" content="Somebody">
            </head></html>
        "#;

        let metadata = extract_meta_tags(html);

        assert!(metadata.is_empty());
    }

    #[test]
    fn test_ignores_names_outside_the_wanted_set() {
        let html = r#"
            <html><head>
                <meta name="viewport" content="width=device-width">
                <meta name="keywords" content="one,two">
            </head></html>
        "#;

        let metadata = extract_meta_tags(html);

        assert!(metadata.is_empty());
    }

    #[test]
    fn test_missing_content_yields_an_empty_value() {
        let html = r#"<html><head><meta name="description"></head></html>"#;

        let metadata = extract_meta_tags(html);

        assert_eq!(metadata.get("description").map(String::as_str), Some(""));
    }
}

//! Open Graph metadata extraction.

use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Flat map of metadata keys to their values.
///
/// Ordered, so a payload re-serialized from cache comes out identical to
/// the one first served.
pub type MetadataMap = BTreeMap<String, String>;

/// Properties a page must carry to count as a complete Open Graph object.
pub const REQUIRED_PROPERTIES: [&str; 4] = ["og:title", "og:type", "og:image", "og:url"];

#[allow(clippy::unwrap_used)] // the CSS literal is valid
static OG_META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property^="og:"], meta[name^="og:"]"#).unwrap());

/// Extract Open Graph properties from a page.
///
/// Keys keep their `og:` prefix. The first occurrence of a property wins,
/// and a tag without `content` yields an empty value. Pages declare the
/// property in either the `property` or the `name` attribute; both are
/// accepted, with `property` preferred.
#[must_use]
pub fn extract_opengraph(html: &str) -> MetadataMap {
    let document = Html::parse_document(html);
    let mut metadata = MetadataMap::new();

    for element in document.select(&OG_META) {
        let tag = element.value();
        let Some(property) = tag
            .attr("property")
            .filter(|p| p.starts_with("og:"))
            .or_else(|| tag.attr("name").filter(|n| n.starts_with("og:")))
        else {
            continue;
        };

        metadata
            .entry(property.to_string())
            .or_insert_with(|| tag.attr("content").unwrap_or_default().to_string());
    }

    metadata
}

/// List the required properties missing from extracted metadata.
#[must_use]
pub fn missing_required_properties(metadata: &MetadataMap) -> Vec<&'static str> {
    REQUIRED_PROPERTIES
        .iter()
        .copied()
        .filter(|property| !metadata.contains_key(*property))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_properties_with_prefix() {
        let html = r#"
            <html><head>
                <meta property="og:title" content="Example Page">
                <meta property="og:image" content="https://example.com/image.jpg">
            </head></html>
        "#;

        let metadata = extract_opengraph(html);

        assert_eq!(metadata.get("og:title").map(String::as_str), Some("Example Page"));
        assert_eq!(
            metadata.get("og:image").map(String::as_str),
            Some("https://example.com/image.jpg")
        );
    }

    #[test]
    fn test_first_occurrence_of_a_property_wins() {
        let html = r#"
            <html><head>
                <meta property="og:title" content="First">
                <meta property="og:title" content="Second">
            </head></html>
        "#;

        let metadata = extract_opengraph(html);

        assert_eq!(metadata.get("og:title").map(String::as_str), Some("First"));
    }

    #[test]
    fn test_accepts_the_name_attribute_form() {
        let html = r#"<html><head><meta name="og:title" content="Named"></head></html>"#;

        let metadata = extract_opengraph(html);

        assert_eq!(metadata.get("og:title").map(String::as_str), Some("Named"));
    }

    #[test]
    fn test_missing_content_yields_an_empty_value() {
        let html = r#"<html><head><meta property="og:title"></head></html>"#;

        let metadata = extract_opengraph(html);

        assert_eq!(metadata.get("og:title").map(String::as_str), Some(""));
    }

    #[test]
    fn test_ignores_tags_outside_the_og_namespace() {
        let html = r#"
            <html><head>
                <meta name="viewport" content="width=device-width">
                <meta name="description" content="Plain description">
                <meta property="twitter:card" content="summary">
            </head></html>
        "#;

        let metadata = extract_opengraph(html);

        assert!(metadata.is_empty());
    }

    #[test]
    fn test_reports_missing_required_properties() {
        let html = r#"
            <html><head>
                <meta property="og:title" content="Example">
                <meta property="og:image" content="https://example.com/i.jpg">
            </head></html>
        "#;

        let metadata = extract_opengraph(html);
        let missing = missing_required_properties(&metadata);

        assert_eq!(missing, vec!["og:type", "og:url"]);
    }

    #[test]
    fn test_complete_pages_have_nothing_missing() {
        let html = r#"
            <html><head>
                <meta property="og:title" content="Example">
                <meta property="og:type" content="website">
                <meta property="og:image" content="https://example.com/i.jpg">
                <meta property="og:url" content="https://example.com/">
            </head></html>
        "#;

        let metadata = extract_opengraph(html);

        assert!(missing_required_properties(&metadata).is_empty());
    }
}

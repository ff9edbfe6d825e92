//! HTML link extraction
//!
//! This module turns page content into the set of absolute URLs it links
//! to. Relative links are resolved against the page's own URL.

use crate::url::normalize_parsed;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Collaborator that extracts outgoing links from page content
pub trait LinkExtractor: Send + Sync {
    /// Returns the absolute, normalized URLs linked from `content`
    fn extract_links(&self, content: &str, base_url: &Url) -> HashSet<Url>;
}

/// `scraper`-backed extractor reading `<a href>` anchors
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, content: &str, base_url: &Url) -> HashSet<Url> {
        parse_links(content, base_url)
    }
}

/// Parses HTML content and extracts the links to follow
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - Empty or whitespace-only hrefs
/// - Fragment-only hrefs (`#section`)
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Anything that does not resolve to an HTTP(S) URL with a host
///
/// Fragments are stripped from the resolved URLs, and duplicates collapse
/// into one entry.
///
/// # Example
///
/// ```
/// use site_crawler::crawler::parse_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a><a href="/page#top">Again</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = parse_links(html, &base_url);
/// assert_eq!(links.len(), 1);
/// ```
pub fn parse_links(html: &str, base_url: &Url) -> HashSet<Url> {
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.insert(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    normalize_parsed(absolute_url).ok()
}

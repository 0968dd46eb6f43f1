//! HTML link extraction
//!
//! # Link Extraction Rules
//!
//! **Include:**
//! - `<a href="...">` tags anywhere in the document
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - `javascript:`, `mailto:`, `tel:` links
//! - Data URIs
//! - Fragment-only links (same page anchors)
//! - Anything that is not HTTP(S) after resolution

use crate::crawler::fetcher::Document;
use crate::{FetchError, FetchResult};
use scraper::{Html, Selector};
use url::Url;

/// A downloaded HTML page
///
/// Parsing is deferred to [`Document::extract_links`] so it runs in the
/// extraction stage rather than the download stage.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    /// URL the page was served from, used to resolve relative links
    base_url: String,

    /// Raw HTML body
    html: String,
}

impl HtmlDocument {
    /// Creates a document for `html` served from `base_url`
    pub fn new(base_url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            html: html.into(),
        }
    }
}

impl Document for HtmlDocument {
    /// # Example
    ///
    /// ```
    /// use wavecrawl::crawler::{Document, HtmlDocument};
    ///
    /// let page = HtmlDocument::new(
    ///     "https://example.com/",
    ///     r#"<a href="/page">Link</a>"#,
    /// );
    /// assert_eq!(page.extract_links().unwrap(), vec!["https://example.com/page"]);
    /// ```
    fn extract_links(&self) -> FetchResult<Vec<String>> {
        let base_url = Url::parse(&self.base_url).map_err(|e| FetchError::Extract {
            url: self.base_url.clone(),
            message: format!("invalid base URL: {}", e),
        })?;

        let selector = Selector::parse("a[href]").map_err(|e| FetchError::Extract {
            url: self.base_url.clone(),
            message: format!("invalid selector: {:?}", e),
        })?;

        let document = Html::parse_document(&self.html);
        let mut links = Vec::new();

        for element in document.select(&selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, &base_url) {
                    links.push(absolute_url);
                }
            }
        }

        Ok(links)
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    // Skip special schemes
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}

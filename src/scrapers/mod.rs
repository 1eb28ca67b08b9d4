//! Per-site adapters for news search pages.
//!
//! Each site gets one adapter implementing [`SiteAdapter`]. The crawler only
//! ever talks to the trait, so adding a site means adding a module here and
//! an entry in [`adapter_for`].
//!
//! # Supported Sources
//!
//! | Site | Module | Name |
//! |------|--------|------|
//! | Detik | [`detik`] | `detik` |
//! | CNN Indonesia | [`cnn`] | `cnn` |
//! | Liputan6 | [`liputan6`] | `liputan6` |
//! | Suara | [`suara`] | `suara` |
//!
//! # Contract
//!
//! - [`SiteAdapter::listing_url`] is pure and URL-encodes the keyword.
//! - [`SiteAdapter::parse_listing`] returns stubs in page order. A malformed
//!   item is skipped, never failing the whole page. Parsing the same markup
//!   twice yields the same stubs.
//! - [`SiteAdapter::parse_content`] returns the cleaned article body, or an
//!   empty string when the body container is missing.

use crate::error::{CrawlError, Result};
use crate::models::ArticleStub;
use scraper::{ElementRef, Selector};
use url::Url;

pub mod cnn;
pub mod detik;
pub mod liputan6;
pub mod suara;

/// Site-specific knowledge of search listing and article markup.
pub trait SiteAdapter: Send + Sync {
    /// Display name written into each record's `Website` column.
    fn name(&self) -> &'static str;

    /// Search results URL for `keyword` at 1-based `page`.
    fn listing_url(&self, keyword: &str, page: u32) -> String;

    /// Candidate articles found on a search results page.
    fn parse_listing(&self, markup: &str) -> Vec<ArticleStub>;

    /// Plain body text of an article detail page.
    fn parse_content(&self, markup: &str) -> String;
}

/// Resolve an adapter by its short name (case-insensitive).
pub fn adapter_for(name: &str) -> Option<Box<dyn SiteAdapter>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "detik" => Some(Box::new(detik::Detik)),
        "cnn" => Some(Box::new(cnn::CnnIndonesia)),
        "liputan6" => Some(Box::new(liputan6::Liputan6)),
        "suara" => Some(Box::new(suara::Suara)),
        _ => None,
    }
}

/// Resolve a list of site names, keeping their order.
///
/// # Arguments
///
/// * `names` - Short site names such as `"detik"` or `"cnn"`.
///
/// # Returns
///
/// One adapter per name, in the same order, which is the order the crawler
/// visits them.
///
/// # Errors
///
/// Returns [`CrawlError::Config`] naming the first unknown site.
pub fn adapters_for(names: &[String]) -> Result<Vec<Box<dyn SiteAdapter>>> {
    names
        .iter()
        .map(|name| {
            adapter_for(name).ok_or_else(|| CrawlError::Config(format!("unknown site `{name}`")))
        })
        .collect()
}

/// Parse a selector known at compile time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector")
}

/// Text content of an element with whitespace collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// First element under `scope` matched by any of `selectors`, tried in order.
pub(crate) fn first_match<'a>(scope: ElementRef<'a>, selectors: &[&Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// Resolve a possibly relative link against a site's base URL.
pub(crate) fn absolute_url(base: &str, href: &str) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    Url::parse(base).ok()?.join(href).ok().map(String::from)
}

/// Body text with every subtree matching one of `strip` removed.
///
/// Remaining text nodes are trimmed and joined with a single space.
pub(crate) fn clean_body(body: Option<ElementRef<'_>>, strip: &[Selector]) -> String {
    let Some(body) = body else {
        return String::new();
    };
    let mut parts = Vec::new();
    collect_text(body, strip, &mut parts);
    parts.join(" ")
}

fn collect_text<'a>(element: ElementRef<'a>, strip: &[Selector], parts: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text);
            }
        } else if let Some(child) = ElementRef::wrap(child) {
            if strip.iter().any(|selector| selector.matches(&child)) {
                continue;
            }
            collect_text(child, strip, parts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_adapter_lookup() {
        assert_eq!(adapter_for("detik").unwrap().name(), "Detik");
        assert_eq!(adapter_for(" CNN ").unwrap().name(), "CNN Indonesia");
        assert_eq!(adapter_for("Liputan6").unwrap().name(), "Liputan6");
        assert_eq!(adapter_for("suara").unwrap().name(), "Suara");
        assert!(adapter_for("kompas").is_none());
    }

    #[test]
    fn test_adapters_for_keeps_order() {
        let names = vec!["suara".to_string(), "detik".to_string()];
        let adapters = adapters_for(&names).unwrap();
        let resolved: Vec<_> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(resolved, vec!["Suara", "Detik"]);
    }

    #[test]
    fn test_adapters_for_rejects_unknown() {
        let names = vec!["detik".to_string(), "nope".to_string()];
        assert!(matches!(adapters_for(&names), Err(CrawlError::Config(_))));
    }

    #[test]
    fn test_listing_urls_encode_keyword() {
        for name in ["detik", "cnn", "liputan6", "suara"] {
            let url = adapter_for(name).unwrap().listing_url("korupsi KPK&co", 3);
            assert!(url.contains("korupsi%20KPK%26co"), "{name}: {url}");
            assert!(url.ends_with("page=3"), "{name}: {url}");
        }
    }

    #[test]
    fn test_clean_body_strips_subtrees() {
        let html = Html::parse_document(
            r#"<div id="body">Satu <script>var x = 1;</script><p>Dua <figure>Foto</figure> Tiga</p>
               <aside class="related">Baca juga</aside></div>"#,
        );
        let body = html.select(&selector("#body")).next();
        let strip = [selector("script"), selector("figure"), selector("aside.related")];
        assert_eq!(clean_body(body, &strip), "Satu Dua Tiga");
    }

    #[test]
    fn test_clean_body_missing_container() {
        assert_eq!(clean_body(None, &[]), "");
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let html = Html::parse_fragment("<h3>  Banjir\n   <b>Jakarta</b> </h3>");
        let h3 = html.select(&selector("h3")).next().unwrap();
        assert_eq!(element_text(h3), "Banjir Jakarta");
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("https://www.suara.com", "/news/2024/01/01/a").as_deref(),
            Some("https://www.suara.com/news/2024/01/01/a")
        );
        assert_eq!(
            absolute_url("https://www.suara.com", "https://other.example/x").as_deref(),
            Some("https://other.example/x")
        );
    }
}

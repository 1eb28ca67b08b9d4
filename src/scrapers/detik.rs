//! Detik search adapter.
//!
//! Search results are `<article>` cards with the headline link inside
//! `h3.media__title`. The publication date is carried in the `title`
//! attribute of a `<span>`, e.g. `title="Senin, 17 Agu 2024 10:30 WIB"`.

use super::{SiteAdapter, clean_body, element_text, selector};
use crate::models::ArticleStub;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ITEM: Lazy<Selector> = Lazy::new(|| selector("article"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("h3.media__title a[href]"));
static DATE: Lazy<Selector> = Lazy::new(|| selector("span[title]"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div.detail__body-text"));
static STRIP: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["script", "style", "iframe", "div", "a", "figure"]
        .into_iter()
        .map(selector)
        .collect()
});

/// Adapter for `detik.com` search results.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detik;

/// Build a stub from one `<article>` of the results list.
///
/// # Returns
///
/// `None` when the item has no title link, so the caller skips it.
fn parse_item(item: ElementRef<'_>) -> Option<ArticleStub> {
    let link = item.select(&TITLE_LINK).next()?;
    let url = link.value().attr("href")?.trim().to_string();
    let raw_date = item
        .select(&DATE)
        .next()
        .and_then(|span| span.value().attr("title"))
        .unwrap_or_default()
        .to_string();

    Some(ArticleStub {
        url,
        title: element_text(link),
        raw_date,
    })
}

impl SiteAdapter for Detik {
    fn name(&self) -> &'static str {
        "Detik"
    }

    fn listing_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "https://www.detik.com/search/searchall?query={}&siteid=2&sortby=time&page={page}",
            urlencoding::encode(keyword)
        )
    }

    fn parse_listing(&self, markup: &str) -> Vec<ArticleStub> {
        let document = Html::parse_document(markup);
        document.select(&ITEM).filter_map(parse_item).collect()
    }

    fn parse_content(&self, markup: &str) -> String {
        let document = Html::parse_document(markup);
        clean_body(document.select(&BODY).next(), &STRIP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <article>
            <h3 class="media__title"><a href="https://news.detik.com/berita/d-1/banjir">Banjir Jakarta</a></h3>
            <span class="media__date"><span title="Senin, 17 Agu 2024 10:30 WIB">2 jam lalu</span></span>
        </article>
        <article>
            <h3 class="media__other"><a href="https://news.detik.com/berita/d-2">No title class</a></h3>
        </article>
        <article>
            <h3 class="media__title"><a href="https://news.detik.com/berita/d-3/kpk">KPK periksa saksi</a></h3>
        </article>
        </body></html>
    "#;

    #[test]
    fn test_listing_url() {
        assert_eq!(
            Detik.listing_url("banjir", 2),
            "https://www.detik.com/search/searchall?query=banjir&siteid=2&sortby=time&page=2"
        );
    }

    #[test]
    fn test_parse_listing_skips_malformed_items() {
        let stubs = Detik.parse_listing(LISTING);
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].url, "https://news.detik.com/berita/d-1/banjir");
        assert_eq!(stubs[0].title, "Banjir Jakarta");
        assert_eq!(stubs[0].raw_date, "Senin, 17 Agu 2024 10:30 WIB");
        assert_eq!(stubs[1].raw_date, "");
    }

    #[test]
    fn test_parse_listing_is_repeatable() {
        assert_eq!(Detik.parse_listing(LISTING), Detik.parse_listing(LISTING));
    }

    #[test]
    fn test_parse_content_strips_noise() {
        let html = r#"<div class="detail__body-text">
            <p>Jakarta - Banjir melanda.</p>
            <div class="parallaxindetail">Iklan</div>
            <p>Warga <a href="/x">tautan</a> mengungsi.</p>
            <script>track()</script>
            <figure>Foto</figure>
        </div>"#;
        assert_eq!(Detik.parse_content(html), "Jakarta - Banjir melanda. Warga mengungsi.");
    }

    #[test]
    fn test_parse_content_without_body() {
        assert_eq!(Detik.parse_content("<html><body><p>x</p></body></html>"), "");
    }
}

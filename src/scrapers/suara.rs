//! Suara search adapter.
//!
//! Results are `div.item-news` blocks. The headline is an `h3` or `h4`
//! nested inside the article link; blocks without one are skipped.

use super::{SiteAdapter, absolute_url, clean_body, element_text, first_match, selector};
use crate::models::ArticleStub;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const BASE_URL: &str = "https://www.suara.com";

static ITEM: Lazy<Selector> = Lazy::new(|| selector("div.item-news"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static H3: Lazy<Selector> = Lazy::new(|| selector("h3"));
static H4: Lazy<Selector> = Lazy::new(|| selector("h4"));
static DATE_SPAN: Lazy<Selector> = Lazy::new(|| selector("span.date"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div.detail-content"));
static BODY_FALLBACK: Lazy<Selector> = Lazy::new(|| selector("div.news-detail-text"));
static STRIP: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["script", "style", "iframe", "figure", "div.bacajuga", "aside"]
        .into_iter()
        .map(selector)
        .collect()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Suara;

fn parse_item(item: ElementRef<'_>) -> Option<ArticleStub> {
    let link = item.select(&LINK).next()?;
    let url = absolute_url(BASE_URL, link.value().attr("href")?)?;
    let title = first_match(link, &[&*H3, &*H4])
        .map(element_text)
        .unwrap_or_default();
    if title.is_empty() {
        return None;
    }
    let raw_date = first_match(item, &[&*DATE_SPAN, &*TIME])
        .map(element_text)
        .unwrap_or_default();

    Some(ArticleStub { url, title, raw_date })
}

impl SiteAdapter for Suara {
    fn name(&self) -> &'static str {
        "Suara"
    }

    fn listing_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "{BASE_URL}/search?q={}&page={page}",
            urlencoding::encode(keyword)
        )
    }

    fn parse_listing(&self, markup: &str) -> Vec<ArticleStub> {
        let document = Html::parse_document(markup);
        document.select(&ITEM).filter_map(parse_item).collect()
    }

    fn parse_content(&self, markup: &str) -> String {
        let document = Html::parse_document(markup);
        let body = document
            .select(&BODY)
            .next()
            .or_else(|| document.select(&BODY_FALLBACK).next());
        clean_body(body, &STRIP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <div class="item-news">
            <a href="/news/2024/02/14/101010/pemilu-2024"><h3>Pemilu 2024 Berjalan Lancar</h3></a>
            <span class="date">Rabu, 14 Februari 2024 | 10:10 WIB</span>
        </div>
        <div class="item-news">
            <a href="https://www.suara.com/bisnis/2024/02/15/1/ihsg"><h4>IHSG Menguat</h4></a>
            <time>15 Feb 2024</time>
        </div>
        <div class="item-news">
            <a href="/news/2024/02/16/2/untitled"><img src="x.jpg"></a>
        </div>
    "#;

    #[test]
    fn test_listing_url() {
        assert_eq!(
            Suara.listing_url("pemilu", 1),
            "https://www.suara.com/search?q=pemilu&page=1"
        );
    }

    #[test]
    fn test_parse_listing_requires_title() {
        let stubs = Suara.parse_listing(LISTING);
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].url, "https://www.suara.com/news/2024/02/14/101010/pemilu-2024");
        assert_eq!(stubs[0].title, "Pemilu 2024 Berjalan Lancar");
        assert_eq!(stubs[0].raw_date, "Rabu, 14 Februari 2024 | 10:10 WIB");
        assert_eq!(stubs[1].title, "IHSG Menguat");
        assert_eq!(stubs[1].raw_date, "15 Feb 2024");
    }

    #[test]
    fn test_parse_content() {
        let html = r#"<div class="detail-content">
            <p>Suara.com - Pemungutan suara dimulai.</p>
            <div class="bacajuga">Baca Juga: X</div>
            <aside>Terkait</aside>
            <p>Antrean panjang terlihat.</p>
        </div>"#;
        assert_eq!(
            Suara.parse_content(html),
            "Suara.com - Pemungutan suara dimulai. Antrean panjang terlihat."
        );
    }
}

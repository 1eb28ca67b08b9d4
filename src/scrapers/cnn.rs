//! CNN Indonesia search adapter.
//!
//! Result cards are `<article>` elements. Only links pointing back into
//! `https://www.cnnindonesia.com/` are accepted; cards linking elsewhere
//! (ads, partner sites) are skipped.

use super::{SiteAdapter, clean_body, element_text, first_match, selector};
use crate::models::ArticleStub;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const ARTICLE_PREFIX: &str = "https://www.cnnindonesia.com/";

static ITEM: Lazy<Selector> = Lazy::new(|| selector("article"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static HEADLINE: Lazy<Selector> = Lazy::new(|| selector("h2"));
static TITLE_SPAN: Lazy<Selector> = Lazy::new(|| selector("span.title"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time"));
static DATE_SPAN: Lazy<Selector> = Lazy::new(|| selector("span.date"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div.detail_text"));
static BODY_FALLBACK: Lazy<Selector> = Lazy::new(|| selector("div.news-content"));
static STRIP: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["script", "style", "iframe", "table", "aside", "figure"]
        .into_iter()
        .map(selector)
        .collect()
});

/// Adapter for `cnnindonesia.com` search results.
#[derive(Debug, Clone, Copy, Default)]
pub struct CnnIndonesia;

fn parse_item(item: ElementRef<'_>) -> Option<ArticleStub> {
    let href = item.select(&LINK).next()?.value().attr("href")?;
    if !href.starts_with(ARTICLE_PREFIX) {
        return None;
    }
    let title = first_match(item, &[&*HEADLINE, &*TITLE_SPAN]).map(element_text)?;
    let raw_date = first_match(item, &[&*TIME, &*DATE_SPAN])
        .map(element_text)
        .unwrap_or_default();

    Some(ArticleStub {
        url: href.to_string(),
        title,
        raw_date,
    })
}

impl SiteAdapter for CnnIndonesia {
    fn name(&self) -> &'static str {
        "CNN Indonesia"
    }

    fn listing_url(&self, keyword: &str, page: u32) -> String {
        format!(
            "https://www.cnnindonesia.com/search/?query={}&page={page}",
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

//! Liputan6 search adapter.

use super::{SiteAdapter, absolute_url, clean_body, element_text, first_match, selector};
use crate::models::ArticleStub;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

const BASE_URL: &str = "https://www.liputan6.com";

static ITEM: Lazy<Selector> = Lazy::new(|| selector("article.articles--iridescent-list--item"));
static PRIMARY_LINK: Lazy<Selector> = Lazy::new(|| selector("a.ui--a[href]"));
static ANY_LINK: Lazy<Selector> = Lazy::new(|| selector("a[href]"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h4.articles--iridescent-list--text-title"));
static TIME: Lazy<Selector> = Lazy::new(|| selector("time.articles--iridescent-list--text-time"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("div.article-content-body"));
static STRIP: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "script",
        "style",
        "iframe",
        "figure",
        "div.read-page--header",
        "p.baca-juga",
    ]
    .into_iter()
    .map(selector)
    .collect()
});

/// Adapter for `liputan6.com` search results.
#[derive(Debug, Clone, Copy, Default)]
pub struct Liputan6;

fn parse_item(item: ElementRef<'_>) -> Option<ArticleStub> {
    let href = first_match(item, &[&*PRIMARY_LINK, &*ANY_LINK])?
        .value()
        .attr("href")?;
    let url = absolute_url(BASE_URL, href)?;
    let title = element_text(item.select(&TITLE).next()?);

    // The machine-readable timestamp sits in `title`; the text is relative ("2 jam lalu").
    let raw_date = item
        .select(&TIME)
        .next()
        .map(|time| match time.value().attr("title") {
            Some(stamp) => stamp.trim().to_string(),
            None => element_text(time),
        })
        .unwrap_or_default();

    Some(ArticleStub { url, title, raw_date })
}

impl SiteAdapter for Liputan6 {
    fn name(&self) -> &'static str {
        "Liputan6"
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
        clean_body(document.select(&BODY).next(), &STRIP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <article class="articles--iridescent-list--item">
            <a class="ui--a" href="/news/read/5500001/gempa-guncang-cianjur">
                <h4 class="articles--iridescent-list--text-title">Gempa Guncang Cianjur</h4>
            </a>
            <time class="articles--iridescent-list--text-time" title="21 Nov 2022, 13:21 WIB">1 tahun lalu</time>
        </article>
        <article class="articles--iridescent-list--item">
            <a href="https://www.liputan6.com/bisnis/read/5500002/rupiah">
                <h4 class="articles--iridescent-list--text-title">Rupiah Menguat</h4>
            </a>
            <time class="articles--iridescent-list--text-time">22 Nov 2022</time>
        </article>
        <article class="articles--iridescent-list--item">
            <a href="/news/read/5500003/no-title"><h3>Wrong heading</h3></a>
        </article>
        <article class="articles--iridescent-list--item">
            <h4 class="articles--iridescent-list--text-title">No link at all</h4>
        </article>
    "#;

    #[test]
    fn test_listing_url() {
        assert_eq!(
            Liputan6.listing_url("gempa", 4),
            "https://www.liputan6.com/search?q=gempa&page=4"
        );
    }

    #[test]
    fn test_parse_listing() {
        let stubs = Liputan6.parse_listing(LISTING);
        assert_eq!(stubs.len(), 2);
        assert_eq!(
            stubs[0].url,
            "https://www.liputan6.com/news/read/5500001/gempa-guncang-cianjur"
        );
        assert_eq!(stubs[0].title, "Gempa Guncang Cianjur");
        assert_eq!(stubs[0].raw_date, "21 Nov 2022, 13:21 WIB");
        assert_eq!(stubs[1].url, "https://www.liputan6.com/bisnis/read/5500002/rupiah");
        assert_eq!(stubs[1].raw_date, "22 Nov 2022");
    }

    #[test]
    fn test_parse_content() {
        let html = r#"<div class="article-content-body">
            <div class="read-page--header">Header</div>
            <p>Liputan6.com, Cianjur - Gempa terjadi siang ini.</p>
            <p class="baca-juga">Baca Juga: Lainnya</p>
            <p>Warga diminta waspada.</p>
        </div>"#;
        assert_eq!(
            Liputan6.parse_content(html),
            "Liputan6.com, Cianjur - Gempa terjadi siang ini. Warga diminta waspada."
        );
    }
}

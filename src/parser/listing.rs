use scraper::{Html, Selector};

/// One parsed listing page: resume detail links in document order, plus the
/// pagination "next" link when one exists. Absence of the next link is the
/// only thing that ends traversal; a page with zero items can still point
/// at a next page.
pub struct ListingPage {
    pub resume_urls: Vec<String>,
    pub next_url: Option<String>,
}

impl ListingPage {
    pub fn parse(html: &str, base_url: &str) -> Self {
        let doc = Html::parse_document(html);

        let link_sel = Selector::parse("div.results-i a.results-i-link").unwrap();
        let resume_urls = doc
            .select(&link_sel)
            .filter_map(|a| a.value().attr("href"))
            .map(|href| resolve(base_url, href))
            .collect();

        let next_sel = Selector::parse("nav.pagination span.next a[rel=\"next\"]").unwrap();
        let next_url = doc
            .select(&next_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve(base_url, href));

        ListingPage {
            resume_urls,
            next_url,
        }
    }
}

/// Resolve a (possibly relative) href against the site base.
fn resolve(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}

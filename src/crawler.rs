use tracing::{info, warn};

use crate::fetch::Fetch;
use crate::parser::listing::ListingPage;

/// Result of walking the listing pagination. `truncated` marks a crawl cut
/// short by a fetch failure; the URLs gathered before the failure are kept.
pub struct CrawlOutcome {
    pub urls: Vec<String>,
    pub pages_visited: usize,
    pub truncated: bool,
}

/// Walk listing pages from `start_url`, collecting detail-page URLs in
/// discovery order until the pagination runs out, the page cap is hit, or a
/// listing fetch fails.
///
/// Duplicate URLs across pages are passed through untouched; the queue's
/// unique constraint dedups downstream.
pub fn collect_resume_urls(
    fetcher: &dyn Fetch,
    base_url: &str,
    start_url: &str,
    max_pages: Option<usize>,
) -> CrawlOutcome {
    let mut urls = Vec::new();
    let mut pages_visited = 0;
    let mut truncated = false;
    let mut current = Some(start_url.to_string());

    while let Some(page_url) = current.take() {
        if max_pages.is_some_and(|cap| pages_visited >= cap) {
            break;
        }

        let html = match fetcher.fetch(&page_url) {
            Ok(html) => html,
            Err(e) => {
                warn!("Listing fetch failed, stopping pagination: {}", e);
                truncated = true;
                break;
            }
        };

        let page = ListingPage::parse(&html, base_url);
        pages_visited += 1;
        info!(
            "Listing page {}: {} resumes",
            pages_visited,
            page.resume_urls.len()
        );
        urls.extend(page.resume_urls);
        current = page.next_url;
    }

    CrawlOutcome {
        urls,
        pages_visited,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::fetch::FetchError;

    /// Canned-document fetcher; unknown URLs fail like a dead server.
    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    impl Fetch for MapFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.pages.get(url).cloned().ok_or(FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        }
    }

    fn listing(items: &[&str], next: Option<&str>) -> String {
        let mut html = String::from("<html><body><div class=\"results\">");
        for href in items {
            html.push_str(&format!(
                "<div class=\"results-i\"><a class=\"results-i-link\" href=\"{}\">cv</a></div>",
                href
            ));
        }
        html.push_str("</div>");
        if let Some(next) = next {
            html.push_str(&format!(
                "<nav class=\"pagination\"><span class=\"next\">\
                 <a rel=\"next\" href=\"{}\">→</a></span></nav>",
                next
            ));
        }
        html.push_str("</body></html>");
        html
    }

    fn three_page_site() -> MapFetcher {
        let mut pages = HashMap::new();
        pages.insert(
            "https://boss.az/resumes?page=1".to_string(),
            listing(&["/resumes/1", "/resumes/2"], Some("/resumes?page=2")),
        );
        pages.insert(
            "https://boss.az/resumes?page=2".to_string(),
            listing(&["/resumes/3"], Some("/resumes?page=3")),
        );
        pages.insert(
            "https://boss.az/resumes?page=3".to_string(),
            listing(&["/resumes/4"], None),
        );
        MapFetcher { pages }
    }

    #[test]
    fn walks_until_no_next_link() {
        let out = collect_resume_urls(
            &three_page_site(),
            "https://boss.az",
            "https://boss.az/resumes?page=1",
            None,
        );
        assert_eq!(out.pages_visited, 3);
        assert!(!out.truncated);
        assert_eq!(
            out.urls,
            vec![
                "https://boss.az/resumes/1",
                "https://boss.az/resumes/2",
                "https://boss.az/resumes/3",
                "https://boss.az/resumes/4",
            ]
        );
    }

    #[test]
    fn page_cap_stops_early() {
        let out = collect_resume_urls(
            &three_page_site(),
            "https://boss.az",
            "https://boss.az/resumes?page=1",
            Some(2),
        );
        assert_eq!(out.pages_visited, 2);
        assert_eq!(out.urls.len(), 3);
    }

    #[test]
    fn fetch_failure_keeps_partial_results() {
        let mut fetcher = three_page_site();
        fetcher.pages.remove("https://boss.az/resumes?page=3");
        let out = collect_resume_urls(
            &fetcher,
            "https://boss.az",
            "https://boss.az/resumes?page=1",
            None,
        );
        assert!(out.truncated);
        assert_eq!(out.pages_visited, 2);
        assert_eq!(out.urls.len(), 3);
    }

    #[test]
    fn empty_page_does_not_end_pagination() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://boss.az/resumes?page=1".to_string(),
            listing(&[], Some("/resumes?page=2")),
        );
        pages.insert(
            "https://boss.az/resumes?page=2".to_string(),
            listing(&["/resumes/9"], None),
        );
        let out = collect_resume_urls(
            &MapFetcher { pages },
            "https://boss.az",
            "https://boss.az/resumes?page=1",
            None,
        );
        assert_eq!(out.pages_visited, 2);
        assert_eq!(out.urls, vec!["https://boss.az/resumes/9"]);
    }

    #[test]
    fn failing_first_page_yields_empty_crawl() {
        let out = collect_resume_urls(
            &MapFetcher {
                pages: HashMap::new(),
            },
            "https://boss.az",
            "https://boss.az/resumes?page=1",
            None,
        );
        assert!(out.truncated);
        assert!(out.urls.is_empty());
        assert_eq!(out.pages_visited, 0);
    }
}

use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;

use super::first_text;

/// Top-of-page fields: the uniquely-classed title/salary/seeker elements
/// plus the two counters buried in the secondary header's text.
pub struct Header {
    pub title: Option<String>,
    pub salary: Option<String>,
    pub seeker_name: Option<String>,
    pub listing_number: Option<String>,
    pub view_count: Option<String>,
}

pub fn extract(doc: &Html) -> Header {
    let secondary = first_text(doc, "div.post-header-secondary");
    let (listing_number, view_count) = match &secondary {
        Some(text) => (listing_number(text), view_count(text)),
        None => (None, None),
    };

    Header {
        title: first_text(doc, "h1.post-title"),
        salary: first_text(doc, "span.post-salary.salary"),
        seeker_name: first_text(doc, "div.post-seeker"),
        listing_number,
        view_count,
    }
}

// The two counters share one text block but are matched independently:
// either can be missing without affecting the other.

fn listing_number(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"Elan #(\d+)").unwrap());
    re.captures(text).map(|c| c[1].to_string())
}

fn view_count(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"Baxışların sayı:\s*(\d+)").unwrap());
    re.captures(text).map(|c| c[1].to_string())
}

pub mod extract;
pub mod listing;

use crate::db::{FetchedPage, ResumeRow};

/// One pass per stored document: HTML → DOM → one resume row.
pub fn process_page(page: &FetchedPage) -> ResumeRow {
    let doc = scraper::Html::parse_document(&page.html);
    extract::extract_resume(&doc, &page.url)
}

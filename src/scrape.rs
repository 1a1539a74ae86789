use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::PageFetchRow;
use crate::fetch::{Fetch, FetchError};

/// Scrape stats returned after the queue drain.
pub struct ScrapeStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Fetch queued detail pages one at a time, saving each result to the
/// store as it arrives. A failed fetch is recorded as an error row and the
/// page is still marked visited, so one dead resume never stalls the rest.
pub fn scrape_pages(
    conn: &Connection,
    fetcher: &dyn Fetch,
    pages: Vec<(i64, String)>,
) -> Result<ScrapeStats> {
    let total = pages.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Prepare statements once, reuse for each row
    let mut insert_stmt = conn.prepare(
        "INSERT INTO page_data (page_id, url, html, status, error)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let mut update_stmt =
        conn.prepare("UPDATE pages SET visited = 1, visited_at = datetime('now') WHERE id = ?1")?;

    let mut ok = 0usize;
    let mut errors = 0usize;

    for (page_id, url) in pages {
        let row = match fetcher.fetch(&url) {
            Ok(html) => PageFetchRow {
                page_id,
                url,
                html: Some(html),
                status: None,
                error: None,
            },
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                let status = match &e {
                    FetchError::Status { status, .. } => Some(status.as_u16() as i32),
                    FetchError::Transport(_) => None,
                };
                PageFetchRow {
                    page_id,
                    url,
                    html: None,
                    status,
                    error: Some(e.to_string()),
                }
            }
        };

        if row.error.is_some() {
            errors += 1;
        } else {
            ok += 1;
        }

        insert_stmt.execute(rusqlite::params![
            row.page_id,
            row.url,
            row.html,
            row.status,
            row.error,
        ])?;
        update_stmt.execute(rusqlite::params![row.page_id])?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Scraped {} pages ({} ok, {} errors)", total, ok, errors);

    Ok(ScrapeStats { total, ok, errors })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::db;

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

    #[test]
    fn errors_skip_but_queue_drains() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        db::insert_pages(
            &conn,
            &[
                "https://boss.az/resumes/1".to_string(),
                "https://boss.az/resumes/2".to_string(),
            ],
        )
        .unwrap();

        let mut pages = HashMap::new();
        pages.insert(
            "https://boss.az/resumes/1".to_string(),
            "<html></html>".to_string(),
        );
        let fetcher = MapFetcher { pages };

        let queued = db::fetch_unvisited(&conn, None).unwrap();
        let stats = scrape_pages(&conn, &fetcher, queued).unwrap();

        assert_eq!(stats.total, 2);
        assert_eq!(stats.ok, 1);
        assert_eq!(stats.errors, 1);
        // Both pages are visited: the failed one never blocks the queue.
        assert!(db::fetch_unvisited(&conn, None).unwrap().is_empty());
        // Only the successful page is available for processing.
        assert_eq!(db::fetch_unprocessed(&conn, None).unwrap().len(), 1);
    }
}

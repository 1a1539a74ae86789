use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = std::path::Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS pages (
            id         INTEGER PRIMARY KEY,
            url        TEXT UNIQUE NOT NULL,
            visited    BOOLEAN NOT NULL DEFAULT 0,
            visited_at TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_pages_visited ON pages(visited);

        CREATE TABLE IF NOT EXISTS page_data (
            id         INTEGER PRIMARY KEY,
            page_id    INTEGER NOT NULL REFERENCES pages(id),
            url        TEXT NOT NULL,
            html       TEXT,
            status     INTEGER,
            error      TEXT,
            fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_page_data_url ON page_data(url);

        -- Extracted rows, one per resume, keyed by source URL.
        CREATE TABLE IF NOT EXISTS resumes (
            url             TEXT PRIMARY KEY,
            title           TEXT,
            seeker_name     TEXT,
            salary          TEXT,
            phone           TEXT,
            email           TEXT,
            listing_number  TEXT,
            view_count      TEXT,
            city            TEXT,
            age             TEXT,
            gender          TEXT,
            approval_date   TEXT,
            expiry_date     TEXT,
            full_name       TEXT,
            skills          TEXT,
            education       TEXT,
            education_info  TEXT,
            experience      TEXT,
            experience_info TEXT,
            personal_info   TEXT,
            processed_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

// ── Queue ──

pub fn insert_pages(conn: &Connection, urls: &[String]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO pages (url) VALUES (?1)")?;
        for url in urls {
            count += stmt.execute(rusqlite::params![url])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn fetch_unvisited(conn: &Connection, limit: Option<usize>) -> Result<Vec<(i64, String)>> {
    let sql = match limit {
        Some(n) => format!(
            "SELECT id, url FROM pages WHERE visited = 0 ORDER BY id LIMIT {}",
            n
        ),
        None => "SELECT id, url FROM pages WHERE visited = 0 ORDER BY id".to_string(),
    };
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// One fetch attempt for a queued detail page. An error row still marks the
/// page visited so the queue drains.
pub struct PageFetchRow {
    pub page_id: i64,
    pub url: String,
    pub html: Option<String>,
    pub status: Option<i32>,
    pub error: Option<String>,
}

// ── Processing ──

pub struct FetchedPage {
    pub page_data_id: i64,
    pub url: String,
    pub html: String,
}

pub fn fetch_unprocessed(conn: &Connection, limit: Option<usize>) -> Result<Vec<FetchedPage>> {
    let sql = format!(
        "SELECT pd.id, pd.url, pd.html
         FROM page_data pd
         LEFT JOIN resumes r ON r.url = pd.url
         WHERE pd.html IS NOT NULL AND r.url IS NULL
         ORDER BY pd.id{}",
        match limit {
            Some(n) => format!(" LIMIT {}", n),
            None => String::new(),
        }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(FetchedPage {
                page_data_id: row.get(0)?,
                url: row.get(1)?,
                html: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Extracted rows ──

/// One row per scraped resume. Every field except `url` is optional:
/// missing markup on the source page stores NULL, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRow {
    pub url: String,
    pub title: Option<String>,
    pub seeker_name: Option<String>,
    pub salary: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub listing_number: Option<String>,
    pub view_count: Option<String>,
    pub city: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub approval_date: Option<String>,
    pub expiry_date: Option<String>,
    pub full_name: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub education_info: Option<String>,
    pub experience: Option<String>,
    pub experience_info: Option<String>,
    pub personal_info: Option<String>,
}

pub fn save_resumes(conn: &Connection, rows: &[ResumeRow]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO resumes
             (url, title, seeker_name, salary, phone, email, listing_number,
              view_count, city, age, gender, approval_date, expiry_date,
              full_name, skills, education, education_info, experience,
              experience_info, personal_info)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20)",
        )?;
        for r in rows {
            stmt.execute(rusqlite::params![
                r.url,
                r.title,
                r.seeker_name,
                r.salary,
                r.phone,
                r.email,
                r.listing_number,
                r.view_count,
                r.city,
                r.age,
                r.gender,
                r.approval_date,
                r.expiry_date,
                r.full_name,
                r.skills,
                r.education,
                r.education_info,
                r.experience,
                r.experience_info,
                r.personal_info,
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

pub fn fetch_resumes(conn: &Connection) -> Result<Vec<ResumeRow>> {
    let mut stmt = conn.prepare(
        "SELECT url, title, seeker_name, salary, phone, email, listing_number,
                view_count, city, age, gender, approval_date, expiry_date,
                full_name, skills, education, education_info, experience,
                experience_info, personal_info
         FROM resumes ORDER BY rowid",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ResumeRow {
                url: row.get(0)?,
                title: row.get(1)?,
                seeker_name: row.get(2)?,
                salary: row.get(3)?,
                phone: row.get(4)?,
                email: row.get(5)?,
                listing_number: row.get(6)?,
                view_count: row.get(7)?,
                city: row.get(8)?,
                age: row.get(9)?,
                gender: row.get(10)?,
                approval_date: row.get(11)?,
                expiry_date: row.get(12)?,
                full_name: row.get(13)?,
                skills: row.get(14)?,
                education: row.get(15)?,
                education_info: row.get(16)?,
                experience: row.get(17)?,
                experience_info: row.get(18)?,
                personal_info: row.get(19)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub queued: usize,
    pub visited: usize,
    pub unvisited: usize,
    pub fetched: usize,
    pub errors: usize,
    pub processed: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let queued: usize = conn.query_row("SELECT COUNT(*) FROM pages", [], |r| r.get(0))?;
    let visited: usize =
        conn.query_row("SELECT COUNT(*) FROM pages WHERE visited = 1", [], |r| r.get(0))?;
    let fetched: usize = conn.query_row(
        "SELECT COUNT(*) FROM page_data WHERE html IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let errors: usize = conn.query_row(
        "SELECT COUNT(*) FROM page_data WHERE error IS NOT NULL",
        [],
        |r| r.get(0),
    )?;
    let processed: usize = conn.query_row("SELECT COUNT(*) FROM resumes", [], |r| r.get(0))?;
    Ok(Stats {
        queued,
        visited,
        unvisited: queued - visited,
        fetched,
        errors,
        processed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn row(url: &str) -> ResumeRow {
        ResumeRow {
            url: url.to_string(),
            title: Some("Proqramçı".into()),
            seeker_name: None,
            salary: Some("1200 AZN".into()),
            phone: None,
            email: None,
            listing_number: Some("12345".into()),
            view_count: None,
            city: Some("Bakı".into()),
            age: None,
            gender: None,
            approval_date: None,
            expiry_date: None,
            full_name: None,
            skills: None,
            education: None,
            education_info: None,
            experience: None,
            experience_info: None,
            personal_info: None,
        }
    }

    #[test]
    fn queue_dedups_on_url() {
        let conn = mem_conn();
        let urls = vec![
            "https://boss.az/resumes/1".to_string(),
            "https://boss.az/resumes/2".to_string(),
        ];
        assert_eq!(insert_pages(&conn, &urls).unwrap(), 2);
        // Re-queueing the same URLs inserts nothing new.
        assert_eq!(insert_pages(&conn, &urls).unwrap(), 0);
        assert_eq!(fetch_unvisited(&conn, None).unwrap().len(), 2);
    }

    #[test]
    fn unvisited_preserves_discovery_order() {
        let conn = mem_conn();
        let urls: Vec<String> = (1..=5)
            .map(|i| format!("https://boss.az/resumes/{}", i))
            .collect();
        insert_pages(&conn, &urls).unwrap();
        let got: Vec<String> = fetch_unvisited(&conn, Some(3))
            .unwrap()
            .into_iter()
            .map(|(_, u)| u)
            .collect();
        assert_eq!(got, &urls[..3]);
    }

    #[test]
    fn resumes_round_trip() {
        let conn = mem_conn();
        save_resumes(&conn, &[row("https://boss.az/resumes/9")]).unwrap();
        let rows = fetch_resumes(&conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "https://boss.az/resumes/9");
        assert_eq!(rows[0].title.as_deref(), Some("Proqramçı"));
        assert_eq!(rows[0].seeker_name, None);
    }
}

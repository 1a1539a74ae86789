mod crawler;
mod db;
mod export;
mod fetch;
mod normalize;
mod parser;
mod report;
mod scrape;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "boss_scraper", about = "Resume scraper for boss.az listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk listing pages and queue resume detail URLs
    Init {
        /// Listing URL to start from (default: configured start page)
        #[arg(long)]
        start_url: Option<String>,
        /// Max listing pages to walk (default: until pagination ends)
        #[arg(long)]
        max_pages: Option<usize>,
    },
    /// Fetch queued detail pages and store their raw HTML
    Scrape {
        /// Max pages to fetch (default: all unvisited)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Parse stored detail pages into resume rows
    Process {
        /// Max pages to process (default: all unprocessed)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Init + scrape + process in one pipeline
    Run {
        /// Max listing pages to walk
        #[arg(long)]
        max_pages: Option<usize>,
        /// Max detail pages to fetch+process
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Dump the resumes table to a file
    Export {
        /// Output path
        #[arg(short, long, default_value = "resumes.csv")]
        output: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,
    },
    /// Descriptive statistics over the collected resumes
    Report,
    /// Show pipeline counters
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Jsonl,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = settings::load();

    let result = match cli.command {
        Commands::Init {
            start_url,
            max_pages,
        } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let fetcher = fetch::HttpFetcher::new(&settings)?;
            let start = start_url.unwrap_or_else(|| settings.start_url.clone());
            let outcome =
                crawler::collect_resume_urls(&fetcher, &settings.base_url, &start, max_pages);
            let inserted = db::insert_pages(&conn, &outcome.urls)?;
            println!(
                "Queued {} new resume URLs ({} found on {} listing pages{})",
                inserted,
                outcome.urls.len(),
                outcome.pages_visited,
                if outcome.truncated { ", crawl truncated" } else { "" }
            );
            Ok(())
        }
        Commands::Scrape { limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("No unvisited pages. Run 'init' first or all pages are scraped.");
                return Ok(());
            }
            let fetcher = fetch::HttpFetcher::new(&settings)?;
            println!("Scraping {} pages (streaming to DB)...", pages.len());
            let stats = scrape::scrape_pages(&conn, &fetcher, pages)?;
            println!(
                "Done: {} scraped ({} ok, {} errors).",
                stats.total, stats.ok, stats.errors
            );
            Ok(())
        }
        Commands::Process { limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let pages = db::fetch_unprocessed(&conn, limit)?;
            if pages.is_empty() {
                println!("No unprocessed pages. Run 'scrape' first.");
                return Ok(());
            }
            println!("Processing {} pages...", pages.len());
            let saved = process_pages(&conn, &pages)?;
            println!("Saved {} resume rows.", saved);
            Ok(())
        }
        Commands::Run { max_pages, limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let fetcher = fetch::HttpFetcher::new(&settings)?;

            // Phase 1: discover
            let t_crawl = Instant::now();
            let outcome = crawler::collect_resume_urls(
                &fetcher,
                &settings.base_url,
                &settings.start_url,
                max_pages,
            );
            let inserted = db::insert_pages(&conn, &outcome.urls)?;
            println!(
                "Queued {} new resume URLs in {:.1}s",
                inserted,
                t_crawl.elapsed().as_secs_f64()
            );

            // Phase 2: scrape
            let pages = db::fetch_unvisited(&conn, limit)?;
            if pages.is_empty() {
                println!("Nothing to scrape.");
                return Ok(());
            }
            let t_scrape = Instant::now();
            println!("Pipeline: scraping {} pages (streaming to DB)...", pages.len());
            let stats = scrape::scrape_pages(&conn, &fetcher, pages)?;
            println!(
                "Scraped {} pages ({} ok, {} errors) in {:.1}s",
                stats.total,
                stats.ok,
                stats.errors,
                t_scrape.elapsed().as_secs_f64()
            );

            // Phase 3: process
            let unprocessed = db::fetch_unprocessed(&conn, None)?;
            if unprocessed.is_empty() {
                println!("Nothing to process (all scraped pages had errors).");
                return Ok(());
            }
            println!("Processing {} pages...", unprocessed.len());
            let saved = process_pages(&conn, &unprocessed)?;
            println!("Saved {} resume rows.", saved);
            Ok(())
        }
        Commands::Export { output, format } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_resumes(&conn)?;
            if rows.is_empty() {
                println!("No resumes to export. Run 'process' first.");
                return Ok(());
            }
            match format {
                ExportFormat::Csv => export::write_csv(&rows, &output)?,
                ExportFormat::Jsonl => export::write_jsonl(&rows, &output)?,
            }
            println!("Wrote {} rows to {}", rows.len(), output.display());
            Ok(())
        }
        Commands::Report => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            report::print_report(&conn)
        }
        Commands::Stats => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let s = db::get_stats(&conn)?;
            println!("Queued:    {}", s.queued);
            println!("Visited:   {}", s.visited);
            println!("Unvisited: {}", s.unvisited);
            println!("Fetched:   {}", s.fetched);
            println!("Errors:    {}", s.errors);
            println!("Processed: {}", s.processed);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn process_pages(conn: &rusqlite::Connection, pages: &[db::FetchedPage]) -> anyhow::Result<usize> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut saved = 0;
    for chunk in pages.chunks(500) {
        // One document at a time, in discovery order.
        let rows: Vec<_> = chunk.iter().map(parser::process_page).collect();
        db::save_resumes(conn, &rows)?;
        saved += rows.len();
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    Ok(saved)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

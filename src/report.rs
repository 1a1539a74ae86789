use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use itertools::Itertools;
use rusqlite::Connection;

use crate::db::{self, ResumeRow};
use crate::normalize::{classify_title, experience_midpoint_years, first_integer, JobCategory};

/// Age window considered plausible for the demographics section; values
/// outside it are treated as typos and dropped.
const AGE_RANGE: std::ops::RangeInclusive<i64> = 18..=65;

/// Experience buckets in display order, keyed by the normalizer's midpoint.
const EXPERIENCE_LEVELS: &[(f64, &str)] = &[
    (0.0, "No experience"),
    (0.5, "Under 1 year"),
    (2.0, "1-3 years"),
    (4.0, "3-5 years"),
    (6.0, "Over 5 years"),
];

/// Descriptive statistics over the collected table. All derived values
/// (salary, experience years, age, category) are computed here from the
/// raw strings; nothing is stored back.
pub fn print_report(conn: &Connection) -> Result<()> {
    let rows = db::fetch_resumes(conn)?;
    if rows.is_empty() {
        println!("No resumes processed yet. Run 'process' first.");
        return Ok(());
    }
    let total = rows.len();

    println!("Resume market report");
    println!("====================\n");
    println!("Total resumes: {}", total);

    print_categories(&rows, total);
    print_salaries(&rows);
    print_salary_by_experience(&rows);
    print_salary_by_category(&rows);
    print_ages(&rows);
    print_genders(&rows, total);
    print_cities(&rows);
    print_views(&rows);
    print_monthly_activity(&rows);

    Ok(())
}

fn category_of(row: &ResumeRow) -> JobCategory {
    row.title
        .as_deref()
        .map(classify_title)
        .unwrap_or(JobCategory::Other)
}

fn salary_of(row: &ResumeRow) -> Option<i64> {
    row.salary.as_deref().and_then(first_integer)
}

fn print_categories(rows: &[ResumeRow], total: usize) {
    let mut counts: HashMap<JobCategory, usize> = HashMap::new();
    for row in rows {
        *counts.entry(category_of(row)).or_default() += 1;
    }

    println!("\n--- Job categories ---");
    for (category, count) in counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.label().cmp(b.0.label())))
    {
        println!(
            "  {:<22} {:>6}  ({:.1}%)",
            category.label(),
            count,
            percent(count, total)
        );
    }
}

fn print_salaries(rows: &[ResumeRow]) {
    let mut salaries: Vec<i64> = rows.iter().filter_map(salary_of).collect();
    if salaries.is_empty() {
        return;
    }
    println!("\n--- Salary expectations (AZN) ---");
    println!(
        "  average {:.0}, median {:.0}, range {}-{}  ({} with salary)",
        mean(&salaries),
        median(&mut salaries),
        salaries.iter().min().unwrap(),
        salaries.iter().max().unwrap(),
        salaries.len()
    );
}

fn print_salary_by_experience(rows: &[ResumeRow]) {
    println!("\n--- Salary by experience ---");
    for &(midpoint, label) in EXPERIENCE_LEVELS {
        let mut salaries: Vec<i64> = rows
            .iter()
            .filter(|r| {
                r.experience
                    .as_deref()
                    .and_then(experience_midpoint_years)
                    .is_some_and(|y| y == midpoint)
            })
            .filter_map(salary_of)
            .collect();
        if salaries.is_empty() {
            continue;
        }
        println!(
            "  {:<14} avg {:>6.0}, median {:>6.0}  ({} samples)",
            label,
            mean(&salaries),
            median(&mut salaries),
            salaries.len()
        );
    }
}

fn print_salary_by_category(rows: &[ResumeRow]) {
    let mut by_category: HashMap<JobCategory, Vec<i64>> = HashMap::new();
    for row in rows {
        if let Some(salary) = salary_of(row) {
            by_category.entry(category_of(row)).or_default().push(salary);
        }
    }
    if by_category.is_empty() {
        return;
    }

    println!("\n--- Average salary by category ---");
    for (category, salaries) in by_category
        .into_iter()
        .sorted_by(|a, b| mean(&b.1).total_cmp(&mean(&a.1)))
    {
        println!(
            "  {:<22} {:>6.0} AZN  ({} samples)",
            category.label(),
            mean(&salaries),
            salaries.len()
        );
    }
}

fn print_ages(rows: &[ResumeRow]) {
    let mut ages: Vec<i64> = rows
        .iter()
        .filter_map(|r| r.age.as_deref().and_then(first_integer))
        .filter(|a| AGE_RANGE.contains(a))
        .collect();
    if ages.is_empty() {
        return;
    }
    println!("\n--- Age demographics ---");
    println!(
        "  average {:.0}, median {:.0}, range {}-{}",
        mean(&ages),
        median(&mut ages),
        ages.iter().min().unwrap(),
        ages.iter().max().unwrap()
    );
}

fn print_genders(rows: &[ResumeRow], total: usize) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        if let Some(gender) = row.gender.as_deref() {
            *counts.entry(gender).or_default() += 1;
        }
    }
    if counts.is_empty() {
        return;
    }
    println!("\n--- Gender ---");
    for (gender, count) in counts.into_iter().sorted_by(|a, b| b.1.cmp(&a.1)) {
        println!("  {:<12} {:>6}  ({:.1}%)", gender, count, percent(count, total));
    }
}

fn print_cities(rows: &[ResumeRow]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        if let Some(city) = row.city.as_deref() {
            let city = city.trim();
            if !city.is_empty() {
                *counts.entry(city).or_default() += 1;
            }
        }
    }
    if counts.is_empty() {
        return;
    }
    println!("\n--- Top cities ---");
    for (city, count) in counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(10)
    {
        println!("  {:<20} {:>6}", city, count);
    }
}

fn print_views(rows: &[ResumeRow]) {
    let mut views: Vec<i64> = rows
        .iter()
        .filter_map(|r| r.view_count.as_deref().and_then(first_integer))
        .collect();
    if views.is_empty() {
        return;
    }
    println!("\n--- Resume views ---");
    println!(
        "  average {:.0}, median {:.0}, max {}",
        mean(&views),
        median(&mut views),
        views.iter().max().unwrap()
    );
}

fn print_monthly_activity(rows: &[ResumeRow]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in rows {
        if let Some(month) = row.approval_date.as_deref().and_then(approval_month) {
            *counts.entry(month).or_default() += 1;
        }
    }
    if counts.is_empty() {
        return;
    }

    let months: Vec<(String, usize)> = counts.into_iter().sorted().collect();
    let last_12 = months.len().saturating_sub(12);

    println!("\n--- Monthly activity ---");
    for (month, count) in &months[last_12..] {
        println!("  {}  {:>6}", month, count);
    }
}

/// "September 14, 2025" -> "2025-09". Dates the site renders in another
/// language simply drop out of the trend.
fn approval_month(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%B %d, %Y")
        .ok()
        .map(|d| d.format("%Y-%m").to_string())
}

fn mean(values: &[i64]) -> f64 {
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

fn median(values: &mut [i64]) -> f64 {
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) as f64 / 2.0
    } else {
        values[mid] as f64
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;

use crate::db::ResumeRow;

/// Output schema, in row order. Matches the resumes table columns.
pub const COLUMNS: [&str; 20] = [
    "url",
    "title",
    "seeker_name",
    "salary",
    "phone",
    "email",
    "listing_number",
    "view_count",
    "city",
    "age",
    "gender",
    "approval_date",
    "expiry_date",
    "full_name",
    "skills",
    "education",
    "education_info",
    "experience",
    "experience_info",
    "personal_info",
];

pub fn write_csv(rows: &[ResumeRow], path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let header: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    writeln!(w, "{}", format_row(&header))?;
    for row in rows {
        writeln!(w, "{}", format_row(&cells(row)))?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_jsonl(rows: &[ResumeRow], path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut w, row)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

fn cells(r: &ResumeRow) -> Vec<String> {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        r.url.clone(),
        opt(&r.title),
        opt(&r.seeker_name),
        opt(&r.salary),
        opt(&r.phone),
        opt(&r.email),
        opt(&r.listing_number),
        opt(&r.view_count),
        opt(&r.city),
        opt(&r.age),
        opt(&r.gender),
        opt(&r.approval_date),
        opt(&r.expiry_date),
        opt(&r.full_name),
        opt(&r.skills),
        opt(&r.education),
        opt(&r.education_info),
        opt(&r.experience),
        opt(&r.experience_info),
        opt(&r.personal_info),
    ]
}

/// Minimal CSV quoting: only fields carrying the separator, a quote, or a
/// line break get wrapped, with embedded quotes doubled.
fn format_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| {
            if needs_quotes(cell) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_cells_stay_unquoted() {
        let cells = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_row(&cells), "a,b");
    }

    #[test]
    fn separator_newline_and_quote_force_quoting() {
        let cells = vec![
            "Python, SQL".to_string(),
            "line1\nline2".to_string(),
            "he said \"hi\"".to_string(),
        ];
        assert_eq!(
            format_row(&cells),
            "\"Python, SQL\",\"line1\nline2\",\"he said \"\"hi\"\"\""
        );
    }

    #[test]
    fn header_matches_row_width() {
        let row = ResumeRow {
            url: "u".into(),
            title: None,
            seeker_name: None,
            salary: None,
            phone: None,
            email: None,
            listing_number: None,
            view_count: None,
            city: None,
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
        };
        assert_eq!(cells(&row).len(), COLUMNS.len());
    }
}

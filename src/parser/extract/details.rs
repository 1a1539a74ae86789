use scraper::{Html, Selector};

use super::element_text;

/// The six free-text sections of a resume, each tagged with its own class
/// on a definition-value element.
pub struct Details {
    pub skills: Option<String>,
    pub education: Option<String>,
    pub education_info: Option<String>,
    pub experience: Option<String>,
    pub experience_info: Option<String>,
    pub personal_info: Option<String>,
}

pub fn extract(doc: &Html) -> Details {
    Details {
        skills: field_text(doc, "skills"),
        education: field_text(doc, "education"),
        education_info: field_text(doc, "education_info"),
        experience: field_text(doc, "experience"),
        experience_info: field_text(doc, "experience_info"),
        personal_info: field_text(doc, "personal"),
    }
}

/// Text of one tagged section. Paragraph children are collected in document
/// order, trimmed, and the non-empty ones joined with newlines; a section
/// without paragraph markup contributes its whole trimmed text instead.
fn field_text(doc: &Html, tag: &str) -> Option<String> {
    let sel = Selector::parse(&format!("dd.{}.params-i-val", tag)).unwrap();
    let element = doc.select(&sel).next()?;

    let p_sel = Selector::parse("p").unwrap();
    let mut has_paragraphs = false;
    let mut parts = Vec::new();
    for p in element.select(&p_sel) {
        has_paragraphs = true;
        let text = element_text(p);
        if !text.is_empty() {
            parts.push(text);
        }
    }

    if has_paragraphs {
        Some(parts.join("\n"))
    } else {
        Some(element_text(element))
    }
}

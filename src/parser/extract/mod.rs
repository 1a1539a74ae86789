pub mod contact;
pub mod details;
pub mod header;
pub mod params;

use scraper::{ElementRef, Html, Selector};

use crate::db::ResumeRow;
use self::params::ParamLabel;

/// Build the single row for one detail document.
///
/// Every step degrades independently: a missing element nulls its own
/// field and nothing else. Only the source URL is guaranteed present.
pub fn extract_resume(doc: &Html, url: &str) -> ResumeRow {
    let header = header::extract(doc);
    let contact = contact::extract(doc);
    let params = params::extract(doc);
    let details = details::extract(doc);

    ResumeRow {
        url: url.to_string(),
        title: header.title,
        seeker_name: header.seeker_name,
        salary: header.salary,
        phone: contact.phone,
        email: contact.email,
        listing_number: header.listing_number,
        view_count: header.view_count,
        city: params.get(ParamLabel::City),
        age: params.get(ParamLabel::Age),
        gender: params.get(ParamLabel::Gender),
        approval_date: params.get(ParamLabel::ApprovalDate),
        expiry_date: params.get(ParamLabel::ExpiryDate),
        full_name: params.get(ParamLabel::FullName),
        skills: details.skills,
        education: details.education,
        education_info: details.education_info,
        experience: details.experience,
        experience_info: details.experience_info,
        personal_info: details.personal_info,
    }
}

/// Trimmed text of the first element matching a selector.
pub(crate) fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).unwrap();
    doc.select(&sel).next().map(element_text)
}

/// All descendant text of an element, concatenated and trimmed.
pub(crate) fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

// ── Tests ──

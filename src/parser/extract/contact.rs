use scraper::{Html, Selector};

pub struct Contact {
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Phone and email come from anchor hrefs, not display text: the phone link
/// carries a fixed class, the email link is recognized by its mailto:
/// scheme.
pub fn extract(doc: &Html) -> Contact {
    let phone_sel = Selector::parse("a.phone").unwrap();
    let phone = doc
        .select(&phone_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| strip_scheme(href, "tel:"));

    let email_sel = Selector::parse("a[href^=\"mailto:\"]").unwrap();
    let email = doc
        .select(&email_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| strip_scheme(href, "mailto:"));

    Contact { phone, email }
}

fn strip_scheme(href: &str, scheme: &str) -> String {
    href.strip_prefix(scheme).unwrap_or(href).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_prefixes_are_stripped() {
        assert_eq!(strip_scheme("tel:+994501234567", "tel:"), "+994501234567");
        assert_eq!(strip_scheme("mailto:a@b.az", "mailto:"), "a@b.az");
        // href without the scheme is kept as-is
        assert_eq!(strip_scheme("+994501234567", "tel:"), "+994501234567");
    }
}

//! Pure normalization over the free-text fields of a resume row.
//!
//! Nothing here touches the network or the database; the report derives its
//! analytical columns (salary, experience years, age, job category) by
//! running these over the raw strings the extractor stored.

use std::sync::OnceLock;

use regex::Regex;

/// First maximal run of digits in `text`, parsed as an integer.
///
/// "1200 AZN" -> 1200, "25 yaş" -> 25. Returns None when no digit run
/// exists or the run overflows i64.
pub fn first_integer(text: &str) -> Option<i64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d+").unwrap());
    re.find(text)?.as_str().parse().ok()
}

/// Experience bucket phrases mapped to a numeric midpoint, in priority
/// order. Earlier rules win when phrases overlap, so the order below is
/// part of the contract, not an accident of declaration.
///
/// Each rule carries the Azerbaijani, Russian and English phrasings the
/// site shows for that bucket.
const EXPERIENCE_BUCKETS: &[(&[&str], f64)] = &[
    (&["təcrübəsiz", "без опыта", "no experience"], 0.0),
    (&["1 ildən az", "менее года", "less than 1 year"], 0.5),
    (&["1 ildən 3", "от 1 года до 3", "1 to 3 years"], 2.0),
    (&["3 ildən 5", "от 3 до 5", "3 to 5 years"], 4.0),
    (&["5 ildən artıq", "более 5", "more than 5 years"], 6.0),
];

/// Map a free-text experience bucket to its midpoint in years.
/// Unrecognized phrasing returns None.
pub fn experience_midpoint_years(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    EXPERIENCE_BUCKETS
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| lower.contains(p)))
        .map(|&(_, years)| years)
}

/// Closed set of job categories a resume title can classify into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobCategory {
    ItTechnology,
    FinanceAccounting,
    SalesMarketing,
    HrAdministration,
    Engineering,
    Healthcare,
    Education,
    Logistics,
    CustomerService,
    Other,
}

impl JobCategory {
    pub fn label(self) -> &'static str {
        match self {
            JobCategory::ItTechnology => "IT & Technology",
            JobCategory::FinanceAccounting => "Finance & Accounting",
            JobCategory::SalesMarketing => "Sales & Marketing",
            JobCategory::HrAdministration => "HR & Administration",
            JobCategory::Engineering => "Engineering",
            JobCategory::Healthcare => "Healthcare",
            JobCategory::Education => "Education",
            JobCategory::Logistics => "Logistics",
            JobCategory::CustomerService => "Customer Service",
            JobCategory::Other => "Other",
        }
    }
}

/// Category keywords, one tuple per category. Declared order is the
/// tie-break: the first category with any keyword hit wins. Keywords cover
/// Azerbaijani, Russian and English title vocabulary.
const CATEGORY_KEYWORDS: &[(JobCategory, &[&str])] = &[
    (
        JobCategory::ItTechnology,
        &[
            "proqramçı",
            "developer",
            "programmer",
            "it",
            "sistem",
            "designer",
            "dizayner",
            "программист",
        ],
    ),
    (
        JobCategory::FinanceAccounting,
        &["mühasib", "maliyyə", "accountant", "finance", "bank", "бухгалтер"],
    ),
    (
        JobCategory::SalesMarketing,
        &["satış", "marketing", "sales", "reklam", "menecer", "продаж", "маркетинг"],
    ),
    (
        JobCategory::HrAdministration,
        &["kadr", "hr", "human resource", "insan resurs", "ofis", "кадр"],
    ),
    (
        JobCategory::Engineering,
        &["mühəndis", "engineer", "texniki", "инженер"],
    ),
    (
        JobCategory::Healthcare,
        &["həkim", "tibb", "medical", "doctor", "nurse", "врач"],
    ),
    (
        JobCategory::Education,
        &["müəllim", "teacher", "təhsil", "education", "учитель"],
    ),
    (
        JobCategory::Logistics,
        &["logistika", "logistics", "driver", "sürücü", "водитель"],
    ),
    (
        JobCategory::CustomerService,
        &["müştəri", "customer", "operator", "call center", "оператор"],
    ),
];

/// Classify a resume title into a job category by keyword containment.
///
/// Keywords of one or two characters ("it", "hr") only match as whole
/// words; longer keywords match as substrings.
pub fn classify_title(title: &str) -> JobCategory {
    let lower = title.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| keyword_hit(&lower, k)))
        .map(|&(category, _)| category)
        .unwrap_or(JobCategory::Other)
}

fn keyword_hit(haystack: &str, keyword: &str) -> bool {
    if keyword.chars().count() <= 2 {
        contains_word(haystack, keyword)
    } else {
        haystack.contains(keyword)
    }
}

/// Case-insensitive whole-word containment (best-effort; a needle that
/// fails to compile counts as no match).
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let pattern = format!(r"(?i)\b{}\b", regex::escape(needle));
    Regex::new(&pattern)
        .ok()
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_integer_picks_first_run() {
        assert_eq!(first_integer("1200 AZN"), Some(1200));
        assert_eq!(first_integer("500-700 AZN"), Some(500));
        assert_eq!(first_integer("25 yaş"), Some(25));
        assert_eq!(first_integer("no digits"), None);
        assert_eq!(first_integer(""), None);
    }

    #[test]
    fn experience_buckets_map_to_midpoints() {
        assert_eq!(experience_midpoint_years("Təcrübəsiz"), Some(0.0));
        assert_eq!(experience_midpoint_years("1 ildən az"), Some(0.5));
        assert_eq!(experience_midpoint_years("1 ildən 3 ilə qədər"), Some(2.0));
        assert_eq!(experience_midpoint_years("3 ildən 5 ilə qədər"), Some(4.0));
        assert_eq!(experience_midpoint_years("5 ildən artıq"), Some(6.0));
        assert_eq!(experience_midpoint_years("Без опыта"), Some(0.0));
        assert_eq!(experience_midpoint_years("более 5 лет"), Some(6.0));
        assert_eq!(experience_midpoint_years("something else"), None);
    }

    #[test]
    fn classify_common_titles() {
        assert_eq!(classify_title("Proqramçı"), JobCategory::ItTechnology);
        assert_eq!(classify_title("Mühasib"), JobCategory::FinanceAccounting);
        assert_eq!(classify_title("Satış meneceri"), JobCategory::SalesMarketing);
        assert_eq!(classify_title("Mühəndis"), JobCategory::Engineering);
        assert_eq!(classify_title("unrelated title"), JobCategory::Other);
    }

    #[test]
    fn short_keywords_need_word_boundaries() {
        // "title" contains "it" as a substring but is not an IT title
        assert_eq!(classify_title("quality title"), JobCategory::Other);
        assert_eq!(classify_title("IT mütəxəssisi"), JobCategory::ItTechnology);
        assert_eq!(classify_title("HR assistant"), JobCategory::HrAdministration);
    }

    #[test]
    fn declared_order_breaks_ties() {
        // Hits both IT ("sistem") and Sales ("satış"); IT is declared first.
        assert_eq!(
            classify_title("Satış sistemləri proqramçısı"),
            JobCategory::ItTechnology
        );
    }

    #[test]
    fn category_labels_are_stable() {
        assert_eq!(JobCategory::ItTechnology.label(), "IT & Technology");
        assert_eq!(JobCategory::Other.label(), "Other");
    }
}

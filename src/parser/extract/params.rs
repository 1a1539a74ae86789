use std::collections::HashMap;

use scraper::{Html, Selector};

use super::element_text;

/// Closed set of parameter-table labels the extractor understands.
///
/// The site renders labels in Azerbaijani; the translation to this enum is
/// an exact-string lookup, and any label outside it is an explicit no-op
/// rather than a silently-growing dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLabel {
    City,
    Age,
    Gender,
    ApprovalDate,
    ExpiryDate,
    FullName,
}

impl ParamLabel {
    fn from_site_label(label: &str) -> Option<Self> {
        match label {
            "Şəhər" => Some(ParamLabel::City),
            "Yaş" => Some(ParamLabel::Age),
            "Cins" => Some(ParamLabel::Gender),
            "Elanın tarixi" => Some(ParamLabel::ApprovalDate),
            "Bitmə tarixi" => Some(ParamLabel::ExpiryDate),
            "Ad" => Some(ParamLabel::FullName),
            _ => None,
        }
    }
}

/// Label→value mapping collected from the parameter list. When a label
/// repeats, the last occurrence wins.
pub struct ParamTable {
    values: HashMap<ParamLabel, String>,
}

impl ParamTable {
    pub fn get(&self, label: ParamLabel) -> Option<String> {
        self.values.get(&label).cloned()
    }
}

pub fn extract(doc: &Html) -> ParamTable {
    let item_sel = Selector::parse("li.params-i").unwrap();
    let label_sel = Selector::parse(".params-i-label").unwrap();
    let value_sel = Selector::parse(".params-i-val").unwrap();

    let mut values = HashMap::new();
    for item in doc.select(&item_sel) {
        let label = item.select(&label_sel).next();
        let value = item.select(&value_sel).next();
        let (Some(label), Some(value)) = (label, value) else {
            continue;
        };
        let Some(key) = ParamLabel::from_site_label(&element_text(label)) else {
            continue;
        };
        values.insert(key, element_text(value));
    }
    ParamTable { values }
}

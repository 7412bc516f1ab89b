//! Declarative extraction rules.
//!
//! Adding a label synonym or a date notation is a data change here, not a
//! matcher change.

use serde::{Deserialize, Serialize};

/// The packaging fields we know how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelField {
    ManufacturingDate,
    ExpiryDate,
    CompanyName,
}

impl LabelField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelField::ManufacturingDate => "manufacturing_date",
            LabelField::ExpiryDate => "expiry_date",
            LabelField::CompanyName => "company_name",
        }
    }
}

// --- Value tokens ---

/// `12 JAN 2024`; whitespace between parts is optional.
pub const DAY_MONTH_NAME_YEAR: &str = r"[0-9]{1,2}\s*[A-Z]{3}\s*[0-9]{4}";

/// `12/01/2024`
pub const SLASHED_DATE: &str = r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}";

/// `12-01-24`, `12/01/24`, `12-01-2024`
pub const DELIMITED_DATE: &str = r"[0-9]{1,2}[-/][0-9]{1,2}[-/][0-9]{2,4}";

/// `30 Days`
pub const DAYS_DURATION: &str = r"[0-9]+\s*Days";

/// `2 Year` (also the prefix of `2 Years`).
pub const YEARS_DURATION: &str = r"[0-9]+\s*Year";

/// A greedy run of name characters, trimmed after capture.
pub const COMPANY_RUN: &str = r"[A-Za-z0-9\s&,.]+";

/// Shape of the value following a label.
///
/// Alternatives are tried in order at each position, so earlier entries win
/// when several could match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueGrammar {
    pub alternatives: Vec<String>,
    /// Strip surrounding whitespace from the captured value.
    pub trim: bool,
}

impl ValueGrammar {
    pub fn new<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: alternatives.into_iter().map(Into::into).collect(),
            trim: false,
        }
    }

    pub fn trimmed(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Absolute date notations shared by manufacturing and expiry labels.
    pub fn absolute_date() -> Self {
        Self::new([DAY_MONTH_NAME_YEAR, SLASHED_DATE, DELIMITED_DATE])
    }

    /// Absolute dates, then relative durations counted from manufacture.
    pub fn date_or_duration() -> Self {
        let mut grammar = Self::absolute_date();
        grammar.alternatives.push(DAYS_DURATION.to_string());
        grammar.alternatives.push(YEARS_DURATION.to_string());
        grammar
    }

    pub fn company_name() -> Self {
        Self::new([COMPANY_RUN]).trimmed()
    }
}

/// One extraction rule: `labels` followed by optional whitespace and a value
/// matching `grammar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: LabelField,
    /// Literal label phrasings, matched case-insensitively in this order.
    pub labels: Vec<String>,
    pub grammar: ValueGrammar,
}

impl FieldRule {
    pub fn new<I, S>(field: LabelField, labels: I, grammar: ValueGrammar) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field,
            labels: labels.into_iter().map(Into::into).collect(),
            grammar,
        }
    }

    /// Append label synonyms after the existing ones.
    pub fn with_extra_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Regular expression source for this rule.
    ///
    /// Only whitespace may separate label and value: `Mfg Date: 12/01/2024`
    /// does not match because of the colon.
    pub fn pattern(&self) -> String {
        let labels = self
            .labels
            .iter()
            .map(|label| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        let values = self.grammar.alternatives.join("|");
        format!(r"(?i)(?:{labels})\s*(?P<value>{values})")
    }
}

/// Built-in rules, one per field.
pub fn standard_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::new(
            LabelField::ManufacturingDate,
            [
                "Mfg Date",
                "Manufactured On",
                "Manufacture Date",
                "Packed On",
                "Pack Date",
                "Made On",
                "Date of Manufacture",
            ],
            ValueGrammar::absolute_date(),
        ),
        FieldRule::new(
            LabelField::ExpiryDate,
            [
                "Exp Date",
                "Expiry Date",
                "Expired On",
                "Best Before",
                "Best Before Use",
                "Use By",
            ],
            ValueGrammar::date_or_duration(),
        ),
        FieldRule::new(
            LabelField::CompanyName,
            ["Mktd by", "Pkd by", "Manufactured by", "Marketing By"],
            ValueGrammar::company_name(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_rules_cover_each_field_once() {
        let rules = standard_rules();
        let fields: Vec<_> = rules.iter().map(|r| r.field).collect();
        assert_eq!(
            fields,
            vec![
                LabelField::ManufacturingDate,
                LabelField::ExpiryDate,
                LabelField::CompanyName
            ]
        );
    }

    #[test]
    fn pattern_escapes_labels_and_keeps_order() {
        let rule = FieldRule::new(
            LabelField::CompanyName,
            ["Mfd. by", "Pkd by"],
            ValueGrammar::company_name(),
        );
        let pattern = rule.pattern();
        assert!(pattern.starts_with(r"(?i)(?:Mfd\. by|Pkd by)\s*(?P<value>"));
    }

    #[test]
    fn expiry_grammar_keeps_durations_after_dates() {
        let grammar = ValueGrammar::date_or_duration();
        assert_eq!(grammar.alternatives.len(), 5);
        assert_eq!(grammar.alternatives[3], DAYS_DURATION);
        assert_eq!(grammar.alternatives[4], YEARS_DURATION);
        assert!(!grammar.trim);
    }

    #[test]
    fn extra_labels_are_appended() {
        let rule = standard_rules()
            .into_iter()
            .find(|r| r.field == LabelField::CompanyName)
            .unwrap()
            .with_extra_labels(["Imported by"]);
        assert_eq!(rule.labels.last().map(String::as_str), Some("Imported by"));
        assert_eq!(rule.labels[0], "Mktd by");
    }

    #[test]
    fn field_keys_deserialize_from_camel_case() {
        let field: LabelField = serde_json::from_str("\"expiryDate\"").unwrap();
        assert_eq!(field, LabelField::ExpiryDate);
        assert_eq!(field.as_str(), "expiry_date");
    }
}

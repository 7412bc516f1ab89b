//! Generic matcher over [`FieldRule`] records.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use labelscan_core::ExtractedFields;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::rules::{standard_rules, FieldRule, LabelField};

static STANDARD: Lazy<FieldExtractor> = Lazy::new(|| {
    FieldExtractor::new(standard_rules()).expect("built-in extraction rules must compile")
});

#[derive(Clone)]
struct CompiledRule {
    field: LabelField,
    regex: Regex,
    trim: bool,
}

/// Compiled rule set.
///
/// Rules are evaluated independently. For each field the leftmost match in
/// the flattened text wins; when several rules target the same field, the
/// first rule (in list order) that matches anywhere supplies the value.
#[derive(Clone)]
pub struct FieldExtractor {
    rules: Vec<CompiledRule>,
}

impl FieldExtractor {
    /// Compile a rule list.
    pub fn new(rules: Vec<FieldRule>) -> Result<Self> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                // An empty alternative would match a value with no label.
                if rule.labels.iter().any(|label| label.trim().is_empty()) {
                    bail!("blank label in extraction rule for {}", rule.field.as_str());
                }
                let pattern = rule.pattern();
                let regex = Regex::new(&pattern).with_context(|| {
                    format!("invalid extraction rule for {}", rule.field.as_str())
                })?;
                Ok(CompiledRule {
                    field: rule.field,
                    regex,
                    trim: rule.grammar.trim,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// The shared built-in extractor.
    pub fn standard() -> &'static FieldExtractor {
        &STANDARD
    }

    /// Built-in rules with configured synonyms appended per field.
    pub fn with_extra_labels(extra: &HashMap<LabelField, Vec<String>>) -> Result<Self> {
        let rules = standard_rules()
            .into_iter()
            .map(|rule| match extra.get(&rule.field) {
                Some(labels) => rule.with_extra_labels(labels.iter().cloned()),
                None => rule,
            })
            .collect();
        Self::new(rules)
    }

    /// Extract fields from recognized strings in engine order.
    pub fn extract<S: AsRef<str>>(&self, texts: &[S]) -> ExtractedFields {
        let text = flatten(texts);
        let mut fields = ExtractedFields::default();

        for rule in &self.rules {
            let slot = match rule.field {
                LabelField::ManufacturingDate => &mut fields.manufacturing_date,
                LabelField::ExpiryDate => &mut fields.expiry_date,
                LabelField::CompanyName => &mut fields.company_name,
            };
            if slot.is_some() {
                continue;
            }
            *slot = rule.find(&text);
            if slot.is_some() {
                debug!(field = rule.field.as_str(), "Matched label field");
            }
        }

        fields
    }
}

impl CompiledRule {
    fn find(&self, text: &str) -> Option<String> {
        let captured = self.regex.captures(text)?.name("value")?.as_str();
        let value = if self.trim { captured.trim() } else { captured };
        // A label followed only by whitespace captures nothing useful.
        (!value.is_empty()).then(|| value.to_string())
    }
}

/// Join recognized strings with single spaces, preserving order.
///
/// A label and its value often land in separate detections; joining lets one
/// match span both.
pub fn flatten<S: AsRef<str>>(texts: &[S]) -> String {
    texts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract fields with the built-in rules.
pub fn extract_fields<S: AsRef<str>>(texts: &[S]) -> ExtractedFields {
    FieldExtractor::standard().extract(texts)
}
